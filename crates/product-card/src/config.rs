//! Card configuration.

use serde::{Deserialize, Serialize};

use crate::error::CardError;
use crate::logging::{LogFormat, LogLevel};

/// Default wrapper column class.
pub const DEFAULT_WRAPPER_CLASS: &str = "col-md-4 col-sm-6 col-xs-8 col-12 mb-4";

/// How the selected variant reacts when the product record is replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// Keep the selection made at mount or by the user, even if the new
    /// product no longer offers it.
    #[default]
    Retain,
    /// Reset to the new first option when the current selection is no longer
    /// one of the new product's options.
    Resync,
}

/// Presentation settings for a product card.
///
/// Defaults reproduce the stock card; every field may be overridden from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Class applied to the outer wrapper when the caller supplies none.
    pub wrapper_class: String,
    /// Title shown when the record has neither title nor name.
    pub placeholder_title: String,
    /// Maximum number of description characters before truncation.
    pub description_limit: usize,
    /// Marker appended to a truncated description.
    pub ellipsis: String,
    /// Prefix printed before the price.
    pub currency_symbol: String,
    pub buy_label: String,
    pub buy_aria_label: String,
    pub add_to_cart_label: String,
    pub out_of_stock_label: String,
    pub selection_policy: SelectionPolicy,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            wrapper_class: DEFAULT_WRAPPER_CLASS.to_string(),
            placeholder_title: "Untitled".to_string(),
            description_limit: 70,
            ellipsis: "...".to_string(),
            currency_symbol: "$".to_string(),
            buy_label: "Buy".to_string(),
            buy_aria_label: "Buy product".to_string(),
            add_to_cart_label: "Add to cart".to_string(),
            out_of_stock_label: "Out of Stock".to_string(),
            selection_policy: SelectionPolicy::Retain,
            log_level: LogLevel::Info,
            log_format: LogFormat::Json,
        }
    }
}

impl CardConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, CardError> {
        Ok(toml::from_str(source)?)
    }

    /// Set the default wrapper class.
    pub fn with_wrapper_class(mut self, class: impl Into<String>) -> Self {
        self.wrapper_class = class.into();
        self
    }

    /// Set the placeholder title.
    pub fn with_placeholder_title(mut self, title: impl Into<String>) -> Self {
        self.placeholder_title = title.into();
        self
    }

    /// Set the description truncation limit.
    pub fn with_description_limit(mut self, limit: usize) -> Self {
        self.description_limit = limit;
        self
    }

    /// Set the currency symbol.
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Set the selection policy.
    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.selection_policy = policy;
        self
    }

    /// Set the minimum log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Set the log output format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }
}
