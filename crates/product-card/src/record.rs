//! Product record model.
//!
//! A [`ProductRecord`] is owned by the caller and only read by the card. It
//! keeps the caller's fields exactly as given and exposes typed accessors for
//! the ones the card understands. Every field is optional, and an accessor
//! whose field carries the wrong JSON type reports it as absent. The stored
//! value is left untouched, so the record handed back on add-to-cart is the
//! caller's record, not a projection of it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::CardError;

/// Field name under which the chosen variant is attached to the record.
pub const SELECTED_VARIANT_FIELD: &str = "selectedVariant";

/// Product identifier, numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(Number),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<u64> for ProductId {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<ProductId> for Value {
    fn from(id: ProductId) -> Self {
        match id {
            ProductId::Number(n) => Value::Number(n),
            ProductId::Text(s) => Value::String(s),
        }
    }
}

/// The three record fields a variant list may come from, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantSource {
    Variants,
    Sizes,
    Options,
}

impl VariantSource {
    /// All sources, highest precedence first.
    pub const PRECEDENCE: [VariantSource; 3] = [Self::Variants, Self::Sizes, Self::Options];

    /// JSON field name of this source.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Variants => "variants",
            Self::Sizes => "sizes",
            Self::Options => "options",
        }
    }
}

/// Stock information as the record expresses it.
///
/// An explicit flag always wins over a count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StockIndicator {
    /// `inStock` was a boolean.
    Flag(bool),
    /// `stock` was a number.
    Count(f64),
    /// Neither was present.
    Unknown,
}

/// Loosely-shaped product record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRecord {
    fields: Map<String, Value>,
}

impl ProductRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a record from a JSON document.
    ///
    /// The document must be an object; individual fields are never rejected.
    pub fn from_json(json: &str) -> Result<Self, CardError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a record from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, CardError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(CardError::InvalidRecord(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// All fields as given.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Raw value of one field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set any field, replacing an earlier value.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_id(self, id: impl Into<ProductId>) -> Self {
        let id: ProductId = id.into();
        self.with_field("id", Value::from(id))
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_field("title", Value::String(title.into()))
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_field("name", Value::String(name.into()))
    }

    pub fn with_image(self, image: impl Into<String>) -> Self {
        self.with_field("image", Value::String(image.into()))
    }

    /// Set an integral price.
    pub fn with_price(self, price: impl Into<Number>) -> Self {
        self.with_field("price", Value::Number(price.into()))
    }

    /// Set a fractional price. Non-finite values leave the record unchanged.
    pub fn with_price_f64(self, price: f64) -> Self {
        match Number::from_f64(price) {
            Some(price) => self.with_field("price", Value::Number(price)),
            None => self,
        }
    }

    pub fn with_in_stock(self, in_stock: bool) -> Self {
        self.with_field("inStock", in_stock)
    }

    pub fn with_stock(self, stock: impl Into<Number>) -> Self {
        self.with_field("stock", Value::Number(stock.into()))
    }

    pub fn with_badge(self, badge: impl Into<String>) -> Self {
        self.with_field("badge", Value::String(badge.into()))
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.with_field("description", Value::String(description.into()))
    }

    /// Set the list for one variant source.
    pub fn with_variant_list<I, S>(self, source: VariantSource, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<Value> = labels.into_iter().map(|l| Value::String(l.into())).collect();
        self.with_field(source.field_name(), labels)
    }

    /// Set `variants`.
    pub fn with_variants<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_variant_list(VariantSource::Variants, labels)
    }

    /// Set `sizes`.
    pub fn with_sizes<I, S>(self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_variant_list(VariantSource::Sizes, labels)
    }

    pub fn id(&self) -> Option<ProductId> {
        self.get("id")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// `title`, if it is a usable label.
    pub fn title(&self) -> Option<String> {
        self.get("title").and_then(truthy_text)
    }

    /// `name`, if it is a usable label.
    pub fn name(&self) -> Option<String> {
        self.get("name").and_then(truthy_text)
    }

    /// Image reference, passed through as given.
    pub fn image(&self) -> Option<&str> {
        self.get("image").and_then(Value::as_str)
    }

    pub fn price(&self) -> Option<&Number> {
        match self.get("price") {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        }
    }

    pub fn in_stock(&self) -> Option<bool> {
        self.get("inStock").and_then(Value::as_bool)
    }

    pub fn stock(&self) -> Option<&Number> {
        match self.get("stock") {
            Some(Value::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Promotional badge; empty strings and zero count as absent.
    pub fn badge(&self) -> Option<String> {
        self.get("badge").and_then(truthy_text)
    }

    /// Description; empty strings and zero count as absent.
    pub fn description(&self) -> Option<String> {
        self.get("description").and_then(truthy_text)
    }

    /// Labels stored under one variant source, if that field is an array.
    ///
    /// Numeric labels are shown as text; other non-text items are skipped.
    pub fn variant_list(&self, source: VariantSource) -> Option<Vec<String>> {
        match self.get(source.field_name()) {
            Some(Value::Array(items)) => Some(items.iter().filter_map(label_text).collect()),
            _ => None,
        }
    }

    /// Stock information, flag before count.
    pub fn stock_indicator(&self) -> StockIndicator {
        if let Some(flag) = self.in_stock() {
            return StockIndicator::Flag(flag);
        }
        match self.stock().and_then(Number::as_f64) {
            Some(count) => StockIndicator::Count(count),
            None => StockIndicator::Unknown,
        }
    }

    /// Copy of this record with the chosen variant attached.
    ///
    /// An existing `selectedVariant` field on the record is overridden.
    pub fn with_selection(&self, selected_variant: Option<String>) -> SelectedProduct {
        let mut product = self.clone();
        product.fields.remove(SELECTED_VARIANT_FIELD);
        SelectedProduct {
            product,
            selected_variant,
        }
    }
}

/// Product record extended with the variant chosen on the card.
///
/// This is the sole argument of the add-to-cart callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedProduct {
    #[serde(flatten)]
    pub product: ProductRecord,
    #[serde(rename = "selectedVariant")]
    pub selected_variant: Option<String>,
}

impl SelectedProduct {
    /// Serialize as a JSON value.
    pub fn to_value(&self) -> Result<Value, CardError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serialize as a JSON string.
    pub fn to_json(&self) -> Result<String, CardError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn label_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    }
}

/// Text of a string or number, unless it is empty or zero.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(number_text(n)),
        _ => None,
    }
}

/// Render a number the way a browser prints it: integral values carry no
/// fractional part and negative zero prints as `0`.
pub fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            if f == 0.0 {
                "0".to_string()
            } else {
                format!("{:.0}", f)
            }
        }
        _ => n.to_string(),
    }
}
