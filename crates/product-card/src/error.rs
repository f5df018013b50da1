//! Product card error types.

use thiserror::Error;

/// Errors raised at the card's data boundaries.
///
/// Rendering and dispatch never fail; these only surface when records or
/// configuration are parsed from text.
#[derive(Error, Debug)]
pub enum CardError {
    /// The product document was not a JSON object.
    #[error("Invalid product record: {0}")]
    InvalidRecord(String),

    /// Configuration could not be parsed.
    #[error("Invalid card configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CardError {
    fn from(e: serde_json::Error) -> Self {
        CardError::SerializationError(e.to_string())
    }
}

impl From<toml::de::Error> for CardError {
    fn from(e: toml::de::Error) -> Self {
        CardError::InvalidConfig(e.to_string())
    }
}
