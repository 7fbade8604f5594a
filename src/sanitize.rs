//! Turns model text into a JSON value no matter what the model sent.

use serde_json::{Value, json};

/// Error marker carried by the fallback object. Clients match on it.
pub const DEGRADED_ERROR: &str = "Model did not return valid JSON";

#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// The whole payload parsed as JSON.
    Parsed(Value),
    /// Anything else, kept verbatim.
    Degraded(String),
}

impl ModelReply {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ModelReply::Degraded(_))
    }

    /// Wire form: the parsed value untouched, or `{"raw", "error"}`.
    pub fn into_value(self) -> Value {
        match self {
            ModelReply::Parsed(value) => value,
            ModelReply::Degraded(raw) => json!({
                "raw": raw,
                "error": DEGRADED_ERROR,
            }),
        }
    }
}

pub fn sanitize(text: &str) -> ModelReply {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => ModelReply::Parsed(value),
        Err(_) => ModelReply::Degraded(text.to_string()),
    }
}
