use serde::Deserialize;
use tracing::{info, warn};

use crate::llm::{Error, Generator};
use crate::sanitize::{ModelReply, sanitize};

/// Typed view of a well-formed detection reply. Only used for logging; the
/// response body carries the sanitized value as the model sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Verdict {
    pub classification: Label,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Scam,
    Safe,
}

impl Verdict {
    pub fn from_reply(reply: &ModelReply) -> Option<Self> {
        match reply {
            ModelReply::Parsed(value) => Verdict::deserialize(value).ok(),
            ModelReply::Degraded(_) => None,
        }
    }
}

pub fn prompt(message: &str) -> String {
    format!(
        r#"You are a scam detection system.

Classify this message as:
- scam
- safe

Return ONLY JSON like:
{{
  "classification": "...",
  "confidence": 0.0,
  "reason": "..."
}}

Message: {message}
"#
    )
}

pub async fn classify(message: &str, generator: &dyn Generator) -> Result<ModelReply, Error> {
    let text = generator.generate(&prompt(message)).await?;
    let reply = sanitize(&text);

    match Verdict::from_reply(&reply) {
        Some(verdict) => info!(
            "Classified as {:?} ({:.2}): {}",
            verdict.classification, verdict.confidence, verdict.reason
        ),
        None if reply.is_degraded() => warn!("Detection reply was not JSON"),
        None => warn!("Detection reply was JSON but not a verdict"),
    }

    Ok(reply)
}
