//! Honeypot engagement: the model plays a victim to draw out payment details.

use tracing::{info, warn};

use crate::extract::{ExtractionResult, extract};
use crate::llm::{Error, Generator};
use crate::sanitize::{ModelReply, sanitize};

/// Model reply and regex hits side by side. The two are never reconciled;
/// they can disagree and callers decide which to trust.
#[derive(Debug, Clone, PartialEq)]
pub struct Engagement {
    pub ai_response: ModelReply,
    pub regex_extracted: ExtractionResult,
}

pub fn prompt(message: &str) -> String {
    format!(
        r#"You are an AI honeypot agent.

A scammer is talking to you.
You must act like a real victim.

Try to extract:
- UPI ID
- bank account number
- phishing links

Reply naturally.

Return ONLY JSON:
{{
  "reply": "...",
  "extracted": {{
    "upi": "...",
    "account": "...",
    "link": "..."
  }}
}}

Message: {message}
"#
    )
}

pub async fn engage(message: &str, generator: &dyn Generator) -> Result<Engagement, Error> {
    let regex_extracted = extract(message);
    let text = generator.generate(&prompt(message)).await?;
    let ai_response = sanitize(&text);

    if ai_response.is_degraded() {
        warn!("Engagement reply was not JSON");
    }
    info!(
        "Regex extraction: upi={:?} link={:?} account={:?}",
        regex_extracted.upi, regex_extracted.link, regex_extracted.bank_account
    );

    Ok(Engagement {
        ai_response,
        regex_extracted,
    })
}
