//! Deterministic identifier extraction, independent of the model.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// Loose on purpose: the domain half is letters only, no TLD dot.
static UPI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9.\-_]+@[a-zA-Z]+").expect("valid UPI regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid link regex"));
static BANK_ACCOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{9,18}\b").expect("valid account regex"));

/// First match of each pattern, `None` when a pattern finds nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub upi: Option<String>,
    pub link: Option<String>,
    pub bank_account: Option<String>,
}

pub fn extract(text: &str) -> ExtractionResult {
    ExtractionResult {
        upi: first_match(&UPI, text),
        link: first_match(&LINK, text),
        bank_account: first_match(&BANK_ACCOUNT, text),
    }
}

fn first_match(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().to_string())
}
