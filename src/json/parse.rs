//! Purpose: Provide the internal runtime JSON decode entrypoints.
//! Exports: `from_str`, `ParseFailureCategory`, `categorize_error`, `hint_for_error`.
//! Role: Parser boundary that centralizes serde_json usage details.
//! Invariants: Failure categories are stable labels used by diagnostics and tests.
//! Notes: Domain error mapping is done by callsites so record context stays explicit.

use serde::de::DeserializeOwned;
use serde_json::error::Category;

pub(crate) fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(input)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParseFailureCategory {
    /// Text is not well-formed JSON (includes truncation).
    Syntax,
    /// Well-formed JSON whose shape does not match the expected record.
    Schema,
    Unknown,
}

impl ParseFailureCategory {
    pub(crate) fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Schema => "schema",
            ParseFailureCategory::Unknown => "unknown",
        }
    }
}

pub(crate) fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        Category::Syntax | Category::Eof => ParseFailureCategory::Syntax,
        Category::Data => ParseFailureCategory::Schema,
        Category::Io => ParseFailureCategory::Unknown,
    }
}

pub(crate) fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; context: {context}; line {}, column {}",
        categorize_error(err).label(),
        err.line(),
        err.column()
    )
}
