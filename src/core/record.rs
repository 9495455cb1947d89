//! Purpose: Define the validated response record and the parse/validate stage.
//! Exports: `ResponseRecord`, `parse_response`, `parse_normalized`.
//! Role: Second pipeline stage; strict JSON parse plus shape validation.
//! Invariants: Records are immutable once constructed; no partial recovery on failure.
//! Invariants: Raw/normalized text reaches logs only, never error messages.
use crate::core::error::{Error, ErrorKind};
use crate::core::normalize::normalize;
use crate::json::parse::{self, ParseFailureCategory};
use serde::{Deserialize, Serialize};

/// One validated upstream response. Field names mirror the wire contract;
/// `message` and `session_id` default to empty when the service omits them,
/// payload fields stay `None` when absent.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct ResponseRecord {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
}

impl ResponseRecord {
    pub fn has_payloads(&self) -> bool {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.image) || present(&self.object)
    }
}

/// Run the full text stage: normalize the quasi-JSON dialect, then parse
/// strictly. On failure both texts go to the debug log for diagnosis.
pub fn parse_response(raw: &str) -> Result<ResponseRecord, Error> {
    let normalized = normalize(raw);
    parse_normalized(&normalized).inspect_err(|_| {
        tracing::debug!(raw, normalized = %normalized, "response text failed strict parse");
    })
}

pub fn parse_normalized(text: &str) -> Result<ResponseRecord, Error> {
    parse::from_str::<ResponseRecord>(text).map_err(|err| {
        let kind = match parse::categorize_error(&err) {
            ParseFailureCategory::Syntax => ErrorKind::Syntax,
            ParseFailureCategory::Schema => ErrorKind::Schema,
            ParseFailureCategory::Unknown => ErrorKind::Internal,
        };
        Error::new(kind)
            .with_message("invalid response format")
            .with_hint(parse::hint_for_error(&err, "response.record"))
            .with_source(err)
    })
}
