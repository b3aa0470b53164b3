//! Brace-scanning JSON extraction from free-text model output.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur when extracting JSON from model output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No JSON object found in model response")]
    EmptyOrMalformed,

    #[error("Invalid JSON in model response: {0}")]
    InvalidJson(String),
}

/// Extract the JSON object embedded in `raw`.
///
/// The object is taken to span from the first `{` to the last `}`. A
/// response carrying two separate objects is sliced as one and will not
/// round-trip; callers get `InvalidJson` (or a merged object) in that case.
pub fn parse_json_object(raw: &str) -> Result<Map<String, Value>, ParseError> {
    let candidate = locate_object(raw).ok_or(ParseError::EmptyOrMalformed)?;

    serde_json::from_str(candidate).map_err(|e| ParseError::InvalidJson(e.to_string()))
}

/// Slice the outermost brace-delimited span, trimmed.
fn locate_object(raw: &str) -> Option<&str> {
    let first = raw.find('{')?;
    let last = raw.rfind('}')?;

    if last <= first {
        return None;
    }

    Some(raw[first..=last].trim())
}

/// Typed view of an interior-wear classifier response.
///
/// Expected shape: `{"condition": "good|moderate|poor", "reasons": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifierOutput {
    /// Raw condition label; `None` when absent or not a string
    pub condition: Option<String>,

    /// Free-text reasons; empty when absent
    pub reasons: Vec<String>,
}

impl ClassifierOutput {
    /// Parse a classifier response from free text.
    pub fn from_text(raw: &str) -> Result<Self, ParseError> {
        let object = parse_json_object(raw)?;
        Ok(Self::from_object(&object))
    }

    /// Read the typed fields from an already-parsed object.
    ///
    /// Non-string reasons are skipped rather than rejected.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let condition = object
            .get("condition")
            .and_then(Value::as_str)
            .map(str::to_string);

        let reasons = object
            .get("reasons")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self { condition, reasons }
    }
}
