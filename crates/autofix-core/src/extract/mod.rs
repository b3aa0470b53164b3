//! Classifier output extraction.
//!
//! Vision and chat models are asked to answer in JSON but routinely wrap
//! the object in prose or markdown fences. This module locates the object,
//! hands it to `serde_json`, and reports a distinct error per failure mode.

mod parser;

pub use parser::{parse_json_object, ClassifierOutput, ParseError};
