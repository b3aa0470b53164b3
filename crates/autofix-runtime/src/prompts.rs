//! Prompts sent to the vision model.
//!
//! The engine only relies on the JSON shape named at the end of each
//! prompt; the wording around it is free to change.

/// Interior wear classification prompt.
pub const INTERIOR_WEAR_PROMPT: &str = r#"
Classify the car interior wear level from this photo as one of: good, moderate, poor.
Rules:
- Seats, dashboard and trims clean with minimal wear -> good
- Noticeable stains, scuffs or small tears -> moderate
- Heavy stains, rips, missing panels or severe wear -> poor
Return ONLY JSON like:
{"condition":"good|moderate|poor","reasons":["reason1","reason2"]}
"#;
