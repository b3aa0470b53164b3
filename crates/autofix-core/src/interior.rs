//! Interior wear assessment from classifier text.
//!
//! A failed classification never leaves the interior slot empty: callers
//! get the `moderate` row flagged as degraded.

use serde::{Deserialize, Serialize};

use crate::adjustment::Adjustment;
use crate::extract::{ClassifierOutput, ParseError};
use crate::mapping::ConditionLabel;
use crate::types::Money;

/// Reason attached to a fallback assessment.
pub const FALLBACK_REASON: &str = "Fallback: analysis failed";

/// Result of the interior leg of a valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteriorAssessment {
    pub condition: ConditionLabel,
    pub score_delta: i32,
    pub value_delta: Money,
    pub reasons: Vec<String>,

    /// True when the classifier failed and this is the fallback row
    #[serde(default)]
    pub degraded: bool,
}

impl InteriorAssessment {
    /// Build an assessment from a parsed classifier response.
    pub fn from_output(output: ClassifierOutput, base_price: Money) -> Self {
        let condition = ConditionLabel::resolve_or_default(output.condition.as_deref());
        Self::for_condition(condition, output.reasons, base_price, false)
    }

    /// The moderate row used when classification fails.
    pub fn fallback(base_price: Money) -> Self {
        Self::for_condition(
            ConditionLabel::Moderate,
            vec![FALLBACK_REASON.to_string()],
            base_price,
            true,
        )
    }

    fn for_condition(
        condition: ConditionLabel,
        reasons: Vec<String>,
        base_price: Money,
        degraded: bool,
    ) -> Self {
        let row = condition.adjustment();
        Self {
            condition,
            score_delta: row.score_delta,
            value_delta: row.value_delta(base_price),
            reasons,
            degraded,
        }
    }

    /// The breakdown line for this assessment.
    pub fn to_adjustment(&self) -> Adjustment {
        Adjustment::interior(self.condition, self.score_delta, self.value_delta)
    }
}

/// Assess interior wear from raw classifier text.
pub fn assess_interior(raw: &str, base_price: Money) -> Result<InteriorAssessment, ParseError> {
    let output = ClassifierOutput::from_text(raw)?;
    Ok(InteriorAssessment::from_output(output, base_price))
}

/// Assess interior wear, substituting the fallback row on a parse failure.
pub fn assess_interior_or_fallback(raw: &str, base_price: Money) -> InteriorAssessment {
    assess_interior(raw, base_price).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Interior classifier output unusable, using fallback");
        InteriorAssessment::fallback(base_price)
    })
}
