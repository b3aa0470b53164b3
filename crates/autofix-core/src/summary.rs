//! Capture coverage and condition summary shown next to the breakdown.

use serde::{Deserialize, Serialize};

use crate::mapping::ConditionLabel;
use crate::types::{Angle, Valuation};

/// Exterior score lost per detected damaged part.
pub const EXTERIOR_PENALTY_PER_PART: i32 = 10;

/// Score penalty shown when the interior came back moderate.
pub const MODERATE_INTERIOR_PENALTY: i32 = 15;

/// How many of the capture slots have an uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub filled: usize,
    pub total_angles: usize,

    /// `filled / total_angles` as a rounded percentage
    pub percentage: u32,
}

impl Coverage {
    /// Coverage over the filled angles. Duplicates count once.
    pub fn from_angles<'a>(filled: impl IntoIterator<Item = &'a Angle>) -> Self {
        let mut seen: Vec<Angle> = filled.into_iter().copied().collect();
        seen.sort();
        seen.dedup();

        let total_angles = Angle::ALL.len();
        let percentage = ((seen.len() * 100) as f64 / total_angles as f64).round() as u32;

        Self {
            filled: seen.len(),
            total_angles,
            percentage,
        }
    }

    /// At least one photo is needed before analysis can run.
    pub fn can_analyze(&self) -> bool {
        self.filled > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionSummary {
    /// `100 - 10 * detected parts`, floored at zero
    pub exterior_damage_score: i32,

    pub interior_score_penalty: i32,

    /// Sum of every adjustment's score delta
    pub total_score_delta: i32,
}

impl ConditionSummary {
    /// `interior` is the interior condition used for scoring, or `None`
    /// when no interior photo was taken.
    pub fn new(
        detected_parts: usize,
        interior: Option<ConditionLabel>,
        valuation: &Valuation,
    ) -> Self {
        let parts = i32::try_from(detected_parts).unwrap_or(i32::MAX);
        let exterior_damage_score = 100i32
            .saturating_sub(parts.saturating_mul(EXTERIOR_PENALTY_PER_PART))
            .max(0);

        let interior_score_penalty = match interior {
            Some(ConditionLabel::Moderate) => MODERATE_INTERIOR_PENALTY,
            _ => 0,
        };

        Self {
            exterior_damage_score,
            interior_score_penalty,
            total_score_delta: valuation.total_score_delta(),
        }
    }
}
