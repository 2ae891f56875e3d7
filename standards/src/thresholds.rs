//! Classification cut-offs for materiality and target trajectories.

use serde::{Deserialize, Serialize};

use crate::types::{PriorityBucket, Result, StandardsError};

/// Cut-offs for double-materiality priority buckets (scores on a 1-10 scale).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialityThresholds {
    /// Impact score at or above which a topic is high priority
    pub high_impact: f64,
    /// Financial score at or above which a topic is high priority
    pub high_financial: f64,
    /// Average score at or above which a topic is high priority
    pub high_average: f64,
    /// Average score at or above which a topic is medium priority
    pub medium_average: f64,
    /// Lowest admissible score
    pub min_score: f64,
    /// Highest admissible score
    pub max_score: f64,
}

impl Default for MaterialityThresholds {
    fn default() -> Self {
        Self {
            high_impact: 7.0,
            high_financial: 7.0,
            high_average: 7.0,
            medium_average: 4.0,
            min_score: 1.0,
            max_score: 10.0,
        }
    }
}

impl MaterialityThresholds {
    /// Bucket a topic by its two scores. Depends on nothing else.
    pub fn bucket(&self, impact_score: f64, financial_score: f64) -> PriorityBucket {
        let average = (impact_score + financial_score) / 2.0;

        if impact_score >= self.high_impact
            || financial_score >= self.high_financial
            || average >= self.high_average
        {
            PriorityBucket::High
        } else if average >= self.medium_average {
            PriorityBucket::Medium
        } else {
            PriorityBucket::Low
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_score < self.max_score && self.medium_average <= self.high_average {
            Ok(())
        } else {
            Err(StandardsError::InvalidTable(
                "materiality thresholds must satisfy min < max and medium <= high".to_string(),
            ))
        }
    }
}

/// Tolerances below the expected trajectory for target status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetThresholds {
    /// Percentage points behind trajectory still counted as on track
    pub on_track_tolerance: f64,
    /// Percentage points behind trajectory still counted as at risk
    pub at_risk_tolerance: f64,
}

impl Default for TargetThresholds {
    fn default() -> Self {
        Self {
            on_track_tolerance: 10.0,
            at_risk_tolerance: 25.0,
        }
    }
}

impl TargetThresholds {
    pub fn validate(&self) -> Result<()> {
        if 0.0 <= self.on_track_tolerance && self.on_track_tolerance <= self.at_risk_tolerance {
            Ok(())
        } else {
            Err(StandardsError::InvalidTable(format!(
                "target tolerances must satisfy 0 <= on_track {} <= at_risk {}",
                self.on_track_tolerance, self.at_risk_tolerance
            )))
        }
    }
}
