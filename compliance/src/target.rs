//! Sustainability target progress and status.
//!
//! Progress measures how far the current value has moved from the baseline
//! toward the target, in percent. Status compares progress with a straight
//! line from the baseline year (0%) to the target year (100%).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use standards::TargetThresholds;

use crate::recompute::{Recompute, RecomputeContext};
use crate::types::{check_range, RecordMeta, Result};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// How a target is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// Absolute quantity, e.g. tCO2e
    Absolute,
    /// Quantity per unit of activity, e.g. tCO2e per revenue
    Intensity,
    /// No numeric trajectory; progress is entered by hand
    Qualitative,
}

/// Where a target stands against its trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    /// No progress recorded yet
    #[default]
    NotStarted,
    OnTrack,
    AtRisk,
    OffTrack,
    Achieved,
    /// Withdrawn by the reporter; never changed by recompute
    Cancelled,
}

/// A sustainability goal with a baseline and a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct TargetRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub target_type: TargetType,
    pub unit: Option<String>,
    pub baseline_year: i32,
    pub baseline_value: f64,
    pub target_year: i32,
    pub target_value: f64,
    pub current_value: Option<f64>,

    /// Derived for numeric targets, entered by hand for qualitative ones
    pub progress: Option<f64>,
    pub status: TargetStatus,
}

impl TargetRecord {
    pub fn new(
        tenant_id: impl Into<String>,
        name: impl Into<String>,
        target_type: TargetType,
        baseline: (i32, f64),
        target: (i32, f64),
    ) -> Self {
        Self {
            meta: RecordMeta::new(tenant_id),
            name: name.into(),
            target_type,
            unit: None,
            baseline_year: baseline.0,
            baseline_value: baseline.1,
            target_year: target.0,
            target_value: target.1,
            current_value: None,
            progress: None,
            status: TargetStatus::NotStarted,
        }
    }
}

/// Computes progress and trajectory status.
pub struct ProgressEvaluator<'a> {
    thresholds: &'a TargetThresholds,
}

impl<'a> ProgressEvaluator<'a> {
    pub fn new(thresholds: &'a TargetThresholds) -> Self {
        Self { thresholds }
    }

    /// Progress in percent, or `None` when it cannot be computed yet.
    ///
    /// Reduction goals (baseline above target) progress as the value falls,
    /// increase goals as it rises. The result is clamped to 0-100.
    pub fn progress(&self, target: &TargetRecord) -> Option<f64> {
        if target.target_type == TargetType::Qualitative {
            return None;
        }
        let current = target.current_value.filter(|value| value.is_finite())?;

        let span = target.target_value - target.baseline_value;
        if span == 0.0 || !span.is_finite() {
            warn!(
                record_id = %target.meta.id,
                baseline_value = target.baseline_value,
                target_value = target.target_value,
                "Baseline equals target; progress not computable"
            );
            return None;
        }

        // Same formula for both directions: the sign of `span` flips it.
        let fraction = (current - target.baseline_value) / span;
        Some(fraction.clamp(0.0, 1.0) * 100.0)
    }

    /// Expected progress in percent at `current_year` on a straight line.
    ///
    /// Keeps rising past 100 once the target year has gone by, so an overdue
    /// target drifts to at risk and then off track. Never below 0.
    pub fn expected_progress(&self, baseline_year: i32, target_year: i32, current_year: i32) -> f64 {
        let total_years = target_year - baseline_year;
        if total_years <= 0 {
            return 100.0;
        }
        let years_elapsed = current_year - baseline_year;
        (100.0 * years_elapsed as f64 / total_years as f64).max(0.0)
    }

    /// Classify progress against the expected trajectory.
    pub fn status(&self, progress: f64, expected: f64) -> TargetStatus {
        if progress >= 100.0 {
            TargetStatus::Achieved
        } else if progress >= expected - self.thresholds.on_track_tolerance {
            TargetStatus::OnTrack
        } else if progress >= expected - self.thresholds.at_risk_tolerance {
            TargetStatus::AtRisk
        } else {
            TargetStatus::OffTrack
        }
    }
}

impl Recompute for TargetRecord {
    type Outcome = ();

    fn recompute(&mut self, ctx: &RecomputeContext<'_>) -> Result<()> {
        let evaluator = ProgressEvaluator::new(&ctx.standards.targets);

        let progress = evaluator.progress(self).or(self.progress);
        if let Some(value) = progress {
            check_range("progress", value, 0.0, 100.0)?;
        }

        let status = match (self.status, progress) {
            (TargetStatus::Cancelled, _) => TargetStatus::Cancelled,
            (current, None) => current,
            (_, Some(value)) => {
                let expected = evaluator.expected_progress(
                    self.baseline_year,
                    self.target_year,
                    ctx.current_year(),
                );
                evaluator.status(value, expected)
            }
        };

        debug!(
            record_id = %self.meta.id,
            progress = ?progress,
            status = ?status,
            "Recomputed target progress"
        );

        self.progress = progress;
        self.status = status;
        self.meta.touch(ctx);
        Ok(())
    }
}
