//! Risk register scoring.
//!
//! Inherent risk is the product of the likelihood and impact ranks (1-25).
//! Residual risk discounts the inherent score by the average effectiveness
//! of the mitigating controls, never dropping below 1.

use serde::{Deserialize, Serialize};
use tracing::debug;

use standards::{
    ControlEffectiveness, Impact, Likelihood, RiskBands, RiskLevel, RiskScales, StandardsError,
};

use crate::recompute::{Recompute, RecomputeContext};
use crate::types::{ComplianceError, RecordMeta, Result};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A control mitigating a risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub id: String,
    pub description: String,
    pub effectiveness: ControlEffectiveness,
}

impl Control {
    pub fn new(description: impl Into<String>, effectiveness: ControlEffectiveness) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            description: description.into(),
            effectiveness,
        }
    }
}

/// An ESG risk register entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RiskRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub title: String,
    pub likelihood: Likelihood,
    pub impact: Impact,
    pub controls: Vec<Control>,
    /// Residual score set by an assessor; takes precedence over the computed one
    pub residual_risk_override: Option<u8>,

    // Derived
    pub likelihood_score: Option<u8>,
    pub impact_score: Option<u8>,
    pub inherent_risk_score: Option<u8>,
    /// Overwritten on every recompute: with no controls and no override it
    /// is reset to `None`, even if an earlier recompute had set it
    pub residual_risk_score: Option<u8>,
    pub inherent_risk_level: Option<RiskLevel>,
    pub residual_risk_level: Option<RiskLevel>,
}

impl RiskRecord {
    pub fn new(
        tenant_id: impl Into<String>,
        title: impl Into<String>,
        likelihood: Likelihood,
        impact: Impact,
    ) -> Self {
        Self {
            meta: RecordMeta::new(tenant_id),
            title: title.into(),
            likelihood,
            impact,
            controls: Vec::new(),
            residual_risk_override: None,
            likelihood_score: None,
            impact_score: None,
            inherent_risk_score: None,
            residual_risk_score: None,
            inherent_risk_level: None,
            residual_risk_level: None,
        }
    }
}

/// Scores produced for one risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskAssessment {
    pub likelihood_score: u8,
    pub impact_score: u8,
    pub inherent_risk_score: u8,
    pub residual_risk_score: Option<u8>,
    pub inherent_risk_level: RiskLevel,
    pub residual_risk_level: Option<RiskLevel>,
}

/// Scores risks against a rank/discount table.
pub struct RiskScorer<'a> {
    scales: &'a RiskScales,
    bands: &'a RiskBands,
}

impl<'a> RiskScorer<'a> {
    pub fn new(scales: &'a RiskScales, bands: &'a RiskBands) -> Self {
        Self { scales, bands }
    }

    /// Likelihood rank times impact rank.
    pub fn inherent_score(&self, likelihood: Likelihood, impact: Impact) -> Result<(u8, u8, u8)> {
        let likelihood_score = self.scales.likelihood_rank(likelihood)?;
        let impact_score = self.scales.impact_rank(impact)?;
        for (table, rank) in [("likelihood_ranks", likelihood_score), ("impact_ranks", impact_score)] {
            if !(1..=5).contains(&rank) {
                return Err(StandardsError::InvalidTable(format!(
                    "{} rank {} is outside 1..=5",
                    table, rank
                ))
                .into());
            }
        }
        Ok((likelihood_score, impact_score, likelihood_score * impact_score))
    }

    /// Inherent score discounted by the mean control discount.
    ///
    /// `None` when there are no controls.
    pub fn residual_score(&self, inherent: u8, controls: &[Control]) -> Result<Option<u8>> {
        if controls.is_empty() {
            return Ok(None);
        }

        let mut total_discount = 0.0;
        for control in controls {
            total_discount += self.scales.control_discount(control.effectiveness)?;
        }
        let average_discount = total_discount / controls.len() as f64;

        let residual = (inherent as f64 * (1.0 - average_discount)).round() as u8;
        Ok(Some(residual.clamp(1, inherent)))
    }

    /// Score a risk. An override replaces the computed residual score.
    pub fn assess(
        &self,
        likelihood: Likelihood,
        impact: Impact,
        controls: &[Control],
        residual_override: Option<u8>,
    ) -> Result<RiskAssessment> {
        let (likelihood_score, impact_score, inherent) = self.inherent_score(likelihood, impact)?;

        let residual = match residual_override {
            Some(value) if value == 0 || value > inherent => {
                return Err(ComplianceError::InconsistentInput(format!(
                    "residual risk score {} must be between 1 and the inherent score {}",
                    value, inherent
                )));
            }
            Some(value) => Some(value),
            None => self.residual_score(inherent, controls)?,
        };

        Ok(RiskAssessment {
            likelihood_score,
            impact_score,
            inherent_risk_score: inherent,
            residual_risk_score: residual,
            inherent_risk_level: self.bands.level_for(inherent),
            residual_risk_level: residual.map(|score| self.bands.level_for(score)),
        })
    }
}

impl Recompute for RiskRecord {
    type Outcome = ();

    fn recompute(&mut self, ctx: &RecomputeContext<'_>) -> Result<()> {
        let risk = &ctx.standards.risk;
        let assessment = RiskScorer::new(&risk.scales, &risk.bands).assess(
            self.likelihood,
            self.impact,
            &self.controls,
            self.residual_risk_override,
        )?;

        debug!(
            record_id = %self.meta.id,
            inherent = assessment.inherent_risk_score,
            residual = ?assessment.residual_risk_score,
            controls = self.controls.len(),
            "Recomputed risk scores"
        );

        self.likelihood_score = Some(assessment.likelihood_score);
        self.impact_score = Some(assessment.impact_score);
        self.inherent_risk_score = Some(assessment.inherent_risk_score);
        self.residual_risk_score = assessment.residual_risk_score;
        self.inherent_risk_level = Some(assessment.inherent_risk_level);
        self.residual_risk_level = assessment.residual_risk_level;
        self.meta.touch(ctx);
        Ok(())
    }
}
