//! Risk matrix tables: ordinal ranks, control discounts and score bands.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{ControlEffectiveness, Impact, Likelihood, Result, RiskLevel, StandardsError};

/// Rank and discount tables for the 5x5 risk matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskScales {
    /// Likelihood level to 1-based rank
    pub likelihood_ranks: BTreeMap<Likelihood, u8>,
    /// Impact level to 1-based rank
    pub impact_ranks: BTreeMap<Impact, u8>,
    /// Control effectiveness to the fraction of inherent risk it removes
    pub control_discounts: BTreeMap<ControlEffectiveness, f64>,
}

impl Default for RiskScales {
    fn default() -> Self {
        Self {
            likelihood_ranks: Likelihood::all()
                .into_iter()
                .zip(1u8..)
                .collect(),
            impact_ranks: Impact::all().into_iter().zip(1u8..).collect(),
            control_discounts: BTreeMap::from([
                (ControlEffectiveness::NotEffective, 0.0),
                (ControlEffectiveness::PartiallyEffective, 0.3),
                (ControlEffectiveness::Effective, 0.6),
                (ControlEffectiveness::HighlyEffective, 0.9),
            ]),
        }
    }
}

impl RiskScales {
    pub fn likelihood_rank(&self, level: Likelihood) -> Result<u8> {
        self.likelihood_ranks
            .get(&level)
            .copied()
            .ok_or_else(|| StandardsError::MissingScaleEntry {
                table: "likelihood_ranks",
                key: level.as_str().to_string(),
            })
    }

    pub fn impact_rank(&self, level: Impact) -> Result<u8> {
        self.impact_ranks
            .get(&level)
            .copied()
            .ok_or_else(|| StandardsError::MissingScaleEntry {
                table: "impact_ranks",
                key: level.as_str().to_string(),
            })
    }

    pub fn control_discount(&self, level: ControlEffectiveness) -> Result<f64> {
        self.control_discounts
            .get(&level)
            .copied()
            .ok_or_else(|| StandardsError::MissingScaleEntry {
                table: "control_discounts",
                key: level.as_str().to_string(),
            })
    }

    /// Check that every level has an entry and every entry is in range.
    pub fn validate(&self) -> Result<()> {
        for level in Likelihood::all() {
            check_rank("likelihood_ranks", level.as_str(), self.likelihood_rank(level)?)?;
        }
        for level in Impact::all() {
            check_rank("impact_ranks", level.as_str(), self.impact_rank(level)?)?;
        }
        for level in ControlEffectiveness::all() {
            let discount = self.control_discount(level)?;
            if !(0.0..1.0).contains(&discount) {
                return Err(StandardsError::InvalidTable(format!(
                    "control_discounts.{} = {} is outside [0, 1)",
                    level.as_str(),
                    discount
                )));
            }
        }
        Ok(())
    }
}

fn check_rank(table: &str, key: &str, rank: u8) -> Result<()> {
    if (1..=5).contains(&rank) {
        Ok(())
    } else {
        Err(StandardsError::InvalidTable(format!(
            "{}.{} = {} is outside 1..=5",
            table, key, rank
        )))
    }
}

/// Lower bounds of each risk band on the 1-25 score scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskBands {
    pub medium: u8,
    pub high: u8,
    pub critical: u8,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            medium: 5,
            high: 10,
            critical: 20,
        }
    }
}

impl RiskBands {
    /// Assign the band for a risk score.
    pub fn level_for(&self, score: u8) -> RiskLevel {
        if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.medium < self.high && self.high < self.critical {
            Ok(())
        } else {
            Err(StandardsError::InvalidTable(format!(
                "risk bands must ascend: medium {} < high {} < critical {}",
                self.medium, self.high, self.critical
            )))
        }
    }
}
