//! Science Based Targets initiative criteria.

use serde::{Deserialize, Serialize};

use crate::types::{Result, StandardsError};

/// Numeric criteria a near-term/long-term target set must meet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SbtiCriteria {
    /// Shortest near-term timeframe in years
    pub min_near_term_years: i32,
    /// Longest near-term timeframe in years
    pub max_near_term_years: i32,
    /// Scope 3 share of total emissions (percent) above which scope 3 must be targeted
    pub scope3_materiality_percent: f64,
    /// Minimum scope 3 coverage (percent) once scope 3 is targeted
    pub min_scope3_coverage_percent: f64,
    /// Latest admissible net-zero year
    pub latest_net_zero_year: i32,
}

impl Default for SbtiCriteria {
    fn default() -> Self {
        Self {
            min_near_term_years: 5,
            max_near_term_years: 10,
            scope3_materiality_percent: 40.0,
            min_scope3_coverage_percent: 67.0,
            latest_net_zero_year: 2050,
        }
    }
}

impl SbtiCriteria {
    pub fn validate(&self) -> Result<()> {
        if self.min_near_term_years > self.max_near_term_years {
            return Err(StandardsError::InvalidTable(format!(
                "near-term window {}..={} is empty",
                self.min_near_term_years, self.max_near_term_years
            )));
        }
        for (name, value) in [
            ("scope3_materiality_percent", self.scope3_materiality_percent),
            ("min_scope3_coverage_percent", self.min_scope3_coverage_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(StandardsError::InvalidTable(format!(
                    "{} = {} is not a percentage",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
