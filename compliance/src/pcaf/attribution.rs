//! Per-asset attribution of borrower emissions.

use serde::{Deserialize, Serialize};
use tracing::warn;

use standards::AttributionPolicy;

use crate::pcaf::Asset;
use crate::types::{check_finite, check_range, Result};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Why an asset's attribution needs a second look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum AttributionFlag {
    /// The raw factor was outside `[0, 1]` and was clamped
    Clamped,
    /// The raw factor is outside `[0, 1]` and was kept as is
    OutOfRange,
    /// Company value is zero or negative; nothing could be attributed
    InvalidCompanyValue,
    /// Factor or emissions exceed the f64 range; nothing could be attributed
    Overflow,
}

/// Attribution result for one asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attribution {
    pub factor: Option<f64>,
    pub emissions: Option<f64>,
    pub flag: Option<AttributionFlag>,
}

/// Computes `outstanding / company value` and the emissions it attributes.
pub struct AttributionCalculator {
    policy: AttributionPolicy,
}

impl AttributionCalculator {
    pub fn new(policy: AttributionPolicy) -> Self {
        Self { policy }
    }

    /// Reject asset inputs no attribution can be built from.
    pub fn check_inputs(&self, asset: &Asset) -> Result<()> {
        check_finite(format!("assets[{}].outstandingAmount", asset.id), asset.outstanding_amount)?;
        check_finite(format!("assets[{}].companyValue", asset.id), asset.company_value)?;
        check_finite(format!("assets[{}].borrowerEmissions", asset.id), asset.borrower_emissions)?;
        check_range(
            format!("assets[{}].dataQualityScore", asset.id),
            asset.data_quality_score as f64,
            1.0,
            5.0,
        )
    }

    /// Attribute one asset. Inputs must have passed [`Self::check_inputs`].
    pub fn attribute(&self, asset: &Asset) -> Attribution {
        if asset.company_value <= 0.0 {
            warn!(
                asset_id = %asset.id,
                company_value = asset.company_value,
                "Company value is not positive; asset left unattributed"
            );
            return Attribution {
                factor: None,
                emissions: None,
                flag: Some(AttributionFlag::InvalidCompanyValue),
            };
        }

        let raw = asset.outstanding_amount / asset.company_value;
        let in_range = (0.0..=1.0).contains(&raw);

        let (factor, flag) = match (in_range, self.policy) {
            (true, _) => (raw, None),
            (false, AttributionPolicy::Clamp) => {
                warn!(asset_id = %asset.id, raw_factor = raw, "Attribution factor clamped");
                (raw.clamp(0.0, 1.0), Some(AttributionFlag::Clamped))
            }
            (false, AttributionPolicy::Unclamped) => {
                warn!(asset_id = %asset.id, raw_factor = raw, "Attribution factor out of range");
                (raw, Some(AttributionFlag::OutOfRange))
            }
        };

        let emissions = asset.borrower_emissions * factor;
        if !factor.is_finite() || !emissions.is_finite() {
            warn!(
                asset_id = %asset.id,
                raw_factor = raw,
                "Attribution overflowed; asset left unattributed"
            );
            return Attribution {
                factor: None,
                emissions: None,
                flag: Some(AttributionFlag::Overflow),
            };
        }

        Attribution {
            factor: Some(factor),
            emissions: Some(emissions),
            flag,
        }
    }
}
