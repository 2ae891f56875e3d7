//! Portfolio-level totals and breakdowns.
//!
//! Aggregation always runs over the whole asset sequence. Assets can be
//! removed as well as added, so there is no incremental path; a recompute is
//! O(n) in the number of assets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pcaf::{Asset, AssetClass};
use crate::types::{check_finite, Result};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Portfolio totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub total_financed_emissions: f64,
    /// Plain mean of data quality scores across assets
    pub weighted_average_data_quality: f64,
    pub total_exposure: f64,
    pub asset_count: usize,
}

/// Totals for one sector or geography.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub emissions: f64,
    pub asset_count: usize,
    pub exposure: f64,
}

/// Totals for one asset class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct AssetClassBreakdown {
    pub emissions: f64,
    pub asset_count: usize,
    pub exposure: f64,
    pub avg_data_quality: f64,
}

/// Everything aggregated from one pass over the assets.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioAggregate {
    pub totals: PortfolioTotals,
    pub by_asset_class: BTreeMap<AssetClass, AssetClassBreakdown>,
    pub by_sector: BTreeMap<String, Breakdown>,
    pub by_geography: BTreeMap<String, Breakdown>,
    /// Asset count per data quality score, keys 1 through 5
    pub data_quality_distribution: BTreeMap<u8, usize>,
}

impl PortfolioAggregate {
    /// Reject sums that overflowed the f64 range.
    pub fn check_finite(&self) -> Result<()> {
        check_finite("totals.totalFinancedEmissions", self.totals.total_financed_emissions)?;
        check_finite("totals.totalExposure", self.totals.total_exposure)?;
        for (class, breakdown) in &self.by_asset_class {
            check_finite(format!("breakdownByAssetClass[{:?}].emissions", class), breakdown.emissions)?;
            check_finite(format!("breakdownByAssetClass[{:?}].exposure", class), breakdown.exposure)?;
        }
        for (dimension, breakdowns) in [
            ("breakdownBySector", &self.by_sector),
            ("breakdownByGeography", &self.by_geography),
        ] {
            for (key, breakdown) in breakdowns {
                check_finite(format!("{}[{}].emissions", dimension, key), breakdown.emissions)?;
                check_finite(format!("{}[{}].exposure", dimension, key), breakdown.exposure)?;
            }
        }
        Ok(())
    }
}

/// An empty histogram over the five PCAF data quality scores.
pub fn empty_distribution() -> BTreeMap<u8, usize> {
    (1..=5).map(|score| (score, 0)).collect()
}

/// Sums attributed emissions and exposure along each dimension.
pub struct PortfolioAggregator<'a> {
    unspecified_key: &'a str,
}

impl<'a> PortfolioAggregator<'a> {
    pub fn new(unspecified_key: &'a str) -> Self {
        Self { unspecified_key }
    }

    /// Aggregate assets whose attribution fields are current.
    pub fn aggregate(&self, assets: &[Asset]) -> PortfolioAggregate {
        let mut totals = PortfolioTotals {
            asset_count: assets.len(),
            ..Default::default()
        };
        let mut by_asset_class: BTreeMap<AssetClass, AssetClassBreakdown> = BTreeMap::new();
        let mut by_sector: BTreeMap<String, Breakdown> = BTreeMap::new();
        let mut by_geography: BTreeMap<String, Breakdown> = BTreeMap::new();
        let mut distribution = empty_distribution();
        let mut quality_sum = 0.0;

        for asset in assets {
            let emissions = asset.attributed_emissions.unwrap_or(0.0);
            let quality = asset.data_quality_score as f64;

            totals.total_financed_emissions += emissions;
            totals.total_exposure += asset.outstanding_amount;
            quality_sum += quality;

            let class = by_asset_class.entry(asset.asset_class).or_default();
            class.emissions += emissions;
            class.asset_count += 1;
            class.exposure += asset.outstanding_amount;
            // Holds the quality sum until the pass completes.
            class.avg_data_quality += quality;

            for (key, breakdowns) in [
                (asset.sector.as_deref(), &mut by_sector),
                (asset.geography.as_deref(), &mut by_geography),
            ] {
                let entry = breakdowns
                    .entry(key.unwrap_or(self.unspecified_key).to_string())
                    .or_default();
                entry.emissions += emissions;
                entry.asset_count += 1;
                entry.exposure += asset.outstanding_amount;
            }

            *distribution.entry(asset.data_quality_score).or_insert(0) += 1;
        }

        if !assets.is_empty() {
            totals.weighted_average_data_quality = quality_sum / assets.len() as f64;
        }
        for class in by_asset_class.values_mut() {
            class.avg_data_quality /= class.asset_count as f64;
        }

        PortfolioAggregate {
            totals,
            by_asset_class,
            by_sector,
            by_geography,
            data_quality_distribution: distribution,
        }
    }
}
