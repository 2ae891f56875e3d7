//! PCAF financed emissions.
//!
//! Each asset attributes a share of its borrower's emissions to the portfolio
//! in proportion to `outstanding amount / company value`. The portfolio then
//! aggregates attributed emissions, exposure and data quality by asset class,
//! sector and geography.
//!
//! - **Attribution**: per-asset factor and emissions, see [`AttributionCalculator`]
//! - **Aggregation**: whole-sequence totals and breakdowns, see [`PortfolioAggregator`]

mod aggregation;
mod attribution;

pub use aggregation::{
    empty_distribution, AssetClassBreakdown, Breakdown, PortfolioAggregate, PortfolioAggregator,
    PortfolioTotals,
};
pub use attribution::{Attribution, AttributionCalculator, AttributionFlag};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::recompute::{Recompute, RecomputeContext};
use crate::types::{RecordMeta, Result};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// PCAF asset classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    ListedEquityAndCorporateBonds,
    /// Business loans and unlisted equity
    BusinessLoans,
    ProjectFinance,
    CommercialRealEstate,
    Mortgages,
    MotorVehicleLoans,
    SovereignDebt,
}

/// A financed exposure in a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub asset_class: AssetClass,
    pub sector: Option<String>,
    pub geography: Option<String>,
    /// Loan or investment amount outstanding
    pub outstanding_amount: f64,
    /// EVIC or total equity plus debt of the borrower
    pub company_value: f64,
    /// Borrower's scope 1 and 2 emissions, tCO2e
    pub borrower_emissions: f64,
    /// PCAF score, 1 (best) to 5
    pub data_quality_score: u8,

    // Derived
    pub attribution_factor: Option<f64>,
    pub attributed_emissions: Option<f64>,
    pub attribution_flag: Option<AttributionFlag>,
}

/// A financed-emissions portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub reporting_year: i32,
    pub assets: Vec<Asset>,

    // Derived
    pub totals: PortfolioTotals,
    pub breakdown_by_asset_class: BTreeMap<AssetClass, AssetClassBreakdown>,
    pub breakdown_by_sector: BTreeMap<String, Breakdown>,
    pub breakdown_by_geography: BTreeMap<String, Breakdown>,
    pub data_quality_distribution: BTreeMap<u8, usize>,
}

impl PortfolioRecord {
    pub fn new(tenant_id: impl Into<String>, name: impl Into<String>, reporting_year: i32) -> Self {
        Self {
            meta: RecordMeta::new(tenant_id),
            name: name.into(),
            reporting_year,
            assets: Vec::new(),
            totals: PortfolioTotals::default(),
            breakdown_by_asset_class: BTreeMap::new(),
            breakdown_by_sector: BTreeMap::new(),
            breakdown_by_geography: BTreeMap::new(),
            data_quality_distribution: empty_distribution(),
        }
    }

    /// Assets whose attribution was clamped, out of range or impossible.
    pub fn flagged_assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter().filter(|asset| asset.attribution_flag.is_some())
    }
}

impl Recompute for PortfolioRecord {
    type Outcome = ();

    fn recompute(&mut self, ctx: &RecomputeContext<'_>) -> Result<()> {
        let policy = &ctx.standards.pcaf;
        let calculator = AttributionCalculator::new(policy.attribution);

        for asset in &self.assets {
            calculator.check_inputs(asset)?;
        }
        let mut assets = self.assets.clone();
        for asset in &mut assets {
            let attribution = calculator.attribute(asset);
            asset.attribution_factor = attribution.factor;
            asset.attributed_emissions = attribution.emissions;
            asset.attribution_flag = attribution.flag;
        }

        let aggregate = PortfolioAggregator::new(&policy.unspecified_key).aggregate(&assets);
        aggregate.check_finite()?;

        debug!(
            record_id = %self.meta.id,
            assets = aggregate.totals.asset_count,
            financed_emissions = aggregate.totals.total_financed_emissions,
            "Recomputed portfolio financed emissions"
        );

        self.assets = assets;
        self.totals = aggregate.totals;
        self.breakdown_by_asset_class = aggregate.by_asset_class;
        self.breakdown_by_sector = aggregate.by_sector;
        self.breakdown_by_geography = aggregate.by_geography;
        self.data_quality_distribution = aggregate.data_quality_distribution;
        self.meta.touch(ctx);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use standards::StandardsProfile;

    pub(crate) fn make_asset(
        id: &str,
        outstanding_amount: f64,
        company_value: f64,
        borrower_emissions: f64,
    ) -> Asset {
        Asset {
            id: id.to_string(),
            name: format!("Borrower {}", id),
            asset_class: AssetClass::BusinessLoans,
            sector: None,
            geography: None,
            outstanding_amount,
            company_value,
            borrower_emissions,
            data_quality_score: 3,
            attribution_factor: None,
            attributed_emissions: None,
            attribution_flag: None,
        }
    }

    #[test]
    fn test_recompute_attributes_and_aggregates() {
        let standards = StandardsProfile::default();
        let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

        let mut portfolio = PortfolioRecord::new("tenant-1", "Corporate book", 2024);
        portfolio.assets.push(make_asset("a1", 100.0, 1000.0, 500.0));
        portfolio.assets.push(make_asset("a2", 200.0, 400.0, 80.0));
        portfolio.recompute(&ctx).unwrap();

        assert_eq!(portfolio.assets[0].attribution_factor, Some(0.1));
        assert_eq!(portfolio.assets[0].attributed_emissions, Some(50.0));
        assert_eq!(portfolio.assets[1].attributed_emissions, Some(40.0));
        assert_eq!(portfolio.totals.total_financed_emissions, 90.0);
        assert_eq!(portfolio.totals.weighted_average_data_quality, 3.0);
        assert_eq!(portfolio.data_quality_distribution[&3], 2);
        assert_eq!(portfolio.flagged_assets().count(), 0);
    }

    #[test]
    fn test_removal_triggers_full_reaggregation() {
        let standards = StandardsProfile::default();
        let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

        let mut portfolio = PortfolioRecord::new("tenant-1", "Corporate book", 2024);
        let mut energy = make_asset("a1", 100.0, 1000.0, 500.0);
        energy.sector = Some("energy".to_string());
        portfolio.assets.push(energy);
        portfolio.assets.push(make_asset("a2", 200.0, 400.0, 80.0));
        portfolio.recompute(&ctx).unwrap();
        assert!(portfolio.breakdown_by_sector.contains_key("energy"));

        portfolio.assets.remove(0);
        portfolio.recompute(&ctx).unwrap();

        assert_eq!(portfolio.totals.total_financed_emissions, 40.0);
        assert_eq!(portfolio.totals.asset_count, 1);
        assert!(!portfolio.breakdown_by_sector.contains_key("energy"));
    }

    #[test]
    fn test_invalid_asset_aborts_whole_recompute() {
        let standards = StandardsProfile::default();
        let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

        let mut portfolio = PortfolioRecord::new("tenant-1", "Corporate book", 2024);
        portfolio.assets.push(make_asset("a1", 100.0, 1000.0, 500.0));
        let mut bad = make_asset("a2", 100.0, 1000.0, 500.0);
        bad.data_quality_score = 0;
        portfolio.assets.push(bad);
        let snapshot = portfolio.clone();

        assert!(portfolio.recompute(&ctx).is_err());
        assert_eq!(portfolio, snapshot);
    }

    #[test]
    fn test_overflowing_attribution_never_stored() {
        let mut standards = StandardsProfile::default();
        standards.pcaf.attribution = standards::AttributionPolicy::Unclamped;
        let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

        let mut portfolio = PortfolioRecord::new("tenant-1", "Corporate book", 2024);
        portfolio.assets.push(make_asset("a1", 100.0, 1000.0, 500.0));
        portfolio.assets.push(make_asset("a2", 1e300, 1e-10, 0.0));
        portfolio.recompute(&ctx).unwrap();

        assert_eq!(portfolio.assets[1].attribution_factor, None);
        assert_eq!(portfolio.assets[1].attributed_emissions, None);
        assert_eq!(portfolio.assets[1].attribution_flag, Some(AttributionFlag::Overflow));
        assert_eq!(portfolio.totals.total_financed_emissions, 50.0);
        assert_eq!(portfolio.totals.asset_count, 2);
    }

    #[test]
    fn test_non_finite_input_aborts_whole_recompute() {
        let standards = StandardsProfile::default();
        let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

        let mut portfolio = PortfolioRecord::new("tenant-1", "Corporate book", 2024);
        portfolio.assets.push(make_asset("a1", 100.0, 1000.0, 500.0));
        portfolio.recompute(&ctx).unwrap();

        portfolio.assets.push(make_asset("a2", 100.0, f64::INFINITY, 500.0));
        let snapshot = portfolio.clone();

        let err = portfolio.recompute(&ctx).unwrap_err();
        assert!(matches!(err, crate::types::ComplianceError::OutOfRange { .. }));
        assert_eq!(portfolio, snapshot);
    }

    #[test]
    fn test_overflowing_total_aborts_whole_recompute() {
        let standards = StandardsProfile::default();
        let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

        let mut portfolio = PortfolioRecord::new("tenant-1", "Corporate book", 2024);
        portfolio.assets.push(make_asset("a1", 1.0, 1.0, 1e308));
        portfolio.assets.push(make_asset("a2", 1.0, 1.0, 1e308));
        let snapshot = portfolio.clone();

        assert!(portfolio.recompute(&ctx).is_err());
        assert_eq!(portfolio, snapshot);
    }
}
