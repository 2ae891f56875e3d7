//! Science Based Targets initiative validation.
//!
//! Validation recomputes the scope 3 coverage from the screening, then checks
//! every rule and collects all violations instead of stopping at the first.
//! Violations are data, not errors: an invalid target set is still a valid
//! record. Only [`SbtiRecord::submit`] turns violations into an error.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use standards::{SbtiCriteria, Scope3Category};

use crate::recompute::{Recompute, RecomputeContext};
use crate::types::{check_range, ComplianceError, RecordMeta, Result};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Submission workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum SbtiStatus {
    #[default]
    Draft,
    Submitted,
    Validated,
    Rejected,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Scope3Commitment {
    pub included: bool,
    pub categories: Vec<Scope3Category>,
    /// Derived from the screening
    pub coverage_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct NearTermTarget {
    pub base_year: Option<i32>,
    pub target_year: Option<i32>,
    pub scope3: Scope3Commitment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct LongTermTarget {
    pub net_zero_year: Option<i32>,
}

/// Share of scope 3 emissions from one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CategoryAssessment {
    pub category: Scope3Category,
    /// Percent of scope 3 emissions
    pub percentage: f64,
    /// Covered by the near-term target
    pub included: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Scope3Screening {
    /// Scope 3 as a percent of total emissions
    pub total_scope3: Option<f64>,
    pub categories_assessed: Vec<CategoryAssessment>,
}

/// A science-based target set awaiting submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SbtiRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub status: SbtiStatus,
    pub near_term: NearTermTarget,
    pub long_term: LongTermTarget,
    pub scope3_screening: Scope3Screening,
}

impl SbtiRecord {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            meta: RecordMeta::new(tenant_id),
            status: SbtiStatus::Draft,
            near_term: NearTermTarget::default(),
            long_term: LongTermTarget::default(),
            scope3_screening: Scope3Screening::default(),
        }
    }

    /// Validate and move a draft to `submitted`.
    ///
    /// Only drafts can be submitted. An invalid target set is rejected with
    /// its violation messages and stays a draft.
    pub fn submit(&mut self, ctx: &RecomputeContext<'_>) -> Result<SbtiValidation> {
        if self.status != SbtiStatus::Draft {
            return Err(ComplianceError::InconsistentInput(format!(
                "cannot submit a target set in status {:?}",
                self.status
            )));
        }

        let validation = self.recompute(ctx)?;
        if !validation.valid {
            warn!(
                record_id = %self.meta.id,
                violations = validation.violations.len(),
                "SBTi submission rejected"
            );
            return Err(ComplianceError::ValidationFailed(validation.errors));
        }

        self.status = SbtiStatus::Submitted;
        Ok(validation)
    }
}

/// SBTi criteria checked on every validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum SbtiRule {
    /// Near-term target 5 to 10 years after the base year
    NearTermTimeframe,
    /// Scope 3 targeted when it is a large share of emissions
    Scope3Required,
    /// Targeted scope 3 covers enough of the inventory
    Scope3Coverage,
    /// Net zero no later than 2050
    NetZeroDeadline,
}

impl SbtiRule {
    /// Short rule code, R1 to R4.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NearTermTimeframe => "R1",
            Self::Scope3Required => "R2",
            Self::Scope3Coverage => "R3",
            Self::NetZeroDeadline => "R4",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SbtiViolation {
    pub rule: SbtiRule,
    pub message: String,
}

/// Result of validating a target set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SbtiValidation {
    pub valid: bool,
    /// Violation messages in rule order
    pub errors: Vec<String>,
    pub violations: Vec<SbtiViolation>,
    pub coverage_percentage: f64,
}

impl SbtiValidation {
    pub fn violates(&self, rule: SbtiRule) -> bool {
        self.violations.iter().any(|violation| violation.rule == rule)
    }
}

/// Checks a target set against [`SbtiCriteria`].
pub struct SbtiValidator<'a> {
    criteria: &'a SbtiCriteria,
}

impl<'a> SbtiValidator<'a> {
    pub fn new(criteria: &'a SbtiCriteria) -> Self {
        Self { criteria }
    }

    /// Sum of the percentages of included categories.
    pub fn coverage(&self, screening: &Scope3Screening) -> Result<f64> {
        let mut coverage = 0.0;
        for assessment in &screening.categories_assessed {
            check_range(
                format!("scope3Screening.{}.percentage", assessment.category.as_str()),
                assessment.percentage,
                0.0,
                100.0,
            )?;
            if assessment.included {
                coverage += assessment.percentage;
            }
        }
        Ok(coverage)
    }

    /// Check every rule with a precomputed coverage.
    pub fn validate(&self, record: &SbtiRecord, coverage: f64) -> SbtiValidation {
        let criteria = self.criteria;
        let mut violations = Vec::new();
        let mut violate = |rule: SbtiRule, message: String| {
            violations.push(SbtiViolation { rule, message });
        };

        let near_term = &record.near_term;
        match (near_term.base_year, near_term.target_year) {
            (Some(base), Some(target)) => {
                let years = target - base;
                if years < criteria.min_near_term_years || years > criteria.max_near_term_years {
                    violate(
                        SbtiRule::NearTermTimeframe,
                        format!(
                            "Near-term target must be {} to {} years after the base year (got {})",
                            criteria.min_near_term_years, criteria.max_near_term_years, years
                        ),
                    );
                }
            }
            _ => violate(
                SbtiRule::NearTermTimeframe,
                "Near-term base year and target year are required".to_string(),
            ),
        }

        if let Some(total) = record.scope3_screening.total_scope3 {
            if total > criteria.scope3_materiality_percent && !near_term.scope3.included {
                violate(
                    SbtiRule::Scope3Required,
                    format!(
                        "Scope 3 is {}% of emissions and must be included when above {}%",
                        total, criteria.scope3_materiality_percent
                    ),
                );
            }
        }

        if near_term.scope3.included && coverage < criteria.min_scope3_coverage_percent {
            violate(
                SbtiRule::Scope3Coverage,
                format!(
                    "Scope 3 target coverage is {}%, at least {}% is required",
                    coverage, criteria.min_scope3_coverage_percent
                ),
            );
        }

        if let Some(year) = record.long_term.net_zero_year {
            if year > criteria.latest_net_zero_year {
                violate(
                    SbtiRule::NetZeroDeadline,
                    format!(
                        "Net-zero year {} is later than {}",
                        year, criteria.latest_net_zero_year
                    ),
                );
            }
        }

        SbtiValidation {
            valid: violations.is_empty(),
            errors: violations.iter().map(|v| v.message.clone()).collect(),
            violations,
            coverage_percentage: coverage,
        }
    }
}

impl Recompute for SbtiRecord {
    type Outcome = SbtiValidation;

    fn recompute(&mut self, ctx: &RecomputeContext<'_>) -> Result<SbtiValidation> {
        if let Some(total) = self.scope3_screening.total_scope3 {
            check_range("scope3Screening.totalScope3", total, 0.0, 100.0)?;
        }

        let validator = SbtiValidator::new(&ctx.standards.sbti);
        let coverage = validator.coverage(&self.scope3_screening)?;
        let validation = validator.validate(self, coverage);

        debug!(
            record_id = %self.meta.id,
            coverage,
            valid = validation.valid,
            violations = validation.violations.len(),
            "Validated SBTi target set"
        );

        self.near_term.scope3.coverage_percentage = coverage;
        self.meta.touch(ctx);
        Ok(validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use standards::StandardsProfile;

    fn make_assessment(category: Scope3Category, percentage: f64, included: bool) -> CategoryAssessment {
        CategoryAssessment {
            category,
            percentage,
            included,
        }
    }

    fn make_record(base_year: i32, target_year: i32) -> SbtiRecord {
        let mut record = SbtiRecord::new("tenant-1");
        record.near_term.base_year = Some(base_year);
        record.near_term.target_year = Some(target_year);
        record
    }

    #[test]
    fn test_excluded_material_scope3_is_invalid() {
        let standards = StandardsProfile::default();
        let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

        let mut record = make_record(2020, 2028);
        record.scope3_screening.total_scope3 = Some(45.0);

        let validation = record.recompute(&ctx).unwrap();

        assert!(!validation.valid);
        assert_eq!(validation.violations.len(), 1);
        assert!(validation.violates(SbtiRule::Scope3Required));
        assert_eq!(validation.violations[0].rule.code(), "R2");
    }

    #[test]
    fn test_all_violations_are_collected() {
        let standards = StandardsProfile::default();
        let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

        let mut record = make_record(2020, 2022);
        record.near_term.scope3.included = true;
        record.scope3_screening.categories_assessed = vec![
            make_assessment(Scope3Category::PurchasedGoodsAndServices, 40.0, true),
            make_assessment(Scope3Category::BusinessTravel, 10.0, false),
        ];
        record.long_term.net_zero_year = Some(2060);

        let validation = record.recompute(&ctx).unwrap();

        let codes: Vec<_> = validation.violations.iter().map(|v| v.rule.code()).collect();
        assert_eq!(codes, vec!["R1", "R3", "R4"]);
        assert_eq!(validation.errors.len(), 3);
        assert_eq!(validation.coverage_percentage, 40.0);
        assert_eq!(record.near_term.scope3.coverage_percentage, 40.0);
    }

    #[test]
    fn test_missing_years_violate_timeframe() {
        let criteria = SbtiCriteria::default();
        let validator = SbtiValidator::new(&criteria);

        let record = SbtiRecord::new("tenant-1");
        let validation = validator.validate(&record, 0.0);

        assert!(validation.violates(SbtiRule::NearTermTimeframe));
        assert_eq!(
            validation.errors,
            vec!["Near-term base year and target year are required".to_string()]
        );
    }

    #[test]
    fn test_timeframe_bounds_inclusive() {
        let criteria = SbtiCriteria::default();
        let validator = SbtiValidator::new(&criteria);

        assert!(validator.validate(&make_record(2020, 2025), 0.0).valid);
        assert!(validator.validate(&make_record(2020, 2030), 0.0).valid);
        assert!(!validator.validate(&make_record(2020, 2031), 0.0).valid);
    }

    #[test]
    fn test_missing_total_scope3_skips_materiality_rule() {
        let criteria = SbtiCriteria::default();
        let validator = SbtiValidator::new(&criteria);

        let record = make_record(2020, 2028);
        assert!(!validator.validate(&record, 0.0).violates(SbtiRule::Scope3Required));
    }

    #[test]
    fn test_invalid_percentage_is_fatal() {
        let standards = StandardsProfile::default();
        let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

        let mut record = make_record(2020, 2028);
        record.scope3_screening.categories_assessed =
            vec![make_assessment(Scope3Category::Investments, 120.0, true)];
        let snapshot = record.clone();

        let err = record.recompute(&ctx).unwrap_err();
        assert!(matches!(err, ComplianceError::OutOfRange { .. }));
        assert_eq!(record, snapshot);
    }

    #[test]
    fn test_submit_gate() {
        let standards = StandardsProfile::default();
        let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

        let mut record = make_record(2020, 2028);
        record.scope3_screening.total_scope3 = Some(45.0);

        let err = record.submit(&ctx).unwrap_err();
        assert!(matches!(err, ComplianceError::ValidationFailed(ref errors) if errors.len() == 1));
        assert_eq!(record.status, SbtiStatus::Draft);

        record.near_term.scope3.included = true;
        record.scope3_screening.categories_assessed = vec![
            make_assessment(Scope3Category::PurchasedGoodsAndServices, 55.0, true),
            make_assessment(Scope3Category::UseOfSoldProducts, 20.0, true),
        ];
        let validation = record.submit(&ctx).unwrap();
        assert!(validation.valid);
        assert_eq!(record.status, SbtiStatus::Submitted);

        let again = record.submit(&ctx);
        assert!(matches!(again, Err(ComplianceError::InconsistentInput(_))));
    }
}
