//! The recompute-on-write contract.
//!
//! The persistence layer applies a partial update to a record, then calls
//! [`Recompute::recompute`] before committing. Implementations are pure: the
//! result depends only on the record and the [`RecomputeContext`], and
//! calling twice on an unchanged record changes nothing.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use standards::StandardsProfile;

use crate::types::{ComplianceError, Result};

/// Everything a recompute may read besides the record itself.
#[derive(Debug, Clone)]
pub struct RecomputeContext<'a> {
    /// Tables the calculations run against
    pub standards: &'a StandardsProfile,
    /// Evaluation instant; supplies the current year for trajectories
    pub as_of: DateTime<Utc>,
    fingerprint: String,
}

impl<'a> RecomputeContext<'a> {
    /// Create a context evaluating at `as_of`.
    pub fn new(standards: &'a StandardsProfile, as_of: DateTime<Utc>) -> Self {
        Self {
            standards,
            as_of,
            fingerprint: standards.fingerprint(),
        }
    }

    /// Create a context evaluating at midnight UTC on January 1st of `year`.
    pub fn at_year(standards: &'a StandardsProfile, year: i32) -> Result<Self> {
        let as_of = Utc
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| ComplianceError::InconsistentInput(format!("invalid year {}", year)))?;
        Ok(Self::new(standards, as_of))
    }

    /// Calendar year of the evaluation instant.
    pub fn current_year(&self) -> i32 {
        self.as_of.year()
    }

    /// Fingerprint of the standards profile.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// A record whose derived fields are a function of its source fields.
pub trait Recompute {
    /// Extra result handed back to the caller besides the refreshed record.
    type Outcome;

    /// Overwrite every derived field from the current source fields.
    ///
    /// On error the record is left exactly as it was.
    fn recompute(&mut self, ctx: &RecomputeContext<'_>) -> Result<Self::Outcome>;
}
