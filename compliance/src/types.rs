//! Core types shared by every record: the envelope and the error taxonomy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use standards::StandardsError;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Identity and bookkeeping carried by every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    /// Opaque record id
    pub id: String,
    /// Owning tenant
    pub tenant_id: String,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When derived fields were last recomputed
    pub updated_at: DateTime<Utc>,
    /// Fingerprint of the standards profile used for the last recompute
    pub standards_fingerprint: Option<String>,
}

impl RecordMeta {
    /// Create a new envelope for a tenant.
    pub fn new(tenant_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.into(),
            created_at: now,
            updated_at: now,
            standards_fingerprint: None,
        }
    }

    /// Stamp a successful recompute.
    pub(crate) fn touch(&mut self, ctx: &crate::recompute::RecomputeContext<'_>) {
        self.updated_at = ctx.as_of;
        self.standards_fingerprint = Some(ctx.fingerprint().to_string());
    }
}

/// Error types for metric recomputation.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    /// Lookup table or vocabulary problem
    #[error("Standards error: {0}")]
    Standards(#[from] StandardsError),

    /// A numeric source field outside its admissible range
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Source fields that contradict each other
    #[error("Inconsistent input: {0}")]
    InconsistentInput(String),

    /// Rule violations blocking a workflow transition
    #[error("Validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),
}

pub type Result<T> = std::result::Result<T, ComplianceError>;

/// Reject non-finite values and values outside `[min, max]`.
pub(crate) fn check_range(field: impl Into<String>, value: f64, min: f64, max: f64) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ComplianceError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        })
    }
}

/// Reject non-finite values.
pub(crate) fn check_finite(field: impl Into<String>, value: f64) -> Result<()> {
    check_range(field, value, f64::MIN, f64::MAX)
}
