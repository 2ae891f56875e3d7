//! PCAF attribution policy.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// What to do with an attribution factor outside `[0, 1]`.
///
/// An outstanding amount larger than the company value (or a negative one)
/// yields a factor outside the documented range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum AttributionPolicy {
    /// Clamp into `[0, 1]` and flag the asset
    #[default]
    Clamp,
    /// Keep the raw ratio and flag the asset
    Unclamped,
}

/// Portfolio aggregation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcafPolicy {
    pub attribution: AttributionPolicy,
    /// Breakdown key for assets without a sector or geography
    pub unspecified_key: String,
}

impl Default for PcafPolicy {
    fn default() -> Self {
        Self {
            attribution: AttributionPolicy::Clamp,
            unspecified_key: "unspecified".to_string(),
        }
    }
}
