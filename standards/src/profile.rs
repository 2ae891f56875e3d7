//! The standards profile: every table a recompute depends on, versioned and
//! fingerprinted.
//!
//! A profile is loaded once (usually from YAML) and handed to calculations by
//! reference. Derived metrics store the profile fingerprint so a persisted
//! value can be traced back to the tables that produced it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::disclosure::DisclosureFramework;
use crate::pcaf::PcafPolicy;
use crate::risk::{RiskBands, RiskScales};
use crate::sbti::SbtiCriteria;
use crate::thresholds::{MaterialityThresholds, TargetThresholds};
use crate::types::Result;

/// Versioned bundle of calculation standards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardsProfile {
    /// Profile version, bumped whenever a table changes
    pub version: String,
    /// Risk matrix tables
    pub risk: RiskStandards,
    /// Double-materiality cut-offs
    pub materiality: MaterialityThresholds,
    /// Target trajectory tolerances
    pub targets: TargetThresholds,
    /// SBTi criteria
    pub sbti: SbtiCriteria,
    /// Disclosure framework modules
    pub disclosure: DisclosureFramework,
    /// PCAF attribution policy
    pub pcaf: PcafPolicy,
}

/// Risk scales and bands.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskStandards {
    pub scales: RiskScales,
    pub bands: RiskBands,
}

impl Default for StandardsProfile {
    fn default() -> Self {
        Self {
            version: "2024.1".to_string(),
            risk: RiskStandards::default(),
            materiality: MaterialityThresholds::default(),
            targets: TargetThresholds::default(),
            sbti: SbtiCriteria::default(),
            disclosure: DisclosureFramework::default(),
            pcaf: PcafPolicy::default(),
        }
    }
}

impl StandardsProfile {
    /// Load a profile from YAML and validate it.
    ///
    /// Sections missing from the document keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let profile: Self = serde_yaml::from_str(yaml)?;
        profile.validate()?;
        tracing::debug!(
            version = %profile.version,
            fingerprint = %profile.fingerprint(),
            "Loaded standards profile"
        );
        Ok(profile)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every table for completeness and ordering.
    pub fn validate(&self) -> Result<()> {
        self.risk.scales.validate()?;
        self.risk.bands.validate()?;
        self.materiality.validate()?;
        self.targets.validate()?;
        self.sbti.validate()?;
        Ok(())
    }

    /// Hex SHA-256 over the canonical JSON form of the profile.
    ///
    /// Every table is keyed by strings or unit enums, so JSON serialization
    /// cannot fail. Should it ever, the hash of an empty buffer is returned,
    /// which no real profile shares.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_vec(self).unwrap_or_default();
        compute_hash(&json)
    }

    /// Whether this profile is the one that produced `fingerprint`.
    pub fn matches_fingerprint(&self, fingerprint: &str) -> bool {
        self.fingerprint() == fingerprint
    }
}

/// Compute SHA256 hash of content.
pub fn compute_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
