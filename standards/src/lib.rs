//! Calculation standards for ESG compliance metrics.
//!
//! Every business constant a derived metric depends on lives here as an
//! explicit, named table rather than a literal inside a calculation:
//!
//! - **Risk**: ordinal ranks for likelihood and impact, control discounts, score bands
//! - **Materiality**: double-materiality priority cut-offs
//! - **Targets**: tolerances below the expected trajectory
//! - **SBTi**: near-term window, scope 3 triggers, net-zero deadline
//! - **Disclosure**: modules a disclosure framework expects
//! - **PCAF**: attribution factor policy
//!
//! Tables are bundled into a [`StandardsProfile`], which can be loaded from
//! YAML, validated, and fingerprinted so stored metrics can name the table
//! version they were computed with.
//!
//! # Example
//!
//! ```ignore
//! use standards::StandardsProfile;
//!
//! let profile = StandardsProfile::from_yaml(&std::fs::read_to_string("standards.yaml")?)?;
//! let rank = profile.risk.scales.likelihood_rank("likely".parse()?)?;
//! ```

pub mod disclosure;
pub mod pcaf;
pub mod profile;
pub mod risk;
pub mod sbti;
pub mod thresholds;
pub mod types;

// Re-export main types
pub use disclosure::DisclosureFramework;
pub use pcaf::{AttributionPolicy, PcafPolicy};
pub use profile::{compute_hash, RiskStandards, StandardsProfile};
pub use risk::{RiskBands, RiskScales};
pub use sbti::SbtiCriteria;
pub use thresholds::{MaterialityThresholds, TargetThresholds};
pub use types::*;
