//! Derived ESG compliance metrics.
//!
//! Six record types, each owning one calculation that turns the record's
//! source fields into its derived fields:
//!
//! - **Disclosure**: per-module and overall completion percentages
//! - **Materiality**: double-materiality priority buckets
//! - **Risk**: inherent and residual risk scores
//! - **Portfolio**: PCAF attributed emissions with totals and breakdowns
//! - **Target**: progress toward a goal and trajectory status
//! - **SBTi**: scope 3 coverage and rule violations
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   partial    ┌──────────┐   recompute(ctx)   ┌────────┐
//! │  persistence │──update────▶│  record  │───────────────────▶│ commit │
//! └──────────────┘              └──────────┘                    └────────┘
//!                                     ▲
//!                          ┌──────────┴──────────┐
//!                          │  RecomputeContext   │
//!                          │  StandardsProfile   │
//!                          │  as_of              │
//!                          └─────────────────────┘
//! ```
//!
//! Every record implements [`Recompute`]. Calculations are pure: no I/O, no
//! clock, no shared state. A failed recompute leaves the record untouched.

pub mod disclosure;
pub mod materiality;
pub mod pcaf;
pub mod recompute;
pub mod risk;
pub mod sbti;
pub mod target;
pub mod types;

// Re-export main types
pub use disclosure::{CompletionRollup, CompletionStatus, DisclosureItem, DisclosureRecord};
pub use materiality::{MaterialTopic, MaterialityClassifier, MaterialityMatrix, MaterialityRecord};
pub use pcaf::{Asset, AssetClass, AttributionCalculator, PortfolioAggregator, PortfolioRecord};
pub use recompute::{Recompute, RecomputeContext};
pub use risk::{Control, RiskRecord, RiskScorer};
pub use sbti::{SbtiRecord, SbtiRule, SbtiStatus, SbtiValidation, SbtiValidator, SbtiViolation};
pub use target::{ProgressEvaluator, TargetRecord, TargetStatus, TargetType};
pub use types::*;
