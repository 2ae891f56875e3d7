//! Disclosure completion rollup.
//!
//! A disclosure groups its items into named modules (`environmental.climateChange`).
//! Completion is counted per module and across the whole disclosure. The overall
//! figure is item-weighted, not an average of module scores, so a module with
//! no items cannot drag it down.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use standards::DisclosureFramework;

use crate::recompute::{Recompute, RecomputeContext};
use crate::types::{RecordMeta, Result};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A single disclosure requirement answered by the reporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct DisclosureItem {
    pub id: String,
    pub content: String,
    pub completed: bool,
}

/// Completion percentages, 0-100.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatus {
    pub overall: u8,
    pub by_module: BTreeMap<String, u8>,
    pub completed_items: usize,
    pub total_items: usize,
}

/// A sustainability disclosure for one reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct DisclosureRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub reporting_year: i32,
    /// Module path to its ordered items
    pub modules: BTreeMap<String, Vec<DisclosureItem>>,
    /// Derived
    pub completion_status: CompletionStatus,
}

impl DisclosureRecord {
    pub fn new(tenant_id: impl Into<String>, reporting_year: i32) -> Self {
        Self {
            meta: RecordMeta::new(tenant_id),
            reporting_year,
            modules: BTreeMap::new(),
            completion_status: CompletionStatus::default(),
        }
    }

    /// Append an item to a module, creating the module if needed.
    pub fn push_item(&mut self, module: impl Into<String>, item: DisclosureItem) {
        self.modules.entry(module.into()).or_default().push(item);
    }
}

/// Counts completed items per module and overall.
pub struct CompletionRollup<'a> {
    framework: &'a DisclosureFramework,
}

impl<'a> CompletionRollup<'a> {
    pub fn new(framework: &'a DisclosureFramework) -> Self {
        Self { framework }
    }

    /// Roll up completion across every module.
    ///
    /// Framework modules missing from `modules` are reported at 0.
    pub fn rollup(&self, modules: &BTreeMap<String, Vec<DisclosureItem>>) -> CompletionStatus {
        let mut by_module: BTreeMap<String, u8> = self
            .framework
            .modules
            .iter()
            .map(|module| (module.clone(), 0))
            .collect();

        let mut completed_items = 0;
        let mut total_items = 0;

        for (module, items) in modules {
            let done = items.iter().filter(|item| item.completed).count();
            by_module.insert(module.clone(), percent(done, items.len()));
            completed_items += done;
            total_items += items.len();
        }

        CompletionStatus {
            overall: percent(completed_items, total_items),
            by_module,
            completed_items,
            total_items,
        }
    }
}

/// `round(100 * part / whole)`, or 0 for an empty whole.
fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u8
}

impl Recompute for DisclosureRecord {
    type Outcome = ();

    fn recompute(&mut self, ctx: &RecomputeContext<'_>) -> Result<()> {
        let status = CompletionRollup::new(&ctx.standards.disclosure).rollup(&self.modules);

        debug!(
            record_id = %self.meta.id,
            overall = status.overall,
            completed = status.completed_items,
            total = status.total_items,
            "Recomputed disclosure completion"
        );

        self.completion_status = status;
        self.meta.touch(ctx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(id: &str, completed: bool) -> DisclosureItem {
        DisclosureItem {
            id: id.to_string(),
            content: format!("Response for {}", id),
            completed,
        }
    }

    fn make_modules(groups: &[(&str, &[bool])]) -> BTreeMap<String, Vec<DisclosureItem>> {
        groups
            .iter()
            .map(|(name, flags)| {
                let items = flags
                    .iter()
                    .enumerate()
                    .map(|(i, done)| make_item(&format!("{}-{}", name, i), *done))
                    .collect();
                (name.to_string(), items)
            })
            .collect()
    }

    #[test]
    fn test_item_weighted_overall() {
        let framework = DisclosureFramework::open("test");
        let rollup = CompletionRollup::new(&framework);

        let status = rollup.rollup(&make_modules(&[("A", &[true, true]), ("B", &[false])]));

        assert_eq!(status.overall, 67);
        assert_eq!(status.by_module["A"], 100);
        assert_eq!(status.by_module["B"], 0);
        assert_eq!(status.completed_items, 2);
        assert_eq!(status.total_items, 3);
    }

    #[test]
    fn test_empty_module_does_not_distort_overall() {
        let framework = DisclosureFramework::open("test");
        let rollup = CompletionRollup::new(&framework);

        let status = rollup.rollup(&make_modules(&[("A", &[true, true]), ("B", &[])]));

        assert_eq!(status.overall, 100);
        assert_eq!(status.by_module["B"], 0);
    }

    #[test]
    fn test_no_items_anywhere() {
        let framework = DisclosureFramework::default();
        let rollup = CompletionRollup::new(&framework);

        let status = rollup.rollup(&BTreeMap::new());

        assert_eq!(status.overall, 0);
        assert_eq!(status.by_module.len(), framework.modules.len());
        assert!(status.by_module.values().all(|score| *score == 0));
    }

    #[test]
    fn test_framework_modules_and_extra_modules() {
        let framework = DisclosureFramework::default();
        let rollup = CompletionRollup::new(&framework);

        let status = rollup.rollup(&make_modules(&[
            ("environmental.climateChange", &[true, false, false, false]),
            ("custom.taxTransparency", &[true]),
        ]));

        assert_eq!(status.by_module["environmental.climateChange"], 25);
        assert_eq!(status.by_module["custom.taxTransparency"], 100);
        assert_eq!(status.by_module["governance.businessConduct"], 0);
        assert_eq!(status.overall, 40);
    }

    #[test]
    fn test_rounding_half_up() {
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(5, 5), 100);
    }

    #[test]
    fn test_recompute_overwrites() {
        let standards = standards::StandardsProfile::default();
        let ctx = RecomputeContext::at_year(&standards, 2025).unwrap();

        let mut record = DisclosureRecord::new("tenant-1", 2024);
        record.push_item("environmental.climateChange", make_item("e1-1", true));
        record.recompute(&ctx).unwrap();
        assert_eq!(record.completion_status.overall, 100);

        record.modules.clear();
        record.push_item("social.ownWorkforce", make_item("s1-1", false));
        record.recompute(&ctx).unwrap();
        assert_eq!(record.completion_status.overall, 0);
        assert_eq!(record.completion_status.by_module["environmental.climateChange"], 0);
        assert_eq!(
            record.meta.standards_fingerprint.as_deref(),
            Some(ctx.fingerprint())
        );
    }
}
