//! Disclosure framework module catalogue.

use serde::{Deserialize, Serialize};

/// The modules a disclosure is expected to cover.
///
/// Modules listed here always appear in a completion rollup, scoring 0 when
/// the record has no items for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisclosureFramework {
    /// Framework name, e.g. "ESRS"
    pub name: String,
    /// Dotted module paths, `pillar.topic`
    pub modules: Vec<String>,
}

impl Default for DisclosureFramework {
    fn default() -> Self {
        Self {
            name: "ESRS".to_string(),
            modules: [
                "environmental.climateChange",
                "environmental.pollution",
                "environmental.waterAndMarineResources",
                "environmental.biodiversity",
                "environmental.circularEconomy",
                "social.ownWorkforce",
                "social.valueChainWorkers",
                "social.affectedCommunities",
                "social.consumersAndEndUsers",
                "governance.businessConduct",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl DisclosureFramework {
    /// A framework that requires no particular modules.
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: Vec::new(),
        }
    }

    pub fn requires(&self, module: &str) -> bool {
        self.modules.iter().any(|m| m == module)
    }
}
