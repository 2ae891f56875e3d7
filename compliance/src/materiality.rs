//! Double-materiality classification.
//!
//! Each material topic is scored on two independent axes, impact on people
//! and environment and impact on enterprise value, and placed in exactly one
//! priority bucket. Non-material topics are never bucketed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use standards::{MaterialityThresholds, PriorityBucket};

use crate::recompute::{Recompute, RecomputeContext};
use crate::types::{check_range, RecordMeta, Result};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A sustainability topic assessed for materiality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct MaterialTopic {
    pub id: String,
    pub name: String,
    /// Impact materiality, 1-10
    pub impact_score: f64,
    /// Financial materiality, 1-10
    pub financial_score: f64,
    pub is_material: bool,
    /// Derived; `None` for non-material topics
    pub priority: Option<PriorityBucket>,
}

impl MaterialTopic {
    pub fn new(name: impl Into<String>, impact_score: f64, financial_score: f64, is_material: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            impact_score,
            financial_score,
            is_material,
            priority: None,
        }
    }
}

/// Topic ids per priority bucket, in topic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct MaterialityMatrix {
    pub high_priority: Vec<String>,
    pub medium_priority: Vec<String>,
    pub low_priority: Vec<String>,
}

impl MaterialityMatrix {
    /// Bucket holding a topic id, if any.
    pub fn bucket_of(&self, topic_id: &str) -> Option<PriorityBucket> {
        let contains = |ids: &[String]| ids.iter().any(|id| id == topic_id);
        if contains(&self.high_priority) {
            Some(PriorityBucket::High)
        } else if contains(&self.medium_priority) {
            Some(PriorityBucket::Medium)
        } else if contains(&self.low_priority) {
            Some(PriorityBucket::Low)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.high_priority.len() + self.medium_priority.len() + self.low_priority.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A double-materiality assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct MaterialityRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub reporting_year: i32,
    pub topics: Vec<MaterialTopic>,
    /// Derived
    pub materiality_matrix: MaterialityMatrix,
}

impl MaterialityRecord {
    pub fn new(tenant_id: impl Into<String>, reporting_year: i32) -> Self {
        Self {
            meta: RecordMeta::new(tenant_id),
            reporting_year,
            topics: Vec::new(),
            materiality_matrix: MaterialityMatrix::default(),
        }
    }
}

/// Buckets material topics by their scores.
pub struct MaterialityClassifier<'a> {
    thresholds: &'a MaterialityThresholds,
}

impl<'a> MaterialityClassifier<'a> {
    pub fn new(thresholds: &'a MaterialityThresholds) -> Self {
        Self { thresholds }
    }

    /// Classify one topic. `None` if it is not material.
    pub fn classify_topic(&self, topic: &MaterialTopic) -> Result<Option<PriorityBucket>> {
        if !topic.is_material {
            return Ok(None);
        }

        let (min, max) = (self.thresholds.min_score, self.thresholds.max_score);
        check_range(format!("topics[{}].impactScore", topic.id), topic.impact_score, min, max)?;
        check_range(
            format!("topics[{}].financialScore", topic.id),
            topic.financial_score,
            min,
            max,
        )?;

        Ok(Some(
            self.thresholds.bucket(topic.impact_score, topic.financial_score),
        ))
    }

    /// Classify every topic, returning the matrix and per-topic buckets.
    pub fn classify(
        &self,
        topics: &[MaterialTopic],
    ) -> Result<(MaterialityMatrix, Vec<Option<PriorityBucket>>)> {
        let mut matrix = MaterialityMatrix::default();
        let mut priorities = Vec::with_capacity(topics.len());

        for topic in topics {
            let bucket = self.classify_topic(topic)?;
            match bucket {
                Some(PriorityBucket::High) => matrix.high_priority.push(topic.id.clone()),
                Some(PriorityBucket::Medium) => matrix.medium_priority.push(topic.id.clone()),
                Some(PriorityBucket::Low) => matrix.low_priority.push(topic.id.clone()),
                None => {}
            }
            priorities.push(bucket);
        }

        Ok((matrix, priorities))
    }
}

impl Recompute for MaterialityRecord {
    type Outcome = ();

    fn recompute(&mut self, ctx: &RecomputeContext<'_>) -> Result<()> {
        let classifier = MaterialityClassifier::new(&ctx.standards.materiality);
        let (matrix, priorities) = classifier.classify(&self.topics)?;

        debug!(
            record_id = %self.meta.id,
            high = matrix.high_priority.len(),
            medium = matrix.medium_priority.len(),
            low = matrix.low_priority.len(),
            "Recomputed materiality matrix"
        );

        for (topic, priority) in self.topics.iter_mut().zip(priorities) {
            topic.priority = priority;
        }
        self.materiality_matrix = matrix;
        self.meta.touch(ctx);
        Ok(())
    }
}
