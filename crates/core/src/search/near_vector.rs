//! `nearVector` clause.

use super::SimilarityOptions;
use crate::rpc::pb;
use crate::text;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NearVector {
    vector: Vec<f32>,
    vector_per_target: Vec<(String, Vec<f32>)>,
    pub(crate) options: SimilarityOptions,
}

impl NearVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vector(mut self, vector: impl Into<Vec<f32>>) -> Self {
        self.vector = vector.into();
        self
    }

    /// A distinct query vector for each named target. Setting the same
    /// target twice replaces the earlier vector in place.
    pub fn with_vector_per_target(
        mut self,
        target: impl Into<String>,
        vector: impl Into<Vec<f32>>,
    ) -> Self {
        let target = target.into();
        let vector = vector.into();
        match self.vector_per_target.iter_mut().find(|(name, _)| *name == target) {
            Some(entry) => entry.1 = vector,
            None => self.vector_per_target.push((target, vector)),
        }
        self
    }

    similarity_setters!();

    pub fn options(&self) -> &SimilarityOptions {
        &self.options
    }

    pub(crate) fn to_text_body(&self) -> String {
        let mut parts = Vec::new();
        if !self.vector.is_empty() || self.vector_per_target.is_empty() {
            parts.push(format!("vector: {}", text::array(&self.vector)));
        }
        if !self.vector_per_target.is_empty() {
            let entries: Vec<String> = self
                .vector_per_target
                .iter()
                .map(|(name, v)| format!("{}: {}", name, text::array(v)))
                .collect();
            parts.push(format!("vectorPerTarget:{{{}}}", entries.join(" ")));
        }
        parts.extend(self.options.threshold_text());
        parts.extend(self.options.targets_text());
        format!("{{{}}}", parts.join(" "))
    }

    pub fn to_text(&self) -> String {
        format!("nearVector:{}", self.to_text_body())
    }

    pub fn to_rpc(&self) -> pb::NearVector {
        let (target_vectors, targets) = self.options.rpc_targets();
        pb::NearVector {
            vector: self.vector.clone(),
            certainty: self.options.certainty(),
            distance: self.options.distance(),
            target_vectors,
            targets,
            vector_for_targets: self
                .vector_per_target
                .iter()
                .map(|(name, v)| pb::VectorForTarget {
                    name: name.clone(),
                    vector: v.clone(),
                })
                .collect(),
        }
    }
}
