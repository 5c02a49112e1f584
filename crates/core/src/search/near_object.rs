//! `nearObject` clause: search around an existing object by id or beacon.

use super::SimilarityOptions;
use crate::rpc::pb;
use crate::text;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NearObject {
    id: String,
    beacon: String,
    pub(crate) options: SimilarityOptions,
}

impl NearObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Cross-reference URI of the form `nearql://localhost/<Class>/<id>`.
    pub fn with_beacon(mut self, beacon: impl Into<String>) -> Self {
        self.beacon = beacon.into();
        self
    }

    similarity_setters!();

    pub fn options(&self) -> &SimilarityOptions {
        &self.options
    }

    pub fn to_text(&self) -> String {
        let mut parts = Vec::new();
        if !self.id.is_empty() {
            parts.push(format!("id: {}", text::quote(&self.id)));
        }
        if !self.beacon.is_empty() {
            parts.push(format!("beacon: {}", text::quote(&self.beacon)));
        }
        parts.extend(self.options.threshold_text());
        parts.extend(self.options.targets_text());
        format!("nearObject:{{{}}}", parts.join(" "))
    }

    pub fn to_rpc(&self) -> pb::NearObject {
        let (target_vectors, targets) = self.options.rpc_targets();
        pb::NearObject {
            id: self.id.clone(),
            beacon: self.beacon.clone(),
            certainty: self.options.certainty(),
            distance: self.options.distance(),
            target_vectors,
            targets,
        }
    }
}
