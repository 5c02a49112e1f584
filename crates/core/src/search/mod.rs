//! Search argument builders.
//!
//! Every builder here is a plain value type: setters consume and return
//! `self`, and `to_text()` / `to_rpc()` render the accumulated state without
//! I/O. Builders are `Send` but carry no synchronization; share one across
//! threads only behind a lock.

use crate::rpc::pb;
use multi_target::MultiTarget;

/// Generates the setters shared by every similarity builder. The target type
/// must have an `options: SimilarityOptions` field.
macro_rules! similarity_setters {
    () => {
        /// Minimum normalized similarity. Replaces any distance set earlier.
        pub fn with_certainty(mut self, certainty: f32) -> Self {
            self.options.threshold = Some($crate::search::Threshold::Certainty(certainty));
            self
        }

        /// Maximum raw distance. Replaces any certainty set earlier.
        pub fn with_distance(mut self, distance: f32) -> Self {
            self.options.threshold = Some($crate::search::Threshold::Distance(distance));
            self
        }

        pub fn with_target_vectors<I, S>(mut self, names: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.options.target_vectors = names.into_iter().map(Into::into).collect();
            self
        }

        /// Weighted combination of target vectors; takes precedence over
        /// plain target names when both are set.
        pub fn with_targets(mut self, targets: $crate::search::multi_target::MultiTarget) -> Self {
            self.options.targets = Some(targets);
            self
        }
    };
}

pub mod bm25;
pub mod filter;
pub mod hybrid;
pub mod multi_target;
pub mod near_media;
pub mod near_object;
pub mod near_text;
pub mod near_vector;
pub mod types;

pub use bm25::{Bm25, SearchOperator};
pub use filter::WhereBuilder;
pub use hybrid::{FusionType, Hybrid, HybridSearch};
pub use multi_target::{CombinationMethod, TargetWeight};
pub use near_media::{
    MediaKind, NearAudio, NearDepth, NearImage, NearImu, NearMedia, NearThermal, NearVideo,
};
pub use near_object::NearObject;
pub use near_text::{MoveObject, MoveParameters, NearText};
pub use near_vector::NearVector;
pub use types::{ConsistencyLevel, GroupBy, Sort, SortOrder};

/// Similarity cut-off. Certainty and distance share one slot so at most one
/// is ever rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Certainty(f32),
    Distance(f32),
}

/// Fields common to every similarity clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityOptions {
    pub threshold: Option<Threshold>,
    pub target_vectors: Vec<String>,
    pub targets: Option<MultiTarget>,
}

impl SimilarityOptions {
    pub fn certainty(&self) -> Option<f32> {
        match self.threshold {
            Some(Threshold::Certainty(c)) => Some(c),
            _ => None,
        }
    }

    pub fn distance(&self) -> Option<f32> {
        match self.threshold {
            Some(Threshold::Distance(d)) => Some(d),
            _ => None,
        }
    }

    /// The combination, if one with a method was supplied.
    pub fn effective_targets(&self) -> Option<&MultiTarget> {
        self.targets.as_ref().filter(|t| t.is_set())
    }

    /// `certainty: 0.7` or `distance: 0.3`.
    pub fn threshold_text(&self) -> Option<String> {
        self.threshold.map(|t| match t {
            Threshold::Certainty(c) => format!("certainty: {}", c),
            Threshold::Distance(d) => format!("distance: {}", d),
        })
    }

    /// `targets:{...}` when a combination is set, else `targetVectors: [...]`.
    pub fn targets_text(&self) -> Option<String> {
        if let Some(targets) = self.effective_targets() {
            return Some(targets.to_text());
        }
        if self.target_vectors.is_empty() {
            None
        } else {
            Some(format!(
                "targetVectors: {}",
                crate::text::string_array(&self.target_vectors)
            ))
        }
    }

    /// `(target_vectors, targets)` for RPC messages; only one side is filled.
    pub fn rpc_targets(&self) -> (Vec<String>, Option<pb::Targets>) {
        match self.effective_targets() {
            Some(targets) => (Vec::new(), Some(targets.to_rpc())),
            None => (self.target_vectors.clone(), None),
        }
    }
}

/// One similarity clause of any kind, as accepted by Explore.
#[derive(Debug, Clone, PartialEq)]
pub enum SimilarityClause {
    NearText(NearText),
    NearVector(NearVector),
    NearObject(NearObject),
    NearMedia(NearMedia),
}

impl SimilarityClause {
    pub fn to_text(&self) -> String {
        match self {
            SimilarityClause::NearText(c) => c.to_text(),
            SimilarityClause::NearVector(c) => c.to_text(),
            SimilarityClause::NearObject(c) => c.to_text(),
            SimilarityClause::NearMedia(c) => c.to_text(),
        }
    }
}

impl From<NearText> for SimilarityClause {
    fn from(c: NearText) -> Self {
        SimilarityClause::NearText(c)
    }
}

impl From<NearVector> for SimilarityClause {
    fn from(c: NearVector) -> Self {
        SimilarityClause::NearVector(c)
    }
}

impl From<NearObject> for SimilarityClause {
    fn from(c: NearObject) -> Self {
        SimilarityClause::NearObject(c)
    }
}

impl From<NearMedia> for SimilarityClause {
    fn from(c: NearMedia) -> Self {
        SimilarityClause::NearMedia(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_single_slot() {
        let opts = SimilarityOptions {
            threshold: Some(Threshold::Distance(0.2)),
            ..Default::default()
        };
        assert_eq!(opts.certainty(), None);
        assert_eq!(opts.distance(), Some(0.2));
        assert_eq!(opts.threshold_text().as_deref(), Some("distance: 0.2"));
    }

    #[test]
    fn test_multi_target_wins_over_names() {
        let opts = SimilarityOptions {
            threshold: None,
            target_vectors: vec!["plain".into()],
            targets: Some(MultiTarget::new().sum(["a", "b"])),
        };
        assert_eq!(
            opts.targets_text().as_deref(),
            Some("targets:{combinationMethod: sum targetVectors: [\"a\",\"b\"]}")
        );
        let (names, targets) = opts.rpc_targets();
        assert!(names.is_empty());
        assert!(targets.is_some());
    }

    #[test]
    fn test_unset_multi_target_falls_back_to_names() {
        let opts = SimilarityOptions {
            threshold: None,
            target_vectors: vec!["plain".into()],
            targets: Some(MultiTarget::new().sum(Vec::<String>::new())),
        };
        assert_eq!(opts.targets_text().as_deref(), Some("targetVectors: [\"plain\"]"));
        assert_eq!(opts.rpc_targets(), (vec!["plain".to_string()], None));
    }
}
