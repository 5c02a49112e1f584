//! Hybrid search clause.
//!
//! Combines a BM25 keyword query with a vector query on the server. `alpha`
//! weights the two sides (`0` = pure keyword, `1` = pure vector) and the
//! fusion type picks how the ranked lists are merged:
//! - **rankedFusion**: reciprocal-rank based
//! - **relativeScoreFusion**: min-max normalized scores
//!
//! The vector side is either an explicit `vector` or a nested `nearText` /
//! `nearVector` sub-search.

use super::bm25::SearchOperator;
use super::multi_target::MultiTarget;
use super::near_text::NearText;
use super::near_vector::NearVector;
use super::SimilarityOptions;
use crate::rpc::pb;
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionType {
    Ranked,
    RelativeScore,
}

impl FusionType {
    pub fn as_str(self) -> &'static str {
        match self {
            FusionType::Ranked => "rankedFusion",
            FusionType::RelativeScore => "relativeScoreFusion",
        }
    }

    fn to_rpc(self) -> pb::hybrid::FusionType {
        match self {
            FusionType::Ranked => pb::hybrid::FusionType::Ranked,
            FusionType::RelativeScore => pb::hybrid::FusionType::RelativeScore,
        }
    }
}

/// Vector-side sub-search of a hybrid query.
#[derive(Debug, Clone, PartialEq)]
pub enum HybridSearch {
    NearText(NearText),
    NearVector(NearVector),
}

impl HybridSearch {
    fn to_text(&self) -> String {
        match self {
            HybridSearch::NearText(nt) => format!("searches:{{nearText:{}}}", nt.to_text_body()),
            HybridSearch::NearVector(nv) => {
                format!("searches:{{nearVector:{}}}", nv.to_text_body())
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hybrid {
    query: String,
    vector: Vec<f32>,
    alpha: Option<f32>,
    properties: Vec<String>,
    fusion_type: Option<FusionType>,
    targets: SimilarityOptions,
    max_vector_distance: Option<f32>,
    bm25_search_operator: Option<SearchOperator>,
    search: Option<HybridSearch>,
}

impl Hybrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_vector(mut self, vector: impl Into<Vec<f32>>) -> Self {
        self.vector = vector.into();
        self
    }

    /// Not range-checked; the server rejects values outside `[0, 1]`.
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fusion_type(mut self, fusion_type: FusionType) -> Self {
        self.fusion_type = Some(fusion_type);
        self
    }

    pub fn with_target_vectors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets.target_vectors = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_targets(mut self, targets: MultiTarget) -> Self {
        self.targets.targets = Some(targets);
        self
    }

    pub fn with_max_vector_distance(mut self, distance: f32) -> Self {
        self.max_vector_distance = Some(distance);
        self
    }

    pub fn with_bm25_search_operator(mut self, operator: SearchOperator) -> Self {
        self.bm25_search_operator = Some(operator);
        self
    }

    pub fn with_near_text(mut self, near_text: NearText) -> Self {
        self.search = Some(HybridSearch::NearText(near_text));
        self
    }

    pub fn with_near_vector(mut self, near_vector: NearVector) -> Self {
        self.search = Some(HybridSearch::NearVector(near_vector));
        self
    }

    pub fn to_text(&self) -> String {
        let mut parts = vec![format!("query: {}", text::quote(&self.query))];
        if !self.vector.is_empty() {
            parts.push(format!("vector: {}", text::array(&self.vector)));
        }
        if let Some(alpha) = self.alpha {
            parts.push(format!("alpha: {}", alpha));
        }
        if !self.properties.is_empty() {
            parts.push(format!("properties: {}", text::string_array(&self.properties)));
        }
        if let Some(fusion) = self.fusion_type {
            parts.push(format!("fusionType: {}", fusion.as_str()));
        }
        parts.extend(self.targets.targets_text());
        if let Some(d) = self.max_vector_distance {
            parts.push(format!("maxVectorDistance: {}", d));
        }
        if let Some(op) = &self.bm25_search_operator {
            parts.push(format!("bm25SearchOperator:{}", op.to_text_body()));
        }
        if let Some(search) = &self.search {
            parts.push(search.to_text());
        }
        format!("hybrid:{{{}}}", parts.join(", "))
    }

    pub fn to_rpc(&self) -> pb::Hybrid {
        let (target_vectors, targets) = self.targets.rpc_targets();
        let (near_text, near_vector) = match &self.search {
            Some(HybridSearch::NearText(nt)) => (Some(nt.to_rpc()), None),
            Some(HybridSearch::NearVector(nv)) => (None, Some(nv.to_rpc())),
            None => (None, None),
        };
        pb::Hybrid {
            query: self.query.clone(),
            properties: self.properties.clone(),
            vector: self.vector.clone(),
            alpha: self.alpha,
            fusion_type: self
                .fusion_type
                .map_or(pb::hybrid::FusionType::Unspecified, FusionType::to_rpc)
                as i32,
            target_vectors,
            targets,
            max_vector_distance: self.max_vector_distance,
            bm25_search_operator: self.bm25_search_operator.as_ref().map(SearchOperator::to_rpc),
            near_text,
            near_vector,
        }
    }
}
