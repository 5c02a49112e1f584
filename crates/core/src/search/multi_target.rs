//! Multi-target vector combination.
//!
//! A query against a collection with several named vectors can search all of
//! them at once and merge the per-target scores. [`MultiTarget`] records the
//! merge method, the distinct target names, and (for weighted methods) one
//! weight entry per target.

use crate::rpc::pb;
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombinationMethod {
    Sum,
    Average,
    Minimum,
    ManualWeights,
    RelativeScore,
}

impl CombinationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            CombinationMethod::Sum => "sum",
            CombinationMethod::Average => "average",
            CombinationMethod::Minimum => "minimum",
            CombinationMethod::ManualWeights => "manualWeights",
            CombinationMethod::RelativeScore => "relativeScore",
        }
    }

    fn to_rpc(self) -> pb::CombinationMethod {
        match self {
            CombinationMethod::Sum => pb::CombinationMethod::Sum,
            CombinationMethod::Average => pb::CombinationMethod::Average,
            CombinationMethod::Minimum => pb::CombinationMethod::Minimum,
            CombinationMethod::ManualWeights => pb::CombinationMethod::ManualWeights,
            CombinationMethod::RelativeScore => pb::CombinationMethod::RelativeScore,
        }
    }
}

/// Weight of one target: a single value, or several when the target is
/// listed more than once.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetWeight {
    Single(f32),
    Multi(Vec<f32>),
}

impl TargetWeight {
    fn merge(&mut self, other: TargetWeight) {
        let mut values = match std::mem::replace(self, TargetWeight::Multi(Vec::new())) {
            TargetWeight::Single(w) => vec![w],
            TargetWeight::Multi(ws) => ws,
        };
        match other {
            TargetWeight::Single(w) => values.push(w),
            TargetWeight::Multi(ws) => values.extend(ws),
        }
        *self = TargetWeight::Multi(values);
    }

    fn to_text(&self) -> String {
        match self {
            TargetWeight::Single(w) => w.to_string(),
            TargetWeight::Multi(ws) => text::array(ws),
        }
    }

    fn values(&self) -> &[f32] {
        match self {
            TargetWeight::Single(w) => std::slice::from_ref(w),
            TargetWeight::Multi(ws) => ws,
        }
    }
}

impl From<f32> for TargetWeight {
    fn from(w: f32) -> Self {
        TargetWeight::Single(w)
    }
}

impl From<Vec<f32>> for TargetWeight {
    fn from(ws: Vec<f32>) -> Self {
        TargetWeight::Multi(ws)
    }
}

/// Target-vector combination. Each method setter replaces the whole value atomically;
/// an empty input leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiTarget {
    method: Option<CombinationMethod>,
    target_vectors: Vec<String>,
    weights: Vec<TargetWeight>,
}

impl MultiTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sum<I, S>(self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unweighted(CombinationMethod::Sum, targets)
    }

    pub fn average<I, S>(self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unweighted(CombinationMethod::Average, targets)
    }

    pub fn minimum<I, S>(self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unweighted(CombinationMethod::Minimum, targets)
    }

    /// Explicit per-target weights. Repeating a target name accumulates its
    /// weights in call order.
    pub fn manual_weights<I, S, W>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, W)>,
        S: Into<String>,
        W: Into<TargetWeight>,
    {
        self.weighted(CombinationMethod::ManualWeights, pairs)
    }

    /// Per-target weights applied after score normalization.
    pub fn relative_score<I, S, W>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, W)>,
        S: Into<String>,
        W: Into<TargetWeight>,
    {
        self.weighted(CombinationMethod::RelativeScore, pairs)
    }

    fn unweighted<I, S>(mut self, method: CombinationMethod, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in targets.into_iter().map(Into::into) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        if names.is_empty() {
            return self;
        }
        self.method = Some(method);
        self.target_vectors = names;
        self.weights.clear();
        self
    }

    fn weighted<I, S, W>(mut self, method: CombinationMethod, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, W)>,
        S: Into<String>,
        W: Into<TargetWeight>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut weights: Vec<TargetWeight> = Vec::new();
        for (name, weight) in pairs {
            let name = name.into();
            let weight = weight.into();
            match names.iter().position(|n| *n == name) {
                Some(i) => weights[i].merge(weight),
                None => {
                    names.push(name);
                    weights.push(weight);
                }
            }
        }
        if names.is_empty() {
            return self;
        }
        self.method = Some(method);
        self.target_vectors = names;
        self.weights = weights;
        self
    }

    /// A method has been chosen; an unset combination is ignored by renderers.
    pub fn is_set(&self) -> bool {
        self.method.is_some()
    }

    pub fn method(&self) -> Option<CombinationMethod> {
        self.method
    }

    pub fn target_vectors(&self) -> &[String] {
        &self.target_vectors
    }

    pub fn weights(&self) -> &[TargetWeight] {
        &self.weights
    }

    /// `targets:{combinationMethod: m targetVectors: [..] weights: {..}}`
    pub fn to_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(method) = self.method {
            parts.push(format!("combinationMethod: {}", method.as_str()));
        }
        parts.push(format!(
            "targetVectors: {}",
            text::string_array(&self.target_vectors)
        ));
        if !self.weights.is_empty() {
            let weights: Vec<String> = self
                .target_vectors
                .iter()
                .zip(&self.weights)
                .map(|(name, w)| format!("{}: {}", name, w.to_text()))
                .collect();
            parts.push(format!("weights: {{{}}}", weights.join(" ")));
        }
        format!("targets:{{{}}}", parts.join(" "))
    }

    /// Weighted targets expand to one `target_vectors` entry per weight.
    pub fn to_rpc(&self) -> pb::Targets {
        let combination = self
            .method
            .map_or(pb::CombinationMethod::Unspecified, CombinationMethod::to_rpc)
            as i32;
        if self.weights.is_empty() {
            return pb::Targets {
                target_vectors: self.target_vectors.clone(),
                combination,
                weights_for_targets: Vec::new(),
            };
        }
        let mut target_vectors = Vec::new();
        let mut weights_for_targets = Vec::new();
        for (name, weight) in self.target_vectors.iter().zip(&self.weights) {
            for &w in weight.values() {
                target_vectors.push(name.clone());
                weights_for_targets.push(pb::WeightsForTarget {
                    target: name.clone(),
                    weight: w,
                });
            }
        }
        pb::Targets {
            target_vectors,
            combination,
            weights_for_targets,
        }
    }
}
