//! `Explore` query: a similarity search across all classes.

use super::GraphQlQuery;
use crate::search::SimilarityClause;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExploreField {
    Certainty,
    Distance,
    Beacon,
    ClassName,
}

impl ExploreField {
    pub fn as_str(self) -> &'static str {
        match self {
            ExploreField::Certainty => "certainty",
            ExploreField::Distance => "distance",
            ExploreField::Beacon => "beacon",
            ExploreField::ClassName => "className",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExploreBuilder {
    fields: Vec<ExploreField>,
    similarity: Option<SimilarityClause>,
    limit: Option<u32>,
    offset: Option<u32>,
}

impl ExploreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = ExploreField>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    /// Any similarity clause: `NearText`, `NearVector`, `NearObject` or a
    /// media clause. Replaces the previous one.
    pub fn with_similarity(mut self, clause: impl Into<SimilarityClause>) -> Self {
        self.similarity = Some(clause.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl GraphQlQuery for ExploreBuilder {
    fn build(&self) -> String {
        let mut clauses = Vec::new();
        clauses.extend(self.similarity.as_ref().map(SimilarityClause::to_text));
        clauses.extend(self.limit.map(|n| format!("limit: {}", n)));
        clauses.extend(self.offset.map(|n| format!("offset: {}", n)));
        let fields: Vec<&str> = self.fields.iter().map(|f| f.as_str()).collect();
        if clauses.is_empty() {
            format!("{{Explore{{{}}}}}", fields.join(" "))
        } else {
            format!("{{Explore({}){{{}}}}}", clauses.join(", "), fields.join(" "))
        }
    }
}
