//! `Aggregate` query assembler.

use super::fields::{fields_text, Field};
use super::GraphQlQuery;
use crate::filter_types::FilterNode;
use crate::search::near_media::{MediaKind, NearMedia};
use crate::search::{Hybrid, NearObject, NearText, NearVector, WhereBuilder};
use crate::text;
use std::collections::BTreeMap;

/// Aggregations over a class, optionally narrowed by a filter or a
/// similarity search. Fields are aggregation selections such as
/// `meta{count}` or `price{mean maximum}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateBuilder {
    class_name: String,
    fields: Vec<Field>,
    filter: Option<FilterNode>,
    group_by: Vec<String>,
    near_text: Option<NearText>,
    near_vector: Option<NearVector>,
    near_object: Option<NearObject>,
    near_media: BTreeMap<MediaKind, NearMedia>,
    object_limit: Option<u32>,
    limit: Option<u32>,
    hybrid: Option<Hybrid>,
    tenant: Option<String>,
}

impl AggregateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    pub fn with_where(mut self, filter: WhereBuilder) -> Self {
        self.filter = Some(filter.build());
        self
    }

    pub fn with_group_by<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_near_text(mut self, near_text: NearText) -> Self {
        self.near_text = Some(near_text);
        self
    }

    pub fn with_near_vector(mut self, near_vector: NearVector) -> Self {
        self.near_vector = Some(near_vector);
        self
    }

    pub fn with_near_object(mut self, near_object: NearObject) -> Self {
        self.near_object = Some(near_object);
        self
    }

    pub fn with_near_media(mut self, media: impl Into<NearMedia>) -> Self {
        let media = media.into();
        self.near_media.insert(media.kind(), media);
        self
    }

    /// Number of objects the similarity search may feed into the aggregation.
    pub fn with_object_limit(mut self, limit: u32) -> Self {
        self.object_limit = Some(limit);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_hybrid(mut self, hybrid: Hybrid) -> Self {
        self.hybrid = Some(hybrid);
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    fn clauses(&self) -> Vec<String> {
        let mut clauses = Vec::new();
        clauses.extend(self.filter.as_ref().map(FilterNode::to_text));
        if !self.group_by.is_empty() {
            clauses.push(format!("groupBy:{}", text::string_array(&self.group_by)));
        }
        clauses.extend(self.near_text.as_ref().map(NearText::to_text));
        clauses.extend(self.near_vector.as_ref().map(NearVector::to_text));
        clauses.extend(self.near_object.as_ref().map(NearObject::to_text));
        clauses.extend(self.near_media.values().map(NearMedia::to_text));
        clauses.extend(self.object_limit.map(|n| format!("objectLimit: {}", n)));
        clauses.extend(self.limit.map(|n| format!("limit: {}", n)));
        clauses.extend(self.hybrid.as_ref().map(Hybrid::to_text));
        clauses.extend(self.tenant.as_ref().map(|t| format!("tenant: {}", text::quote(t))));
        clauses
    }
}

impl GraphQlQuery for AggregateBuilder {
    fn build(&self) -> String {
        let clauses = self.clauses();
        let fields = fields_text(&self.fields);
        if clauses.is_empty() {
            format!("{{Aggregate{{{}{{{}}}}}}}", self.class_name, fields)
        } else {
            format!(
                "{{Aggregate{{{}({}){{{}}}}}}}",
                self.class_name,
                clauses.join(", "),
                fields
            )
        }
    }
}
