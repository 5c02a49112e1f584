//! `Get` query assembler.
//!
//! Clause order inside the argument list is fixed: where, nearText,
//! nearVector, nearObject, the media clauses (image, audio, video, depth,
//! thermal, IMU), limit, offset, sort, groupBy, autocut, after, bm25, hybrid,
//! tenant, consistencyLevel.

use super::fields::{fields_text, Field};
use super::generate::GenerativeSearch;
use super::GraphQlQuery;
use crate::filter_types::FilterNode;
use crate::rpc::{self, pb};
use crate::search::near_media::{
    MediaKind, NearAudio, NearDepth, NearImage, NearImu, NearMedia, NearThermal, NearVideo,
};
use crate::search::types::sort_text;
use crate::search::{
    Bm25, ConsistencyLevel, GroupBy, Hybrid, NearObject, NearText, NearVector, Sort, WhereBuilder,
};
use crate::text;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetBuilder {
    pub(crate) class_name: String,
    pub(crate) fields: Vec<Field>,
    pub(crate) filter: Option<FilterNode>,
    pub(crate) near_text: Option<NearText>,
    pub(crate) near_vector: Option<NearVector>,
    pub(crate) near_object: Option<NearObject>,
    pub(crate) near_media: BTreeMap<MediaKind, NearMedia>,
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
    pub(crate) sort: Vec<Sort>,
    pub(crate) group_by: Option<GroupBy>,
    pub(crate) autocut: Option<u32>,
    pub(crate) after: Option<String>,
    pub(crate) bm25: Option<Bm25>,
    pub(crate) hybrid: Option<Hybrid>,
    pub(crate) tenant: Option<String>,
    pub(crate) consistency_level: Option<ConsistencyLevel>,
    pub(crate) generative: Option<GenerativeSearch>,
}

impl GetBuilder {
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

    /// One media clause per kind; a second clause of the same kind replaces
    /// the first.
    pub fn with_near_media(mut self, media: impl Into<NearMedia>) -> Self {
        let media = media.into();
        self.near_media.insert(media.kind(), media);
        self
    }

    pub fn with_near_image(self, media: NearImage) -> Self {
        self.with_near_media(media)
    }

    pub fn with_near_audio(self, media: NearAudio) -> Self {
        self.with_near_media(media)
    }

    pub fn with_near_video(self, media: NearVideo) -> Self {
        self.with_near_media(media)
    }

    pub fn with_near_depth(self, media: NearDepth) -> Self {
        self.with_near_media(media)
    }

    pub fn with_near_thermal(self, media: NearThermal) -> Self {
        self.with_near_media(media)
    }

    pub fn with_near_imu(self, media: NearImu) -> Self {
        self.with_near_media(media)
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_sort(mut self, sort: impl IntoIterator<Item = Sort>) -> Self {
        self.sort = sort.into_iter().collect();
        self
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    /// Cut the result list after `n` jumps in score.
    pub fn with_autocut(mut self, autocut: u32) -> Self {
        self.autocut = Some(autocut);
        self
    }

    /// Cursor: return objects after this id.
    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn with_bm25(mut self, bm25: Bm25) -> Self {
        self.bm25 = Some(bm25);
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

    pub fn with_consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.consistency_level = Some(level);
        self
    }

    pub fn with_generative_search(mut self, generative: GenerativeSearch) -> Self {
        self.generative = Some(generative);
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    fn clauses(&self) -> Vec<String> {
        let mut clauses = Vec::new();
        clauses.extend(self.filter.as_ref().map(FilterNode::to_text));
        clauses.extend(self.near_text.as_ref().map(NearText::to_text));
        clauses.extend(self.near_vector.as_ref().map(NearVector::to_text));
        clauses.extend(self.near_object.as_ref().map(NearObject::to_text));
        clauses.extend(self.near_media.values().map(NearMedia::to_text));
        clauses.extend(self.limit.map(|n| format!("limit: {}", n)));
        clauses.extend(self.offset.map(|n| format!("offset: {}", n)));
        if !self.sort.is_empty() {
            clauses.push(sort_text(&self.sort));
        }
        clauses.extend(self.group_by.as_ref().map(GroupBy::to_text));
        clauses.extend(self.autocut.map(|n| format!("autocut: {}", n)));
        clauses.extend(self.after.as_ref().map(|a| format!("after: {}", text::quote(a))));
        clauses.extend(self.bm25.as_ref().map(Bm25::to_text));
        clauses.extend(self.hybrid.as_ref().map(Hybrid::to_text));
        clauses.extend(self.tenant.as_ref().map(|t| format!("tenant: {}", text::quote(t))));
        clauses.extend(
            self.consistency_level
                .map(|c| format!("consistencyLevel: {}", c.as_str())),
        );
        clauses
    }

    /// `<Class> (<clauses>) {<fields>}`, the part inside `{Get {...}}`.
    pub(crate) fn class_text(&self) -> String {
        let mut selection = fields_text(&self.fields);
        if let Some(generative) = &self.generative {
            if !selection.is_empty() {
                selection.push(' ');
            }
            selection.push_str(&generative.to_text());
        }
        let clauses = self.clauses();
        if clauses.is_empty() {
            format!("{} {{{}}}", self.class_name, selection)
        } else {
            format!("{} ({}) {{{}}}", self.class_name, clauses.join(", "), selection)
        }
    }

    pub fn to_rpc(&self) -> pb::SearchRequest {
        rpc::compile_search(self)
    }
}

impl GraphQlQuery for GetBuilder {
    fn build(&self) -> String {
        format!("{{Get {{{}}}}}", self.class_text())
    }
}

/// Several classes in one `{Get {...}}` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiClassGetBuilder {
    classes: Vec<GetBuilder>,
}

impl MultiClassGetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: GetBuilder) -> Self {
        self.classes.push(class);
        self
    }

    /// One RPC request per class, in insertion order.
    pub fn to_rpc(&self) -> Vec<pb::SearchRequest> {
        self.classes.iter().map(GetBuilder::to_rpc).collect()
    }
}

impl GraphQlQuery for MultiClassGetBuilder {
    fn build(&self) -> String {
        let entries: Vec<String> = self.classes.iter().map(GetBuilder::class_text).collect();
        format!("{{Get {{{}}}}}", entries.join(" "))
    }
}
