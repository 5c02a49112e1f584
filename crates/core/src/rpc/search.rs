//! Compile a [`GetBuilder`] into a `SearchRequest`.
//!
//! Field selection is split the way the server expects it over RPC:
//! - plain leaf fields become `non_ref_properties`
//! - a field whose children are `... on <Class>` selections becomes one
//!   `RefPropertiesRequest` per target class
//! - any other nested field becomes an `ObjectPropertiesRequest`
//! - `_additional{...}` becomes the `MetadataRequest`

use super::pb;
use crate::config::{ADDITIONAL_FIELD, INLINE_FRAGMENT_PREFIX};
use crate::graphql::fields::Field;
use crate::graphql::get::GetBuilder;
use crate::search::near_media::NearMedia;
use crate::search::{Bm25, GroupBy, Hybrid, NearObject, NearText, NearVector, Sort};

pub fn compile_search(get: &GetBuilder) -> pb::SearchRequest {
    pb::SearchRequest {
        collection: get.class_name.clone(),
        tenant: get.tenant.clone().unwrap_or_default(),
        consistency_level: get.consistency_level.map(|c| c.to_rpc() as i32),
        properties: properties_request(&get.fields),
        metadata: metadata_request(&get.fields),
        group_by: get.group_by.as_ref().map(GroupBy::to_rpc),
        limit: get.limit,
        offset: get.offset,
        autocut: get.autocut,
        after: get.after.clone().unwrap_or_default(),
        sort_by: get.sort.iter().map(Sort::to_rpc).collect(),
        filters: get.filter.as_ref().map(|f| f.to_rpc()),
        near_text: get.near_text.as_ref().map(NearText::to_rpc),
        near_vector: get.near_vector.as_ref().map(NearVector::to_rpc),
        near_object: get.near_object.as_ref().map(NearObject::to_rpc),
        near_media: get.near_media.values().map(NearMedia::to_rpc).collect(),
        bm25_search: get.bm25.as_ref().map(Bm25::to_rpc),
        hybrid_search: get.hybrid.as_ref().map(Hybrid::to_rpc),
        generative: get.generative.as_ref().map(|g| g.to_rpc()),
    }
}

/// Property selection, or `None` when nothing but metadata is selected.
pub fn properties_request(fields: &[Field]) -> Option<pb::PropertiesRequest> {
    let mut req = pb::PropertiesRequest::default();
    for field in fields {
        if field.name == ADDITIONAL_FIELD {
            continue;
        }
        if field.fields.is_empty() {
            req.non_ref_properties.push(field.name.clone());
            continue;
        }
        let fragments: Vec<&Field> = field
            .fields
            .iter()
            .filter(|f| f.name.starts_with(INLINE_FRAGMENT_PREFIX))
            .collect();
        if fragments.is_empty() {
            req.object_properties.push(object_properties_request(field));
        } else {
            for fragment in fragments {
                req.ref_properties.push(pb::RefPropertiesRequest {
                    reference_property: field.name.clone(),
                    properties: properties_request(&fragment.fields),
                    metadata: metadata_request(&fragment.fields),
                    target_collection: fragment.name[INLINE_FRAGMENT_PREFIX.len()..]
                        .trim()
                        .to_string(),
                });
            }
        }
    }
    let empty = req.non_ref_properties.is_empty()
        && req.ref_properties.is_empty()
        && req.object_properties.is_empty();
    if empty {
        None
    } else {
        Some(req)
    }
}

fn object_properties_request(field: &Field) -> pb::ObjectPropertiesRequest {
    let mut req = pb::ObjectPropertiesRequest {
        prop_name: field.name.clone(),
        ..Default::default()
    };
    for sub in &field.fields {
        if sub.fields.is_empty() {
            req.primitive_properties.push(sub.name.clone());
        } else {
            req.object_properties.push(object_properties_request(sub));
        }
    }
    req
}

/// Metadata selection from every `_additional` field. Unknown metadata
/// names are ignored.
pub fn metadata_request(fields: &[Field]) -> Option<pb::MetadataRequest> {
    let mut found = false;
    let mut req = pb::MetadataRequest::default();
    for additional in fields.iter().filter(|f| f.name == ADDITIONAL_FIELD) {
        found = true;
        for sub in &additional.fields {
            match sub.name.as_str() {
                "id" => req.uuid = true,
                "vector" => req.vector = true,
                "creationTimeUnix" => req.creation_time_unix = true,
                "lastUpdateTimeUnix" => req.last_update_time_unix = true,
                "distance" => req.distance = true,
                "certainty" => req.certainty = true,
                "score" => req.score = true,
                "explainScore" => req.explain_score = true,
                "isConsistent" => req.is_consistent = true,
                "vectors" => req
                    .vectors
                    .extend(sub.fields.iter().map(|f| f.name.clone())),
                _ => {}
            }
        }
    }
    found.then_some(req)
}
