//! Batch insert and batch delete payloads.
//!
//! Both render to a REST JSON body and to an RPC request; the client picks
//! one depending on which transports it was given.

use crate::filter_types::FilterNode;
use crate::rpc::{self, pb};
use crate::search::{ConsistencyLevel, WhereBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One object to insert. A random v4 id is assigned on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchObject {
    pub id: Uuid,
    pub class: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vectors: BTreeMap<String, Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
}

impl BatchObject {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            class: class.into(),
            properties: Map::new(),
            vector: None,
            vectors: BTreeMap::new(),
            tenant: None,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_vector(mut self, vector: impl Into<Vec<f32>>) -> Self {
        self.vector = Some(vector.into());
        self
    }

    pub fn with_named_vector(
        mut self,
        name: impl Into<String>,
        vector: impl Into<Vec<f32>>,
    ) -> Self {
        self.vectors.insert(name.into(), vector.into());
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn to_rpc(&self) -> pb::BatchObject {
        pb::BatchObject {
            uuid: self.id.to_string(),
            collection: self.class.clone(),
            vector: self.vector.clone().unwrap_or_default(),
            properties: rpc::json_to_properties(&self.properties),
            tenant: self.tenant.clone().unwrap_or_default(),
            vectors: self
                .vectors
                .iter()
                .map(|(name, values)| pb::NamedVector {
                    name: name.clone(),
                    values: values.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectsBatch {
    objects: Vec<BatchObject>,
    consistency_level: Option<ConsistencyLevel>,
}

impl ObjectsBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, object: BatchObject) -> Self {
        self.objects.push(object);
        self
    }

    pub fn with_objects(mut self, objects: impl IntoIterator<Item = BatchObject>) -> Self {
        self.objects.extend(objects);
        self
    }

    pub fn with_consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.consistency_level = Some(level);
        self
    }

    pub fn objects(&self) -> &[BatchObject] {
        &self.objects
    }

    pub fn consistency_level(&self) -> Option<ConsistencyLevel> {
        self.consistency_level
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Split into consecutive batches of at most `max` objects, each keeping
    /// the consistency level. `max == 0` yields a single batch.
    pub fn split(&self, max: usize) -> Vec<ObjectsBatch> {
        if max == 0 || self.objects.len() <= max {
            return vec![self.clone()];
        }
        self.objects
            .chunks(max)
            .map(|chunk| ObjectsBatch {
                objects: chunk.to_vec(),
                consistency_level: self.consistency_level,
            })
            .collect()
    }

    /// `{"objects": [...]}`
    pub fn to_rest_body(&self) -> Value {
        json!({ "objects": self.objects })
    }

    pub fn to_rpc(&self) -> pb::BatchObjectsRequest {
        pb::BatchObjectsRequest {
            objects: self.objects.iter().map(BatchObject::to_rpc).collect(),
            consistency_level: self.consistency_level.map(|c| c.to_rpc() as i32),
        }
    }
}

/// Delete every object of a class matching a filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchDelete {
    class_name: String,
    filter: Option<FilterNode>,
    dry_run: bool,
    verbose: bool,
    consistency_level: Option<ConsistencyLevel>,
    tenant: Option<String>,
}

impl BatchDelete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_where(mut self, filter: WhereBuilder) -> Self {
        self.filter = Some(filter.build());
        self
    }

    /// Report what would be deleted without deleting.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Return per-object results instead of counts only.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_consistency_level(mut self, level: ConsistencyLevel) -> Self {
        self.consistency_level = Some(level);
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn consistency_level(&self) -> Option<ConsistencyLevel> {
        self.consistency_level
    }

    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }

    /// `{"match": {"class": C, "where": {...}}, "output": "minimal", "dryRun": false}`
    pub fn to_rest_body(&self) -> Value {
        let filter = self
            .filter
            .as_ref()
            .map_or_else(|| json!({}), FilterNode::to_rest_json);
        json!({
            "match": { "class": self.class_name, "where": filter },
            "output": if self.verbose { "verbose" } else { "minimal" },
            "dryRun": self.dry_run,
        })
    }

    pub fn to_rpc(&self) -> pb::BatchDeleteRequest {
        pb::BatchDeleteRequest {
            collection: self.class_name.clone(),
            filters: self.filter.as_ref().map(FilterNode::to_rpc),
            verbose: self.verbose,
            dry_run: self.dry_run,
            consistency_level: self.consistency_level.map(|c| c.to_rpc() as i32),
            tenant: self.tenant.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter_types::Operator;

    #[test]
    fn test_new_object_gets_random_id() {
        let a = BatchObject::new("Pizza");
        let b = BatchObject::new("Pizza");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_object_json_shape() {
        let id = Uuid::nil();
        let obj = BatchObject::new("Pizza")
            .with_id(id)
            .with_property("name", "Hawaii")
            .with_vector([0.5]);
        assert_eq!(
            serde_json::to_value(&obj).unwrap(),
            json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "class": "Pizza",
                "properties": { "name": "Hawaii" },
                "vector": [0.5],
            })
        );
    }

    #[test]
    fn test_object_rpc() {
        let rpc = BatchObject::new("Pizza")
            .with_property("price", 9)
            .with_named_vector("title", [1.0, 2.0])
            .with_tenant("t")
            .to_rpc();
        assert_eq!(rpc.collection, "Pizza");
        assert_eq!(rpc.tenant, "t");
        assert_eq!(
            rpc.properties.get("price").and_then(|p| p.kind.clone()),
            Some(pb::property_value::Kind::IntValue(9))
        );
        assert_eq!(rpc.vectors[0].name, "title");
    }

    #[test]
    fn test_split_keeps_order_and_level() {
        let batch = ObjectsBatch::new()
            .with_objects((0..5).map(|i| BatchObject::new("C").with_property("i", i)))
            .with_consistency_level(ConsistencyLevel::One);
        let parts = batch.split(2);
        assert_eq!(parts.iter().map(ObjectsBatch::len).collect::<Vec<_>>(), vec![2, 2, 1]);
        assert_eq!(parts[2].objects()[0].properties["i"], json!(4));
        assert!(parts.iter().all(|p| p.consistency_level() == Some(ConsistencyLevel::One)));
    }

    #[test]
    fn test_batch_rpc_consistency() {
        let rpc = ObjectsBatch::new()
            .with_object(BatchObject::new("C"))
            .with_consistency_level(ConsistencyLevel::Quorum)
            .to_rpc();
        assert_eq!(rpc.objects.len(), 1);
        assert_eq!(rpc.consistency_level, Some(pb::ConsistencyLevel::Quorum as i32));
    }

    #[test]
    fn test_delete_rest_body() {
        let body = BatchDelete::new()
            .with_class_name("Pizza")
            .with_where(
                WhereBuilder::new()
                    .with_operator(Operator::Like)
                    .with_path(["name"])
                    .with_value_text("H*"),
            )
            .with_dry_run(true)
            .to_rest_body();
        assert_eq!(
            body,
            json!({
                "match": {
                    "class": "Pizza",
                    "where": { "operator": "Like", "path": ["name"], "valueText": "H*" }
                },
                "output": "minimal",
                "dryRun": true,
            })
        );
    }

    #[test]
    fn test_delete_rpc() {
        let rpc = BatchDelete::new()
            .with_class_name("Pizza")
            .with_verbose(true)
            .with_tenant("t")
            .to_rpc();
        assert_eq!(rpc.collection, "Pizza");
        assert!(rpc.verbose);
        assert!(!rpc.dry_run);
        assert!(rpc.filters.is_none());
        assert_eq!(rpc.tenant, "t");
    }
}
