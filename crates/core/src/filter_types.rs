//! Filter tree types for where clauses.
//!
//! A [`FilterNode`] is either a leaf comparison (operator + path + one typed
//! value) or a boolean composite (`And`/`Or`/`Not` + ordered operands). The
//! same tree renders to GraphQL text, REST JSON (batch delete), and the RPC
//! `Filters` message; all three share the scalar-vs-array policy in
//! [`FilterNode::renders_array`].

use crate::rpc::pb;
use crate::text;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Comparison or boolean operator of a filter node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    And,
    Or,
    Not,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    Like,
    WithinGeoRange,
    IsNull,
    ContainsAny,
    ContainsAll,
}

impl Operator {
    /// Wire token, identical in GraphQL and REST JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::And => "And",
            Operator::Or => "Or",
            Operator::Not => "Not",
            Operator::Equal => "Equal",
            Operator::NotEqual => "NotEqual",
            Operator::GreaterThan => "GreaterThan",
            Operator::GreaterThanEqual => "GreaterThanEqual",
            Operator::LessThan => "LessThan",
            Operator::LessThanEqual => "LessThanEqual",
            Operator::Like => "Like",
            Operator::WithinGeoRange => "WithinGeoRange",
            Operator::IsNull => "IsNull",
            Operator::ContainsAny => "ContainsAny",
            Operator::ContainsAll => "ContainsAll",
        }
    }

    /// Containment operators always take an array value.
    pub fn is_containment(self) -> bool {
        matches!(self, Operator::ContainsAny | Operator::ContainsAll)
    }

    fn to_rpc(self) -> pb::filters::Operator {
        use pb::filters::Operator as Op;
        match self {
            Operator::And => Op::And,
            Operator::Or => Op::Or,
            Operator::Not => Op::Not,
            Operator::Equal => Op::Equal,
            Operator::NotEqual => Op::NotEqual,
            Operator::GreaterThan => Op::GreaterThan,
            Operator::GreaterThanEqual => Op::GreaterThanEqual,
            Operator::LessThan => Op::LessThan,
            Operator::LessThanEqual => Op::LessThanEqual,
            Operator::Like => Op::Like,
            Operator::WithinGeoRange => Op::WithinGeoRange,
            Operator::IsNull => Op::IsNull,
            Operator::ContainsAny => Op::ContainsAny,
            Operator::ContainsAll => Op::ContainsAll,
        }
    }
}

/// Center point and radius (meters) for `WithinGeoRange`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRange {
    pub latitude: f32,
    pub longitude: f32,
    pub max_distance: f32,
}

/// The single typed value slot of a leaf node.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(Vec<i64>),
    Number(Vec<f64>),
    Boolean(Vec<bool>),
    String(Vec<String>),
    Text(Vec<String>),
    Date(Vec<DateTime<FixedOffset>>),
    GeoRange(GeoRange),
}

impl FilterValue {
    /// GraphQL/REST key, e.g. `valueInt`.
    pub fn key(&self) -> &'static str {
        match self {
            FilterValue::Int(_) => "valueInt",
            FilterValue::Number(_) => "valueNumber",
            FilterValue::Boolean(_) => "valueBoolean",
            FilterValue::String(_) => "valueString",
            FilterValue::Text(_) => "valueText",
            FilterValue::Date(_) => "valueDate",
            FilterValue::GeoRange(_) => "valueGeoRange",
        }
    }

    /// Number of scalar values held (a geo range counts as one).
    pub fn len(&self) -> usize {
        match self {
            FilterValue::Int(v) => v.len(),
            FilterValue::Number(v) => v.len(),
            FilterValue::Boolean(v) => v.len(),
            FilterValue::String(v) | FilterValue::Text(v) => v.len(),
            FilterValue::Date(v) => v.len(),
            FilterValue::GeoRange(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_text(&self, as_array: bool) -> String {
        let rendered = match self {
            FilterValue::Int(v) => scalar_or_array(v, as_array, |x| x.to_string()),
            FilterValue::Number(v) => scalar_or_array(v, as_array, |x| x.to_string()),
            FilterValue::Boolean(v) => scalar_or_array(v, as_array, |x| x.to_string()),
            FilterValue::String(v) | FilterValue::Text(v) => {
                scalar_or_array(v, as_array, |x| text::quote(x))
            }
            FilterValue::Date(v) => {
                scalar_or_array(v, as_array, |x| text::quote(&text::rfc3339_nano(x)))
            }
            FilterValue::GeoRange(g) => format!(
                "{{geoCoordinates:{{latitude:{},longitude:{}}},distance:{{max:{}}}}}",
                g.latitude, g.longitude, g.max_distance
            ),
        };
        format!("{}: {}", self.key(), rendered)
    }

    fn to_json(&self, as_array: bool) -> Value {
        match self {
            FilterValue::Int(v) => json_scalar_or_array(v, as_array, |x| json!(x)),
            FilterValue::Number(v) => json_scalar_or_array(v, as_array, |x| json!(x)),
            FilterValue::Boolean(v) => json_scalar_or_array(v, as_array, |x| json!(x)),
            FilterValue::String(v) | FilterValue::Text(v) => {
                json_scalar_or_array(v, as_array, |x| json!(x))
            }
            FilterValue::Date(v) => {
                json_scalar_or_array(v, as_array, |x| json!(text::rfc3339_nano(x)))
            }
            FilterValue::GeoRange(g) => json!({
                "geoCoordinates": { "latitude": g.latitude, "longitude": g.longitude },
                "distance": { "max": g.max_distance },
            }),
        }
    }

    fn to_rpc(&self, as_array: bool) -> pb::filters::TestValue {
        use pb::filters::TestValue;
        match self {
            FilterValue::Int(v) => match single(v, as_array) {
                Some(x) => TestValue::ValueInt(*x),
                None => TestValue::ValueIntArray(pb::IntArray { values: v.clone() }),
            },
            FilterValue::Number(v) => match single(v, as_array) {
                Some(x) => TestValue::ValueNumber(*x),
                None => TestValue::ValueNumberArray(pb::NumberArray { values: v.clone() }),
            },
            FilterValue::Boolean(v) => match single(v, as_array) {
                Some(x) => TestValue::ValueBoolean(*x),
                None => TestValue::ValueBooleanArray(pb::BooleanArray { values: v.clone() }),
            },
            FilterValue::String(v) | FilterValue::Text(v) => match single(v, as_array) {
                Some(x) => TestValue::ValueText(x.clone()),
                None => TestValue::ValueTextArray(pb::TextArray { values: v.clone() }),
            },
            FilterValue::Date(v) => match single(v, as_array) {
                Some(x) => TestValue::ValueText(text::rfc3339_nano(x)),
                None => TestValue::ValueTextArray(pb::TextArray {
                    values: v.iter().map(text::rfc3339_nano).collect(),
                }),
            },
            FilterValue::GeoRange(g) => TestValue::ValueGeo(pb::GeoCoordinatesFilter {
                latitude: g.latitude,
                longitude: g.longitude,
                distance: g.max_distance,
            }),
        }
    }
}

fn single<T>(values: &[T], as_array: bool) -> Option<&T> {
    if as_array {
        None
    } else {
        values.first()
    }
}

fn scalar_or_array<T>(values: &[T], as_array: bool, fmt: impl Fn(&T) -> String) -> String {
    match single(values, as_array) {
        Some(x) => fmt(x),
        None => {
            let items: Vec<String> = values.iter().map(fmt).collect();
            format!("[{}]", items.join(","))
        }
    }
}

fn json_scalar_or_array<T>(values: &[T], as_array: bool, conv: impl Fn(&T) -> Value) -> Value {
    match single(values, as_array) {
        Some(x) => conv(x),
        None => Value::Array(values.iter().map(conv).collect()),
    }
}

/// A node of the filter tree.
///
/// Leaves populate `operator`, `path` and `value`; composites populate only
/// `operator` and `operands`. Built by [`WhereBuilder`](crate::search::filter::WhereBuilder)
/// and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterNode {
    pub operator: Option<Operator>,
    pub path: Vec<String>,
    pub value: Option<FilterValue>,
    pub operands: Vec<FilterNode>,
}

impl FilterNode {
    pub fn is_composite(&self) -> bool {
        !self.operands.is_empty()
    }

    /// Scalar only for exactly one value under a non-containment operator.
    pub fn renders_array(&self) -> bool {
        let containment = self.operator.is_some_and(Operator::is_containment);
        let count = self.value.as_ref().map_or(0, FilterValue::len);
        containment || count != 1
    }

    /// `where:{...}` clause.
    pub fn to_text(&self) -> String {
        format!("where:{{{}}}", self.to_text_body())
    }

    /// Clause body without the `where:` wrapper, as used inside `operands`.
    pub fn to_text_body(&self) -> String {
        let mut clause = Vec::new();
        if let Some(op) = self.operator {
            clause.push(format!("operator: {}", op.as_str()));
        }
        if !self.path.is_empty() {
            clause.push(format!("path: {}", text::string_array(&self.path)));
        }
        if self.is_composite() {
            let operands: Vec<String> = self
                .operands
                .iter()
                .map(|o| format!("{{{}}}", o.to_text_body()))
                .collect();
            clause.push(format!("operands:[{}]", operands.join(",")));
        } else if let Some(value) = &self.value {
            clause.push(value.to_text(self.renders_array()));
        }
        clause.join(" ")
    }

    /// REST JSON filter object.
    pub fn to_rest_json(&self) -> Value {
        let mut obj = Map::new();
        if let Some(op) = self.operator {
            obj.insert("operator".into(), json!(op.as_str()));
        }
        if !self.path.is_empty() {
            obj.insert("path".into(), json!(self.path));
        }
        if self.is_composite() {
            let operands: Vec<Value> = self.operands.iter().map(FilterNode::to_rest_json).collect();
            obj.insert("operands".into(), Value::Array(operands));
        } else if let Some(value) = &self.value {
            obj.insert(value.key().into(), value.to_json(self.renders_array()));
        }
        Value::Object(obj)
    }

    /// RPC `Filters` message.
    pub fn to_rpc(&self) -> pb::Filters {
        let mut filters = pb::Filters {
            operator: self
                .operator
                .map_or(pb::filters::Operator::Unspecified, Operator::to_rpc) as i32,
            on: self.path.clone(),
            ..Default::default()
        };
        if self.is_composite() {
            filters.filters = self.operands.iter().map(FilterNode::to_rpc).collect();
        } else if let Some(value) = &self.value {
            filters.test_value = Some(value.to_rpc(self.renders_array()));
        }
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(op: Operator, path: &str, value: FilterValue) -> FilterNode {
        FilterNode {
            operator: Some(op),
            path: vec![path.to_string()],
            value: Some(value),
            operands: vec![],
        }
    }

    #[test]
    fn test_single_value_renders_unwrapped() {
        let node = leaf(Operator::Equal, "count", FilterValue::Int(vec![11]));
        assert!(!node.renders_array());
        assert_eq!(node.to_text_body(), "operator: Equal path: [\"count\"] valueInt: 11");
    }

    #[test]
    fn test_containment_renders_array_for_one_value() {
        let node = leaf(Operator::ContainsAll, "tags", FilterValue::Text(vec!["a".into()]));
        assert!(node.renders_array());
        assert_eq!(node.to_text_body(), "operator: ContainsAll path: [\"tags\"] valueText: [\"a\"]");
    }

    #[test]
    fn test_many_values_render_array() {
        let node = leaf(Operator::Equal, "n", FilterValue::Number(vec![1.5, 2.0]));
        assert_eq!(node.to_text_body(), "operator: Equal path: [\"n\"] valueNumber: [1.5,2]");
    }

    #[test]
    fn test_geo_range_text() {
        let node = leaf(
            Operator::WithinGeoRange,
            "location",
            FilterValue::GeoRange(GeoRange {
                latitude: 51.51,
                longitude: -0.09,
                max_distance: 2000.0,
            }),
        );
        assert_eq!(
            node.to_text(),
            "where:{operator: WithinGeoRange path: [\"location\"] valueGeoRange: {geoCoordinates:{latitude:51.51,longitude:-0.09},distance:{max:2000}}}"
        );
    }

    #[test]
    fn test_empty_node_is_degenerate_not_panicking() {
        let node = FilterNode::default();
        assert_eq!(node.to_text(), "where:{}");
        assert_eq!(node.to_rest_json(), json!({}));
        let rpc = node.to_rpc();
        assert_eq!(rpc.operator, pb::filters::Operator::Unspecified as i32);
        assert!(rpc.test_value.is_none());
    }

    #[test]
    fn test_rest_json_composite() {
        let node = FilterNode {
            operator: Some(Operator::Or),
            operands: vec![
                leaf(Operator::Equal, "name", FilterValue::String(vec!["x".into()])),
                leaf(Operator::ContainsAny, "tags", FilterValue::Text(vec!["t".into()])),
            ],
            ..Default::default()
        };
        assert_eq!(
            node.to_rest_json(),
            json!({
                "operator": "Or",
                "operands": [
                    { "operator": "Equal", "path": ["name"], "valueString": "x" },
                    { "operator": "ContainsAny", "path": ["tags"], "valueText": ["t"] },
                ]
            })
        );
    }

    #[test]
    fn test_rpc_follows_array_policy() {
        use pb::filters::TestValue;
        let scalar = leaf(Operator::Equal, "n", FilterValue::Int(vec![3])).to_rpc();
        assert_eq!(scalar.test_value, Some(TestValue::ValueInt(3)));
        assert_eq!(scalar.on, vec!["n".to_string()]);

        let array = leaf(Operator::ContainsAny, "n", FilterValue::Int(vec![3])).to_rpc();
        assert_eq!(
            array.test_value,
            Some(TestValue::ValueIntArray(pb::IntArray { values: vec![3] }))
        );
        assert_eq!(array.operator, pb::filters::Operator::ContainsAny as i32);
    }
}
