//! Where-clause builder.
//!
//! [`WhereBuilder`] accumulates an operator, a property path, one typed value
//! or an ordered list of operand filters, then freezes them into a
//! [`FilterNode`]. Value setters share one slot: the last call wins.
//!
//! ```text
//! WhereBuilder::new()
//!     .with_operator(Operator::Equal)
//!     .with_path(["name"])
//!     .with_value_string("Hawaii")
//!     .to_text()
//! // where:{operator: Equal path: ["name"] valueString: "Hawaii"}
//! ```

use crate::filter_types::{FilterNode, FilterValue, GeoRange, Operator};
use crate::rpc::pb;
use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereBuilder {
    operator: Option<Operator>,
    path: Vec<String>,
    value: Option<FilterValue>,
    operands: Vec<WhereBuilder>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn with_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    /// Child filters of an `And`/`Or`/`Not` node, kept in the given order.
    pub fn with_operands(mut self, operands: impl IntoIterator<Item = WhereBuilder>) -> Self {
        self.operands = operands.into_iter().collect();
        self
    }

    pub fn with_value_int(self, value: i64) -> Self {
        self.set_value(FilterValue::Int(vec![value]))
    }

    pub fn with_value_ints(self, values: impl IntoIterator<Item = i64>) -> Self {
        self.set_value(FilterValue::Int(values.into_iter().collect()))
    }

    pub fn with_value_number(self, value: f64) -> Self {
        self.set_value(FilterValue::Number(vec![value]))
    }

    pub fn with_value_numbers(self, values: impl IntoIterator<Item = f64>) -> Self {
        self.set_value(FilterValue::Number(values.into_iter().collect()))
    }

    pub fn with_value_boolean(self, value: bool) -> Self {
        self.set_value(FilterValue::Boolean(vec![value]))
    }

    pub fn with_value_booleans(self, values: impl IntoIterator<Item = bool>) -> Self {
        self.set_value(FilterValue::Boolean(values.into_iter().collect()))
    }

    pub fn with_value_string(self, value: impl Into<String>) -> Self {
        self.set_value(FilterValue::String(vec![value.into()]))
    }

    pub fn with_value_strings<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_value(FilterValue::String(values.into_iter().map(Into::into).collect()))
    }

    pub fn with_value_text(self, value: impl Into<String>) -> Self {
        self.set_value(FilterValue::Text(vec![value.into()]))
    }

    pub fn with_value_texts<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_value(FilterValue::Text(values.into_iter().map(Into::into).collect()))
    }

    pub fn with_value_date(self, value: impl Into<DateTime<FixedOffset>>) -> Self {
        self.set_value(FilterValue::Date(vec![value.into()]))
    }

    pub fn with_value_dates<I, D>(self, values: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DateTime<FixedOffset>>,
    {
        self.set_value(FilterValue::Date(values.into_iter().map(Into::into).collect()))
    }

    /// Center point and maximum distance in meters.
    pub fn with_value_geo_range(self, latitude: f32, longitude: f32, max_distance: f32) -> Self {
        self.set_value(FilterValue::GeoRange(GeoRange {
            latitude,
            longitude,
            max_distance,
        }))
    }

    fn set_value(mut self, value: FilterValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Freeze into an immutable node. A composite keeps only its operator
    /// and operands; any path or value set alongside operands is dropped.
    pub fn build(&self) -> FilterNode {
        if self.operands.is_empty() {
            FilterNode {
                operator: self.operator,
                path: self.path.clone(),
                value: self.value.clone(),
                operands: Vec::new(),
            }
        } else {
            FilterNode {
                operator: self.operator,
                path: Vec::new(),
                value: None,
                operands: self.operands.iter().map(WhereBuilder::build).collect(),
            }
        }
    }

    /// `where:{...}` clause.
    pub fn to_text(&self) -> String {
        self.build().to_text()
    }

    pub fn to_rpc(&self) -> pb::Filters {
        self.build().to_rpc()
    }
}
