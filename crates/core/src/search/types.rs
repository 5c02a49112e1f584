//! Result-shape types: sorting, grouping, and read consistency.

use crate::rpc::pb;
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One sort key. Without an order the server default applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sort {
    pub path: Vec<String>,
    pub order: Option<SortOrder>,
}

impl Sort {
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            order: None,
        }
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    fn to_text(&self) -> String {
        match self.order {
            Some(order) => format!(
                "{{path:{} order:{}}}",
                text::string_array(&self.path),
                order.as_str()
            ),
            None => format!("{{path:{}}}", text::string_array(&self.path)),
        }
    }

    pub fn to_rpc(&self) -> pb::SortBy {
        pb::SortBy {
            ascending: self.order.map(|o| o == SortOrder::Asc),
            path: self.path.clone(),
        }
    }
}

/// `sort:[{path:["a"] order:asc}, {path:["b"]}]`
pub fn sort_text(sorts: &[Sort]) -> String {
    let items: Vec<String> = sorts.iter().map(Sort::to_text).collect();
    format!("sort:[{}]", items.join(", "))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupBy {
    pub path: Vec<String>,
    pub groups: i32,
    pub objects_per_group: i32,
}

impl GroupBy {
    pub fn new<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_groups(mut self, groups: i32) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_objects_per_group(mut self, objects: i32) -> Self {
        self.objects_per_group = objects;
        self
    }

    pub fn to_text(&self) -> String {
        format!(
            "groupBy:{{path:{} groups:{} objectsPerGroup:{}}}",
            text::string_array(&self.path),
            self.groups,
            self.objects_per_group
        )
    }

    pub fn to_rpc(&self) -> pb::GroupBy {
        pb::GroupBy {
            path: self.path.clone(),
            number_of_groups: self.groups,
            objects_per_group: self.objects_per_group,
        }
    }
}

/// How many replicas must acknowledge a read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsistencyLevel {
    One,
    Quorum,
    All,
}

impl ConsistencyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ConsistencyLevel::One => "ONE",
            ConsistencyLevel::Quorum => "QUORUM",
            ConsistencyLevel::All => "ALL",
        }
    }

    pub fn to_rpc(self) -> pb::ConsistencyLevel {
        match self {
            ConsistencyLevel::One => pb::ConsistencyLevel::One,
            ConsistencyLevel::Quorum => pb::ConsistencyLevel::Quorum,
            ConsistencyLevel::All => pb::ConsistencyLevel::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_text_omits_unset_order() {
        let sorts = [
            Sort::new(["name"]).with_order(SortOrder::Asc),
            Sort::new(["price"]),
        ];
        assert_eq!(
            sort_text(&sorts),
            "sort:[{path:[\"name\"] order:asc}, {path:[\"price\"]}]"
        );
    }

    #[test]
    fn test_sort_rpc_ascending() {
        assert_eq!(Sort::new(["a"]).to_rpc().ascending, None);
        assert_eq!(
            Sort::new(["a"]).with_order(SortOrder::Desc).to_rpc().ascending,
            Some(false)
        );
    }

    #[test]
    fn test_group_by_always_renders_path() {
        let g = GroupBy::new(["category"]).with_groups(2).with_objects_per_group(3);
        assert_eq!(
            g.to_text(),
            "groupBy:{path:[\"category\"] groups:2 objectsPerGroup:3}"
        );
        let rpc = g.to_rpc();
        assert_eq!(rpc.number_of_groups, 2);
        assert_eq!(rpc.objects_per_group, 3);
    }

    #[test]
    fn test_consistency_serde() {
        let json = serde_json::to_string(&ConsistencyLevel::Quorum).unwrap();
        assert_eq!(json, "\"QUORUM\"");
        assert_eq!(ConsistencyLevel::All.as_str(), "ALL");
    }
}
