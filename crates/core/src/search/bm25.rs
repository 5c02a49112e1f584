//! BM25 keyword search clause and the token-matching operator shared with
//! hybrid search.

use crate::rpc::pb;
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenMatch {
    And,
    Or,
}

/// How query tokens must match. `And` requires every token, so its minimum
/// is always rendered as `0`; `Or` renders the configured minimum (default
/// `0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOperator {
    mode: TokenMatch,
    minimum_match: Option<i32>,
}

impl SearchOperator {
    pub fn and() -> Self {
        Self {
            mode: TokenMatch::And,
            minimum_match: None,
        }
    }

    pub fn or() -> Self {
        Self {
            mode: TokenMatch::Or,
            minimum_match: None,
        }
    }

    /// Minimum number of tokens that must match. Ignored for `and()`.
    pub fn with_minimum_match(mut self, minimum: i32) -> Self {
        self.minimum_match = Some(minimum);
        self
    }

    pub fn minimum_or_tokens_match(&self) -> i32 {
        match self.mode {
            TokenMatch::And => 0,
            TokenMatch::Or => self.minimum_match.unwrap_or(0),
        }
    }

    /// `{operator:And minimumOrTokensMatch:0}`
    pub fn to_text_body(&self) -> String {
        let op = match self.mode {
            TokenMatch::And => "And",
            TokenMatch::Or => "Or",
        };
        format!(
            "{{operator:{} minimumOrTokensMatch:{}}}",
            op,
            self.minimum_or_tokens_match()
        )
    }

    pub fn to_rpc(&self) -> pb::SearchOperatorOptions {
        let operator = match self.mode {
            TokenMatch::And => pb::search_operator_options::Operator::And,
            TokenMatch::Or => pb::search_operator_options::Operator::Or,
        };
        pb::SearchOperatorOptions {
            operator: operator as i32,
            minimum_or_tokens_match: Some(self.minimum_or_tokens_match()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bm25 {
    query: String,
    properties: Vec<String>,
    search_operator: Option<SearchOperator>,
}

impl Bm25 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Properties to search; property boosts use the `name^2` form.
    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_search_operator(mut self, operator: SearchOperator) -> Self {
        self.search_operator = Some(operator);
        self
    }

    pub fn to_text(&self) -> String {
        let mut parts = vec![format!("query: {}", text::quote(&self.query))];
        if !self.properties.is_empty() {
            parts.push(format!("properties: {}", text::string_array(&self.properties)));
        }
        if let Some(op) = &self.search_operator {
            parts.push(format!("searchOperator:{}", op.to_text_body()));
        }
        format!("bm25:{{{}}}", parts.join(", "))
    }

    pub fn to_rpc(&self) -> pb::Bm25 {
        pb::Bm25 {
            query: self.query.clone(),
            properties: self.properties.clone(),
            search_operator: self.search_operator.as_ref().map(SearchOperator::to_rpc),
        }
    }
}
