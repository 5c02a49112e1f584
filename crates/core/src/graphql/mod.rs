//! Textual query assembler.
//!
//! Builders collect clauses and render one GraphQL document with
//! [`GraphQlQuery::build`]. Rendering is pure and repeatable; incomplete
//! builders produce a well-formed but degenerate document rather than
//! panicking.

pub mod aggregate;
pub mod explore;
pub mod fields;
pub mod generate;
pub mod get;

pub use aggregate::AggregateBuilder;
pub use explore::{ExploreBuilder, ExploreField};
pub use fields::Field;
pub use generate::GenerativeSearch;
pub use get::{GetBuilder, MultiClassGetBuilder};

/// A builder that renders a complete GraphQL document.
pub trait GraphQlQuery {
    fn build(&self) -> String;
}

/// A hand-written query passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    query: String,
}

impl RawQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

impl GraphQlQuery for RawQuery {
    fn build(&self) -> String {
        self.query.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_query_passthrough() {
        let q = "{Get {Pizza {name}}}";
        assert_eq!(RawQuery::new(q).build(), q);
    }
}
