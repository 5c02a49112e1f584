//! # nearql-core
//!
//! Query argument compiler for a remote vector/keyword document database.
//! Builders accumulate filters, similarity clauses, multi-target vector
//! combination, sorting, grouping, BM25 and hybrid parameters, then render
//! them either as a GraphQL document or as an equivalent RPC request.
//!
//! This is the pure core crate: no I/O, no async, no logging. Transports and
//! the client facade live in `nearql-client`.

/// Batch insert and batch delete payloads (REST JSON and RPC).
pub mod batch;
/// Global configuration constants: endpoint paths, wire markers, defaults.
pub mod config;
/// Vocabulary extension for the contextionary vectorizer.
pub mod contextionary;
/// Errors raised by validating builder setters.
pub mod error;
/// Filter tree model shared by every render path.
pub mod filter_types;
/// GraphQL document assemblers: Get, Aggregate, Explore.
pub mod graphql;
/// Generated RPC messages and the search request compiler.
pub mod rpc;
/// Search argument builders: where, near*, multi-target, bm25, hybrid, sort, groupBy.
pub mod search;
/// Literal formatting helpers for the textual renderer.
pub mod text;

pub use error::ConfigError;
pub use filter_types::{FilterNode, FilterValue, GeoRange, Operator};
pub use graphql::{
    AggregateBuilder, ExploreBuilder, ExploreField, Field, GenerativeSearch, GetBuilder,
    GraphQlQuery, MultiClassGetBuilder, RawQuery,
};
pub use search::multi_target::MultiTarget;
pub use search::{
    Bm25, CombinationMethod, ConsistencyLevel, FusionType, GroupBy, Hybrid, MediaKind, MoveObject,
    MoveParameters, NearAudio, NearDepth, NearImage, NearImu, NearMedia, NearObject, NearText,
    NearThermal, NearVector, NearVideo, SearchOperator, SimilarityClause, Sort, SortOrder,
    TargetWeight, Threshold, WhereBuilder,
};
