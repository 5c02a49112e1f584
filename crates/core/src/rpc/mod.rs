//! RPC request compiler.
//!
//! Message types are generated by `prost-build` from `proto/nearql/v1/*.proto`.
//! Each search builder has a `to_rpc()` beside its `to_text()`; this module
//! adds the pieces with no textual counterpart, such as the translation of a
//! GraphQL field selection into property and metadata requests.

// Generated protobuf code (compiled by build.rs)
#[allow(clippy::all)]
#[allow(clippy::pedantic)]
pub mod pb {
    include!(concat!(env!("OUT_DIR"), "/nearql.v1.rs"));
}

pub mod properties;
pub mod search;

pub use properties::{json_to_properties, json_to_property_value, property_value_to_json};
pub use search::{compile_search, metadata_request, properties_request};
