//! Global configuration constants for nearql.
//!
//! Endpoint paths, wire markers, and client defaults are defined here.
//! These are compile-time constants; runtime configuration (host, headers,
//! timeouts) is handled by `ClientConfig` in `nearql-client`.

/// Version prefix of every REST path. Client base URLs end with it.
pub const API_PREFIX: &str = "/v1";

/// GraphQL query endpoint, relative to [`API_PREFIX`].
pub const GRAPHQL_PATH: &str = "/graphql";

/// Batch insert (`POST`) and batch delete (`DELETE`) endpoint.
pub const BATCH_OBJECTS_PATH: &str = "/batch/objects";

/// Vocabulary extension endpoint of the contextionary vectorizer module.
pub const CONCEPT_EXTENSIONS_PATH: &str = "/modules/text2vec-contextionary/extensions";

/// Backup endpoints live under `/backups/{backend}`.
pub const BACKUPS_PATH: &str = "/backups";

/// Fully-qualified RPC method names (`/<package>.<Service>/<Method>`).
pub const RPC_SEARCH_METHOD: &str = "/nearql.v1.Search/Search";
pub const RPC_BATCH_OBJECTS_METHOD: &str = "/nearql.v1.Batch/BatchObjects";
pub const RPC_BATCH_DELETE_METHOD: &str = "/nearql.v1.Batch/BatchDelete";

/// Media strings starting with this prefix are treated as data URIs.
pub const DATA_URI_PREFIX: &str = "data:";

/// Marker separating the data-URI header from the base64 payload.
///
/// Only the text after the *last* occurrence is kept.
pub const DATA_URI_BASE64_MARKER: &str = ";base64,";

/// Prefix identifying a reference-target selection inside a field list.
pub const INLINE_FRAGMENT_PREFIX: &str = "... on ";

/// Name of the GraphQL field carrying metadata (`id`, `distance`, ...).
pub const ADDITIONAL_FIELD: &str = "_additional";

/// Concept-extension weights must lie within this closed range.
pub const CONCEPT_WEIGHT_MIN: f32 = 0.0;
pub const CONCEPT_WEIGHT_MAX: f32 = 1.0;

/// Weight applied to a concept extension when none is given.
pub const DEFAULT_CONCEPT_WEIGHT: f32 = 1.0;

/// Default URL scheme for REST requests.
pub const DEFAULT_SCHEME: &str = "http";

/// Default REST host (`host:port`).
pub const DEFAULT_HOST: &str = "localhost:8080";

/// Default RPC port when only a host name is configured.
pub const DEFAULT_GRPC_PORT: u16 = 50051;

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Interval between status polls while waiting for a long-running operation.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Maximum number of objects sent in a single batch request.
pub const MAX_BATCH_SIZE: usize = 1_000;

/// Backup statuses after which polling stops.
pub const BACKUP_TERMINAL_STATUSES: &[&str] = &["SUCCESS", "FAILED"];
