//! Client error types.

use crate::graphql::GraphQlError;
use nearql_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// A builder setter rejected its input.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client configuration could not be parsed or is incomplete.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The server answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The GraphQL endpoint returned errors alongside (or instead of) data.
    #[error("graphql errors: {}", join_messages(.0))]
    GraphQl(Vec<GraphQlError>),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to decode rpc reply: {0}")]
    Decode(#[from] prost::DecodeError),

    /// An RPC-only operation was requested without an RPC transport.
    #[error("no rpc transport configured")]
    RpcNotConfigured,

    /// A wait was cancelled before the operation reached a terminal state.
    #[error("wait cancelled")]
    Cancelled,

    /// Failure inside a transport (connection, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Derived(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ClientError {
    pub fn derived<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ClientError::Derived(Box::new(err))
    }

    pub fn unexpected(status: u16, body: &[u8]) -> Self {
        ClientError::UnexpectedStatus {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Status code for `UnexpectedStatus`, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn join_messages(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_status_keeps_body() {
        let err = ClientError::unexpected(422, b"{\"error\":\"bad\"}");
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "unexpected status 422: {\"error\":\"bad\"}");
    }

    #[test]
    fn graphql_errors_are_joined() {
        let err = ClientError::GraphQl(vec![
            GraphQlError {
                message: "first".into(),
                ..Default::default()
            },
            GraphQlError {
                message: "second".into(),
                ..Default::default()
            },
        ]);
        assert_eq!(err.to_string(), "graphql errors: first; second");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn config_error_converts() {
        let err: ClientError = ConfigError::WeightOutOfRange(2.0).into();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
