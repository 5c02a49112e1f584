//! Transport collaborators.
//!
//! The client never opens sockets itself: REST goes through a [`Transport`]
//! and RPC through an [`RpcTransport`]. [`HttpTransport`] is the bundled
//! reqwest implementation and [`GrpcTransport`](crate::grpc::GrpcTransport)
//! the tonic one; tests substitute in-memory ones.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use nearql_core::config::{RPC_BATCH_DELETE_METHOD, RPC_BATCH_OBJECTS_METHOD, RPC_SEARCH_METHOD};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Status and raw body of a REST response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON after checking that the status is one of
    /// `expected`.
    pub fn json<T: serde::de::DeserializeOwned>(&self, expected: &[u16]) -> Result<T> {
        if !expected.contains(&self.status) {
            return Err(ClientError::unexpected(self.status, &self.body));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Query-string parameters, encoded by the transport.
pub type QueryParams<'a> = &'a [(&'a str, &'a str)];

/// REST capability: `send_request(path, method, query, body) -> (status, bytes)`.
/// `path` is relative to the versioned base URL (e.g. `/graphql`) and never
/// carries a query string; parameters go in `query`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_request(
        &self,
        path: &str,
        method: Method,
        query: QueryParams<'_>,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse>;
}

/// RPC methods the client calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcMethod {
    Search,
    BatchObjects,
    BatchDelete,
}

impl RpcMethod {
    pub fn path(self) -> &'static str {
        match self {
            RpcMethod::Search => RPC_SEARCH_METHOD,
            RpcMethod::BatchObjects => RPC_BATCH_OBJECTS_METHOD,
            RpcMethod::BatchDelete => RPC_BATCH_DELETE_METHOD,
        }
    }
}

/// RPC capability: send a prost-encoded request, receive the encoded reply.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(&self, method: RpcMethod, request: Vec<u8>) -> Result<Vec<u8>>;
}

/// reqwest-backed REST transport.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    headers: Arc<RwLock<HashMap<String, String>>>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::derived)?;
        Ok(Self {
            client,
            base_url: config.base_url(),
            headers: Arc::new(RwLock::new(config.headers.clone())),
        })
    }

    /// Add or replace a header for all subsequent requests.
    pub fn set_header(&self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.write().insert(name.into(), value.into());
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_request(
        &self,
        path: &str,
        method: Method,
        query: QueryParams<'_>,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if !query.is_empty() {
            req = req.query(query);
        }
        // Snapshot so the lock is not held across the await.
        let headers: Vec<(String, String)> = self
            .headers
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (name, value) in headers {
            req = req.header(name, value);
        }
        if let Some(body) = body {
            req = req
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let resp = req.send().await.map_err(ClientError::derived)?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(ClientError::derived)?.to_vec();
        tracing::debug!("{} {} -> {}", method.as_str(), path, status);
        if !(200..300).contains(&status) {
            tracing::warn!("{} {} returned {}", method.as_str(), path, status);
        }
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_response_json_checks_status() {
        let ok = RawResponse {
            status: 200,
            body: br#"{"a":1}"#.to_vec(),
        };
        let v: serde_json::Value = ok.json(&[200]).unwrap();
        assert_eq!(v["a"], 1);

        let bad = RawResponse {
            status: 500,
            body: b"boom".to_vec(),
        };
        let err = bad.json::<serde_json::Value>(&[200]).unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn rpc_paths() {
        assert_eq!(RpcMethod::Search.path(), "/nearql.v1.Search/Search");
        assert_eq!(RpcMethod::BatchDelete.path(), "/nearql.v1.Batch/BatchDelete");
    }

    #[test]
    fn http_transport_uses_versioned_base() {
        let transport = HttpTransport::new(&ClientConfig::new("http", "127.0.0.1:9")).unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:9/v1");
        transport.set_header("X-Test", "1");
        assert_eq!(transport.headers.read().get("X-Test").map(String::as_str), Some("1"));
    }
}
