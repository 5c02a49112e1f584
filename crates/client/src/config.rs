//! Runtime client configuration.
//!
//! Defaults come from `nearql_core::config`; [`ClientConfig::from_env`]
//! overrides them from `NEARQL_*` environment variables.

use crate::error::{ClientError, Result};
use nearql_core::config::{
    API_PREFIX, DEFAULT_GRPC_PORT, DEFAULT_HOST, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SCHEME,
    DEFAULT_TIMEOUT_SECS,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// RPC endpoint settings. Absent means batch and search use REST only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GrpcConfig {
    /// `host` or `host:port`; the default port is appended when missing.
    pub host: String,
    #[serde(default)]
    pub secure: bool,
}

impl GrpcConfig {
    /// Full RPC endpoint URL, e.g. `http://localhost:50051`.
    pub fn endpoint(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        if self.host.contains(':') {
            format!("{}://{}", scheme, self.host)
        } else {
            format!("{}://{}:{}", scheme, self.host, DEFAULT_GRPC_PORT)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub scheme: String,
    pub host: String,
    /// Extra headers sent with every REST request (auth, module API keys).
    pub headers: HashMap<String, String>,
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub grpc: Option<GrpcConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            headers: HashMap::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            grpc: None,
        }
    }
}

impl ClientConfig {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            ..Default::default()
        }
    }

    /// Defaults overridden by `NEARQL_SCHEME`, `NEARQL_HOST`, `NEARQL_API_KEY`,
    /// `NEARQL_TIMEOUT_SECS`, `NEARQL_GRPC_HOST` and `NEARQL_GRPC_SECURE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(scheme) = lookup("NEARQL_SCHEME") {
            cfg.scheme = scheme;
        }
        if let Some(host) = lookup("NEARQL_HOST") {
            cfg.host = host;
        }
        if let Some(key) = lookup("NEARQL_API_KEY") {
            cfg.headers
                .insert("Authorization".to_string(), format!("Bearer {}", key));
        }
        if let Some(secs) = lookup("NEARQL_TIMEOUT_SECS") {
            cfg.timeout_secs = secs.parse().map_err(|_| {
                ClientError::InvalidConfig(format!("NEARQL_TIMEOUT_SECS is not a number: {}", secs))
            })?;
        }
        if let Some(host) = lookup("NEARQL_GRPC_HOST") {
            let secure = match lookup("NEARQL_GRPC_SECURE").as_deref() {
                None | Some("") | Some("0") | Some("false") => false,
                Some("1") | Some("true") => true,
                Some(other) => {
                    return Err(ClientError::InvalidConfig(format!(
                        "NEARQL_GRPC_SECURE must be true or false, got {}",
                        other
                    )))
                }
            };
            cfg.grpc = Some(GrpcConfig { host, secure });
        }
        Ok(cfg)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_grpc(mut self, grpc: GrpcConfig) -> Self {
        self.grpc = Some(grpc);
        self
    }

    /// `<scheme>://<host>/v1`
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, API_PREFIX)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
