//! # nearql-client
//!
//! Async client for a nearql-compatible database. Queries are built with
//! `nearql-core` and sent either as GraphQL text over REST or as protobuf
//! requests over an RPC transport.
//!
//! ```no_run
//! # async fn demo() -> nearql_client::Result<()> {
//! use nearql_client::{Client, ClientConfig};
//! use nearql_core::{Field, GetBuilder};
//!
//! let client = Client::new(ClientConfig::from_env()?)?;
//! let query = GetBuilder::new()
//!     .with_class_name("Pizza")
//!     .with_fields([Field::new("name")])
//!     .with_limit(2);
//! let data = client.graphql().run(&query).await?;
//! println!("{}", data);
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod batch;
pub mod config;
pub mod contextionary;
pub mod error;
pub mod graphql;
pub mod grpc;
pub mod transport;
pub mod wait;

pub use backup::{Backup, BackupCreator, BackupResponse, BackupRestorer, BackupStatus};
pub use batch::{BatchDeleteSummary, BatchObjectOutcome, Batcher};
pub use config::{ClientConfig, GrpcConfig};
pub use contextionary::ConceptExtender;
pub use error::{ClientError, Result};
pub use graphql::{GraphQl, GraphQlError, GraphQlResponse};
pub use grpc::GrpcTransport;
pub use transport::{HttpTransport, Method, RawResponse, RpcMethod, RpcTransport, Transport};
pub use wait::{cancellation, CancelHandle, CancelSignal};

use nearql_core::rpc::{self, pb};
use nearql_core::GetBuilder;
use prost::Message;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Facade over the REST transport and an optional RPC transport.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    rest: Arc<dyn Transport>,
    rpc: Option<Arc<dyn RpcTransport>>,
}

impl Client {
    /// REST over reqwest, plus a tonic RPC transport when `config.grpc` is
    /// set. Nothing is dialed until the first request.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let rest = Arc::new(HttpTransport::new(&config)?);
        let rpc = match &config.grpc {
            Some(grpc) => {
                let transport = GrpcTransport::new(grpc)?;
                tracing::info!("RPC enabled for batch and search via {}", transport.uri());
                Some(Arc::new(transport) as Arc<dyn RpcTransport>)
            }
            None => None,
        };
        Ok(Self {
            config: Arc::new(config),
            rest,
            rpc,
        })
    }

    pub fn with_transports(
        config: ClientConfig,
        rest: Arc<dyn Transport>,
        rpc: Option<Arc<dyn RpcTransport>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            rest,
            rpc,
        }
    }

    pub fn with_rpc(mut self, rpc: Arc<dyn RpcTransport>) -> Self {
        self.rpc = Some(rpc);
        self
    }

    pub fn has_rpc(&self) -> bool {
        self.rpc.is_some()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn graphql(&self) -> GraphQl {
        GraphQl::new(self.rest.clone())
    }

    pub fn batch(&self) -> Batcher {
        Batcher::new(self.rest.clone(), self.rpc.clone())
    }

    pub fn backup(&self) -> Backup {
        Backup::new(self.rest.clone(), self.config.poll_interval())
    }

    pub fn contextionary(&self) -> ConceptExtender {
        ConceptExtender::new(self.rest.clone())
    }

    /// Run a Get query over RPC.
    pub async fn search(&self, query: &GetBuilder) -> Result<pb::SearchReply> {
        let rpc = self.rpc.as_ref().ok_or(ClientError::RpcNotConfigured)?;
        tracing::debug!("RPC search on '{}'", query.class_name());
        let reply = rpc
            .call(RpcMethod::Search, query.to_rpc().encode_to_vec())
            .await?;
        Ok(pb::SearchReply::decode(reply.as_slice())?)
    }

    /// Like [`search`](Self::search), returning only each hit's properties as JSON.
    pub async fn search_properties(&self, query: &GetBuilder) -> Result<Vec<Map<String, Value>>> {
        let reply = self.search(query).await?;
        Ok(reply
            .results
            .iter()
            .map(|hit| {
                hit.properties
                    .iter()
                    .map(|(k, v)| (k.clone(), rpc::property_value_to_json(v)))
                    .collect()
            })
            .collect())
    }
}
