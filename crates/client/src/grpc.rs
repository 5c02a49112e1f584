//! tonic-backed [`RpcTransport`].
//!
//! The channel is dialed on first use, so building a client needs neither a
//! reachable server nor a running runtime.

use crate::config::GrpcConfig;
use crate::error::{ClientError, Result};
use crate::transport::{RpcMethod, RpcTransport};
use async_trait::async_trait;
use nearql_core::rpc::pb;
use prost::Message;
use tokio::sync::OnceCell;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

pub struct GrpcTransport {
    endpoint: Endpoint,
    channel: OnceCell<Channel>,
}

impl GrpcTransport {
    /// Validates the endpoint URI; does not connect.
    pub fn new(config: &GrpcConfig) -> Result<Self> {
        let uri = config.endpoint();
        let mut endpoint = Endpoint::from_shared(uri.clone()).map_err(|e| {
            ClientError::InvalidConfig(format!("bad rpc endpoint {}: {}", uri, e))
        })?;
        if config.secure {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new())
                .map_err(ClientError::derived)?;
        }
        Ok(Self {
            endpoint,
            channel: OnceCell::new(),
        })
    }

    pub fn uri(&self) -> String {
        self.endpoint.uri().to_string()
    }

    async fn channel(&self) -> Result<Channel> {
        let channel = self
            .channel
            .get_or_try_init(|| async {
                tracing::info!("Connecting to rpc endpoint {}", self.endpoint.uri());
                self.endpoint.connect().await.map_err(ClientError::derived)
            })
            .await?;
        Ok(channel.clone())
    }

    /// Decode `request` as `Req`, send it, and re-encode the `Resp` reply.
    async fn unary<Req, Resp>(&self, method: RpcMethod, request: &[u8]) -> Result<Vec<u8>>
    where
        Req: Message + Default + Send + Sync + 'static,
        Resp: Message + Default + Send + Sync + 'static,
    {
        let message = Req::decode(request)?;
        let mut grpc = tonic::client::Grpc::new(self.channel().await?);
        grpc.ready().await.map_err(ClientError::derived)?;
        let reply = grpc
            .unary(
                tonic::Request::new(message),
                PathAndQuery::from_static(method.path()),
                ProstCodec::<Req, Resp>::default(),
            )
            .await
            .map_err(|status| {
                tracing::warn!("{} failed: {}", method.path(), status.message());
                ClientError::derived(status)
            })?;
        Ok(reply.into_inner().encode_to_vec())
    }
}

#[async_trait]
impl RpcTransport for GrpcTransport {
    async fn call(&self, method: RpcMethod, request: Vec<u8>) -> Result<Vec<u8>> {
        tracing::debug!("rpc {} ({} bytes)", method.path(), request.len());
        match method {
            RpcMethod::Search => {
                self.unary::<pb::SearchRequest, pb::SearchReply>(method, &request)
                    .await
            }
            RpcMethod::BatchObjects => {
                self.unary::<pb::BatchObjectsRequest, pb::BatchObjectsReply>(method, &request)
                    .await
            }
            RpcMethod::BatchDelete => {
                self.unary::<pb::BatchDeleteRequest, pb::BatchDeleteReply>(method, &request)
                    .await
            }
        }
    }
}
