//! Batch insert and batch delete.
//!
//! RPC is used when the client was built with an RPC transport; otherwise
//! the REST endpoint `/batch/objects` is used. Both paths return the same
//! outcome types.

use crate::error::Result;
use crate::transport::{Method, RpcMethod, RpcTransport, Transport};
use nearql_core::batch::{BatchDelete, ObjectsBatch};
use nearql_core::config::{BATCH_OBJECTS_PATH, MAX_BATCH_SIZE};
use nearql_core::rpc::pb;
use prost::Message;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Result for one object of a batch insert, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchObjectOutcome {
    pub index: usize,
    pub id: Uuid,
    pub errors: Vec<String>,
}

impl BatchObjectOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BatchDeleteSummary {
    #[serde(default)]
    pub matches: i64,
    #[serde(default)]
    pub failed: i64,
    #[serde(default)]
    pub successful: i64,
}

// ── REST response shapes ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RestObjectResult {
    #[serde(default)]
    result: Option<RestResult>,
}

#[derive(Debug, Deserialize)]
struct RestResult {
    #[serde(default)]
    errors: Option<RestErrors>,
}

#[derive(Debug, Deserialize)]
struct RestErrors {
    #[serde(default)]
    error: Vec<RestErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct RestErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RestDeleteResponse {
    results: BatchDeleteSummary,
}

#[derive(Clone)]
pub struct Batcher {
    rest: Arc<dyn Transport>,
    rpc: Option<Arc<dyn RpcTransport>>,
}

impl Batcher {
    pub fn new(rest: Arc<dyn Transport>, rpc: Option<Arc<dyn RpcTransport>>) -> Self {
        Self { rest, rpc }
    }

    pub fn uses_rpc(&self) -> bool {
        self.rpc.is_some()
    }

    /// Insert every object, splitting into requests of at most
    /// `MAX_BATCH_SIZE` objects. Per-object failures are reported in the
    /// outcomes; transport and status failures abort the whole call.
    pub async fn insert(&self, batch: &ObjectsBatch) -> Result<Vec<BatchObjectOutcome>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        tracing::info!(
            "Batch insert of {} objects via {}",
            batch.len(),
            if self.uses_rpc() { "rpc" } else { "rest" }
        );

        let mut outcomes = Vec::with_capacity(batch.len());
        for part in batch.split(MAX_BATCH_SIZE) {
            let errors = match &self.rpc {
                Some(rpc) => insert_rpc(rpc.as_ref(), &part).await?,
                None => insert_rest(self.rest.as_ref(), &part).await?,
            };
            let offset = outcomes.len();
            outcomes.extend(part.objects().iter().zip(errors).enumerate().map(
                |(i, (object, errors))| BatchObjectOutcome {
                    index: offset + i,
                    id: object.id,
                    errors,
                },
            ));
        }
        Ok(outcomes)
    }

    pub async fn delete(&self, delete: &BatchDelete) -> Result<BatchDeleteSummary> {
        tracing::info!(
            "Batch delete via {}",
            if self.uses_rpc() { "rpc" } else { "rest" }
        );
        match &self.rpc {
            Some(rpc) => {
                let reply = rpc
                    .call(RpcMethod::BatchDelete, delete.to_rpc().encode_to_vec())
                    .await?;
                let reply = pb::BatchDeleteReply::decode(reply.as_slice())?;
                Ok(BatchDeleteSummary {
                    matches: reply.matches,
                    failed: reply.failed,
                    successful: reply.successful,
                })
            }
            None => {
                let params = query_params(
                    delete.consistency_level().map(|c| c.as_str()),
                    delete.tenant(),
                );
                let body = serde_json::to_vec(&delete.to_rest_body())?;
                let resp = self
                    .rest
                    .send_request(BATCH_OBJECTS_PATH, Method::Delete, &params, Some(body))
                    .await?;
                let parsed: RestDeleteResponse = resp.json(&[200])?;
                Ok(parsed.results)
            }
        }
    }
}

/// Errors per object of `part`, in order.
async fn insert_rpc(rpc: &dyn RpcTransport, part: &ObjectsBatch) -> Result<Vec<Vec<String>>> {
    let reply = rpc
        .call(RpcMethod::BatchObjects, part.to_rpc().encode_to_vec())
        .await?;
    let reply = pb::BatchObjectsReply::decode(reply.as_slice())?;
    let mut errors = vec![Vec::new(); part.len()];
    for err in reply.errors {
        match usize::try_from(err.index).ok().and_then(|i| errors.get_mut(i)) {
            Some(slot) => slot.push(err.error),
            None => tracing::warn!(
                "Batch reply error for unknown index {}: {}",
                err.index,
                err.error
            ),
        }
    }
    Ok(errors)
}

async fn insert_rest(rest: &dyn Transport, part: &ObjectsBatch) -> Result<Vec<Vec<String>>> {
    let params = query_params(part.consistency_level().map(|c| c.as_str()), None);
    let body = serde_json::to_vec(&part.to_rest_body())?;
    let resp = rest
        .send_request(BATCH_OBJECTS_PATH, Method::Post, &params, Some(body))
        .await?;
    let results: Vec<RestObjectResult> = resp.json(&[200])?;
    Ok(rest_errors(results, part.len()))
}

const NO_RESULT: &str = "no result returned for object";

/// Errors per object from the REST reply. Objects the server returned no
/// result for are failures, not silent successes.
fn rest_errors(results: Vec<RestObjectResult>, expected: usize) -> Vec<Vec<String>> {
    if results.len() != expected {
        tracing::warn!(
            "Batch insert returned {} results for {} objects",
            results.len(),
            expected
        );
    }
    let mut results = results.into_iter();
    (0..expected)
        .map(|_| match results.next() {
            Some(result) => result
                .result
                .and_then(|r| r.errors)
                .map(|errs| errs.error.into_iter().map(|e| e.message).collect())
                .unwrap_or_default(),
            None => vec![NO_RESULT.to_string()],
        })
        .collect()
}

fn query_params<'a>(
    consistency_level: Option<&'a str>,
    tenant: Option<&'a str>,
) -> Vec<(&'a str, &'a str)> {
    consistency_level
        .map(|c| ("consistency_level", c))
        .into_iter()
        .chain(tenant.map(|t| ("tenant", t)))
        .collect()
}
