//! Concept extension for the text2vec-contextionary module.

use crate::error::{ClientError, Result};
use crate::transport::{Method, Transport};
use nearql_core::config::CONCEPT_EXTENSIONS_PATH;
use nearql_core::contextionary::ConceptExtension;
use std::sync::Arc;

/// Submits vocabulary extensions to the contextionary vectorizer module.
#[derive(Clone)]
pub struct ConceptExtender {
    transport: Arc<dyn Transport>,
}

impl ConceptExtender {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn extend(&self, extension: &ConceptExtension) -> Result<()> {
        let body = serde_json::to_vec(&extension.to_rest_body())?;
        let resp = self
            .transport
            .send_request(CONCEPT_EXTENSIONS_PATH, Method::Post, &[], Some(body))
            .await?;
        if !resp.is_success() {
            return Err(ClientError::unexpected(resp.status, &resp.body));
        }
        tracing::info!("Extended vocabulary with concept '{}'", extension.concept());
        Ok(())
    }
}
