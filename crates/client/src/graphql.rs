//! GraphQL execution over the REST transport.

use crate::error::{ClientError, Result};
use crate::transport::{Method, Transport};
use nearql_core::config::GRAPHQL_PATH;
use nearql_core::GraphQlQuery;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// One entry of the `errors` array of a GraphQL response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub path: Vec<Value>,
    #[serde(default)]
    pub locations: Vec<ErrorLocation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    /// `data` when there are no errors, otherwise [`ClientError::GraphQl`].
    pub fn into_result(self) -> Result<Value> {
        if !self.errors.is_empty() {
            return Err(ClientError::GraphQl(self.errors));
        }
        Ok(self.data.unwrap_or(Value::Null))
    }
}

/// Posts rendered queries to the GraphQL endpoint.
#[derive(Clone)]
pub struct GraphQl {
    transport: Arc<dyn Transport>,
}

impl GraphQl {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Render `query` and return the full response, errors included.
    pub async fn execute<Q: GraphQlQuery + ?Sized>(&self, query: &Q) -> Result<GraphQlResponse> {
        let text = query.build();
        tracing::debug!("graphql query: {}", text);
        let body = serde_json::to_vec(&json!({ "query": text }))?;
        let resp = self
            .transport
            .send_request(GRAPHQL_PATH, Method::Post, &[], Some(body))
            .await?;
        resp.json(&[200])
    }

    /// Render `query` and return `data`, failing on any GraphQL error.
    pub async fn run<Q: GraphQlQuery + ?Sized>(&self, query: &Q) -> Result<Value> {
        self.execute(query).await?.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_with_errors_fails() {
        let resp: GraphQlResponse = serde_json::from_str(
            r#"{
                "data": null,
                "errors": [{
                    "message": "no such class",
                    "locations": [{"line": 1, "column": 7}],
                    "path": ["Get", 0]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(resp.errors[0].locations[0], ErrorLocation { line: 1, column: 7 });
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.to_string(), "graphql errors: no such class");
    }

    #[test]
    fn response_data_is_returned() {
        let resp: GraphQlResponse =
            serde_json::from_str(r#"{"data": {"Get": {"Pizza": []}}}"#).unwrap();
        assert_eq!(resp.into_result().unwrap(), json!({"Get": {"Pizza": []}}));
    }
}
