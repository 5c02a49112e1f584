use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use nearql_client::{
    cancellation, BackupStatus, Client, ClientConfig, ClientError, RpcMethod, RpcTransport,
};
use nearql_core::batch::{BatchDelete, BatchObject, ObjectsBatch};
use nearql_core::contextionary::ConceptExtension;
use nearql_core::rpc::pb;
use nearql_core::{ConsistencyLevel, Field, GetBuilder, GraphQlQuery, Operator, WhereBuilder};
use parking_lot::Mutex;
use prost::Message;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

// ── Fake server ────────────────────────────────────────────────────

#[derive(Default)]
struct Recorded {
    graphql_queries: Vec<String>,
    authorization: Vec<Option<String>>,
    graphql_reply: Value,
    batch_calls: Vec<(String, HashMap<String, String>, Value)>,
    drop_batch_results: bool,
    backup_script: VecDeque<&'static str>,
    backup_polls: usize,
    extensions: Vec<Value>,
}

#[derive(Clone, Default)]
struct FakeState {
    inner: Arc<Mutex<Recorded>>,
}

async fn graphql(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut rec = state.inner.lock();
    rec.graphql_queries
        .push(body["query"].as_str().unwrap_or_default().to_string());
    rec.authorization.push(
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );
    Json(rec.graphql_reply.clone())
}

async fn batch_insert(
    State(state): State<FakeState>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut results: Vec<Value> = body["objects"]
        .as_array()
        .map(|objects| {
            objects
                .iter()
                .map(|o| {
                    if o["properties"]["fail"] == json!(true) {
                        let errors = json!({"error": [{"message": "rejected"}]});
                        json!({"id": o["id"], "result": {"errors": errors}})
                    } else {
                        json!({"id": o["id"], "result": {}})
                    }
                })
                .collect()
        })
        .unwrap_or_default();
    let mut rec = state.inner.lock();
    if rec.drop_batch_results {
        results.clear();
    }
    rec.batch_calls.push(("POST".to_string(), query, body));
    Json(Value::Array(results))
}

async fn batch_delete(
    State(state): State<FakeState>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state
        .inner
        .lock()
        .batch_calls
        .push(("DELETE".to_string(), query, body));
    Json(json!({"results": {"matches": 3, "failed": 1, "successful": 2, "limit": 10000}}))
}

async fn backup_create(Path(backend): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"id": body["id"], "backend": backend, "status": "STARTED"}))
}

async fn backup_restore(Path((backend, id)): Path<(String, String)>) -> Json<Value> {
    Json(json!({"id": id, "backend": backend, "status": "STARTED"}))
}

async fn backup_status(
    State(state): State<FakeState>,
    Path((backend, id)): Path<(String, String)>,
) -> Json<Value> {
    let mut rec = state.inner.lock();
    rec.backup_polls += 1;
    let status = rec.backup_script.pop_front().unwrap_or("STARTED");
    Json(json!({"id": id, "backend": backend, "status": status}))
}

async fn extend_concept(State(state): State<FakeState>, Json(body): Json<Value>) -> Response {
    if body["concept"] == json!("fail") {
        return (StatusCode::UNPROCESSABLE_ENTITY, "unknown words in definition").into_response();
    }
    state.inner.lock().extensions.push(body.clone());
    Json(body).into_response()
}

async fn spawn_app(state: FakeState) -> String {
    let app = Router::new()
        .route("/v1/graphql", post(graphql))
        .route("/v1/batch/objects", post(batch_insert).delete(batch_delete))
        .route("/v1/backups/:backend", post(backup_create))
        .route("/v1/backups/:backend/:id", get(backup_status))
        .route(
            "/v1/backups/:backend/:id/restore",
            post(backup_restore).get(backup_status),
        )
        .route(
            "/v1/modules/text2vec-contextionary/extensions",
            post(extend_concept),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr.to_string()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn rest_client(state: &FakeState) -> Client {
    init_tracing();
    let host = spawn_app(state.clone()).await;
    let mut config = ClientConfig::new("http", host);
    config.poll_interval_ms = 5;
    Client::new(config).expect("client")
}

// ── In-memory RPC transport ────────────────────────────────────────

#[derive(Default)]
struct FakeRpc {
    calls: Mutex<Vec<(RpcMethod, Vec<u8>)>>,
}

#[async_trait]
impl RpcTransport for FakeRpc {
    async fn call(&self, method: RpcMethod, request: Vec<u8>) -> nearql_client::Result<Vec<u8>> {
        self.calls.lock().push((method, request));
        let reply = match method {
            RpcMethod::Search => pb::SearchReply {
                took: 1.0,
                results: vec![pb::SearchResult {
                    properties: HashMap::from([(
                        "name".to_string(),
                        pb::PropertyValue {
                            kind: Some(pb::property_value::Kind::TextValue("Hawaii".into())),
                        },
                    )]),
                    ..Default::default()
                }],
                generative_grouped_result: String::new(),
            }
            .encode_to_vec(),
            RpcMethod::BatchObjects => pb::BatchObjectsReply {
                took: 0.5,
                errors: vec![pb::batch_objects_reply::BatchError {
                    index: 1,
                    error: "duplicate id".into(),
                }],
            }
            .encode_to_vec(),
            RpcMethod::BatchDelete => pb::BatchDeleteReply {
                took: 0.5,
                failed: 0,
                matches: 4,
                successful: 4,
            }
            .encode_to_vec(),
        };
        Ok(reply)
    }
}

fn pizza_query() -> GetBuilder {
    GetBuilder::new()
        .with_class_name("Pizza")
        .with_fields([Field::new("name")])
        .with_limit(2)
}

// ── GraphQL ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_graphql_posts_rendered_query() {
    let state = FakeState::default();
    state.inner.lock().graphql_reply = json!({"data": {"Get": {"Pizza": [{"name": "Hawaii"}]}}});
    let client = rest_client(&state).await;

    let query = pizza_query();
    let data = client.graphql().run(&query).await.unwrap();
    assert_eq!(data["Get"]["Pizza"][0]["name"], "Hawaii");

    let rec = state.inner.lock();
    assert_eq!(rec.graphql_queries, vec![query.build()]);
    assert_eq!(rec.graphql_queries[0], "{Get {Pizza (limit: 2) {name}}}");
}

#[tokio::test]
async fn test_graphql_errors_are_returned() {
    let state = FakeState::default();
    state.inner.lock().graphql_reply =
        json!({"data": null, "errors": [{"message": "class Pizza not found"}]});
    let client = rest_client(&state).await;

    let err = client.graphql().run(&pizza_query()).await.unwrap_err();
    match err {
        ClientError::GraphQl(errors) => assert_eq!(errors[0].message, "class Pizza not found"),
        other => panic!("expected graphql error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_configured_headers_are_sent() {
    init_tracing();
    let state = FakeState::default();
    state.inner.lock().graphql_reply = json!({"data": {}});
    let host = spawn_app(state.clone()).await;
    let client =
        Client::new(ClientConfig::new("http", host).with_header("Authorization", "Bearer k1"))
            .unwrap();

    client.graphql().run(&pizza_query()).await.unwrap();
    assert_eq!(
        state.inner.lock().authorization,
        vec![Some("Bearer k1".to_string())]
    );
}

// ── Batch ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_batch_insert_over_rest() {
    let state = FakeState::default();
    let client = rest_client(&state).await;
    assert!(!client.has_rpc());

    let batch = ObjectsBatch::new()
        .with_object(BatchObject::new("Pizza").with_property("name", "Hawaii"))
        .with_object(BatchObject::new("Pizza").with_property("fail", true))
        .with_consistency_level(ConsistencyLevel::Quorum);
    let outcomes = client.batch().insert(&batch).await.unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].is_success());
    assert_eq!(outcomes[0].id, batch.objects()[0].id);
    assert_eq!(outcomes[1].index, 1);
    assert_eq!(outcomes[1].errors, vec!["rejected".to_string()]);

    let rec = state.inner.lock();
    let (method, query, body) = &rec.batch_calls[0];
    assert_eq!(method, "POST");
    assert_eq!(
        query,
        &HashMap::from([("consistency_level".to_string(), "QUORUM".to_string())])
    );
    assert_eq!(body["objects"][0]["class"], "Pizza");
}

#[tokio::test]
async fn test_batch_insert_missing_results_are_failures() {
    let state = FakeState::default();
    state.inner.lock().drop_batch_results = true;
    let client = rest_client(&state).await;

    let batch = ObjectsBatch::new()
        .with_object(BatchObject::new("Pizza").with_property("name", "Hawaii"))
        .with_object(BatchObject::new("Pizza").with_property("name", "Doener"));
    let outcomes = client.batch().insert(&batch).await.unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| !o.is_success()));
    assert_eq!(
        outcomes[1].errors,
        vec!["no result returned for object".to_string()]
    );
}

#[tokio::test]
async fn test_empty_batch_sends_nothing() {
    let state = FakeState::default();
    let client = rest_client(&state).await;
    let outcomes = client.batch().insert(&ObjectsBatch::new()).await.unwrap();
    assert!(outcomes.is_empty());
    assert!(state.inner.lock().batch_calls.is_empty());
}

#[tokio::test]
async fn test_batch_delete_over_rest() {
    let state = FakeState::default();
    let client = rest_client(&state).await;

    let delete = BatchDelete::new()
        .with_class_name("Pizza")
        .with_where(
            WhereBuilder::new()
                .with_operator(Operator::Equal)
                .with_path(["name"])
                .with_value_text("Hawaii"),
        )
        .with_tenant("tenantA");
    let summary = client.batch().delete(&delete).await.unwrap();
    assert_eq!((summary.matches, summary.failed, summary.successful), (3, 1, 2));

    let rec = state.inner.lock();
    let (method, query, body) = &rec.batch_calls[0];
    assert_eq!(method, "DELETE");
    assert_eq!(query.get("tenant").map(String::as_str), Some("tenantA"));
    assert_eq!(body["match"]["where"]["valueText"], "Hawaii");
}

#[tokio::test]
async fn test_batch_tenant_is_percent_encoded() {
    let state = FakeState::default();
    let client = rest_client(&state).await;

    let delete = BatchDelete::new()
        .with_class_name("Pizza")
        .with_tenant("a&b c")
        .with_consistency_level(ConsistencyLevel::One);
    client.batch().delete(&delete).await.unwrap();

    let rec = state.inner.lock();
    let (_, query, _) = &rec.batch_calls[0];
    assert_eq!(
        query,
        &HashMap::from([
            ("tenant".to_string(), "a&b c".to_string()),
            ("consistency_level".to_string(), "ONE".to_string()),
        ])
    );
}

#[tokio::test]
async fn test_batch_prefers_rpc_when_configured() {
    let state = FakeState::default();
    let rpc = Arc::new(FakeRpc::default());
    let client = rest_client(&state).await.with_rpc(rpc.clone());
    assert!(client.has_rpc());

    let batch = ObjectsBatch::new()
        .with_objects((0..3).map(|i| BatchObject::new("C").with_property("i", i)));
    let outcomes = client.batch().insert(&batch).await.unwrap();
    assert_eq!(
        outcomes.iter().map(|o| o.is_success()).collect::<Vec<_>>(),
        vec![true, false, true]
    );
    assert_eq!(outcomes[1].errors, vec!["duplicate id".to_string()]);

    let summary = client
        .batch()
        .delete(&BatchDelete::new().with_class_name("C"))
        .await
        .unwrap();
    assert_eq!(summary.matches, 4);

    assert!(state.inner.lock().batch_calls.is_empty(), "REST must not be used");
    let calls = rpc.calls.lock();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, RpcMethod::BatchObjects);
    let sent = pb::BatchObjectsRequest::decode(calls[0].1.as_slice()).unwrap();
    assert_eq!(sent.objects.len(), 3);
    assert_eq!(calls[1].0, RpcMethod::BatchDelete);
}

// ── Search ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_requires_rpc() {
    let state = FakeState::default();
    let client = rest_client(&state).await;
    let err = client.search(&pizza_query()).await.unwrap_err();
    assert!(matches!(err, ClientError::RpcNotConfigured));
}

#[tokio::test]
async fn test_search_over_rpc() {
    let state = FakeState::default();
    let rpc = Arc::new(FakeRpc::default());
    let client = rest_client(&state).await.with_rpc(rpc.clone());

    let hits = client.search_properties(&pizza_query()).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Hawaii");

    let calls = rpc.calls.lock();
    let sent = pb::SearchRequest::decode(calls[0].1.as_slice()).unwrap();
    assert_eq!(sent.collection, "Pizza");
    assert_eq!(sent.limit, Some(2));
}

// ── Backup ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_backup_create_waits_for_success() {
    let state = FakeState::default();
    state.inner.lock().backup_script = VecDeque::from(["TRANSFERRING", "TRANSFERRED", "SUCCESS"]);
    let client = rest_client(&state).await;

    let resp = client
        .backup()
        .creator()
        .with_backend("filesystem")
        .with_backup_id("b1")
        .with_include_classes(["Pizza"])
        .with_wait_for_completion(true)
        .run()
        .await
        .unwrap();
    assert_eq!(resp.status, BackupStatus::Success);
    assert_eq!(resp.id, "b1");
    assert_eq!(state.inner.lock().backup_polls, 3);
}

#[tokio::test]
async fn test_backup_without_wait_returns_started() {
    let state = FakeState::default();
    let client = rest_client(&state).await;

    let resp = client
        .backup()
        .creator()
        .with_backend("filesystem")
        .with_backup_id("b2")
        .run()
        .await
        .unwrap();
    assert_eq!(resp.status, BackupStatus::Started);
    assert_eq!(state.inner.lock().backup_polls, 0);
}

#[tokio::test]
async fn test_backup_restore_reports_failure() {
    let state = FakeState::default();
    state.inner.lock().backup_script = VecDeque::from(["FAILED"]);
    let client = rest_client(&state).await;

    let resp = client
        .backup()
        .restorer()
        .with_backend("s3")
        .with_backup_id("b3")
        .with_wait_for_completion(true)
        .run()
        .await
        .unwrap();
    assert_eq!(resp.status, BackupStatus::Failed);
}

#[tokio::test]
async fn test_backup_wait_can_be_cancelled() {
    let state = FakeState::default();
    let client = rest_client(&state).await;
    let (handle, signal) = cancellation();

    let waiter = tokio::spawn(
        client
            .backup()
            .creator()
            .with_backend("filesystem")
            .with_backup_id("b4")
            .with_wait_for_completion(true)
            .with_cancel_signal(signal)
            .run(),
    );
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel();

    let result = waiter.await.unwrap();
    assert!(matches!(result, Err(ClientError::Cancelled)));
    assert!(state.inner.lock().backup_polls >= 1);
}

#[tokio::test]
async fn test_backup_requires_backend() {
    let state = FakeState::default();
    let client = rest_client(&state).await;
    let err = client
        .backup()
        .creator()
        .with_backup_id("b5")
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidConfig(_)));
}

// ── Concept extension ──────────────────────────────────────────────

#[tokio::test]
async fn test_concept_extension() {
    let state = FakeState::default();
    let client = rest_client(&state).await;

    let ext = ConceptExtension::new()
        .with_concept("foobarium")
        .with_definition("a fictional element")
        .with_weight(0.7)
        .unwrap();
    client.contextionary().extend(&ext).await.unwrap();

    let rec = state.inner.lock();
    assert_eq!(rec.extensions[0]["concept"], "foobarium");
    assert!((rec.extensions[0]["weight"].as_f64().unwrap() - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn test_concept_extension_rejected() {
    let state = FakeState::default();
    let client = rest_client(&state).await;

    let ext = ConceptExtension::new()
        .with_concept("fail")
        .with_definition("nonsense");
    let err = client.contextionary().extend(&ext).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
}
