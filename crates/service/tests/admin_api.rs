//! Integration tests for the admin API: node and root configuration plus
//! path resolution.

use axum::body::Body;
use axum::routing::get;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use service::ServiceState;

/// Router as served by the daemon, over an in-memory database.
async fn test_app() -> Router {
    let state = ServiceState::ephemeral().await.unwrap();
    Router::new().nest("/api", service::http::api::router(state))
}

/// A live loopback endpoint standing in for a storage node's API port.
async fn spawn_fake_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/", get(|| async { "ok" }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&bytes).to_string();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value, text)
}

async fn create_node(app: &Router, name: &str, endpoint: &str) -> (StatusCode, Value, String) {
    post_json(
        app,
        "/api/v0/node",
        json!({
            "name": name,
            "endpoint": endpoint,
            "access_key_id": "AK",
            "secret_access_key": "SK",
        }),
    )
    .await
}

async fn create_root(
    app: &Router,
    node: &str,
    bucket: &str,
    base_path: &str,
) -> (StatusCode, Value, String) {
    post_json(
        app,
        "/api/v0/root",
        json!({
            "node_name": node,
            "root_type": "public",
            "bucket": bucket,
            "base_path": base_path,
        }),
    )
    .await
}

#[tokio::test]
async fn test_node_create_and_duplicate_name() {
    let app = test_app().await;
    let endpoint = spawn_fake_endpoint().await;

    let (status, body, _) = create_node(&app, "n1", &endpoint).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["node"]["name"], "n1");
    // Credentials never come back out.
    assert!(body["node"].get("access_key_id").is_none());
    assert!(body["node"].get("secret_access_key").is_none());

    let (status, _, text) = create_node(&app, "n1", &endpoint).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(text.contains("duplicate node name"));

    // The original node is still listed, unmodified.
    let (status, body, _) = post_json(&app, "/api/v0/node/list", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"].as_array().unwrap().len(), 1);
    assert_eq!(body["nodes"][0]["endpoint"].as_str().unwrap(), format!("{}/", endpoint));
}

#[tokio::test]
async fn test_node_create_unreachable_endpoint() {
    let app = test_app().await;

    // Port 1 on loopback has nothing listening.
    let (status, _, text) = create_node(&app, "n1", "http://127.0.0.1:1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(text.contains("unreachable endpoint"));

    let (_, body, _) = post_json(&app, "/api/v0/node/list", json!({})).await;
    assert!(body["nodes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_root_create_unknown_node_and_conflicts() {
    let app = test_app().await;
    let endpoint = spawn_fake_endpoint().await;
    create_node(&app, "nodeA", &endpoint).await;

    let (status, _, text) = create_root(&app, "missing", "bucketA", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(text.contains("unknown node"));

    let (status, body, _) = create_root(&app, "nodeA", "bucketA", "public/").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["root"]["base_path"], "public/");

    // Same base path on the same node and bucket must conflict.
    let (status, _, text) = create_root(&app, "nodeA", "bucketA", "public/").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(text.contains("conflicts"));

    // The catch-all coexists; a nested non-empty prefix does not.
    let (status, _, _) = create_root(&app, "nodeA", "bucketA", "").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _, _) = create_root(&app, "nodeA", "bucketA", "public/docs/").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_resolve_longest_prefix_match() {
    let app = test_app().await;
    let endpoint = spawn_fake_endpoint().await;
    create_node(&app, "nodeA", &endpoint).await;
    create_root(&app, "nodeA", "bucketA", "").await;
    create_root(&app, "nodeA", "bucketA", "public/").await;

    let (status, body, _) =
        post_json(&app, "/api/v0/storage/resolve", json!({"path": "public/file.txt"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["base_path"], "public/");
    assert_eq!(body["sub_path"], "file.txt");
    assert_eq!(body["object_key"], "public/file.txt");

    // Outside the carve-out, the catch-all wins.
    let (status, body, _) =
        post_json(&app, "/api/v0/storage/resolve", json!({"path": "misc/file.txt"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["base_path"], "");
    assert_eq!(body["sub_path"], "misc/file.txt");
}

#[tokio::test]
async fn test_resolve_admin_scenario() {
    let app = test_app().await;
    let endpoint = spawn_fake_endpoint().await;
    create_node(&app, "n1", &endpoint).await;
    create_root(&app, "n1", "bucket1", "shared/").await;

    let (status, body, _) =
        post_json(&app, "/api/v0/storage/resolve", json!({"path": "shared/doc.txt"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["node"], "n1");
    assert_eq!(body["bucket"], "bucket1");
    assert_eq!(body["sub_path"], "doc.txt");

    let (status, _, text) =
        post_json(&app, "/api/v0/storage/resolve", json!({"path": "other/doc.txt"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(text.contains("no root matches"));
}

#[tokio::test]
async fn test_root_delete_frees_the_prefix() {
    let app = test_app().await;
    let endpoint = spawn_fake_endpoint().await;
    create_node(&app, "n1", &endpoint).await;
    let (_, body, _) = create_root(&app, "n1", "bucket1", "shared/").await;
    let root_id = body["root"]["id"].as_str().unwrap().to_string();

    let (status, _, _) =
        post_json(&app, "/api/v0/root/delete", json!({"id": root_id})).await;
    assert_eq!(status, StatusCode::OK);

    // Gone from resolution immediately.
    let (status, _, _) =
        post_json(&app, "/api/v0/storage/resolve", json!({"path": "shared/doc.txt"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // And the prefix can be re-registered.
    let (status, _, _) = create_root(&app, "n1", "bucket1", "shared/").await;
    assert_eq!(status, StatusCode::CREATED);
}
