// End-to-end checks of the HTTP control surface against a real listener.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use googly_star::StarStore;
use googly_star::sim::{SimConfig, Simulation};
use serde_json::{Value, json};

// Start a server on an ephemeral port and return its base URL and store.
async fn spawn_server() -> (String, StarStore) {
    let store = StarStore::from_simulation(Simulation::with_seed(SimConfig::default(), 11));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    let server_store = store.clone();
    tokio::spawn(async move {
        googly_star::api::serve(listener, server_store, std::future::pending())
            .await
            .expect("server failed");
    });
    (format!("http://{addr}"), store)
}

async fn manipulate(base_url: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base_url}/api/manipulate_star"))
        .json(&body)
        .send()
        .await
        .expect("request should succeed")
}

#[tokio::test]
async fn test_health() {
    let (base_url, store) = spawn_server().await;
    let res = reqwest::get(format!("{base_url}/health")).await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["running"], true);

    store.set_running(false);
    let body: Value = reqwest::get(format!("{base_url}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["running"], false);
}

#[tokio::test]
async fn test_manipulate_then_status() {
    let (base_url, _store) = spawn_server().await;

    let res = manipulate(&base_url, json!({"action": "drill"})).await;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["action"], "drill");

    let res = manipulate(
        &base_url,
        json!({"action": "color", "parameters": {"color": "00ff00"}}),
    )
    .await;
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let status: Value = reqwest::get(format!("{base_url}/api/status"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["effect_active"], "drill");
    assert_eq!(status["color"], "#00ff00");
    assert_eq!(status["velocity"]["vx"], 0.0);
    assert_eq!(status["display_size"]["width"], 1280.0);
}

#[tokio::test]
async fn test_bad_requests_leave_state_untouched() {
    let (base_url, store) = spawn_server().await;
    let before = store.status();

    let res = manipulate(&base_url, json!({"parameters": {}})).await;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "missing action parameter");

    let res = manipulate(&base_url, json!({"action": "teleport"})).await;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    let res = manipulate(
        &base_url,
        json!({"action": "opacity", "parameters": {"opacity": "lots"}}),
    )
    .await;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    // Wrong-typed action is an unknown action, still JSON
    let res = manipulate(&base_url, json!({"action": 5})).await;
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("invalid action `5`"));

    // Undecodable body
    let res = reqwest::Client::new()
        .post(format!("{base_url}/api/manipulate_star"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("malformed request body"));

    assert_eq!(store.status(), before);
}

#[tokio::test]
async fn test_null_parameters_use_defaults() {
    let (base_url, store) = spawn_server().await;
    let res = manipulate(&base_url, json!({"action": "shrink", "parameters": null})).await;
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["action"], "shrink");
    assert_eq!(body["parameters"], json!({}));
    assert_eq!(store.status().effect_active.as_deref(), Some("shrink"));
}

#[tokio::test]
async fn test_cross_origin_requests_allowed() {
    let (base_url, _store) = spawn_server().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{base_url}/api/status"))
        .header("origin", "http://example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");

    let res = client
        .request(reqwest::Method::OPTIONS, format!("{base_url}/api/manipulate_star"))
        .header("origin", "http://example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());
    assert!(res.headers().contains_key("access-control-allow-origin"));
    assert!(res.headers().contains_key("access-control-allow-methods"));
}

#[tokio::test]
async fn test_server_exit_raises_stop() {
    let store = StarStore::from_simulation(Simulation::with_seed(SimConfig::default(), 11));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let stop = Arc::new(AtomicBool::new(false));

    googly_star::api::serve_with_stop(listener, store, async {}, stop.clone())
        .await
        .expect("server failed");
    assert!(stop.load(Ordering::Acquire));
}

#[tokio::test]
async fn test_reset_endpoint() {
    let (base_url, store) = spawn_server().await;
    manipulate(
        &base_url,
        json!({"action": "opacity", "parameters": {"opacity": -3}}),
    )
    .await;
    assert_eq!(store.status().opacity, 0.0);
    manipulate(&base_url, json!({"action": "shrink"})).await;
    assert_eq!(store.status().effect_active.as_deref(), Some("shrink"));

    let res = reqwest::Client::new()
        .post(format!("{base_url}/api/reset"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["action"], "reset");
    let status = store.status();
    assert_eq!(status.effect_active, None);
    assert_eq!(status.opacity, 1.0);
}
