use carelink_net::client::ApiClient;
use carelink_net::client::alerts::AlertSink;
use carelink_net::client::indicator::IndicatorSink;
use carelink_net::client::params::Params;
use carelink_net::config::{Config, Environment};
use carelink_net::error::ApiError;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Profile {
    id: i64,
    name: String,
}

fn config_for(server: &MockServer) -> Config {
    Config {
        environment: Environment::Development,
        development_url: server.uri(),
        production_url: String::new(),
        log_file_path: None,
        http_timeout_seconds: 20,
        max_connections_per_host: 3,
    }
}

#[derive(Default)]
struct CountingIndicator {
    begins: AtomicUsize,
    ends: AtomicUsize,
}

impl IndicatorSink for CountingIndicator {
    fn begin_busy(&self) {
        self.begins.fetch_add(1, Ordering::SeqCst);
    }

    fn end_busy(&self) {
        self.ends.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct RecordingAlert {
    shown: Mutex<Vec<(String, String)>>,
}

impl AlertSink for RecordingAlert {
    fn show_failure(&self, title: &str, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

/// Waits for any spawned fire-and-forget alert task to run
async fn settle_alerts() {
    tokio::time::sleep(Duration::from_millis(25)).await;
}

#[tokio::test]
async fn test_get_sends_default_headers_and_decodes_typed_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/profile"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 7,
                "name": "Mina"
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&config_for(&server)).unwrap();
    let profile: Profile = client.get("/v1/profile", None, None).await.unwrap();
    assert_eq!(
        profile,
        Profile {
            id: 7,
            name: "Mina".to_string()
        }
    );
}

#[tokio::test]
async fn test_caller_supplied_content_type_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/export"))
        .and(header("content-type", "application/vnd.carelink+json"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::CONTENT_TYPE,
        reqwest::header::HeaderValue::from_static("application/vnd.carelink+json"),
    );

    let client = ApiClient::new(&config_for(&server)).unwrap();
    let _: serde_json::Value = client.get("/v1/export", None, Some(headers)).await.unwrap();
}

#[tokio::test]
async fn test_query_parameters_flatten_lists_to_bracketed_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let params = Params::new()
        .with("status", "active")
        .with("tags", vec!["a", "b"]);
    let client = ApiClient::new(&config_for(&server)).unwrap();
    let _: serde_json::Value = client.get("/v1/items", Some(&params), None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let pairs: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("status".to_string(), "active".to_string()),
            ("tags[]".to_string(), "a".to_string()),
            ("tags[]".to_string(), "b".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/meals"))
        .and(body_json(serde_json::json!({
            "name": "lunch",
            "calories": 420,
            "tags": ["veggie", "soup"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "name": "lunch"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = Params::new()
        .with("name", "lunch")
        .with("calories", 420)
        .with("tags", vec!["veggie", "soup"]);

    let client = ApiClient::new(&config_for(&server)).unwrap();
    let created: Profile = client.post("/v1/meals", Some(&params), None).await.unwrap();
    assert_eq!(created.id, 1);
}

#[tokio::test]
async fn test_404_with_json_error_body_is_http_status_not_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/profile"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"error": "profile not found"})),
        )
        .mount(&server)
        .await;

    let alerts = Arc::new(RecordingAlert::default());
    let client = ApiClient::new(&config_for(&server))
        .unwrap()
        .with_alerts(alerts.clone());

    let result: Result<Profile, ApiError> = client.get("/v1/profile", None, None).await;
    let error = result.unwrap_err();
    assert_eq!(error.status(), Some(404));
    assert!(!error.is_decode());
    match &error {
        ApiError::HttpStatus { message, .. } => assert!(message.contains("profile not found")),
        other => panic!("expected HttpStatus, got {other:?}"),
    }

    settle_alerts().await;
    let shown = alerts.shown.lock().unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].0, "Network error (404)");
}

#[tokio::test]
async fn test_decode_failure_on_2xx_does_not_alert() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/profile"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"unexpected": true})),
        )
        .mount(&server)
        .await;

    let alerts = Arc::new(RecordingAlert::default());
    let client = ApiClient::new(&config_for(&server))
        .unwrap()
        .with_alerts(alerts.clone());

    let result: Result<Profile, ApiError> = client.get("/v1/profile", None, None).await;
    let error = result.unwrap_err();
    assert!(error.is_decode());
    match &error {
        ApiError::Decode { body, .. } => assert!(body.contains("unexpected")),
        other => panic!("expected Decode, got {other:?}"),
    }

    settle_alerts().await;
    assert!(alerts.shown.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_put_and_delete_validate_status_like_other_verbs() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/goals/3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/goals/3"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let client = ApiClient::new(&config_for(&server)).unwrap();

    let put_result: Result<serde_json::Value, ApiError> =
        client.put("/v1/goals/3", None, None).await;
    assert_eq!(put_result.unwrap_err().status(), Some(500));

    let delete_result: Result<serde_json::Value, ApiError> =
        client.delete("/v1/goals/3", None, None).await;
    assert_eq!(delete_result.unwrap_err().status(), Some(403));
}

#[tokio::test]
async fn test_timeout_yields_transport_failure_with_paired_busy_signals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"ok": true}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.http_timeout_seconds = 1;

    let indicator = Arc::new(CountingIndicator::default());
    let client = ApiClient::new(&config)
        .unwrap()
        .with_indicator(indicator.clone());

    let result: Result<serde_json::Value, ApiError> = client.get("/v1/slow", None, None).await;
    let error = result.unwrap_err();
    assert!(matches!(error, ApiError::NetworkTimeout { .. }));
    assert!(error.is_transport());

    assert_eq!(indicator.begins.load(Ordering::SeqCst), 1);
    assert_eq!(indicator.ends.load(Ordering::SeqCst), 1);
    assert!(!client.is_busy());
}

#[tokio::test]
async fn test_concurrent_requests_pair_busy_signals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"ok": true}))
                .set_delay(Duration::from_millis(150)),
        )
        .mount(&server)
        .await;

    let indicator = Arc::new(CountingIndicator::default());
    let client = ApiClient::new(&config_for(&server))
        .unwrap()
        .with_indicator(indicator.clone());

    let mut handles = Vec::new();
    for i in 0..4 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let path = format!("/v1/items/{i}");
            let result: Result<serde_json::Value, ApiError> = client.get(&path, None, None).await;
            result
        }));
    }

    // While requests overlap, the client reports busy
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(client.is_busy());

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert!(!client.is_busy());
    // The counted gauge forwards one begin/end pair per busy episode, and
    // every begin has a matching end
    let begins = indicator.begins.load(Ordering::SeqCst);
    let ends = indicator.ends.load(Ordering::SeqCst);
    assert_eq!(begins, ends);
    assert!(begins >= 1);
}

#[tokio::test]
async fn test_connection_failure_is_transport_kind() {
    // Nothing listens on this port
    let config = Config {
        environment: Environment::Development,
        development_url: "http://127.0.0.1:9".to_string(),
        production_url: String::new(),
        log_file_path: None,
        http_timeout_seconds: 2,
        max_connections_per_host: 3,
    };

    let alerts = Arc::new(RecordingAlert::default());
    let client = ApiClient::new(&config).unwrap().with_alerts(alerts.clone());

    let result: Result<serde_json::Value, ApiError> = client.get("/v1/profile", None, None).await;
    let error = result.unwrap_err();
    assert!(error.is_transport());
    assert_eq!(error.status(), None);

    settle_alerts().await;
    let shown = alerts.shown.lock().unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].0, "Network error");
}

#[tokio::test]
async fn test_fetch_raw_returns_bytes() {
    let server = MockServer::start().await;
    let payload: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00];
    Mock::given(method("GET"))
        .and(path("/v1/photos/1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload))
        .mount(&server)
        .await;

    let client = ApiClient::new(&config_for(&server)).unwrap();
    let bytes = client.fetch_raw("/v1/photos/1").await.unwrap();
    assert_eq!(bytes, payload);
}

#[tokio::test]
async fn test_fetch_raw_validates_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/photos/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ApiClient::new(&config_for(&server)).unwrap();
    let error = client.fetch_raw("/v1/photos/404").await.unwrap_err();
    assert_eq!(error.status(), Some(404));
}

#[tokio::test]
async fn test_empty_path_fails_without_touching_network() {
    let server = MockServer::start().await;
    let client = ApiClient::new(&config_for(&server)).unwrap();

    let result: Result<serde_json::Value, ApiError> = client.get("", None, None).await;
    assert!(matches!(result.unwrap_err(), ApiError::InvalidRequest(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
