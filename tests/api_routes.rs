use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use iris_api::{api::create_router, config::AppConfig, AppState};
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt;
use uuid::Uuid;

const TEST_KEY: &str = "test-secret";
const SPECIES: [&str; 3] = ["setosa", "versicolor", "virginica"];

struct TestContext {
    app: Router,
    model_dir: PathBuf,
}

impl TestContext {
    async fn new() -> Self {
        let model_dir = std::env::temp_dir().join(format!("iris-api-test-{}", Uuid::new_v4()));
        let config = AppConfig {
            app_name: "Iris Test API".to_string(),
            model_dir: model_dir.clone(),
            api_key: TEST_KEY.to_string(),
            ..AppConfig::default()
        };
        let state = AppState::open(config).await.expect("failed to open state");
        Self {
            app: create_router(state),
            model_dir,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request_builder = Request::builder().method(method).uri(uri);
        for (key, value) in headers {
            request_builder = request_builder.header(*key, *value);
        }

        let request = if let Some(payload) = body {
            request_builder
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("failed to build json request")
        } else {
            request_builder
                .body(Body::empty())
                .expect("failed to build empty request")
        };

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router request failed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, body)
    }

    async fn post_raw(
        &self,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut request_builder = Request::builder().method(Method::POST).uri(uri);
        if let Some(content_type) = content_type {
            request_builder = request_builder.header("content-type", content_type);
        }
        let request = request_builder
            .body(Body::from(body.to_string()))
            .expect("failed to build raw request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router request failed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn train(&self, payload: Value) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/model/train",
            &[("x-api-key", TEST_KEY)],
            Some(payload),
        )
        .await
    }

    async fn predict(&self, payload: Value) -> (StatusCode, Value) {
        self.send(Method::POST, "/model/predict", &[], Some(payload))
            .await
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.model_dir);
    }
}

fn setosa() -> Value {
    json!({
        "sepal_length": 5.1,
        "sepal_width": 3.5,
        "petal_length": 1.4,
        "petal_width": 0.2
    })
}

#[tokio::test]
async fn health_reports_app_name() {
    let ctx = TestContext::new().await;
    let (status, body) = ctx.send(Method::GET, "/health", &[], None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["app_name"], "Iris Test API");
}

#[tokio::test]
async fn untrained_status_and_predict() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.send(Method::GET, "/model/status", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_trained"], false);
    assert!(body["model_version"].is_null());
    assert!(body["trained_at"].is_null());
    assert!(body["accuracy"].is_null());

    let (status, body) = ctx.predict(setosa()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("not been trained"));
}

#[tokio::test]
async fn train_requires_matching_api_key() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx
        .send(Method::POST, "/model/train", &[], Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .send(
            Method::POST,
            "/model/train",
            &[("x-api-key", "wrong")],
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Invalid API key");

    // Rejected requests leave the model untouched
    let (_, body) = ctx.send(Method::GET, "/model/status", &[], None).await;
    assert_eq!(body["is_trained"], false);
}

#[tokio::test]
async fn train_then_predict_roundtrip() {
    let ctx = TestContext::new().await;

    let (status, trained) = ctx
        .train(json!({ "test_size": 0.2, "random_state": 42 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trained["message"], "Model trained successfully");
    assert_eq!(trained["samples_trained"], 120);
    assert_eq!(trained["samples_tested"], 30);
    let accuracy = trained["accuracy"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&accuracy));

    let (_, status_body) = ctx.send(Method::GET, "/model/status", &[], None).await;
    assert_eq!(status_body["is_trained"], true);
    assert_eq!(status_body["accuracy"].as_f64().unwrap(), accuracy);
    assert_eq!(status_body["trained_at"], trained["trained_at"]);

    let (status, predicted) = ctx.predict(setosa()).await;
    assert_eq!(status, StatusCode::OK);
    let species = predicted["predicted_species"].as_str().unwrap();
    assert!(SPECIES.contains(&species));
    assert_eq!(species, "setosa");
    let confidence = predicted["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
    assert_eq!(predicted["model_version"], status_body["model_version"]);
}

#[tokio::test]
async fn train_accepts_empty_body_with_defaults() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/model/train",
            &[("x-api-key", TEST_KEY)],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["samples_trained"], 120);
    assert_eq!(body["samples_tested"], 30);
}

#[tokio::test]
async fn train_rejects_out_of_range_parameters() {
    let ctx = TestContext::new().await;

    for payload in [
        json!({ "test_size": 0.0 }),
        json!({ "test_size": 1.0 }),
        json!({ "test_size": "big" }),
        json!({ "random_state": -1 }),
    ] {
        let (status, _) = ctx.train(payload.clone()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "payload {payload}");
    }

    let (_, body) = ctx.send(Method::GET, "/model/status", &[], None).await;
    assert_eq!(body["is_trained"], false);
}

#[tokio::test]
async fn predict_rejects_boundary_and_malformed_features() {
    let ctx = TestContext::new().await;
    let (status, _) = ctx.train(json!({})).await;
    assert_eq!(status, StatusCode::OK);

    for (field, value) in [("sepal_length", 0.0), ("petal_width", 10.0), ("sepal_width", -2.5)] {
        let mut payload = setosa();
        payload[field] = json!(value);
        let (status, body) = ctx.predict(payload).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains(field));
    }

    let (status, _) = ctx
        .predict(json!({ "sepal_length": 5.1, "sepal_width": 3.5 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn predict_rejects_unparsable_bodies_with_422() {
    let ctx = TestContext::new().await;

    // Body errors win over the missing model
    let (status, body) = ctx
        .post_raw("/model/predict", Some("application/json"), "{not json")
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, _) = ctx.train(json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let bodies = [
        (Some("application/json"), "{not json".to_string()),
        (
            Some("application/json"),
            r#"{"sepal_length": 1e999, "sepal_width": 3.5, "petal_length": 1.4, "petal_width": 0.2}"#
                .to_string(),
        ),
        (None, "{not json".to_string()),
        (Some("application/json"), String::new()),
    ];
    for (content_type, raw) in &bodies {
        let (status, body) = ctx.post_raw("/model/predict", *content_type, raw).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {raw}");
        assert!(body["detail"].is_string());
    }

    // A well-formed body without a content type is still accepted
    let (status, body) = ctx
        .post_raw("/model/predict", None, &setosa().to_string())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_species"], "setosa");
}

#[tokio::test]
async fn model_files_are_written_on_train() {
    let ctx = TestContext::new().await;
    let (status, _) = ctx.train(json!({ "random_state": 3 })).await;
    assert_eq!(status, StatusCode::OK);

    assert!(ctx.model_dir.join("iris_model.json").exists());
    assert!(ctx.model_dir.join("iris_metadata.json").exists());
}
