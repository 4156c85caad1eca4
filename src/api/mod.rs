//! HTTP surface: router assembly, shared state and middleware.
//!
//! Resource routes are nested under `AppConfig::api_prefix`; `/` and `/health`
//! stay at the root. Mutating routes take an [`auth::AuthUser`] and so require
//! HTTP Basic credentials.

/// HTTP Basic credentials extractor
pub mod auth;
/// `/customers` and subscription routes
pub mod customers;
/// Extractors that report rejections through the response envelope
pub mod extract;
/// `/plans` routes
pub mod plans;
/// Response envelope and error mapping
pub mod response;
/// `/` and `/health`
pub mod system;
/// `/transactions` and per-customer transaction routes
pub mod transactions;

use crate::{config::AppConfig, core::Services};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, warn};

/// State shared by every handler
///
/// The connection sits behind an `Arc` because `DatabaseConnection` is not
/// `Clone` when sea-orm's `mock` feature is enabled.
#[derive(Clone)]
pub struct AppState {
    db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            services: Arc::new(Services::default()),
        }
    }

    /// The shared connection pool.
    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Builds the application router with tracing and CORS applied.
pub fn build_router(state: AppState) -> Router {
    let resources = Router::new()
        .merge(customers::routes())
        .merge(plans::routes())
        .merge(transactions::routes());

    let prefix = state.config.api_prefix.trim_end_matches('/');
    let app = if prefix.is_empty() {
        system::routes().merge(resources)
    } else {
        system::routes().nest(prefix, resources)
    };

    // Request spans and the status/latency line are emitted at INFO.
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    app.layer(cors_layer(&state.config))
        .layer(trace)
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|e| warn!("Ignoring invalid CORS origin '{}': {}", origin, e))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const AUTH: &str = "Basic YWRtaW46c2VjcmV0";

    async fn app() -> Router {
        build_router(test_state().await.unwrap())
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
        auth: bool,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if auth {
            request = request.header(header::AUTHORIZATION, AUTH);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn prueba() -> Value {
        json!({
            "name": "Prueba",
            "email": "test@test.com",
            "age": 30,
            "description": "Test"
        })
    }

    #[tokio::test]
    async fn test_create_then_get_customer() {
        let app = app().await;
        let (status, body) = send(&app, Method::POST, "/api/v1/customers", Some(prueba()), true).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["message"], json!("Customer created successfully"));
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(&app, Method::GET, &format!("/api/v1/customers/{id}"), None, false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], json!("Prueba"));
    }

    #[tokio::test]
    async fn test_missing_customer_is_404() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/api/v1/customers/999999", None, false).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Customer not found"));
        assert_eq!(body["error_code"], json!("RESOURCE_NOT_FOUND"));
        assert_eq!(body["errors"], json!(["Customer with id '999999' not found"]));
    }

    #[tokio::test]
    async fn test_update_missing_customer_is_404() {
        let app = app().await;
        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/v1/customers/123",
            Some(json!({"name": "Prueba2"})),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Customer not found"));
    }

    #[tokio::test]
    async fn test_delete_missing_customer_is_404() {
        let app = app().await;
        let (status, body) = send(&app, Method::DELETE, "/api/v1/customers/123", None, true).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Customer not found"));
        assert_eq!(body["errors"], json!(["Customer with id '123' not found"]));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_409() {
        let app = app().await;
        send(&app, Method::POST, "/api/v1/customers", Some(prueba()), true).await;

        let mut other = prueba();
        other["name"] = json!("Another Name");
        let (status, body) = send(&app, Method::POST, "/api/v1/customers", Some(other), true).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error_code"], json!("RESOURCE_CONFLICT"));
    }

    #[tokio::test]
    async fn test_mutations_require_credentials() {
        let app = app().await;
        let (status, body) = send(&app, Method::POST, "/api/v1/customers", Some(prueba()), false).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], json!("UNAUTHORIZED"));

        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/api/v1/plans/1")
            .header(header::AUTHORIZATION, "Basic YWRtaW46d3Jvbmc=")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[tokio::test]
    async fn test_empty_patch_returns_unchanged_customer() {
        let app = app().await;
        let (_, created) = send(&app, Method::POST, "/api/v1/customers", Some(prueba()), true).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/customers/{id}"),
            Some(json!({})),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], created["data"]);
    }

    #[tokio::test]
    async fn test_invalid_bodies_are_422() {
        let app = app().await;
        let mut bad = prueba();
        bad["age"] = json!(0);
        let (status, body) = send(&app, Method::POST, "/api/v1/customers", Some(bad), true).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"], json!(["age: must be between 1 and 149"]));

        let (status, body) = send(&app, Method::POST, "/api/v1/plans", Some(json!({"name": 5})), true).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_code"], json!("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_subscriptions() {
        let app = app().await;
        let (_, customer) = send(&app, Method::POST, "/api/v1/customers", Some(prueba()), true).await;
        let customer_id = customer["data"]["id"].as_i64().unwrap();
        let plan = json!({"name": "Gold", "price": 1000, "description": "Gold plan"});
        let (status, plan) = send(&app, Method::POST, "/api/v1/plans", Some(plan), true).await;
        assert_eq!(status, StatusCode::CREATED);
        let plan_id = plan["data"]["id"].as_i64().unwrap();

        let uri = format!("/api/v1/customers/{customer_id}/plans/{plan_id}");
        let (status, body) = send(&app, Method::POST, &uri, None, true).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["plans"][0]["id"], json!(plan_id));
        assert_eq!(body["data"]["plans"][0]["status"], json!("active"));

        let (status, _) = send(&app, Method::POST, &uri, None, true).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let plans_uri = format!("/api/v1/customers/{customer_id}/plans?status=inactive");
        let (status, body) = send(&app, Method::GET, &plans_uri, None, false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));

        let (status, body) = send(&app, Method::DELETE, &uri, None, true).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["plans"], json!([]));
    }

    #[tokio::test]
    async fn test_pagination() {
        let app = app().await;
        for n in 1..=5 {
            let plan = json!({"name": format!("Plan {n}"), "description": "Paged"});
            send(&app, Method::POST, "/api/v1/plans", Some(plan), true).await;
        }

        let (status, body) = send(&app, Method::GET, "/api/v1/plans?skip=0&limit=2", None, false).await;
        assert_eq!(status, StatusCode::OK);
        let page = &body["data"];
        assert_eq!(page["total"], json!(5));
        assert_eq!(page["page"], json!(1));
        assert_eq!(page["size"], json!(2));
        assert_eq!(page["pages"], json!(3));
        assert_eq!(page["items"][0]["name"], json!("Plan 1"));
        assert_eq!(page["items"][1]["name"], json!("Plan 2"));

        let (status, _) = send(&app, Method::GET, "/api/v1/plans?limit=0", None, false).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_transaction_total_excludes_deleted() {
        let app = app().await;
        let (_, customer) = send(&app, Method::POST, "/api/v1/customers", Some(prueba()), true).await;
        let customer_id = customer["data"]["id"].as_i64().unwrap();

        let mut ids = Vec::new();
        for amount in [1500, 2500] {
            let tx = json!({"amount": amount, "description": "Fee", "customer_id": customer_id});
            let (status, body) = send(&app, Method::POST, "/api/v1/transactions", Some(tx), true).await;
            assert_eq!(status, StatusCode::CREATED);
            ids.push(body["data"]["id"].as_i64().unwrap());
        }

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/transactions/{}", ids[0]),
            None,
            true,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!({"deleted_id": ids[0]}));

        let total_uri = format!("/api/v1/customers/{customer_id}/transactions/total");
        let (status, body) = send(&app, Method::GET, &total_uri, None, false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            json!({"customer_id": customer_id, "total_amount": 2500, "currency": "cents"})
        );
    }

    #[tokio::test]
    async fn test_overflowing_total_is_409_not_a_panic() {
        let app = app().await;
        let (_, customer) = send(&app, Method::POST, "/api/v1/customers", Some(prueba()), true).await;
        let customer_id = customer["data"]["id"].as_i64().unwrap();
        for amount in [i64::MAX, 1] {
            let tx = json!({"amount": amount, "description": "Fee", "customer_id": customer_id});
            send(&app, Method::POST, "/api/v1/transactions", Some(tx), true).await;
        }

        let total_uri = format!("/api/v1/customers/{customer_id}/transactions/total");
        let (status, body) = send(&app, Method::GET, &total_uri, None, false).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error_code"], json!("RESOURCE_CONFLICT"));
    }

    #[tokio::test]
    async fn test_plan_filter_accepts_status_filter_alias() {
        let app = app().await;
        let (_, customer) = send(&app, Method::POST, "/api/v1/customers", Some(prueba()), true).await;
        let customer_id = customer["data"]["id"].as_i64().unwrap();
        let plan = json!({"name": "Gold", "description": "Gold plan"});
        let (_, plan) = send(&app, Method::POST, "/api/v1/plans", Some(plan), true).await;
        let plan_id = plan["data"]["id"].as_i64().unwrap();
        let uri = format!("/api/v1/customers/{customer_id}/plans/{plan_id}");
        send(&app, Method::POST, &uri, None, true).await;

        let inactive = format!("/api/v1/customers/{customer_id}/plans?status_filter=inactive");
        let (status, body) = send(&app, Method::GET, &inactive, None, false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));

        let active = format!("/api/v1/customers/{customer_id}/plans?status_filter=active");
        let (_, body) = send(&app, Method::GET, &active, None, false).await;
        assert_eq!(body["data"][0]["plan_id"], json!(plan_id));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_requests_are_logged_at_info() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .with_writer(logs.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = app().await;
        let (status, _) = send(&app, Method::GET, "/health", None, false).await;
        assert_eq!(status, StatusCode::OK);

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("finished processing request"), "{output}");
    }

    #[test]
    fn test_state_clones_over_mock_connection() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let state = AppState::new(db, test_config());
        let copy = state.clone();
        assert!(std::ptr::eq(state.db(), copy.db()));
    }

    #[tokio::test]
    async fn test_transaction_for_missing_customer_is_404() {
        let app = app().await;
        let tx = json!({"amount": 100, "description": "Fee", "customer_id": 42});
        let (status, body) = send(&app, Method::POST, "/api/v1/transactions", Some(tx), true).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Customer not found"));
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/health", None, false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], json!("healthy"));
        assert!(body["data"]["timestamp"].is_string());

        let (status, _) = send(&app, Method::GET, "/", None, false).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, body) = send(&app, Method::GET, "/", None, true).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"], json!("admin"));
    }
}
