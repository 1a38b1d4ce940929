use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{calendar, emails, health};
use crate::pipeline::Pipeline;

pub fn api_routes() -> Router<Arc<Pipeline>> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))

        // Trigger routes, reachable with either method
        .route(
            "/process_emails",
            get(emails::process_emails).post(emails::process_emails),
        )
        .route(
            "/process_calendar_events",
            get(calendar::process_calendar_events).post(calendar::process_calendar_events),
        )
}

pub fn create_app(pipeline: Arc<Pipeline>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api_routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    async fn call(app: Router, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn app(fixtures: Fixtures, generator: EchoGenerator, dir: &tempfile::TempDir) -> Router {
        let pipeline = pipeline(
            fixtures,
            Arc::new(MemoryStore::default()),
            generator,
            dir.path().join("notifications.csv"),
        );
        create_app(Arc::new(pipeline))
    }

    fn fixtures() -> Fixtures {
        Fixtures {
            messages: vec![raw_message(Some("Trip"), "a@x.com", "Flight info")],
            events: vec![raw_event("Standup")],
            fail_fetch: false,
        }
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = call(
            app(fixtures(), EchoGenerator { fail: false }, &dir),
            Method::GET,
            "/health",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_process_emails_accepts_get_and_post() {
        let dir = tempfile::tempdir().unwrap();

        for method in [Method::GET, Method::POST] {
            let (status, body) = call(
                app(fixtures(), EchoGenerator { fail: false }, &dir),
                method,
                "/process_emails",
            )
            .await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                body["message"],
                "Emails processed and notifications generated successfully."
            );
        }
    }

    #[tokio::test]
    async fn test_process_emails_failure_is_generic_500() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = call(
            app(fixtures(), EchoGenerator { fail: true }, &dir),
            Method::POST,
            "/process_emails",
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Failed to generate notifications"));
    }

    #[tokio::test]
    async fn test_process_calendar_events_returns_events() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = call(
            app(fixtures(), EchoGenerator { fail: false }, &dir),
            Method::GET,
            "/process_calendar_events",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "Calendar events retrieved and saved successfully."
        );
        assert_eq!(body["events"][0]["Summary"], "Standup");
        assert_eq!(body["events"][0]["Location"], "No Location");
    }

    #[tokio::test]
    async fn test_unknown_method_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = call(
            app(fixtures(), EchoGenerator { fail: false }, &dir),
            Method::DELETE,
            "/process_emails",
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
