use std::time::Duration;

use axum::{
    BoxError, Router, error_handling::HandleErrorLayer, extract::DefaultBodyLimit,
    http::StatusCode,
};
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::timeout::{TimeoutLayer, error::Elapsed};

use crate::infrastructure::settings::Settings;
use crate::presentation::app_error::AppError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct HttpLimits {
    pub(crate) body_limit_bytes: usize,
    pub(crate) concurrency_limit: usize,
    pub(crate) request_timeout: Duration,
}

impl From<&Settings> for HttpLimits {
    fn from(settings: &Settings) -> Self {
        Self {
            body_limit_bytes: settings.http_request_body_limit_bytes,
            concurrency_limit: settings.http_concurrency_limit,
            request_timeout: Duration::from_secs(settings.http_request_timeout_secs),
        }
    }
}

/// Превышение лимита тела ловит сам `AppJson` (413), истечение таймаута
/// превращается в 408 в `handle_layer_error`.
pub(crate) fn apply_limits(router: Router, limits: HttpLimits) -> Router {
    router
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_layer_error))
                .layer(GlobalConcurrencyLimitLayer::new(limits.concurrency_limit))
                .layer(TimeoutLayer::new(limits.request_timeout)),
        )
        .layer(DefaultBodyLimit::max(limits.body_limit_bytes))
}

async fn handle_layer_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::status(StatusCode::REQUEST_TIMEOUT, "Request timed out")
    } else {
        AppError::Internal(anyhow::anyhow!("unhandled middleware error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        routing::{get, post},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::{HttpLimits, apply_limits};
    use crate::presentation::extract::AppJson;

    fn limited_router(limits: HttpLimits) -> Router {
        let router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    "done"
                }),
            )
            .route(
                "/echo",
                post(|AppJson(value): AppJson<Value>| async move { value.to_string() }),
            );
        apply_limits(router, limits)
    }

    fn limits() -> HttpLimits {
        HttpLimits {
            body_limit_bytes: 32,
            concurrency_limit: 4,
            request_timeout: Duration::from_millis(50),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn slow_request_times_out_with_408() {
        let response = limited_router(limits())
            .oneshot(
                Request::builder()
                    .uri("/slow")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body_json(response).await["error"], "Request timed out");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_with_413() {
        let payload = format!(r#"{{"text":"{}"}}"#, "x".repeat(128));
        let response = limited_router(limits())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload))
                    .expect("request"),
            )
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn small_body_passes() {
        let response = limited_router(limits())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"a":1}"#))
                    .expect("request"),
            )
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
