use axum::Router;
use axum::routing::get;

use super::handlers::health::healthz;
use super::{BugsState, PostsState};

pub(crate) mod auth;
pub(crate) mod bugs;
pub(crate) mod posts;

pub(crate) fn posts_router(state: PostsState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api/auth", auth::router())
        .nest("/api/posts", posts::router(state.clone()))
        .with_state(state)
}

pub(crate) fn bugs_router(state: BugsState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api/bugs", bugs::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::{bugs_router, posts_router};
    use crate::domain::identity::Identity;
    use crate::infrastructure::jwt::{JwtService, TokenService};
    use crate::presentation::{BugsState, PostsState};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    struct PostsApp {
        router: Router,
        jwt: Arc<JwtService>,
    }

    impl PostsApp {
        fn new() -> Self {
            let jwt = Arc::new(JwtService::new(SECRET));
            let router = posts_router(PostsState::in_memory(jwt.clone()));
            Self { router, jwt }
        }

        fn token_for(&self, who: &str) -> String {
            self.jwt.issue(&Identity::new(who)).expect("issue token")
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            send(&self.router, method, uri, token, body).await
        }

        async fn create_post(&self, token: &str, title: &str, category: Option<&str>) -> Value {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/posts",
                    Some(token),
                    Some(json!({ "title": title, "content": "body", "category": category })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
            body
        }
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        send_raw(router, request).await
    }

    async fn send_raw(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn healthz_answers_on_both_apps() {
        let app = PostsApp::new();
        let (status, body) = app.send(Method::GET, "/healthz", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));

        let bugs = bugs_router(BugsState::in_memory());
        let (status, body) = send(&bugs, Method::GET, "/healthz", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn create_without_token_is_not_authenticated() {
        let app = PostsApp::new();
        let (status, body) = app
            .send(
                Method::POST,
                "/api/posts",
                None,
                Some(json!({ "title": "T", "content": "C" })),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Not authenticated" }));

        let (_, list) = app.send(Method::GET, "/api/posts", None, None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn create_with_invalid_token_is_rejected() {
        let app = PostsApp::new();
        let (status, body) = app
            .send(
                Method::POST,
                "/api/posts",
                Some("not-a-jwt"),
                Some(json!({ "title": "T", "content": "C" })),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Invalid token" }));
    }

    #[tokio::test]
    async fn ownership_flow_end_to_end() {
        let app = PostsApp::new();
        let alice = app.token_for("alice");
        let bob = app.token_for("bob");

        let created = app.create_post(&alice, "Hello World", None).await;
        assert_eq!(created["author"], "alice");
        assert_eq!(created["slug"], "hello-world");
        let uri = format!("/api/posts/{}", created["id"].as_str().expect("id"));

        let (status, body) = app
            .send(
                Method::PUT,
                &uri,
                Some(&bob),
                Some(json!({ "title": "Hijacked" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Forbidden" }));

        let (_, unchanged) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(unchanged["title"], "Hello World");

        let (status, updated) = app
            .send(
                Method::PUT,
                &uri,
                Some(&alice),
                Some(json!({ "title": "Second Take" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Second Take");
        assert_eq!(updated["slug"], "second-take");
        assert_eq!(updated["content"], "body");

        let (status, body) = app.send(Method::DELETE, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Forbidden" }));

        let (status, body) = app.send(Method::DELETE, &uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (status, body) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn missing_post_is_404_for_any_caller() {
        let app = PostsApp::new();
        let bob = app.token_for("bob");
        let uri = format!("/api/posts/{}", Uuid::new_v4());

        let (status, body) = app
            .send(Method::PUT, &uri, Some(&bob), Some(json!({ "title": "x" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not found" }));

        let (status, _) = app.send(Method::DELETE, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request() {
        let app = PostsApp::new();
        let alice = app.token_for("alice");

        let (status, body) = app.send(Method::GET, "/api/posts/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid id" }));

        let (status, body) = app
            .send(Method::DELETE, "/api/posts/abc", Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid id" }));
    }

    #[tokio::test]
    async fn update_cannot_change_author() {
        let app = PostsApp::new();
        let alice = app.token_for("alice");
        let created = app.create_post(&alice, "Mine", None).await;
        let uri = format!("/api/posts/{}", created["id"].as_str().expect("id"));

        let (status, updated) = app
            .send(
                Method::PUT,
                &uri,
                Some(&alice),
                Some(json!({ "author": "mallory", "content": "edited" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["author"], "alice");
        assert_eq!(updated["content"], "edited");

        let mallory = app.token_for("mallory");
        let (status, _) = app.send(Method::DELETE, &uri, Some(&mallory), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn create_requires_title_and_content() {
        let app = PostsApp::new();
        let alice = app.token_for("alice");

        let (status, body) = app
            .send(
                Method::POST,
                "/api/posts",
                Some(&alice),
                Some(json!({ "content": "no title" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Title and content are required" }));
    }

    #[tokio::test]
    async fn malformed_json_goes_through_normalizer() {
        let app = PostsApp::new();
        let alice = app.token_for("alice");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/posts")
            .header(header::AUTHORIZATION, format!("Bearer {alice}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\": "))
            .expect("request");
        let (status, body) = send_raw(&app.router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let app = PostsApp::new();
        let alice = app.token_for("alice");
        for i in 0..3 {
            app.create_post(&alice, &format!("Rust {i}"), Some("rust"))
                .await;
        }
        app.create_post(&alice, "Cooking", Some("food")).await;

        let (status, all) = app.send(Method::GET, "/api/posts", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().expect("array").len(), 4);

        let (_, rust) = app
            .send(Method::GET, "/api/posts?category=rust", None, None)
            .await;
        let titles: Vec<&str> = rust
            .as_array()
            .expect("array")
            .iter()
            .map(|post| post["title"].as_str().expect("title"))
            .collect();
        assert_eq!(titles, ["Rust 0", "Rust 1", "Rust 2"]);

        let (_, page) = app
            .send(
                Method::GET,
                "/api/posts?category=rust&page=2&limit=2",
                None,
                None,
            )
            .await;
        assert_eq!(page.as_array().expect("array").len(), 1);
        assert_eq!(page[0]["title"], "Rust 2");
    }

    #[tokio::test]
    async fn list_rejects_bad_query() {
        let app = PostsApp::new();

        let (status, body) = app
            .send(Method::GET, "/api/posts?limit=0", None, None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "limit must be in 1..=100");

        let (status, body) = app
            .send(Method::GET, "/api/posts?page=abc", None, None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn register_login_and_post_with_issued_token() {
        let app = PostsApp::new();
        let register = json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "correct horse"
        });

        let (status, registered) = app
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(register.clone()),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(registered["access_token"].is_string());

        let (status, body) = app
            .send(Method::POST, "/api/auth/register", None, Some(register))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "Duplicate key error" }));

        let (status, body) = app
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": "alice", "password": "wrong password" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Invalid credentials" }));

        let (status, logged_in) = app
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": "alice", "password": "correct horse" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let token = logged_in["access_token"].as_str().expect("token");

        let created = app.create_post(token, "From login", None).await;
        assert_eq!(created["author"], registered["user"]["id"]);
    }

    #[tokio::test]
    async fn bug_tracker_is_open() {
        let bugs = bugs_router(BugsState::in_memory());

        let (status, created) = send(
            &bugs,
            Method::POST,
            "/api/bugs",
            None,
            Some(json!({ "title": "Crash on save", "description": "stack overflow" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "open");
        let uri = format!("/api/bugs/{}", created["id"].as_str().expect("id"));

        let (status, updated) = send(
            &bugs,
            Method::PUT,
            &uri,
            None,
            Some(json!({ "status": "in-progress" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "in-progress");
        assert_eq!(updated["title"], "Crash on save");

        let (status, list) = send(&bugs, Method::GET, "/api/bugs", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().expect("array").len(), 1);

        let (status, body) = send(&bugs, Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (status, _) = send(&bugs, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bug_validation_and_ids() {
        let bugs = bugs_router(BugsState::in_memory());

        let (status, _) = send(
            &bugs,
            Method::POST,
            "/api/bugs",
            None,
            Some(json!({ "title": "x", "status": "done" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &bugs,
            Method::POST,
            "/api/bugs",
            None,
            Some(json!({ "description": "no title" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&bugs, Method::GET, "/api/bugs/42", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid id" }));

        let missing = format!("/api/bugs/{}", Uuid::new_v4());
        let (status, _) = send(&bugs, Method::DELETE, &missing, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
