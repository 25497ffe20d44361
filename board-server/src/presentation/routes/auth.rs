use axum::{Router, routing::post};

use crate::presentation::PostsState;
use crate::presentation::handlers::auth::{login, register};

pub(crate) fn router() -> Router<PostsState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
