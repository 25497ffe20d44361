use axum::Router;
use axum::routing::get;

use crate::presentation::BugsState;
use crate::presentation::handlers::bugs::{create_bug, delete_bug, get_bug, list_bugs, update_bug};

pub(crate) fn router() -> Router<BugsState> {
    Router::new()
        .route("/", get(list_bugs).post(create_bug))
        .route("/{id}", get(get_bug).put(update_bug).delete(delete_bug))
}
