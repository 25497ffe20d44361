use std::sync::Arc;

use sqlx::PgPool;

use crate::application::auth_service::AuthService;
use crate::application::bug_service::BugService;
use crate::application::post_service::PostService;
use crate::data::repositories::memory::bug_repository::InMemoryBugRepository;
use crate::data::repositories::memory::post_repository::InMemoryPostRepository;
use crate::data::repositories::memory::user_repository::InMemoryUserRepository;
use crate::data::repositories::postgres::bug_repository::PostgresBugRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::infrastructure::jwt::TokenService;

pub(crate) mod app_error;
pub(crate) mod extract;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

/// Состояние сервиса постов.
#[derive(Clone)]
pub(crate) struct PostsState {
    pub(crate) auth_service: Arc<AuthService>,
    pub(crate) post_service: Arc<PostService>,
    pub(crate) tokens: Arc<dyn TokenService>,
}

impl PostsState {
    pub(crate) fn postgres(pool: PgPool, tokens: Arc<dyn TokenService>) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                tokens.clone(),
            )),
            post_service: Arc::new(PostService::new(Arc::new(PostgresPostRepository::new(
                pool,
            )))),
            tokens,
        }
    }

    pub(crate) fn in_memory(tokens: Arc<dyn TokenService>) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(
                Arc::new(InMemoryUserRepository::new()),
                tokens.clone(),
            )),
            post_service: Arc::new(PostService::new(Arc::new(InMemoryPostRepository::new()))),
            tokens,
        }
    }
}

/// Состояние баг-трекера. Токенов здесь нет: все маршруты открыты.
#[derive(Clone)]
pub(crate) struct BugsState {
    pub(crate) bug_service: Arc<BugService>,
}

impl BugsState {
    pub(crate) fn postgres(pool: PgPool) -> Self {
        Self {
            bug_service: Arc::new(BugService::new(Arc::new(PostgresBugRepository::new(pool)))),
        }
    }

    pub(crate) fn in_memory() -> Self {
        Self {
            bug_service: Arc::new(BugService::new(Arc::new(InMemoryBugRepository::new()))),
        }
    }
}
