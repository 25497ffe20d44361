use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::database::{create_pool, run_migrations};
use crate::infrastructure::jwt::{JwtService, TokenService};
use crate::infrastructure::settings::Settings;
use crate::presentation::middleware::cors::apply_cors;
use crate::presentation::middleware::limits::{HttpLimits, apply_limits};
use crate::presentation::middleware::trace::apply_trace;
use crate::presentation::openapi::{BugsApiDoc, PostsApiDoc};
use crate::presentation::routes::{bugs_router, posts_router};
use crate::presentation::{BugsState, PostsState};

/// Сервис постов: регистрация, вход и CRUD постов с проверкой владельца.
pub async fn run_posts(settings: Settings) -> Result<()> {
    let tokens: Arc<dyn TokenService> = Arc::new(JwtService::new(&settings.jwt_secret));

    let state = match settings.database_url.as_deref() {
        Some(url) => PostsState::postgres(connect(url).await?, tokens),
        None => PostsState::in_memory(tokens),
    };

    let app = posts_app(state, &settings)?;
    serve(app, &settings.http_addr, "posts-api").await
}

/// Баг-трекер без аутентификации.
pub async fn run_bugs(settings: Settings) -> Result<()> {
    let state = match settings.database_url.as_deref() {
        Some(url) => BugsState::postgres(connect(url).await?),
        None => BugsState::in_memory(),
    };

    let app = bugs_app(state, &settings)?;
    serve(app, &settings.http_addr, "bugs-api").await
}

fn posts_app(state: PostsState, settings: &Settings) -> Result<Router> {
    build_app(posts_router(state), PostsApiDoc::openapi(), settings)
}

fn bugs_app(state: BugsState, settings: &Settings) -> Result<Router> {
    build_app(bugs_router(state), BugsApiDoc::openapi(), settings)
}

fn build_app(
    router: Router,
    openapi: utoipa::openapi::OpenApi,
    settings: &Settings,
) -> Result<Router> {
    let app = router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));
    let app = apply_limits(app, HttpLimits::from(settings));
    let app = apply_trace(app);
    apply_cors(app, &settings.cors_origins)
}

async fn connect(url: &str) -> Result<sqlx::PgPool> {
    let pool = create_pool(url).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

async fn serve(app: Router, addr: &str, name: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(service = name, "HTTP server listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!(service = name, "HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
