use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::domain::identity::Identity;
use crate::infrastructure::jwt::TokenService;
use crate::presentation::PostsState;
use crate::presentation::app_error::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Текущий вызывающий, восстановленный из проверенного токена.
#[derive(Debug, Clone)]
pub(crate) struct CurrentCaller {
    pub(crate) identity: Identity,
}

impl<S> FromRequestParts<S> for CurrentCaller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentCaller>()
            .cloned()
            .ok_or(AppError::NotAuthenticated)
    }
}

/// Схема сравнивается буквально: `bearer x` или `Basic x` это
/// `NotAuthenticated`, а не `InvalidToken`.
pub(crate) fn authenticate(
    headers: &HeaderMap,
    tokens: &dyn TokenService,
) -> Result<CurrentCaller, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::NotAuthenticated)?;

    let credentials = auth_header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AppError::NotAuthenticated)?;
    let token = credentials.split(' ').next().unwrap_or_default();

    let identity = tokens.verify(token).map_err(|err| {
        debug!(error = %err, "bearer token rejected");
        AppError::InvalidToken
    })?;

    Ok(CurrentCaller { identity })
}

pub(crate) async fn require_auth(
    State(state): State<PostsState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let caller = authenticate(request.headers(), state.tokens.as_ref())?;
    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}
