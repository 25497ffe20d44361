use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::bug::{Bug, CreateBugRequest, UpdateBugRequest};
use crate::presentation::BugsState;
use crate::presentation::app_error::AppResult;
use crate::presentation::extract::{AppJson, AppPath};
use crate::presentation::handlers::DeletedDto;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateBugDto {
    #[serde(default)]
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    /// `open`, `in-progress` или `resolved`.
    pub(crate) status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateBugDto {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct BugDto {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) status: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<Bug> for BugDto {
    fn from(bug: Bug) -> Self {
        Self {
            id: bug.id,
            title: bug.title,
            description: bug.description,
            status: bug.status.to_string(),
            created_at: bug.created_at,
            updated_at: bug.updated_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/bugs",
    tag = "bugs",
    request_body = CreateBugDto,
    responses(
        (status = 201, description = "Bug created", body = BugDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_bug(
    State(state): State<BugsState>,
    AppJson(dto): AppJson<CreateBugDto>,
) -> AppResult<(StatusCode, Json<BugDto>)> {
    let req = CreateBugRequest {
        title: dto.title,
        description: dto.description,
        status: dto.status,
    };

    let bug = state.bug_service.create_bug(req).await?;
    Ok((StatusCode::CREATED, Json(bug.into())))
}

#[utoipa::path(
    get,
    path = "/api/bugs",
    tag = "bugs",
    responses(
        (status = 200, description = "All bugs", body = [BugDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_bugs(State(state): State<BugsState>) -> AppResult<Json<Vec<BugDto>>> {
    let bugs = state.bug_service.list_bugs().await?;
    Ok(Json(bugs.into_iter().map(BugDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/bugs/{id}",
    tag = "bugs",
    params(
        ("id" = String, Path, description = "Bug id (UUID)")
    ),
    responses(
        (status = 200, description = "Bug found", body = BugDto),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Bug not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_bug(
    State(state): State<BugsState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<BugDto>> {
    let bug = state.bug_service.get_bug(&id).await?;
    Ok(Json(bug.into()))
}

#[utoipa::path(
    put,
    path = "/api/bugs/{id}",
    tag = "bugs",
    params(
        ("id" = String, Path, description = "Bug id (UUID)")
    ),
    request_body = UpdateBugDto,
    responses(
        (status = 200, description = "Bug updated", body = BugDto),
        (status = 400, description = "Validation error or invalid id"),
        (status = 404, description = "Bug not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_bug(
    State(state): State<BugsState>,
    AppPath(id): AppPath<String>,
    AppJson(dto): AppJson<UpdateBugDto>,
) -> AppResult<Json<BugDto>> {
    let req = UpdateBugRequest {
        title: dto.title,
        description: dto.description,
        status: dto.status,
    };

    let bug = state.bug_service.update_bug(&id, req).await?;
    Ok(Json(bug.into()))
}

#[utoipa::path(
    delete,
    path = "/api/bugs/{id}",
    tag = "bugs",
    params(
        ("id" = String, Path, description = "Bug id (UUID)")
    ),
    responses(
        (status = 200, description = "Bug deleted", body = DeletedDto),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Bug not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_bug(
    State(state): State<BugsState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<DeletedDto>> {
    state.bug_service.delete_bug(&id).await?;
    Ok(Json(DeletedDto::ok()))
}
