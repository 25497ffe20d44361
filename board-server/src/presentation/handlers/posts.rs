use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest};
use crate::presentation::PostsState;
use crate::presentation::app_error::AppResult;
use crate::presentation::extract::{AppJson, AppPath, AppQuery};
use crate::presentation::handlers::DeletedDto;
use crate::presentation::middleware::auth::CurrentCaller;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

/// Отсутствующие поля десериализуются в пустые строки и отсекаются
/// валидацией с одним общим сообщением.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title and content are required"))]
    pub(crate) title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Title and content are required"))]
    pub(crate) content: String,
    pub(crate) category: Option<String>,
}

/// Неизвестные поля (в том числе `author`) молча отбрасываются.
/// Поля проверяет сервис, уже после проверки владельца.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdatePostDto {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct PostsQuery {
    /// Фильтр по категории.
    pub(crate) category: Option<String>,
    /// Номер страницы, начиная с 1.
    #[validate(range(min = 1, message = "page must be >= 1"))]
    pub(crate) page: Option<u32>,
    /// Размер страницы, 1..=100.
    #[validate(range(min = 1, max = 100, message = "limit must be in 1..=100"))]
    pub(crate) limit: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author: String,
    pub(crate) category: Option<String>,
    pub(crate) slug: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author: post.author.into_inner(),
            category: post.category,
            slug: post.slug,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(PostsQuery),
    responses(
        (status = 200, description = "Posts listed", body = [PostDto]),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<PostsState>,
    AppQuery(query): AppQuery<PostsQuery>,
) -> AppResult<Json<Vec<PostDto>>> {
    query.validate()?;
    let page = query.page.unwrap_or(DEFAULT_PAGE);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    let posts = state
        .post_service
        .list_posts(query.category, page, limit)
        .await?;

    Ok(Json(posts.into_iter().map(PostDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = String, Path, description = "Post id (UUID)")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<PostsState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<PostDto>> {
    let post = state.post_service.get_post(&id).await?;
    Ok(Json(post.into()))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated / Invalid token"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<PostsState>,
    caller: CurrentCaller,
    AppJson(dto): AppJson<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let req = CreatePostRequest {
        title: dto.title,
        content: dto.content,
        category: dto.category,
    };

    let post = state.post_service.create_post(caller.identity, req).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Post id (UUID)")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error or invalid id"),
        (status = 401, description = "Not authenticated / Invalid token"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<PostsState>,
    caller: CurrentCaller,
    AppPath(id): AppPath<String>,
    AppJson(dto): AppJson<UpdatePostDto>,
) -> AppResult<Json<PostDto>> {
    let req = UpdatePostRequest {
        title: dto.title,
        content: dto.content,
        category: dto.category,
    };

    let post = state
        .post_service
        .update_post(&caller.identity, &id, req)
        .await?;
    Ok(Json(post.into()))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = String, Path, description = "Post id (UUID)")
    ),
    responses(
        (status = 200, description = "Post deleted", body = DeletedDto),
        (status = 400, description = "Invalid id"),
        (status = 401, description = "Not authenticated / Invalid token"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<PostsState>,
    caller: CurrentCaller,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<DeletedDto>> {
    state.post_service.delete_post(&caller.identity, &id).await?;
    Ok(Json(DeletedDto::ok()))
}
