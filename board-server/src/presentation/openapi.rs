use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::DeletedDto;
use crate::presentation::handlers::auth::{AuthResponseDto, LoginDto, RegisterDto, UserDto};
use crate::presentation::handlers::bugs::{BugDto, CreateBugDto, UpdateBugDto};
use crate::presentation::handlers::health::HealthDto;
use crate::presentation::handlers::posts::{CreatePostDto, PostDto, UpdatePostDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::health::healthz,
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post
    ),
    components(
        schemas(
            HealthDto,
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            CreatePostDto,
            UpdatePostDto,
            PostDto,
            DeletedDto
        )
    ),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "posts", description = "Post endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct PostsApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::health::healthz,
        crate::presentation::handlers::bugs::list_bugs,
        crate::presentation::handlers::bugs::get_bug,
        crate::presentation::handlers::bugs::create_bug,
        crate::presentation::handlers::bugs::update_bug,
        crate::presentation::handlers::bugs::delete_bug
    ),
    components(schemas(HealthDto, CreateBugDto, UpdateBugDto, BugDto, DeletedDto)),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "bugs", description = "Bug tracker endpoints")
    )
)]
pub(crate) struct BugsApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
