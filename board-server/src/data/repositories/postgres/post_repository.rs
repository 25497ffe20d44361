use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::errors::map_db_error;
use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::identity::Identity;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    author: String,
    category: Option<String>,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const POST_COLUMNS: &str = "id, title, content, author, category, slug, created_at, updated_at";

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO posts (id, title, content, author, category, slug)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.author.as_str())
            .bind(&input.category)
            .bind(&input.slug)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        map_row_to_post(row)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        // author намеренно не входит в SET
        let sql = format!(
            r#"
            UPDATE posts
            SET title = $2,
                content = $3,
                category = $4,
                slug = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.content)
            .bind(&patch.category)
            .bind(&patch.slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
        let limit = i64::from(filter.pagination.page_size);
        let offset = i64::try_from(filter.pagination.offset())
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY created_at ASC, id ASC
            LIMIT $2
            OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(&filter.category)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    let mut post = Post::new(
        row.id,
        row.title,
        row.content,
        Identity::new(row.author),
        row.category,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))?;
    post.slug = row.slug;
    Ok(post)
}
