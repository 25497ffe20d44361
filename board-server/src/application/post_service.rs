use std::sync::Arc;

use tracing::debug;

use crate::data::post_repository::{NewPost, Pagination, PostFilter, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::identity::{Identity, parse_resource_id};
use crate::domain::ownership::ensure_owner;
use crate::domain::post::{CreatePostRequest, Post, UpdatePostRequest, normalize_category, slugify};

pub(crate) struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub(crate) fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_post(
        &self,
        author: Identity,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            slug: slugify(&req.title),
            title: req.title,
            content: req.content,
            author,
            category: req.category,
        };
        self.repo.create_post(new_post).await
    }

    pub(crate) async fn get_post(&self, raw_id: &str) -> Result<Post, DomainError> {
        let id = parse_resource_id(raw_id)?;
        self.repo
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    pub(crate) async fn list_posts(
        &self,
        category: Option<String>,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Post>, DomainError> {
        let filter = PostFilter {
            category: normalize_category(category),
            pagination: Pagination { page, page_size },
        };
        self.repo.list_posts(filter).await
    }

    /// Существование проверяется раньше владения: для отсутствующего поста
    /// всегда `NotFound`, никогда `Forbidden`.
    pub(crate) async fn update_post(
        &self,
        caller: &Identity,
        raw_id: &str,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let current = self.get_post(raw_id).await?;
        ensure_owner(caller, &current)?;

        let req = req.validate()?;
        let title = req.title.unwrap_or(current.title);
        let patch = PostPatch {
            slug: slugify(&title),
            title,
            content: req.content.unwrap_or(current.content),
            category: match req.category {
                Some(category) => normalize_category(Some(category)),
                None => current.category,
            },
        };

        debug!(post_id = %current.id, caller = %caller, "updating post");
        self.repo
            .update_post(current.id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found("post", current.id))
    }

    pub(crate) async fn delete_post(&self, caller: &Identity, raw_id: &str) -> Result<(), DomainError> {
        let current = self.get_post(raw_id).await?;
        ensure_owner(caller, &current)?;

        let deleted = self.repo.delete_post(current.id).await?;
        if !deleted {
            return Err(DomainError::not_found("post", current.id));
        }
        debug!(post_id = %current.id, caller = %caller, "post deleted");
        Ok(())
    }
}
