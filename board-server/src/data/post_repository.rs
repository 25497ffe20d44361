use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::identity::Identity;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author: Identity,
    pub(crate) category: Option<String>,
    pub(crate) slug: String,
}

/// Полный набор изменяемых полей. Автора здесь нет: он задаётся один раз
/// при создании.
#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: Option<String>,
    pub(crate) slug: String,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pagination {
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}

impl Pagination {
    pub(crate) fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PostFilter {
    pub(crate) category: Option<String>,
    pub(crate) pagination: Pagination,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: Uuid) -> Result<bool, DomainError>;
    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError>;
}
