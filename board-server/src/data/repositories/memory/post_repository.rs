use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Default)]
pub(crate) struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let now = Utc::now();
        let mut post = Post::new(
            Uuid::new_v4(),
            input.title,
            input.content,
            input.author,
            input.category,
            now,
            now,
        )?;
        post.slug = input.slug;

        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|post| post.id == id).cloned())
    }

    async fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };

        post.title = patch.title;
        post.content = patch.content;
        post.category = patch.category;
        post.slug = patch.slug;
        post.updated_at = Utc::now().max(post.created_at);
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        Ok(posts.len() < before)
    }

    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>, DomainError> {
        let offset = usize::try_from(filter.pagination.offset())
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        let limit = filter.pagination.page_size as usize;

        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .filter(|post| match filter.category.as_deref() {
                Some(category) => post.category.as_deref() == Some(category),
                None => true,
            })
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
