use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;
use super::identity::Identity;
use super::ownership::Owned;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author: Identity,
    pub(crate) category: Option<String>,
    pub(crate) slug: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: Option<String>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            content: normalize_content(&self.content)?,
            category: normalize_category(self.category),
        })
    }
}

/// Частичное обновление поста. Автор в запросе не передаётся никогда.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) category: Option<String>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: self.title.as_deref().map(normalize_title).transpose()?,
            content: self.content.as_deref().map(normalize_content).transpose()?,
            category: self.category,
        })
    }
}

impl Post {
    pub(crate) fn new(
        id: Uuid,
        title: impl Into<String>,
        content: impl Into<String>,
        author: Identity,
        category: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if author.as_str().trim().is_empty() {
            return Err(DomainError::Validation {
                field: "author",
                message: "must not be empty",
            });
        }
        let title = normalize_title(&title.into())?;
        let content = normalize_content(&content.into())?;

        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            slug: slugify(&title),
            title,
            content,
            author,
            category: normalize_category(category),
            created_at,
            updated_at,
        })
    }
}

impl Owned for Post {
    fn owner(&self) -> &Identity {
        &self.author
    }
}

/// Нижний регистр, каждая серия пробельных символов заменяется на `-`.
pub(crate) fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_space = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    slug
}

pub(crate) fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 255 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::{CreatePostRequest, DomainError, Post, UpdatePostRequest, slugify};
    use crate::domain::identity::Identity;

    #[test]
    fn create_post_request_validate_rejects_empty_title() {
        let req = CreatePostRequest {
            title: "   ".to_string(),
            content: "valid content".to_string(),
            category: None,
        };

        let err = req.validate().expect_err("title must be rejected");
        assert_validation_field(err, "title");
    }

    #[test]
    fn create_post_request_validate_normalizes_fields() {
        let req = CreatePostRequest {
            title: "  title  ".to_string(),
            content: "  content  ".to_string(),
            category: Some("   ".to_string()),
        };

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.title, "title");
        assert_eq!(validated.content, "content");
        assert_eq!(validated.category, None);
    }

    #[test]
    fn update_post_request_validate_rejects_empty_content() {
        let req = UpdatePostRequest {
            content: Some("   ".to_string()),
            ..Default::default()
        };

        let err = req.validate().expect_err("content must be rejected");
        assert_validation_field(err, "content");
    }

    #[test]
    fn update_post_request_keeps_missing_fields_missing() {
        let validated = UpdatePostRequest::default()
            .validate()
            .expect("empty patch is valid");
        assert!(validated.title.is_none());
        assert!(validated.content.is_none());
    }

    #[test]
    fn post_new_builds_slug_from_title() {
        let now = Utc::now();
        let post = Post::new(
            Uuid::new_v4(),
            "  Hello   Big World ",
            "Content",
            Identity::new("alice"),
            Some(" tech ".to_string()),
            now,
            now,
        )
        .expect("post should be created");

        assert_eq!(post.title, "Hello   Big World");
        assert_eq!(post.slug, "hello-big-world");
        assert_eq!(post.category.as_deref(), Some("tech"));
        assert_eq!(post.author, Identity::new("alice"));
    }

    #[test]
    fn post_new_rejects_blank_author() {
        let now = Utc::now();
        let err = Post::new(
            Uuid::new_v4(),
            "Title",
            "Content",
            Identity::new(" "),
            None,
            now,
            now,
        )
        .expect_err("author must be present");
        assert_validation_field(err, "author");
    }

    #[test]
    fn post_new_rejects_updated_before_created() {
        let updated_at = Utc::now();
        let created_at = updated_at + Duration::seconds(1);

        let err = Post::new(
            Uuid::new_v4(),
            "Title",
            "Content",
            Identity::new("alice"),
            None,
            created_at,
            updated_at,
        )
        .expect_err("updated_at < created_at must fail");
        assert_validation_field(err, "updated_at");
    }

    #[test]
    fn slugify_lowercases_and_collapses_whitespace() {
        assert_eq!(slugify("My First\tPost"), "my-first-post");
        assert_eq!(slugify("single"), "single");
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            _ => panic!("expected DomainError::Validation"),
        }
    }
}
