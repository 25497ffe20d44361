use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель пользователя.
pub struct User {
    /// Идентификатор пользователя (UUID).
    pub id: String,
    /// Логин.
    pub username: String,
    /// Email.
    pub email: String,
    /// Дата и время создания пользователя (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ после успешной регистрации или входа.
pub struct AuthResponse {
    /// JWT access token.
    pub access_token: String,
    /// Данные пользователя.
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель поста.
pub struct Post {
    /// Идентификатор поста (UUID).
    pub id: String,
    /// Заголовок поста.
    pub title: String,
    /// Содержимое поста.
    pub content: String,
    /// Идентичность автора, как она записана в токене.
    pub author: String,
    /// Категория, если задана.
    pub category: Option<String>,
    /// Slug, построенный из заголовка.
    pub slug: String,
    /// Дата и время создания поста (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления поста (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Частичное обновление поста. Незаданные поля не отправляются.
pub struct PostUpdate {
    /// Новый заголовок.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Новое содержимое.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Новая категория.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Параметры выборки списка постов.
pub struct ListPostsQuery {
    /// Фильтр по категории.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Номер страницы, начиная с 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Размер страницы, 1..=100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Публичная модель бага.
pub struct Bug {
    /// Идентификатор бага (UUID).
    pub id: String,
    /// Заголовок.
    pub title: String,
    /// Описание, может быть пустым.
    pub description: String,
    /// `open`, `in-progress` или `resolved`.
    pub status: String,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Данные нового бага.
pub struct NewBug {
    /// Заголовок, обязателен.
    pub title: String,
    /// Описание.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Начальный статус, по умолчанию `open`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Частичное обновление бага.
pub struct BugUpdate {
    /// Новый заголовок.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Новое описание.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Новый статус.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
