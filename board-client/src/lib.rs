//! Клиентская библиотека для сервиса постов и баг-трекера.
//!
//! `BoardClient` хранит JWT-токен после `register`/`login` и подставляет его
//! в защищённые операции с постами. Баг-трекер открыт, токен туда не
//! отправляется.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{BoardClientError, BoardClientResult};
pub use models::{
    AuthResponse, Bug, BugUpdate, ListPostsQuery, NewBug, Post, PostUpdate, User,
};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Клиент REST API, например `http://127.0.0.1:5000`.
pub struct BoardClient {
    http: HttpClient,
    token: Option<String>,
}

impl BoardClient {
    /// Создаёт клиент для сервера с базовым URL `base_url`.
    pub fn new(base_url: impl Into<String>) -> BoardClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            token: None,
        })
    }

    /// Устанавливает JWT-токен вручную.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Возвращает текущий JWT-токен, если он установлен.
    pub fn get_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Очищает сохранённый JWT-токен.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Регистрирует пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BoardClientResult<AuthResponse> {
        let result = self.http.register(username, email, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Выполняет вход пользователя и сохраняет полученный JWT-токен в клиенте.
    pub async fn login(&mut self, username: &str, password: &str) -> BoardClientResult<AuthResponse> {
        let result = self.http.login(username, password).await?;
        self.token = Some(result.access_token.clone());
        Ok(result)
    }

    /// Создаёт пост. Требует токен.
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        category: Option<&str>,
    ) -> BoardClientResult<Post> {
        let token = self.require_token()?;
        self.http.create_post(token, title, content, category).await
    }

    /// Возвращает пост по идентификатору.
    pub async fn get_post(&self, id: &str) -> BoardClientResult<Post> {
        self.http.get_post(id).await
    }

    /// Возвращает страницу постов в порядке создания.
    pub async fn list_posts(&self, query: &ListPostsQuery) -> BoardClientResult<Vec<Post>> {
        self.http.list_posts(query).await
    }

    /// Частично обновляет пост. Требует токен владельца.
    pub async fn update_post(&self, id: &str, update: &PostUpdate) -> BoardClientResult<Post> {
        let token = self.require_token()?;
        self.http.update_post(token, id, update).await
    }

    /// Удаляет пост. Требует токен владельца.
    pub async fn delete_post(&self, id: &str) -> BoardClientResult<()> {
        let token = self.require_token()?;
        self.http.delete_post(token, id).await
    }

    /// Заводит баг.
    pub async fn create_bug(&self, bug: &NewBug) -> BoardClientResult<Bug> {
        self.http.create_bug(bug).await
    }

    /// Возвращает все баги.
    pub async fn list_bugs(&self) -> BoardClientResult<Vec<Bug>> {
        self.http.list_bugs().await
    }

    /// Возвращает баг по идентификатору.
    pub async fn get_bug(&self, id: &str) -> BoardClientResult<Bug> {
        self.http.get_bug(id).await
    }

    /// Частично обновляет баг.
    pub async fn update_bug(&self, id: &str, update: &BugUpdate) -> BoardClientResult<Bug> {
        self.http.update_bug(id, update).await
    }

    /// Удаляет баг.
    pub async fn delete_bug(&self, id: &str) -> BoardClientResult<()> {
        self.http.delete_bug(id).await
    }

    fn require_token(&self) -> BoardClientResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| BoardClientError::Unauthorized("no token, log in first".to_string()))
    }
}
