use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{BoardClientError, BoardClientResult};
use crate::models::{
    AuthResponse, Bug, BugUpdate, ListPostsQuery, NewBug, Post, PostUpdate,
};

#[derive(Debug, Serialize)]
struct RegisterRequestDto<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginRequestDto<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePostRequestDto<'a> {
    title: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeletedResponseDto {
    success: bool,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API сервиса постов и баг-трекера.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    pub(crate) fn new(base_url: impl Into<String>) -> BoardClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.endpoint(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> BoardClientError {
        let status = response.status();

        let message = match response.json::<ErrorResponseDto>().await {
            Ok(body) => body.error,
            Err(_) => None,
        };
        BoardClientError::from_http_status(status, message)
    }

    async fn execute<TRes>(&self, request: RequestBuilder) -> BoardClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(BoardClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        response
            .json::<TRes>()
            .await
            .map_err(BoardClientError::from_reqwest)
    }

    async fn execute_delete(&self, request: RequestBuilder) -> BoardClientResult<()> {
        let body: DeletedResponseDto = self.execute(request).await?;
        if !body.success {
            return Err(BoardClientError::InvalidRequest(
                "server did not confirm deletion".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BoardClientResult<AuthResponse> {
        let payload = RegisterRequestDto {
            username,
            email,
            password,
        };
        self.execute(
            self.request(Method::POST, "/api/auth/register", None)
                .json(&payload),
        )
        .await
    }

    pub(crate) async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> BoardClientResult<AuthResponse> {
        let payload = LoginRequestDto { username, password };
        self.execute(
            self.request(Method::POST, "/api/auth/login", None)
                .json(&payload),
        )
        .await
    }

    pub(crate) async fn create_post(
        &self,
        token: &str,
        title: &str,
        content: &str,
        category: Option<&str>,
    ) -> BoardClientResult<Post> {
        let payload = CreatePostRequestDto {
            title,
            content,
            category,
        };
        self.execute(
            self.request(Method::POST, "/api/posts", Some(token))
                .json(&payload),
        )
        .await
    }

    pub(crate) async fn get_post(&self, id: &str) -> BoardClientResult<Post> {
        self.execute(self.request(Method::GET, &format!("/api/posts/{id}"), None))
            .await
    }

    pub(crate) async fn list_posts(&self, query: &ListPostsQuery) -> BoardClientResult<Vec<Post>> {
        self.execute(self.request(Method::GET, "/api/posts", None).query(query))
            .await
    }

    pub(crate) async fn update_post(
        &self,
        token: &str,
        id: &str,
        update: &PostUpdate,
    ) -> BoardClientResult<Post> {
        self.execute(
            self.request(Method::PUT, &format!("/api/posts/{id}"), Some(token))
                .json(update),
        )
        .await
    }

    pub(crate) async fn delete_post(&self, token: &str, id: &str) -> BoardClientResult<()> {
        self.execute_delete(self.request(Method::DELETE, &format!("/api/posts/{id}"), Some(token)))
            .await
    }

    pub(crate) async fn create_bug(&self, bug: &NewBug) -> BoardClientResult<Bug> {
        self.execute(self.request(Method::POST, "/api/bugs", None).json(bug))
            .await
    }

    pub(crate) async fn list_bugs(&self) -> BoardClientResult<Vec<Bug>> {
        self.execute(self.request(Method::GET, "/api/bugs", None))
            .await
    }

    pub(crate) async fn get_bug(&self, id: &str) -> BoardClientResult<Bug> {
        self.execute(self.request(Method::GET, &format!("/api/bugs/{id}"), None))
            .await
    }

    pub(crate) async fn update_bug(&self, id: &str, update: &BugUpdate) -> BoardClientResult<Bug> {
        self.execute(
            self.request(Method::PUT, &format!("/api/bugs/{id}"), None)
                .json(update),
        )
        .await
    }

    pub(crate) async fn delete_bug(&self, id: &str) -> BoardClientResult<()> {
        self.execute_delete(self.request(Method::DELETE, &format!("/api/bugs/{id}"), None))
            .await
    }
}
