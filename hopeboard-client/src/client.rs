//! `ApiClient`: one async method per hopeboard endpoint

use hopeboard_core::models::{LetterFilter, LetterView, NewLetter, NewResource, ResourceTag, UserView};
use hopeboard_core::{Board, BoardUpdate, Resource};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

/// `GET /health` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub version: Option<String>,
    pub counts: HealthCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCounts {
    pub letters: u64,
    pub resources: u64,
    pub boards: u64,
    pub users: u64,
}

/// `POST /api/auth/login` body
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

#[derive(Deserialize)]
struct MeResponse {
    user: UserView,
}

#[derive(Deserialize)]
struct LikeResponse {
    likes: usize,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CreateBoard<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

/// HTTP client holding the base URL and an optional bearer token
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> ClientResult<reqwest::Response> {
        let res = req.send().await.map_err(ClientError::network)?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        let err = ClientError::from_status(status.as_u16(), &body);
        tracing::debug!(status = status.as_u16(), error = %err, "request failed");
        Err(err)
    }

    async fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        self.send(req).await?.json().await.map_err(ClientError::decode)
    }

    fn require_token(&self) -> ClientResult<()> {
        if self.token.is_none() {
            return Err(ClientError::Unauthorized {
                message: "not logged in".into(),
            });
        }
        Ok(())
    }

    // ---- health & auth ----

    pub async fn health(&self) -> ClientResult<HealthReport> {
        self.json(self.request(Method::GET, "/health")).await
    }

    /// Log in (or register on first use) and keep the returned token.
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let req = self
            .request(Method::POST, "/api/auth/login")
            .json(&Credentials { username, password });
        let res: LoginResponse = self.json(req).await?;
        self.token = Some(res.token.clone());
        Ok(res)
    }

    /// The current user; `None` when no token is held or it was rejected.
    pub async fn check_auth(&self) -> ClientResult<Option<UserView>> {
        if self.token.is_none() {
            return Ok(None);
        }
        match self.me().await {
            Ok(user) => Ok(Some(user)),
            Err(ClientError::Unauthorized { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn me(&self) -> ClientResult<UserView> {
        self.require_token()?;
        let res: MeResponse = self.json(self.request(Method::GET, "/api/auth/me")).await?;
        Ok(res.user)
    }

    /// Revoke the session server-side and forget the token.
    pub async fn logout(&mut self) -> ClientResult<()> {
        if self.token.is_some() {
            self.send(self.request(Method::POST, "/api/auth/logout"))
                .await?;
        }
        self.token = None;
        Ok(())
    }

    // ---- boards ----

    pub async fn public_boards(&self) -> ClientResult<Vec<Board>> {
        self.json(self.request(Method::GET, "/api/boards/public"))
            .await
    }

    /// The caller's boards; empty when logged out
    pub async fn user_boards(&self) -> ClientResult<Vec<Board>> {
        self.json(self.request(Method::GET, "/api/boards/user"))
            .await
    }

    pub async fn create_board(&self, title: Option<&str>) -> ClientResult<Board> {
        self.require_token()?;
        let req = self
            .request(Method::POST, "/api/boards")
            .json(&CreateBoard { title });
        self.json(req).await
    }

    pub async fn get_board(&self, id: Uuid) -> ClientResult<Board> {
        self.json(self.request(Method::GET, &format!("/api/boards/{}", id)))
            .await
    }

    pub async fn shared_board(&self, share_token: &str) -> ClientResult<Board> {
        self.json(self.request(Method::GET, &format!("/api/boards/share/{}", share_token)))
            .await
    }

    pub async fn save_board(&self, id: Uuid, update: &BoardUpdate) -> ClientResult<Board> {
        self.require_token()?;
        let req = self
            .request(Method::PUT, &format!("/api/boards/{}", id))
            .json(update);
        self.json(req).await
    }

    // ---- letters ----

    pub async fn letters(&self, filter: &LetterFilter) -> ClientResult<Vec<LetterView>> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(search) = filter.search.as_deref() {
            query.push(("search", search));
        }
        if let Some(category) = filter.category {
            query.push(("category", category.as_str()));
        }
        self.json(self.request(Method::GET, "/api/letters").query(&query))
            .await
    }

    pub async fn create_letter(&self, letter: &NewLetter) -> ClientResult<LetterView> {
        self.json(self.request(Method::POST, "/api/letters").json(letter))
            .await
    }

    /// Like a letter; returns the new like count
    pub async fn like_letter(&self, id: Uuid) -> ClientResult<usize> {
        let res: LikeResponse = self
            .json(self.request(Method::POST, &format!("/api/letters/{}/like", id)))
            .await?;
        Ok(res.likes)
    }

    // ---- resources ----

    pub async fn resources(&self, tag: Option<ResourceTag>) -> ClientResult<Vec<Resource>> {
        let mut req = self.request(Method::GET, "/api/resources");
        if let Some(tag) = tag {
            req = req.query(&[("tag", tag.as_str())]);
        }
        self.json(req).await
    }

    pub async fn create_resource(&self, resource: &NewResource) -> ClientResult<Resource> {
        self.json(self.request(Method::POST, "/api/resources").json(resource))
            .await
    }
}

/// `{success, data}` wrapper for callers that would rather not branch on errors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiOutcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<ClientResult<T>> for ApiOutcome<T> {
    fn from(result: ClientResult<T>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(e) => Self {
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}
