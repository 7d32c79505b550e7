use crate::error::{ClientError, ClientResult};
use fastvinted_shared::{
    db::pool::PoolStats,
    models::{
        discord_webhook::DiscordWebhook,
        item::{Item, ItemWithSearchItem},
        search_item::{SearchItem, SearchItemWithItems},
        user::User,
    },
    pagination::ItemQuery,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const USER_AGENT: &str = concat!("fastvinted-client/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,

    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,

    pub version: String,

    pub database: String,

    pub pool: PoolStats,
}

/// Body for creating a saved search
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSearchItem {
    pub search_text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,

    pub tags: Vec<String>,
}

/// Partial update; `Some(None)` clears a price bound
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Option<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Option<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
struct WebhookUrl<'a> {
    url: &'a str,
}

/// Typed wrapper over the FastVinted REST API
///
/// Holds the bearer token after [`ApiClient::login`]; calls that need one
/// fail with [`ClientError::NotLoggedIn`] before touching the network.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Reuses a token from an earlier session
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn public(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "API request");
        self.http.request(method, self.url(path))
    }

    fn authed(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let token = self.token.as_deref().ok_or(ClientError::NotLoggedIn)?;
        Ok(self.public(method, path).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(%status, "API error response");
        Err(ClientError::from_body(status, &body))
    }

    /// For endpoints that answer `204 No Content`
    async fn send_empty(request: RequestBuilder) -> ClientResult<()> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_body(status, &body))
    }

    pub async fn health(&self) -> ClientResult<Health> {
        Self::send(self.public(Method::GET, "/health")).await
    }

    pub async fn register(&self, email: &str, password: &str) -> ClientResult<User> {
        Self::send(
            self.public(Method::POST, "/auth/register")
                .json(&Credentials { email, password }),
        )
        .await
    }

    /// Logs in and keeps the token for later calls
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<User> {
        let response: LoginResponse = Self::send(
            self.public(Method::POST, "/auth/login")
                .json(&Credentials { email, password }),
        )
        .await?;

        self.token = Some(response.access_token);
        Ok(response.user)
    }

    pub async fn profile(&self) -> ClientResult<User> {
        Self::send(self.authed(Method::GET, "/auth/profile")?).await
    }

    /// Deletes the logged-in account with everything it owns, then forgets
    /// the token
    pub async fn delete_account(&mut self, user_id: Uuid) -> ClientResult<()> {
        Self::send_empty(self.authed(Method::DELETE, &format!("/users/{}", user_id))?).await?;
        self.token = None;
        Ok(())
    }

    pub async fn list_search_items(&self) -> ClientResult<Vec<SearchItemWithItems>> {
        Self::send(self.authed(Method::GET, "/search-items")?).await
    }

    pub async fn create_search_item(&self, search: &NewSearchItem) -> ClientResult<SearchItem> {
        Self::send(self.authed(Method::POST, "/search-items")?.json(search)).await
    }

    pub async fn get_search_item(&self, id: Uuid) -> ClientResult<SearchItemWithItems> {
        Self::send(self.authed(Method::GET, &format!("/search-items/{}", id))?).await
    }

    pub async fn update_search_item(
        &self,
        id: Uuid,
        changes: &SearchItemChanges,
    ) -> ClientResult<SearchItem> {
        Self::send(
            self.authed(Method::PATCH, &format!("/search-items/{}", id))?
                .json(changes),
        )
        .await
    }

    pub async fn delete_search_item(&self, id: Uuid) -> ClientResult<SearchItem> {
        Self::send(self.authed(Method::DELETE, &format!("/search-items/{}", id))?).await
    }

    pub async fn list_items(&self, query: &ItemQuery) -> ClientResult<Vec<ItemWithSearchItem>> {
        Self::send(self.authed(Method::GET, "/items")?.query(query)).await
    }

    pub async fn list_items_for_search(
        &self,
        search_item_id: Uuid,
        query: &ItemQuery,
    ) -> ClientResult<Vec<Item>> {
        Self::send(
            self.authed(Method::GET, &format!("/items/search/{}", search_item_id))?
                .query(query),
        )
        .await
    }

    pub async fn count_items(&self) -> ClientResult<i64> {
        Self::send(self.authed(Method::GET, "/items/count")?).await
    }

    pub async fn count_items_for_search(&self, search_item_id: Uuid) -> ClientResult<i64> {
        Self::send(self.authed(Method::GET, &format!("/items/count/{}", search_item_id))?).await
    }

    pub async fn get_item(&self, id: Uuid) -> ClientResult<ItemWithSearchItem> {
        Self::send(self.authed(Method::GET, &format!("/items/{}", id))?).await
    }

    pub async fn delete_item(&self, id: Uuid) -> ClientResult<Item> {
        Self::send(self.authed(Method::DELETE, &format!("/items/{}", id))?).await
    }

    /// `None` until the user has saved a webhook
    pub async fn get_discord_webhook(&self) -> ClientResult<Option<DiscordWebhook>> {
        Self::send(self.authed(Method::GET, "/discord-webhook")?).await
    }

    pub async fn set_discord_webhook(&self, url: &str) -> ClientResult<DiscordWebhook> {
        Self::send(
            self.authed(Method::POST, "/discord-webhook")?
                .json(&WebhookUrl { url }),
        )
        .await
    }
}
