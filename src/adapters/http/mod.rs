pub mod auth;
pub mod operators;
pub mod prices;
pub mod routes;
pub mod seasons;

use crate::domain::model::ListPayload;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DeskError, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

pub use auth::AuthService;
pub use operators::OperatorService;
pub use prices::PriceEntryService;
pub use routes::RouteService;
pub use seasons::SeasonService;

/// 所有服務共用的 HTTP 用戶端；有 token 時自動帶上 Bearer header
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url).map_err(|e| DeskError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.api_base_url(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.set_token(token);
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.is_empty());
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);
        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self.request(Method::GET, path).query(params).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// 清單端點：裸陣列、分頁物件或 null 都接受
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let payload: Option<ListPayload<T>> = self.get_json(path, params).await?;
        Ok(payload.map(ListPayload::into_items).unwrap_or_default())
    }

    /// 建立資源用；2xx 但沒有內容 (常見的 201/204) 時回傳 None
    pub async fn post_created<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        let response = Self::check(response).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            tracing::debug!("POST {} returned no body", path);
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// 不在意回應內容的 POST
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn put_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn delete_unit(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeskError::ApiResponseError {
            status: status.as_u16(),
            message: server_message(&body),
        })
    }
}

/// 依序取 JSON 的 message、JSON 字串本身、原始文字
pub fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => map
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| map.get("title").and_then(|m| m.as_str()))
            .map(str::to_string)
            .or_else(|| Some(trimmed.to_string())),
        Ok(serde_json::Value::String(s)) => Some(s),
        _ => Some(trimmed.to_string()),
    }
}
