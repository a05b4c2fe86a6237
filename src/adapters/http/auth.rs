use super::ApiClient;
use crate::domain::model::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// 回傳伺服器的確認訊息
    pub async fn register(&self, request: &RegisterRequest) -> Result<String> {
        let response: MessageResponse = self.client.post_json("/auth/register", request).await?;
        Ok(response
            .message
            .unwrap_or_else(|| "Registration completed".to_string()))
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        tracing::info!("🔐 Signing in as {}", request.email);
        self.client.post_json("/auth/login", request).await
    }
}
