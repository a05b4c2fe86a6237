use crate::domain::model::AuthResponse;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

pub const SESSION_KEY: &str = "auth.session";
pub const DEFAULT_ROLE: &str = "Operator";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub role: String,
    pub user_id: Option<String>,
    #[serde(default)]
    pub operator_id: Option<i64>,
}

impl Session {
    /// `token` 或 `accessToken` 都接受，沒有角色時視為 Operator
    pub fn from_auth_response(response: &AuthResponse) -> Self {
        Self {
            token: response
                .token
                .clone()
                .or_else(|| response.access_token.clone())
                .unwrap_or_default(),
            role: response
                .role
                .clone()
                .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            user_id: response.user_id.clone(),
            operator_id: response.operator_id,
        }
    }
}

/// 登入狀態；由呼叫端明確 init / save / clear，不使用全域狀態
pub struct SessionContext<S: Storage> {
    storage: S,
    current: Option<Session>,
}

impl<S: Storage> SessionContext<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            current: None,
        }
    }

    fn file_name() -> String {
        format!("{}.json", SESSION_KEY)
    }

    /// 讀取一次持久化的 session；格式錯誤的資料當作不存在
    pub async fn init(&mut self) -> Option<&Session> {
        self.current = match self.storage.read_file(&Self::file_name()).await {
            Ok(raw) => match serde_json::from_slice::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!("Discarding malformed session data: {}", e);
                    None
                }
            },
            Err(_) => None,
        };
        self.current.as_ref()
    }

    pub async fn save(&mut self, session: Session) -> Result<()> {
        let raw = serde_json::to_vec(&session)?;
        self.storage.write_file(&Self::file_name(), &raw).await?;
        self.current = Some(session);
        Ok(())
    }

    /// 登出
    pub async fn clear(&mut self) -> Result<()> {
        self.current = None;
        self.storage.remove_file(&Self::file_name()).await
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.current
            .as_ref()
            .map(|s| s.token.as_str())
            .filter(|t| !t.is_empty())
    }

    pub fn role(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.role.as_str())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.current.as_ref().and_then(|s| s.user_id.as_deref())
    }

    pub fn operator_id(&self) -> Option<i64> {
        self.current.as_ref().and_then(|s| s.operator_id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn has_role(&self, roles: &[&str]) -> bool {
        self.role().map(|r| roles.contains(&r)).unwrap_or(false)
    }
}
