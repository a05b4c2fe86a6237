use anyhow::Result;
use httpmock::prelude::*;
use pricing_desk::adapters::http::{AuthService, PriceEntryService};
use pricing_desk::domain::model::{LoginRequest, PriceQuery, RegisterRequest};
use pricing_desk::domain::ports::PricingApi;
use pricing_desk::utils::error::ErrorCategory;
use pricing_desk::{ApiClient, DeskError, LocalStorage, Session, SessionContext};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_login_persists_session_and_authorizes_later_calls() -> Result<()> {
    let server = MockServer::start();
    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/auth/login")
            .json_body(json!({"email": "ops@sun.example", "password": "secret1"}));
        then.status(200).json_body(json!({
            "accessToken": "jwt-abc",
            "role": "Admin",
            "userId": 7
        }));
    });
    let prices = server.mock(|when, then| {
        when.method(GET)
            .path("/api/priceentries")
            .header("Authorization", "Bearer jwt-abc")
            .query_param("operatorId", "7");
        then.status(200)
            .json_body(json!({"total": 0, "page": 1, "pageSize": 20, "items": []}));
    });

    let session_dir = TempDir::new()?;
    let storage = LocalStorage::new(session_dir.path().to_string_lossy().to_string());

    // 登入並保存
    let response = AuthService::new(client(&server))
        .login(&LoginRequest {
            email: "ops@sun.example".to_string(),
            password: "secret1".to_string(),
        })
        .await?;
    let mut session = SessionContext::new(storage.clone());
    session.save(Session::from_auth_response(&response)).await?;
    login.assert();
    assert!(session_dir.path().join("auth.session.json").exists());

    // 新的 context 讀回同一份 session
    let mut restored = SessionContext::new(storage);
    restored.init().await;
    assert!(restored.is_authenticated());
    assert_eq!(restored.token(), Some("jwt-abc"));
    assert_eq!(restored.user_id(), Some("7"));
    assert!(restored.has_role(&["Admin"]));

    let api = PriceEntryService::new(
        client(&server).with_token(restored.token().map(str::to_string)),
    );
    let entries = api
        .query(&PriceQuery {
            operator_id: restored.user_id().map(str::to_string),
            ..Default::default()
        })
        .await?;
    assert!(entries.is_empty());
    prices.assert();

    // 登出
    restored.clear().await?;
    assert!(!restored.is_authenticated());
    assert!(!session_dir.path().join("auth.session.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_malformed_session_file_is_discarded() -> Result<()> {
    let session_dir = TempDir::new()?;
    std::fs::write(session_dir.path().join("auth.session.json"), b"{not json")?;

    let mut session =
        SessionContext::new(LocalStorage::new(session_dir.path().to_string_lossy().to_string()));
    assert!(session.init().await.is_none());
    assert!(!session.is_authenticated());
    // 清除不存在的 session 不算錯誤
    session.clear().await?;
    session.clear().await?;
    Ok(())
}

#[tokio::test]
async fn test_register_returns_server_message() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/auth/register")
            .json_body(json!({"email": "new@sun.example", "password": "secret1", "role": "Operator"}));
        then.status(200).json_body(json!({"message": "User registered"}));
    });

    let message = AuthService::new(client(&server))
        .register(&RegisterRequest {
            email: "new@sun.example".to_string(),
            password: "secret1".to_string(),
            role: "Operator".to_string(),
        })
        .await?;
    assert_eq!(message, "User registered");
    Ok(())
}

#[tokio::test]
async fn test_unauthorized_maps_to_session_error() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/routes");
        then.status(401);
    });

    let err = PriceEntryService::new(client(&server))
        .routes()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DeskError::ApiResponseError {
            status: 401,
            message: None
        }
    ));
    assert_eq!(err.category(), ErrorCategory::Session);
    assert!(err.recovery_suggestion().contains("login"));
    Ok(())
}
