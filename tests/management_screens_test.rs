use anyhow::Result;
use httpmock::prelude::*;
use pricing_desk::adapters::http::{OperatorService, RouteService, SeasonService};
use pricing_desk::app::screens::{
    NoticeKind, OperatorForm, OperatorScope, OperatorScreen, RouteForm, RouteScreen, SeasonForm,
    SeasonScreen,
};
use pricing_desk::domain::model::SeasonType;
use pricing_desk::ApiClient;
use serde_json::json;
use std::time::Duration;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.base_url(), Duration::from_secs(5))
        .unwrap()
        .with_token(Some("admin-token".to_string()))
}

fn seasons_body() -> serde_json::Value {
    json!([
        {"id": 1, "name": "Winter 2024", "start": "2024-01-01", "end": "2024-06-30", "year": 2024, "type": "Winter"},
        {"id": 3, "name": "Winter 2025", "start": "2025-01-01", "end": "2025-06-30", "year": 2025, "type": "Winter"},
        {"id": 2, "name": "Summer 2025", "start": "2025-07-01", "end": "2025-12-31", "year": 2025, "type": "Summer"}
    ])
}

#[tokio::test]
async fn test_season_create_sends_derived_dates_and_refetches() -> Result<()> {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST).path("/api/seasons").json_body(json!({
            "id": 0,
            "name": "Summer 2026",
            "start": "2026-07-01",
            "end": "2026-12-31",
            "year": 2026,
            "type": "Summer"
        }));
        then.status(201).json_body(json!({
            "id": 9,
            "name": "Summer 2026",
            "start": "2026-07-01T00:00:00",
            "end": "2026-12-31T00:00:00",
            "year": 2026,
            "type": "Summer"
        }));
    });
    let list = server.mock(|when, then| {
        when.method(GET).path("/api/seasons");
        then.status(200).json_body(seasons_body());
    });

    let mut screen = SeasonScreen::new(SeasonService::new(client(&server)));
    let saved = screen
        .submit(
            SeasonForm {
                year: 2026,
                season_type: SeasonType::Summer,
            },
            None,
        )
        .await?;

    create.assert();
    list.assert();
    assert_eq!(saved.id, 9);
    let names: Vec<&str> = screen.seasons().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Summer 2025", "Winter 2025", "Winter 2024"]);
    Ok(())
}

#[tokio::test]
async fn test_season_create_with_empty_response_still_refetches() -> Result<()> {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST).path("/api/seasons");
        then.status(201);
    });
    let list = server.mock(|when, then| {
        when.method(GET).path("/api/seasons");
        then.status(200).json_body(seasons_body());
    });

    let mut screen = SeasonScreen::new(SeasonService::new(client(&server)));
    let saved = screen
        .submit(
            SeasonForm {
                year: 2026,
                season_type: SeasonType::Winter,
            },
            None,
        )
        .await?;

    create.assert();
    list.assert();
    assert_eq!(saved.name, "Winter 2026");
    assert_eq!(screen.seasons().len(), 3);
    assert!(screen
        .notices()
        .last()
        .map_or(true, |n| n.kind != NoticeKind::Error));
    Ok(())
}

#[tokio::test]
async fn test_season_list_accepts_page_object() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/seasons");
        then.status(200).json_body(json!({
            "total": 1,
            "page": 1,
            "pageSize": 20,
            "items": [
                {"id": 4, "name": "Summer 2025", "start": "2025-07-01", "end": "2025-12-31", "year": 2025, "type": "Summer"}
            ]
        }));
    });

    let mut screen = SeasonScreen::new(SeasonService::new(client(&server)));
    screen.fetch().await?;
    assert_eq!(screen.seasons().len(), 1);
    assert_eq!(screen.seasons()[0].name, "Summer 2025");
    Ok(())
}

#[tokio::test]
async fn test_route_create_with_no_content_response() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/routes");
        then.status(204);
    });
    let list = server.mock(|when, then| {
        when.method(GET).path("/api/routes");
        then.status(200).json_body(json!({"total": 0, "page": 1, "pageSize": 20, "items": []}));
    });

    let mut screen = RouteScreen::new(
        RouteService::new(client(&server)),
        SeasonService::new(client(&server)),
    );
    screen
        .save(
            &RouteForm {
                origin: "VIE".to_string(),
                destination: "PMI".to_string(),
                booking_class_names: vec!["Economy".to_string()],
                season_id: None,
            },
            None,
        )
        .await?;
    list.assert();
    assert!(screen.routes().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_season_delete_conflict_uses_server_message() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/seasons");
        then.status(200).json_body(seasons_body());
    });
    server.mock(|when, then| {
        when.method(DELETE).path("/api/seasons/3");
        then.status(409)
            .json_body(json!({"message": "Season is referenced by 4 routes"}));
    });

    let mut screen = SeasonScreen::new(SeasonService::new(client(&server)));
    screen.fetch().await?;

    let prompts = std::cell::RefCell::new(Vec::new());
    let confirm = |prompt: &str| {
        prompts.borrow_mut().push(prompt.to_string());
        true
    };
    assert!(screen.delete(3, &confirm).await.is_err());

    assert_eq!(prompts.borrow().as_slice(), ["Delete season \"Winter 2025\"?"]);
    let notice = screen.notices().last().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Season is referenced by 4 routes");
    Ok(())
}

#[tokio::test]
async fn test_cancelled_delete_sends_nothing() -> Result<()> {
    let server = MockServer::start();
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/api/routes/5");
        then.status(204);
    });

    let mut screen = RouteScreen::new(
        RouteService::new(client(&server)),
        SeasonService::new(client(&server)),
    );
    let deny = |_: &str| false;
    assert!(!screen.delete(5, &deny).await?);
    delete.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_route_create_resolves_booking_classes() -> Result<()> {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/api/routes")
            .header("Authorization", "Bearer admin-token")
            .json_body(json!({
                "origin": "VIE",
                "destination": "RHO",
                "bookingClassIds": [2, 1],
                "seasonId": 3
            }));
        then.status(201).json_body(json!({
            "id": 11,
            "origin": "VIE",
            "destination": "RHO",
            "seasonId": 3,
            "bookingClasses": [{"id": 2, "name": "Business"}, {"id": 1, "name": "Economy"}]
        }));
    });
    let list = server.mock(|when, then| {
        when.method(GET).path("/api/routes");
        then.status(200).json_body(json!([{
            "id": 11,
            "origin": "VIE",
            "destination": "RHO",
            "seasonId": 3,
            "bookingClasses": [{"id": 2, "name": "Business"}, {"id": 1, "name": "Economy"}]
        }]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/seasons");
        then.status(200).json_body(seasons_body());
    });

    let mut screen = RouteScreen::new(
        RouteService::new(client(&server)),
        SeasonService::new(client(&server)),
    );
    screen
        .save(
            &RouteForm {
                origin: " VIE ".to_string(),
                destination: "RHO".to_string(),
                booking_class_names: vec!["business".to_string(), "Economy".to_string(), "First".to_string()],
                season_id: Some(3),
            },
            None,
        )
        .await?;

    create.assert();
    list.assert();
    assert_eq!(
        RouteScreen::booking_class_names(&screen.routes()[0]),
        "Business, Economy"
    );

    screen.load_seasons().await?;
    assert_eq!(screen.years(), vec![2024, 2025]);
    assert_eq!(screen.seasons_for_year(Some(2025)).len(), 2);
    assert_eq!(screen.seasons_for_year(None).len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_route_delete_success_notice() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(DELETE).path("/api/routes/5");
        then.status(204);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/routes");
        then.status(200).json_body(json!([]));
    });

    let mut screen = RouteScreen::new(
        RouteService::new(client(&server)),
        SeasonService::new(client(&server)),
    );
    let accept = |_: &str| true;
    assert!(screen.delete(5, &accept).await?);
    assert_eq!(
        screen.notices().last().map(|n| n.message.as_str()),
        Some("Route deleted successfully")
    );
    Ok(())
}

#[tokio::test]
async fn test_operator_scope_fetches_own_record() -> Result<()> {
    let server = MockServer::start();
    let own = server.mock(|when, then| {
        when.method(GET).path("/api/TourOperators/12");
        then.status(200).json_body(json!({
            "id": 12,
            "name": "Sun Tours",
            "email": "ops@sun.example",
            "bookingClasses": [{"id": 1, "name": "Economy"}],
            "seasons": []
        }));
    });
    let all = server.mock(|when, then| {
        when.method(GET).path("/api/TourOperators");
        then.status(200).json_body(json!([]));
    });

    let mut screen = OperatorScreen::new(
        OperatorService::new(client(&server)),
        SeasonService::new(client(&server)),
        OperatorScope::Own(12),
    );
    screen.fetch().await?;

    own.assert();
    all.assert_hits(0);
    assert_eq!(screen.operators().len(), 1);
    let form = OperatorScreen::form_for(&screen.operators()[0]);
    assert_eq!(form.booking_class_ids, vec![1]);
    assert!(form.password.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_operator_update_omits_password() -> Result<()> {
    let server = MockServer::start();
    let update = server.mock(|when, then| {
        when.method(PUT).path("/api/TourOperators/12").json_body(json!({
            "name": "Sun Tours GmbH",
            "email": "ops@sun.example",
            "bookingClassIds": [1, 2],
            "seasonIds": [3]
        }));
        then.status(204);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/TourOperators");
        then.status(200).json_body(json!([]));
    });

    let mut screen = OperatorScreen::new(
        OperatorService::new(client(&server)),
        SeasonService::new(client(&server)),
        OperatorScope::All,
    );
    let form = OperatorForm {
        name: "Sun Tours GmbH".to_string(),
        email: "ops@sun.example".to_string(),
        password: String::new(),
        booking_class_ids: vec![1, 2],
        season_ids: vec![3],
    };
    screen.submit(&form, Some(12)).await?;
    update.assert();
    Ok(())
}

#[tokio::test]
async fn test_operator_list_failure_notice() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/TourOperators");
        then.status(500);
    });

    let mut screen = OperatorScreen::new(
        OperatorService::new(client(&server)),
        SeasonService::new(client(&server)),
        OperatorScope::All,
    );
    assert!(screen.fetch().await.is_err());
    assert_eq!(
        screen.notices().last().map(|n| n.message.as_str()),
        Some("Failed to load operators.")
    );
    Ok(())
}
