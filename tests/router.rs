use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::Router;
use hit_tracker::clock::FixedClock;
use hit_tracker::locale::DisplayLocale;
use hit_tracker::models::{CalendarMonth, Hit, HitLog, ImportSummary, RecentLog, SettingsResponse, Statistics};
use hit_tracker::{AppState, EventStore, MemoryStore, router};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;

// 2009-02-13T23:31:30Z
const NOW: i64 = 1_234_567_890_000;
const DAY_MS: i64 = 86_400_000;

fn app_at(now_ms: i64, timezone: &str) -> (Router, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(now_ms));
    let store = EventStore::open(Box::new(MemoryStore::new()), clock.clone(), timezone);
    let state = AppState::new(store, DisplayLocale::EnUs, "guest");
    (router(state), clock)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn get_json<T: DeserializeOwned>(app: &Router, uri: &str) -> T {
    let (status, body) = send(app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn append_then_load_round_trips() {
    let (app, _) = app_at(NOW, "UTC");

    let (status, body) = send(&app, Method::POST, "/api/users/a/hits", None).await;
    assert_eq!(status, StatusCode::OK);
    let hit: Hit = serde_json::from_slice(&body).unwrap();
    assert_eq!(hit.timestamp, NOW);
    assert_eq!(hit.date, "2009-02-13");

    let log: HitLog = get_json(&app, "/api/users/a").await;
    assert_eq!(log.hits.len(), 1);
    assert_eq!(log.hits[0].id, hit.id);
}

#[tokio::test]
async fn unknown_user_is_not_found_but_has_empty_stats() {
    let (app, _) = app_at(NOW, "UTC");

    let (status, _) = send(&app, Method::GET, "/api/users/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let stats: Statistics = get_json(&app, "/api/users/ghost/stats").await;
    assert_eq!(stats.total, 0);
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.peak_day, None);
}

#[tokio::test]
async fn invalid_usernames_are_rejected() {
    let (app, _) = app_at(NOW, "UTC");
    let (status, _) = send(&app, Method::POST, "/api/users/bad%20name/hits", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn streak_builds_over_consecutive_days() {
    let (app, clock) = app_at(NOW, "UTC");
    for _ in 0..3 {
        send(&app, Method::POST, "/api/users/a/hits", None).await;
        clock.advance(DAY_MS);
    }
    clock.advance(-DAY_MS);

    let stats: Statistics = get_json(&app, "/api/users/a/stats").await;
    assert_eq!(stats.total, 3);
    assert_eq!(stats.today, 1);
    assert_eq!(stats.current_streak, 3);
    assert_eq!(stats.longest_streak, 3);
}

#[tokio::test]
async fn timezone_change_rebuckets_stored_dates() {
    let (app, _) = app_at(NOW, "UTC");
    send(&app, Method::POST, "/api/users/a/hits", None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/settings/timezone",
        Some(json!({ "timezone": "Europe/Paris" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let settings: SettingsResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(settings.timezone, "Europe/Paris");
    assert_eq!(settings.offset_minutes, 60);
    assert_eq!(settings.display_name, "Europe/Paris (UTC+1)");

    let log: HitLog = get_json(&app, "/api/users/a").await;
    assert_eq!(log.hits[0].date, "2009-02-14");
}

#[tokio::test]
async fn unknown_timezone_setting_is_rejected() {
    let (app, _) = app_at(NOW, "UTC");
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/settings/timezone",
        Some(json!({ "timezone": "Atlantis/Central" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let settings: SettingsResponse = get_json(&app, "/api/settings").await;
    assert_eq!(settings.timezone, "UTC");
}

#[tokio::test]
async fn calendar_defaults_to_the_current_month() {
    let (app, _) = app_at(NOW, "UTC");
    send(&app, Method::POST, "/api/users/a/hits", None).await;

    let grid: CalendarMonth = get_json(&app, "/api/users/a/calendar").await;
    assert_eq!((grid.year, grid.month), (2009, 2));
    // February 1st 2009 was a Sunday.
    assert!(grid.cells[0].is_some());
    let friday = grid.cells[12].as_ref().unwrap();
    assert_eq!(friday.day, 13);
    assert_eq!(friday.count, 1);
    assert_eq!(friday.intensity, 4);

    let (status, _) = send(&app, Method::GET, "/api/users/a/calendar?year=2009&month=13", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logs_are_newest_first() {
    let (app, clock) = app_at(NOW, "UTC");
    for _ in 0..3 {
        send(&app, Method::POST, "/api/users/a/hits", None).await;
        clock.advance(1_000);
    }

    let recent: RecentLog = get_json(&app, "/api/users/a/logs?limit=2").await;
    assert_eq!(recent.total, 3);
    assert_eq!(recent.entries.len(), 2);
    assert_eq!(recent.entries[0].number, 3);
    assert_eq!(recent.entries[0].display, "Feb 13, 2009, 11:31:32 PM");
}

#[tokio::test]
async fn export_then_import_merges_without_duplicates() {
    let (app, _) = app_at(NOW, "UTC");
    send(&app, Method::POST, "/api/users/a/hits", None).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users/a/export")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(
        disposition,
        "attachment; filename=\"hit-tracker-a-2009-02-13.json\""
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let mut exported: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(exported["username"], "a");

    exported["hits"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "id": "older", "timestamp": NOW - DAY_MS, "date": "2009-02-12" }));

    let (status, body) = send(&app, Method::POST, "/api/users/a/import", Some(exported)).await;
    assert_eq!(status, StatusCode::OK);
    let summary: ImportSummary = serde_json::from_slice(&body).unwrap();
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.added, 1);
    assert_eq!(summary.total, 2);

    let log: HitLog = get_json(&app, "/api/users/a").await;
    assert_eq!(log.hits[0].id, "older");
}

#[tokio::test]
async fn import_replace_and_validation() {
    let (app, _) = app_at(NOW, "UTC");
    send(&app, Method::POST, "/api/users/a/hits", None).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users/a/import?mode=replace",
        Some(json!({ "username": "x", "hits": [{ "id": "1", "timestamp": 1, "date": "bad" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8_lossy(&body).contains("YYYY-MM-DD"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users/a/import?mode=replace",
        Some(json!({
            "username": "x",
            "hits": [{ "id": "1", "timestamp": 1, "date": "1970-01-01" }],
            "settings": { "timezone": "Asia/Tokyo" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let summary: ImportSummary = serde_json::from_slice(&body).unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.timezone.as_deref(), Some("Asia/Tokyo"));

    let log: HitLog = get_json(&app, "/api/users/a").await;
    assert_eq!(log.hits.len(), 1);
    assert_eq!(log.hits[0].date, "1970-01-01");
    assert_eq!(log.bucket_timezone.as_deref(), Some("Asia/Tokyo"));
}

#[tokio::test]
async fn timezone_list_has_labels() {
    let (app, _) = app_at(NOW, "UTC");
    let zones: Vec<Value> = get_json(&app, "/api/timezones").await;
    assert!(zones.len() > 20);
    assert!(zones.iter().any(|zone| zone["display_name"] == "Asia/Kolkata (UTC+5:30)"));
}

#[tokio::test]
async fn index_page_renders_for_the_default_user() {
    let (app, _) = app_at(NOW, "UTC");
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(body).unwrap();
    assert!(page.contains(r#"action="/users/guest/hit""#));
    assert!(page.contains("2009-02"));
}
