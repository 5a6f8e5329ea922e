use crate::calendar::build_calendar;
use crate::errors::AppError;
use crate::history::{DEFAULT_LIMIT, recent_hits};
use crate::locale::DisplayLocale;
use crate::models::{
    CalendarMonth, Hit, HitLog, ImportMode, ImportSummary, RecentLog, SettingsResponse,
    Statistics, TimezoneOption, TimezoneRequest,
};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::timezone::{
    common_timezones, display_name, local_date, offset_minutes, parse_timezone,
};
use crate::transfer::{ExportFile, export_file, export_filename, parse_import};
use crate::ui::{PageView, render_index};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{Html, Redirect},
    Json,
};
use chrono::Datelike;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::info;

const MAX_USERNAME_LEN: usize = 64;

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    pub mode: Option<ImportMode>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, AppError> {
    let username = match query.user {
        Some(user) if !user.trim().is_empty() => user,
        _ => state.default_user.clone(),
    };
    validate_username(&username)?;

    let (log, tz, now) = snapshot(&state, &username).await?;
    let today = local_date(now, tz);
    let stats = build_stats(&log.hits, tz, now);
    let calendar = build_calendar(&log.hits, tz, today.year(), today.month());
    let recent = recent_hits(&log.hits, tz, state.locale, DEFAULT_LIMIT);

    Ok(Html(render_index(&PageView {
        username: &username,
        timezone: display_name(tz, now),
        locale: state.locale,
        stats: &stats,
        calendar: calendar.as_ref(),
        recent: &recent,
    })))
}

pub async fn hit_from_page(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Redirect, AppError> {
    validate_username(&username)?;
    append_hit(&state, &username).await?;
    Ok(Redirect::to(&format!("/?user={username}")))
}

pub async fn get_log(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<HitLog>, AppError> {
    validate_username(&username)?;
    let owner = username.clone();
    state
        .with_store(move |store| store.load(&owner))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("no data for {username}")))
}

pub async fn add_hit(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Hit>, AppError> {
    validate_username(&username)?;
    let hit = append_hit(&state, &username).await?;
    Ok(Json(hit))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Statistics>, AppError> {
    validate_username(&username)?;
    let (log, tz, now) = snapshot(&state, &username).await?;
    Ok(Json(build_stats(&log.hits, tz, now)))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarMonth>, AppError> {
    validate_username(&username)?;
    let (log, tz, now) = snapshot(&state, &username).await?;
    let today = local_date(now, tz);
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());

    build_calendar(&log.hits, tz, year, month)
        .map(Json)
        .ok_or_else(|| AppError::bad_request(format!("invalid month {year}-{month}")))
}

pub async fn get_logs(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<RecentLog>, AppError> {
    validate_username(&username)?;
    let (log, tz, _) = snapshot(&state, &username).await?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    Ok(Json(recent_hits(&log.hits, tz, state.locale, limit)))
}

pub async fn export(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<([(header::HeaderName, String); 1], Json<ExportFile>), AppError> {
    validate_username(&username)?;
    let (log, tz, now) = snapshot(&state, &username).await?;
    let filename = export_filename(&username, local_date(now, tz));
    Ok((
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )],
        Json(export_file(&log)),
    ))
}

pub async fn import(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> Result<Json<ImportSummary>, AppError> {
    validate_username(&username)?;
    let file = parse_import(&body)?;
    if file.username != username {
        info!("importing data exported by {} into {username}", file.username);
    }

    let mode = query.mode.unwrap_or_default();
    let summary = state
        .with_store(move |store| store.import(&username, file, mode))
        .await??;
    Ok(Json(summary))
}

pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    let store = state.store.lock().await;
    Json(settings_response(store.timezone(), store.now_ms(), state.locale))
}

pub async fn set_timezone(
    State(state): State<AppState>,
    Json(payload): Json<TimezoneRequest>,
) -> Result<Json<SettingsResponse>, AppError> {
    let tz = parse_timezone(&payload.timezone)
        .ok_or_else(|| AppError::bad_request(format!("unknown timezone {:?}", payload.timezone)))?;

    let now = state
        .with_store(move |store| store.set_timezone(tz).map(|()| store.now_ms()))
        .await??;
    Ok(Json(settings_response(tz, now, state.locale)))
}

pub async fn list_timezones(State(state): State<AppState>) -> Json<Vec<TimezoneOption>> {
    let now = state.store.lock().await.now_ms();
    let options = common_timezones()
        .iter()
        .filter_map(|name| parse_timezone(name))
        .map(|tz| TimezoneOption {
            id: tz.name().to_string(),
            display_name: display_name(tz, now),
        })
        .collect();
    Json(options)
}

async fn append_hit(state: &AppState, username: &str) -> Result<Hit, AppError> {
    let owner = username.to_string();
    let hit = state
        .with_store(move |store| store.append(&owner))
        .await??;
    info!("recorded hit {} for {username} on {}", hit.id, hit.date);
    Ok(hit)
}

async fn snapshot(state: &AppState, username: &str) -> Result<(HitLog, Tz, i64), AppError> {
    let owner = username.to_string();
    state
        .with_store(move |store| {
            let log = store.load_or_empty(&owner);
            (log, store.timezone(), store.now_ms())
        })
        .await
}

fn settings_response(tz: Tz, now: i64, locale: DisplayLocale) -> SettingsResponse {
    SettingsResponse {
        timezone: tz.name().to_string(),
        display_name: display_name(tz, now),
        offset_minutes: offset_minutes(tz, now),
        locale: locale.to_string(),
    }
}

fn validate_username(username: &str) -> Result<(), AppError> {
    let valid = !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "username must be 1-64 letters, digits, '-', '_' or '.'",
        ))
    }
}
