use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/users/:username/hit", post(handlers::hit_from_page))
        .route("/api/users/:username", get(handlers::get_log))
        .route("/api/users/:username/hits", post(handlers::add_hit))
        .route("/api/users/:username/stats", get(handlers::get_stats))
        .route("/api/users/:username/calendar", get(handlers::get_calendar))
        .route("/api/users/:username/logs", get(handlers::get_logs))
        .route("/api/users/:username/export", get(handlers::export))
        .route("/api/users/:username/import", post(handlers::import))
        .route("/api/settings", get(handlers::get_settings))
        .route("/api/settings/timezone", put(handlers::set_timezone))
        .route("/api/timezones", get(handlers::list_timezones))
        .with_state(state)
}
