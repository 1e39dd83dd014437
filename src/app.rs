use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/submit", get(handlers::submit_page).post(handlers::submit))
        .route("/success", get(handlers::success_page))
        .route("/calendar", get(handlers::calendar_page))
        .route("/api/calendar", get(handlers::api_calendar))
        .route("/mod", get(handlers::mod_index))
        .route("/mod/show/:status/sortby/:order", get(handlers::mod_show))
        .route("/mod/edit/status", post(handlers::mod_edit_status))
        .route("/mod/export", get(handlers::mod_export))
        .with_state(state)
}
