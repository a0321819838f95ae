// ABOUTME: HTTP API layer for Scansheet providing REST endpoints and routing
// ABOUTME: Integration layer that wires the domain packages into axum routers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    routing::{get, post},
    Router,
};

pub mod categories_handlers;
pub mod db;
pub mod entries_handlers;
pub mod error;
pub mod export_handlers;
pub mod health;
pub mod pagination;
pub mod response;
pub mod scans_handlers;

pub use db::DbState;
pub use error::{ApiResult, AppError};
pub use response::ApiResponse;

/// Creates the entries API router (nested under /api/entries)
pub fn create_entries_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(entries_handlers::list_entries).post(entries_handlers::create_entry),
        )
        .route("/import", post(entries_handlers::import_entries))
        .route("/badges", post(entries_handlers::print_badges))
        .route(
            "/{id}",
            get(entries_handlers::get_entry)
                .put(entries_handlers::update_entry)
                .delete(entries_handlers::delete_entry),
        )
        .route(
            "/{id}/regenerate-code",
            post(entries_handlers::regenerate_code),
        )
        .route("/{id}/qr", get(entries_handlers::get_entry_qr))
        .route("/{id}/scans", get(entries_handlers::list_entry_scans))
}

/// Creates the categories API router (nested under /api/categories)
pub fn create_categories_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(categories_handlers::list_categories).post(categories_handlers::create_category),
        )
        .route(
            "/{id}",
            get(categories_handlers::get_category)
                .put(categories_handlers::update_category)
                .delete(categories_handlers::delete_category),
        )
}

/// Creates the scans API router (nested under /api/scans)
pub fn create_scans_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(scans_handlers::list_scans).post(scans_handlers::record_scan),
        )
        .route(
            "/{id}",
            get(scans_handlers::get_scan).delete(scans_handlers::delete_scan),
        )
}

/// Creates the export API router (nested under /api/export)
pub fn create_export_router() -> Router<DbState> {
    Router::new()
        .route("/csv", get(export_handlers::export_csv))
        .route("/pdf", get(export_handlers::export_pdf))
}

/// Full `/api` surface bound to a database
pub fn create_api_router(state: DbState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/dates", get(scans_handlers::list_dates))
        .nest("/entries", create_entries_router())
        .nest("/categories", create_categories_router())
        .nest("/scans", create_scans_router())
        .nest("/export", create_export_router())
        .fallback(api_not_found);

    Router::new().nest("/api", api).with_state(state)
}

async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        ResponseJson(ApiResponse::<()>::error("Not found".to_string())),
    )
}
