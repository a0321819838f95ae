// ABOUTME: HTTP request handlers for entry operations
// ABOUTME: CRUD, code rotation, QR images, per-entry scans, CSV import, and badge sheets

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use scansheet_entries::{EntryCreateInput, EntryUpdateInput};
use scansheet_export::{render_badge_sheet, render_qr_svg};
use scansheet_scans::{ScanFilter, ScanOrder};

use crate::db::DbState;
use crate::error::{ApiResult, AppError};
use crate::pagination::{PaginatedResponse, PaginationParams};
use crate::response::{created, ok};

#[derive(Deserialize)]
pub struct ListEntriesQuery {
    pub search: Option<String>,
}

/// List entries, optionally filtered by a name/code search
pub async fn list_entries(
    State(db): State<DbState>,
    Query(pagination): Query<PaginationParams>,
    Query(params): Query<ListEntriesQuery>,
) -> impl IntoResponse {
    let search = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    info!(
        "Listing entries (page: {}, search: {:?})",
        pagination.page(),
        search
    );

    match db
        .entry_storage
        .list_entries_paginated(search, Some(pagination.limit()), Some(pagination.offset()))
        .await
    {
        Ok((entries, total)) => ok(PaginatedResponse::new(entries, &pagination, total)),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Get a single entry by ID
pub async fn get_entry(
    State(db): State<DbState>,
    Path(entry_id): Path<String>,
) -> impl IntoResponse {
    info!("Getting entry: {}", entry_id);

    match db.entry_storage.get_entry(&entry_id).await {
        Ok(entry) => ok(entry),
        Err(e) => AppError::from(e).into_response(),
    }
}

#[derive(Deserialize)]
pub struct CreateEntryRequest {
    pub name: String,
    pub notes: Option<String>,
}

/// Create a new entry with a fresh code
pub async fn create_entry(
    State(db): State<DbState>,
    Json(request): Json<CreateEntryRequest>,
) -> impl IntoResponse {
    info!("Creating entry: {}", request.name);

    let input = EntryCreateInput {
        name: request.name,
        notes: request.notes,
    };

    match db.entry_storage.create_entry(input).await {
        Ok(entry) => created(entry),
        Err(e) => AppError::from(e).into_response(),
    }
}

#[derive(Deserialize)]
pub struct UpdateEntryRequest {
    pub name: Option<String>,
    pub notes: Option<String>,
}

/// Update an entry's name and/or notes
pub async fn update_entry(
    State(db): State<DbState>,
    Path(entry_id): Path<String>,
    Json(request): Json<UpdateEntryRequest>,
) -> impl IntoResponse {
    info!("Updating entry: {}", entry_id);

    let input = EntryUpdateInput {
        name: request.name,
        notes: request.notes,
    };

    match db.entry_storage.update_entry(&entry_id, input).await {
        Ok(entry) => ok(entry),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Delete an entry along with its scans
pub async fn delete_entry(
    State(db): State<DbState>,
    Path(entry_id): Path<String>,
) -> impl IntoResponse {
    info!("Deleting entry: {}", entry_id);

    match db.entry_storage.delete_entry(&entry_id).await {
        Ok(outcome) => ok(outcome),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Issue a new code; existing scans follow it
pub async fn regenerate_code(
    State(db): State<DbState>,
    Path(entry_id): Path<String>,
) -> impl IntoResponse {
    info!("Regenerating code for entry: {}", entry_id);

    match db.entry_storage.regenerate_code(&entry_id).await {
        Ok(entry) => ok(entry),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// QR code for an entry as SVG
pub async fn get_entry_qr(
    State(db): State<DbState>,
    Path(entry_id): Path<String>,
) -> ApiResult<Response> {
    info!("Rendering QR for entry: {}", entry_id);

    let entry = db.entry_storage.get_entry(&entry_id).await?;
    let svg = render_qr_svg(&entry.code)?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        svg,
    )
        .into_response())
}

/// Scans recorded for an entry, newest first
pub async fn list_entry_scans(
    State(db): State<DbState>,
    Path(entry_id): Path<String>,
) -> ApiResult<Response> {
    info!("Listing scans for entry: {}", entry_id);

    let entry = db.entry_storage.get_entry(&entry_id).await?;
    let filter = ScanFilter {
        code: Some(entry.code),
        ..Default::default()
    };
    let scans = db.scan_storage.list_scans(&filter, ScanOrder::Newest).await?;

    Ok(ok(scans))
}

#[derive(Deserialize)]
pub struct ImportEntriesRequest {
    pub csv: String,
}

/// Bulk-create entries from CSV text with a `name` column
pub async fn import_entries(
    State(db): State<DbState>,
    Json(request): Json<ImportEntriesRequest>,
) -> impl IntoResponse {
    info!("Importing entries from CSV ({} bytes)", request.csv.len());

    match db.entry_storage.import_csv(&request.csv).await {
        Ok(summary) => ok(summary),
        Err(e) => AppError::from(e).into_response(),
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BadgesRequest {
    /// All entries when omitted
    pub entry_ids: Option<Vec<String>>,
}

/// Printable PDF of QR badges. A request without a JSON body prints every entry.
pub async fn print_badges(
    State(db): State<DbState>,
    request: Option<Json<BadgesRequest>>,
) -> ApiResult<Response> {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    let entries = match request.entry_ids {
        Some(ids) => db.entry_storage.get_entries_by_ids(&ids).await?,
        None => db.entry_storage.list_entries(None).await?,
    };
    info!("Printing {} badge(s)", entries.len());

    let pdf = tokio::task::spawn_blocking(move || render_badge_sheet(&entries))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"scansheet-badges.pdf\"",
            ),
        ],
        pdf,
    )
        .into_response())
}
