// ABOUTME: HTTP request handlers for scan operations
// ABOUTME: Records scans by code or entry, lists and deletes them, and summarizes dates

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use scansheet_core::parse_scan_date;
use scansheet_scans::{RecordScanInput, ScanFilter, ScanOrder};

use crate::db::DbState;
use crate::error::{ApiResult, AppError};
use crate::pagination::{PaginatedResponse, PaginationParams};
use crate::response::{created, ok};

/// Empty query values mean "no filter"
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Request body for recording a scan
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordScanRequest {
    pub code: Option<String>,
    pub entry_id: Option<String>,
    pub category_id: Option<String>,
    /// `YYYY-MM-DD`, defaults to today
    pub date: Option<String>,
}

/// Record a scan from a badge code or a manual mark
pub async fn record_scan(
    State(db): State<DbState>,
    Json(request): Json<RecordScanRequest>,
) -> ApiResult<Response> {
    info!(
        "Recording scan (code: {:?}, entry: {:?}, category: {:?})",
        request.code, request.entry_id, request.category_id
    );

    let date = non_empty(request.date)
        .map(|d| parse_scan_date(&d))
        .transpose()?;

    let input = RecordScanInput {
        code: non_empty(request.code),
        entry_id: non_empty(request.entry_id),
        category_id: non_empty(request.category_id),
        date,
    };

    let scan = db.scan_storage.record_scan(input).await?;
    Ok(created(scan))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListScansQuery {
    pub date: Option<String>,
    pub category_id: Option<String>,
    pub code: Option<String>,
}

impl ListScansQuery {
    pub(crate) fn into_filter(self) -> ApiResult<ScanFilter> {
        let date = non_empty(self.date)
            .map(|d| parse_scan_date(&d))
            .transpose()?;

        Ok(ScanFilter {
            date,
            category_id: non_empty(self.category_id),
            code: non_empty(self.code),
        })
    }
}

/// List scans, newest first
pub async fn list_scans(
    State(db): State<DbState>,
    Query(pagination): Query<PaginationParams>,
    Query(params): Query<ListScansQuery>,
) -> ApiResult<Response> {
    let filter = params.into_filter()?;
    info!("Listing scans (page: {}, filter: {:?})", pagination.page(), filter);

    let (scans, total) = db
        .scan_storage
        .list_scans_paginated(
            &filter,
            ScanOrder::Newest,
            Some(pagination.limit()),
            Some(pagination.offset()),
        )
        .await?;

    Ok(ok(PaginatedResponse::new(scans, &pagination, total)))
}

/// Get a single scan by ID
pub async fn get_scan(
    State(db): State<DbState>,
    Path(scan_id): Path<String>,
) -> impl IntoResponse {
    info!("Getting scan: {}", scan_id);

    match db.scan_storage.get_scan(&scan_id).await {
        Ok(scan) => ok(scan),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Delete a single scan
pub async fn delete_scan(
    State(db): State<DbState>,
    Path(scan_id): Path<String>,
) -> impl IntoResponse {
    info!("Deleting scan: {}", scan_id);

    match db.scan_storage.delete_scan(&scan_id).await {
        Ok(()) => ok("Scan deleted successfully"),
        Err(e) => AppError::from(e).into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDatesQuery {
    pub category_id: Option<String>,
}

/// Days that have scans, newest first
pub async fn list_dates(
    State(db): State<DbState>,
    Query(params): Query<ListDatesQuery>,
) -> impl IntoResponse {
    let category_id = non_empty(params.category_id);
    info!("Listing scan dates (category: {:?})", category_id);

    match db.scan_storage.list_dates(category_id.as_deref()).await {
        Ok(dates) => ok(dates),
        Err(e) => AppError::from(e).into_response(),
    }
}
