// ABOUTME: HTTP request handlers for attendance exports
// ABOUTME: Streams filtered scans as CSV or PDF downloads

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use scansheet_core::parse_scan_date;
use scansheet_export::{export_filename, render_scans_pdf, write_scans_csv};
use scansheet_scans::{Scan, ScanFilter, ScanOrder};

use crate::db::DbState;
use crate::error::{ApiResult, AppError};
use crate::scans_handlers::non_empty;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub date: Option<String>,
    pub category_id: Option<String>,
}

/// Scans selected for an export plus what they were filtered by
struct ExportSelection {
    date: Option<NaiveDate>,
    category_name: Option<String>,
    scans: Vec<Scan>,
}

impl ExportSelection {
    fn filename(&self, extension: &str) -> String {
        export_filename(self.date, self.category_name.as_deref(), extension)
    }

    fn title(&self) -> String {
        let date = self
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "All dates".to_string());
        let category = self
            .category_name
            .clone()
            .unwrap_or_else(|| "All categories".to_string());
        format!("Attendance - {} - {}", date, category)
    }
}

async fn select_scans(db: &DbState, query: ExportQuery) -> ApiResult<ExportSelection> {
    let date = non_empty(query.date)
        .map(|d| parse_scan_date(&d))
        .transpose()?;

    // Resolve the category first so an unknown id is a 404, not an empty file
    let category_name = match non_empty(query.category_id.clone()) {
        Some(id) => Some(db.category_storage.get_category(&id).await?.name),
        None => None,
    };

    let filter = ScanFilter {
        date,
        category_id: non_empty(query.category_id),
        code: None,
    };
    let scans = db.scan_storage.list_scans(&filter, ScanOrder::Report).await?;

    Ok(ExportSelection {
        date,
        category_name,
        scans,
    })
}

fn attachment(content_type: &'static str, filename: String, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Download scans as CSV
pub async fn export_csv(
    State(db): State<DbState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let selection = select_scans(&db, query).await?;
    info!("Exporting {} scan(s) as CSV", selection.scans.len());

    let csv = write_scans_csv(&selection.scans)?;
    Ok(attachment(
        "text/csv; charset=utf-8",
        selection.filename("csv"),
        csv,
    ))
}

/// Download scans as a paginated PDF table
pub async fn export_pdf(
    State(db): State<DbState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Response> {
    let selection = select_scans(&db, query).await?;
    info!("Exporting {} scan(s) as PDF", selection.scans.len());

    let filename = selection.filename("pdf");
    let pdf = tokio::task::spawn_blocking(move || {
        render_scans_pdf(&selection.title(), &selection.scans)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(attachment("application/pdf", filename, pdf))
}
