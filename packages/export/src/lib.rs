// ABOUTME: Export formats for Scansheet data
// ABOUTME: CSV and PDF attendance reports, QR code rendering, and printable badge sheets

pub mod badges;
pub mod csv_report;
pub mod error;
pub mod pdf_report;
pub mod qr;

#[cfg(test)]
mod test_support;

pub use badges::render_badge_sheet;
pub use csv_report::{export_filename, write_scans_csv, CSV_HEADER};
pub use error::{ExportError, ExportResult};
pub use pdf_report::{render_scans_pdf, ROWS_PER_PAGE};
pub use qr::{render_qr_svg, QrMatrix};
