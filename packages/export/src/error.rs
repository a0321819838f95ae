// ABOUTME: Error type for report and badge generation
// ABOUTME: Wraps CSV, PDF, and QR encoder failures

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("QR encoding error: {0}")]
    Qr(#[from] qrcode::types::QrError),
}

impl From<printpdf::Error> for ExportError {
    fn from(err: printpdf::Error) -> Self {
        ExportError::Pdf(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
