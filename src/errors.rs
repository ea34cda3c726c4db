// errors.rs

use std::fmt;

/// Errors originating from routing, ingestion, report generation,
/// or the external CRM lookup.
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    /// No portfolio has been uploaded yet this session.
    NoPortfolio,
    CsvError(String),
    PdfError(String),
    XlsxError(String),
    CrmError(String),
    InternalError,
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::NoPortfolio => {
                write!(f, "No portfolio loaded. Upload a CRM CSV export first.")
            }
            ServerError::CsvError(msg) => write!(f, "CSV Error: {msg}"),
            ServerError::PdfError(msg) => write!(f, "PDF Error: {msg}"),
            ServerError::XlsxError(msg) => write!(f, "Spreadsheet Error: {msg}"),
            ServerError::CrmError(msg) => write!(f, "CRM Error: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}
