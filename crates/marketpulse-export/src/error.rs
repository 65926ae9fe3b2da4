use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or writing a report.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("XLSX writing failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The report bytes could not be written to the export directory.
    #[error("failed to write report to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
