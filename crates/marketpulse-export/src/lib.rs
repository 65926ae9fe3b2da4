//! Report exporter: the analyzer session as a paginated PDF or a multi-sheet
//! XLSX workbook.
//!
//! Both exports are no-ops when the session holds no extracted listing.

pub mod bundle;
pub mod error;
pub mod pdf;
pub mod value;
pub mod workbook;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use marketpulse_core::Session;

pub use bundle::ReportBundle;
pub use error::ExportError;
pub use pdf::ReportLayout;
pub use value::render_value;

/// `Relatorio_MarketPulse_<unix millis>.<extension>`.
#[must_use]
pub fn report_file_name(extension: &str, at: DateTime<Local>) -> String {
    format!("Relatorio_MarketPulse_{}.{extension}", at.timestamp_millis())
}

/// Writes the PDF report of `session` into `export_dir`.
///
/// Returns the written path, or `None` when there is no listing to report.
///
/// # Errors
///
/// - [`ExportError::Pdf`] if rendering fails.
/// - [`ExportError::Io`] if the directory or file cannot be written.
pub fn export_pdf(session: &Session, export_dir: &Path) -> Result<Option<PathBuf>, ExportError> {
    export_pdf_at(session, export_dir, Local::now())
}

/// [`export_pdf`] with an explicit generation time.
///
/// # Errors
///
/// See [`export_pdf`].
pub fn export_pdf_at(
    session: &Session,
    export_dir: &Path,
    at: DateTime<Local>,
) -> Result<Option<PathBuf>, ExportError> {
    let Some(bundle) = ReportBundle::from_session(session, at) else {
        tracing::warn!("no extracted listing, skipping PDF export");
        return Ok(None);
    };

    let layout = ReportLayout::build(&bundle);
    let bytes = pdf::render(&layout)?;
    let path = write_report(export_dir, &report_file_name("pdf", at), &bytes)?;
    tracing::info!(path = %path.display(), pages = layout.pages.len(), "PDF report written");
    Ok(Some(path))
}

/// Writes the XLSX report of `session` into `export_dir`.
///
/// Returns the written path, or `None` when there is no listing to report.
///
/// # Errors
///
/// - [`ExportError::Xlsx`] if the workbook cannot be built.
/// - [`ExportError::Io`] if the directory or file cannot be written.
pub fn export_xlsx(session: &Session, export_dir: &Path) -> Result<Option<PathBuf>, ExportError> {
    export_xlsx_at(session, export_dir, Local::now())
}

/// [`export_xlsx`] with an explicit generation time.
///
/// # Errors
///
/// See [`export_xlsx`].
pub fn export_xlsx_at(
    session: &Session,
    export_dir: &Path,
    at: DateTime<Local>,
) -> Result<Option<PathBuf>, ExportError> {
    let Some(bundle) = ReportBundle::from_session(session, at) else {
        tracing::warn!("no extracted listing, skipping XLSX export");
        return Ok(None);
    };

    let sheets = workbook::build_sheets(&bundle);
    let bytes = workbook::write_xlsx(&sheets)?;
    let path = write_report(export_dir, &report_file_name("xlsx", at), &bytes)?;
    tracing::info!(path = %path.display(), sheets = sheets.len(), "XLSX report written");
    Ok(Some(path))
}

fn write_report(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
