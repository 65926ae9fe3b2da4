use chrono::{DateTime, Local};
use marketpulse_core::{
    AnalysisResult, CopywritingResult, ExtractedListing, Session, TrendResult,
};

/// Everything a report is built from, borrowed from the session.
#[derive(Debug, Clone, Copy)]
pub struct ReportBundle<'a> {
    pub listing: &'a ExtractedListing,
    pub analysis: Option<&'a AnalysisResult>,
    pub trends: Option<&'a TrendResult>,
    pub copy: Option<&'a CopywritingResult>,
    pub source_url: Option<&'a str>,
    pub generated_at: DateTime<Local>,
}

impl<'a> ReportBundle<'a> {
    /// Collects the session results; `None` when no listing was extracted.
    #[must_use]
    pub fn from_session(session: &'a Session, generated_at: DateTime<Local>) -> Option<Self> {
        let listing = session.listing.as_ref()?;
        Some(Self {
            listing,
            analysis: session.analysis.as_ref(),
            trends: session.trends.as_ref(),
            copy: session.copy.as_ref(),
            source_url: session.source_url.as_deref(),
            generated_at,
        })
    }

    /// Date printed in the report header (`dd/mm/yyyy`).
    #[must_use]
    pub fn generated_on(&self) -> String {
        self.generated_at.format("%d/%m/%Y").to_string()
    }
}
