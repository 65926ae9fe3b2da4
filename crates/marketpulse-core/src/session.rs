//! Analyzer session state: the form, the fetched results and the calculator
//! inputs, persisted as one JSON document between command invocations.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculator::{
    compute_ad_efficiency, compute_margin, parse_price, suggested_cost, AdEfficiency,
    MarginBreakdown, MarginInputs,
};
use crate::insights::{AnalysisResult, CopywritingResult, TrendResult};
use crate::listing::ExtractedListing;
use crate::platform::Platform;
use crate::CoreError;

/// The editable listing fields of the analyzer form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub platform: Platform,
}

/// Calculator inputs. Rates are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculatorInputs {
    pub cost_price: Decimal,
    pub tax_rate: Decimal,
    pub platform_fee: Decimal,
    pub shipping_cost: Decimal,
    pub ad_spend: Decimal,
    pub ad_revenue: Decimal,
}

impl Default for CalculatorInputs {
    fn default() -> Self {
        Self {
            cost_price: Decimal::ZERO,
            tax_rate: Decimal::from(10),
            platform_fee: Decimal::from(16),
            shipping_cost: Decimal::from(20),
            ad_spend: Decimal::ZERO,
            ad_revenue: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub source_url: Option<String>,
    pub form: ListingForm,
    pub listing: Option<ExtractedListing>,
    pub analysis: Option<AnalysisResult>,
    pub trends: Option<TrendResult>,
    pub copy: Option<CopywritingResult>,
    pub calculator: CalculatorInputs,
}

impl Session {
    /// Loads the session stored at `path`; a missing file yields an empty session.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionRead`] when the file exists but cannot be
    /// read, or [`CoreError::SessionFormat`] when it is not a session document.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no session file, starting fresh");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CoreError::SessionRead {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| CoreError::SessionFormat {
            path: path.display().to_string(),
            source,
        })
    }

    /// Writes the session to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionWrite`] on any filesystem failure.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let write_err = |source| CoreError::SessionWrite {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| CoreError::SessionFormat {
            path: path.display().to_string(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(write_err)
    }

    /// Starts a new extraction for `url`: every previous result is discarded.
    pub fn begin_extraction(&mut self, url: &str) {
        self.source_url = Some(url.trim().to_string());
        self.listing = None;
        self.analysis = None;
        self.trends = None;
        self.copy = None;
    }

    /// Stores a completed extraction and derives form and calculator defaults
    /// from it.
    pub fn apply_extraction(&mut self, listing: ExtractedListing) {
        self.form = ListingForm {
            title: listing.title.clone(),
            description: listing.description.clone(),
            price: listing.price.clone(),
            platform: listing.platform,
        };

        if let Some(fee) = listing.platform.default_fee_percent() {
            self.calculator.platform_fee = fee;
        }

        if self.calculator.cost_price.is_zero() {
            if let Some(price) = parse_price(&listing.price) {
                self.calculator.cost_price = suggested_cost(price);
                tracing::debug!(
                    cost = %self.calculator.cost_price,
                    "seeded cost price from extracted price"
                );
            }
        }

        self.listing = Some(listing);
    }

    /// Drops everything, keeping only the calculator rates.
    pub fn clear(&mut self) {
        let calculator = CalculatorInputs {
            cost_price: Decimal::ZERO,
            ..self.calculator
        };
        *self = Self {
            calculator,
            ..Self::default()
        };
    }

    /// Margin for the current form price, or `None` when it does not parse
    /// or the inputs are out of range.
    #[must_use]
    pub fn margin(&self) -> Option<MarginBreakdown> {
        let sale_price = parse_price(&self.form.price)?;
        compute_margin(&MarginInputs {
            sale_price,
            cost_price: self.calculator.cost_price,
            tax_rate: self.calculator.tax_rate,
            platform_fee: self.calculator.platform_fee,
            shipping_cost: self.calculator.shipping_cost,
        })
    }

    #[must_use]
    pub fn ad_efficiency(&self) -> AdEfficiency {
        compute_ad_efficiency(self.calculator.ad_spend, self.calculator.ad_revenue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(platform: Platform, price: &str) -> ExtractedListing {
        ExtractedListing {
            title: "Tênis X".into(),
            price: price.into(),
            description: "Leve e confortável".into(),
            platform,
            ..ExtractedListing::default()
        }
    }

    #[test]
    fn begin_extraction_clears_previous_results() {
        let mut session = Session {
            listing: Some(listing(Platform::Amazon, "R$ 10,00")),
            analysis: Some(AnalysisResult::default()),
            copy: Some(CopywritingResult::default()),
            ..Session::default()
        };
        session.begin_extraction(" https://shopee.com.br/x ");
        assert_eq!(session.source_url.as_deref(), Some("https://shopee.com.br/x"));
        assert!(session.listing.is_none());
        assert!(session.analysis.is_none());
        assert!(session.trends.is_none());
        assert!(session.copy.is_none());
    }

    #[test]
    fn apply_extraction_fills_form_and_defaults() {
        let mut session = Session::default();
        session.apply_extraction(listing(Platform::Shopee, "R$ 89,90"));
        assert_eq!(session.form.title, "Tênis X");
        assert_eq!(session.form.platform, Platform::Shopee);
        assert_eq!(session.calculator.platform_fee, Decimal::from(14));
        assert_eq!(session.calculator.cost_price, "44.95".parse::<Decimal>().unwrap());
    }

    #[test]
    fn apply_extraction_keeps_user_cost() {
        let mut session = Session::default();
        session.calculator.cost_price = Decimal::from(30);
        session.apply_extraction(listing(Platform::Generic, "R$ 89,90"));
        assert_eq!(session.calculator.cost_price, Decimal::from(30));
        // Generic has no commission estimate; the previous fee stays.
        assert_eq!(session.calculator.platform_fee, Decimal::from(16));
    }

    #[test]
    fn margin_uses_form_price() {
        let mut session = Session::default();
        session.form.price = "R$ 200,00".into();
        session.calculator.cost_price = Decimal::from(100);
        let margin = session.margin().unwrap();
        assert_eq!(margin.display_margin(), "14.0%");

        session.form.price = "consulte".into();
        assert!(session.margin().is_none());

        session.form.price = "R$ 200,00".into();
        session.calculator.cost_price = Decimal::MAX;
        session.calculator.shipping_cost = Decimal::MAX;
        assert!(session.margin().is_none());
    }

    #[test]
    fn save_and_load_preserve_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let mut session = Session::default();
        session.begin_extraction("https://www.amazon.com.br/dp/B0X");
        session.apply_extraction(listing(Platform::Amazon, "R$ 50,00"));
        session.save(&path).unwrap();

        let loaded = Session::load(&path).unwrap();
        assert_eq!(loaded, session);
    }

    #[test]
    fn load_missing_file_gives_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Session::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, Session::default());
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Session::load(&path),
            Err(CoreError::SessionFormat { .. })
        ));
    }

    #[test]
    fn clear_keeps_rates_only() {
        let mut session = Session::default();
        session.calculator.tax_rate = Decimal::from(6);
        session.apply_extraction(listing(Platform::Amazon, "R$ 50,00"));
        session.clear();
        assert!(session.listing.is_none());
        assert_eq!(session.form, ListingForm::default());
        assert_eq!(session.calculator.tax_rate, Decimal::from(6));
        assert_eq!(session.calculator.cost_price, Decimal::ZERO);
    }
}
