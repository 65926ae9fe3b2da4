pub mod app_config;
pub mod calculator;
pub mod config;
pub mod insights;
pub mod listing;
pub mod platform;
pub mod session;
pub mod urls;
pub mod user;

pub use app_config::{AppConfig, AuthBackend, Environment};
pub use calculator::{
    compute_ad_efficiency, compute_margin, parse_price, AdEfficiency, MarginBreakdown,
    MarginHealth, MarginInputs,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use insights::{
    AdTag, AnalysisResult, CatalogItem, CompetitionLevel, CompetitorTitle, CopywritingResult,
    FullListingResult, GeoTrendResult, GroundingSource, MarketplaceSpecifics, OpportunityLevel,
    RegionInterest, TagKind, TitleBenchmarkResult, TrendBoardEntry, TrendResult,
};
pub use listing::{DimensionSet, DimensionSource, ExtractedListing, LinearDimensions, SimilarAd};
pub use platform::Platform;
pub use session::{CalculatorInputs, ListingForm, Session};
pub use urls::{marketplace_search_url, normalize_listing_url, shopping_search_url, url_keywords};
pub use user::{NewUser, Role, User, ROOT_ADMIN_EMAIL};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("session file {path} could not be read: {source}")]
    SessionRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} could not be written: {source}")]
    SessionWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is not valid JSON: {source}")]
    SessionFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
