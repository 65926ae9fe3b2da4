//! Raw payloads of the structured answers, before normalization.
//!
//! Everything is optional and scalar fields accept numbers as well as
//! strings: the schema asks for strings, but the service does not always
//! comply and one stray number must not discard a whole answer.

use marketpulse_core::{LinearDimensions, MarketplaceSpecifics, SimilarAd};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDimensionSet {
    #[serde(deserialize_with = "lenient_string")]
    pub height: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub width: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub length: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub weight: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawExtraction {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub price: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub platform: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub seller: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub stock: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub rating: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub reviews_count: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub item_location: Option<String>,
    pub product_dimensions: Option<RawDimensionSet>,
    pub package_dimensions: Option<RawDimensionSet>,
    pub dimensions_details: Option<LinearDimensions>,
    #[serde(deserialize_with = "lenient_string")]
    pub weight: Option<String>,
    /// Free-text measures such as `"20 x 30 x 10 cm"`.
    #[serde(deserialize_with = "lenient_string")]
    pub dimensions: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub logistics: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub listing_age: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub sales_estimate: Option<String>,
    pub similar_ads: Option<Vec<SimilarAd>>,
    pub actionable_insights: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTrends {
    pub overview: Option<String>,
    pub trending_products: Option<Vec<String>>,
    pub price_range: Option<String>,
    pub opportunity_level: Option<String>,
    pub marketplace_specifics: Option<MarketplaceSpecifics>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCatalogItem {
    #[serde(deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub winning_price: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub competition_level: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub tip_to_win: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub product_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Title benchmark
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCompetitorTitle {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub platform: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub seller_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub item_location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTitleBenchmark {
    pub competitor_titles: Vec<RawCompetitorTitle>,
    pub pattern_analysis: Option<String>,
    pub suggested_titles: Vec<String>,
    pub high_volume_keywords: Vec<String>,
}

// ---------------------------------------------------------------------------
// Geo demand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRegion {
    #[serde(deserialize_with = "lenient_string")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub interest_level: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGeoTrends {
    pub top_regions: Vec<RawRegion>,
    pub related_queries: Vec<String>,
    pub seasonal_insight: Option<String>,
}
