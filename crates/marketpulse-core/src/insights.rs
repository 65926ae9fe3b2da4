//! Result shapes returned by the AI-backed tasks after normalization.
//!
//! Enumerations whose wire values are Portuguese labels (`Baixa`, `Média`,
//! `Alta`, `Extrema`) are parsed leniently: unknown labels map to a middle
//! value instead of failing the whole payload.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::platform::Platform;

// ---------------------------------------------------------------------------
// Listing analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Positive,
    Negative,
    #[default]
    #[serde(other)]
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdTag {
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: TagKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Algorithmic "x-ray" of a listing.
///
/// `score` is stored exactly as the service returned it; it is not clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: i64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
    #[serde(default)]
    pub description_improvement: String,
    #[serde(default)]
    pub price_analysis: String,
    #[serde(default)]
    pub tags: Vec<AdTag>,
    #[serde(default)]
    pub action_plan: Vec<String>,
}

// ---------------------------------------------------------------------------
// Market trends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpportunityLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl OpportunityLevel {
    /// Parses `Baixa`/`Média`/`Alta` (or the English names).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match fold_label(label).as_str() {
            "baixa" | "low" => Some(Self::Low),
            "media" | "medium" => Some(Self::Medium),
            "alta" | "high" => Some(Self::High),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Baixa",
            Self::Medium => "Média",
            Self::High => "Alta",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompetitionLevel {
    Low,
    #[default]
    Medium,
    High,
    Extreme,
}

impl CompetitionLevel {
    /// Parses `Baixa`/`Média`/`Alta`/`Extrema` (or the English names).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match fold_label(label).as_str() {
            "baixa" | "low" => Some(Self::Low),
            "media" | "medium" => Some(Self::Medium),
            "alta" | "high" => Some(Self::High),
            "extrema" | "extreme" => Some(Self::Extreme),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Baixa",
            Self::Medium => "Média",
            Self::High => "Alta",
            Self::Extreme => "Extrema",
        }
    }
}

fn fold_label(label: &str) -> String {
    label.trim().to_lowercase().replace('é', "e")
}

macro_rules! label_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = Option::<String>::deserialize(deserializer)?;
                Ok(raw
                    .as_deref()
                    .and_then(<$ty>::from_label)
                    .unwrap_or_default())
            }
        }
    };
}

label_serde!(OpportunityLevel);
label_serde!(CompetitionLevel);

/// A web page cited by the search-augmented phase of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// Best sellers per marketplace. Lists may be empty; the struct is always
/// present on a completed [`TrendResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceSpecifics {
    #[serde(default)]
    pub mercado_livre: Vec<String>,
    #[serde(default)]
    pub amazon: Vec<String>,
    #[serde(default)]
    pub shopee: Vec<String>,
}

impl MarketplaceSpecifics {
    #[must_use]
    pub fn for_platform(&self, platform: Platform) -> &[String] {
        match platform {
            Platform::MercadoLivre => &self.mercado_livre,
            Platform::Amazon => &self.amazon,
            Platform::Shopee => &self.shopee,
            Platform::Generic => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub overview: String,
    pub trending_products: Vec<String>,
    pub price_range: String,
    pub opportunity_level: OpportunityLevel,
    pub sources: Vec<GroundingSource>,
    pub marketplace_specifics: MarketplaceSpecifics,
}

/// One row of the category trend board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBoardEntry {
    pub name: String,
    pub trend: String,
    /// Marketplaces whose best-seller list mentions the product, joined by `/`.
    pub platforms: String,
    pub shopping_url: String,
}

// ---------------------------------------------------------------------------
// Geographic demand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionInterest {
    pub region: String,
    /// Estimated interest on a 0–100 scale.
    pub interest_level: f64,
}

impl RegionInterest {
    /// Interest clamped to 0–100 for bar rendering; the stored value is untouched.
    #[must_use]
    pub fn display_level(&self) -> f64 {
        if self.interest_level.is_nan() {
            0.0
        } else {
            self.interest_level.clamp(0.0, 100.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoTrendResult {
    pub top_regions: Vec<RegionInterest>,
    pub related_queries: Vec<String>,
    pub seasonal_insight: String,
}

// ---------------------------------------------------------------------------
// Catalog / buy box
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub product_name: String,
    pub winning_price: String,
    pub competition_level: CompetitionLevel,
    pub tip_to_win: String,
    /// Click-through URL, already normalized.
    pub product_url: String,
}

// ---------------------------------------------------------------------------
// Title benchmarking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorTitle {
    pub title: String,
    /// Click-through URL, already normalized.
    pub url: String,
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleBenchmarkResult {
    pub competitor_titles: Vec<CompetitorTitle>,
    pub pattern_analysis: String,
    pub suggested_titles: Vec<String>,
    pub high_volume_keywords: Vec<String>,
}

impl TitleBenchmarkResult {
    /// Competitor titles found on one marketplace.
    pub fn titles_for(&self, platform: Platform) -> impl Iterator<Item = &CompetitorTitle> {
        self.competitor_titles
            .iter()
            .filter(move |t| t.platform == platform)
    }
}

// ---------------------------------------------------------------------------
// Copywriting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CopywritingResult {
    #[serde(default)]
    pub optimized_titles: Vec<String>,
    #[serde(default)]
    pub bullet_points: Vec<String>,
    #[serde(default)]
    pub sales_pitch: String,
}

/// Complete listing draft: titles, markdown description and a technical
/// sheet whose keys are chosen by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullListingResult {
    pub titles: Vec<String>,
    pub description: String,
    /// Ordered key/value pairs; insertion order is display order.
    #[serde(with = "spec_map")]
    pub specs: Vec<(String, String)>,
}

mod spec_map {
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::{Map, Value};

    pub(super) fn serialize<S: Serializer>(
        specs: &[(String, String)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(specs.len()))?;
        for (key, value) in specs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, String)>, D::Error> {
        let map = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(map
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect())
    }
}
