use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Whether a [`DimensionSet`] was read from the listing or synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DimensionSource {
    #[default]
    Extracted,
    Estimated,
}

impl DimensionSource {
    /// Label printed in the logistics table of exported reports.
    #[must_use]
    pub fn report_label(self) -> &'static str {
        match self {
            Self::Extracted => "Real",
            Self::Estimated => "Estimado",
        }
    }
}

/// Height, width, length and weight of a product or its shipping package.
///
/// Values are kept as free-form number-with-unit strings (`"12 cm"`,
/// `"0.4 kg"`); they are never parsed into numbers for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionSet {
    pub height: String,
    pub width: String,
    pub length: String,
    pub weight: String,
    #[serde(default)]
    pub source: DimensionSource,
}

impl DimensionSet {
    /// Linear projection kept for consumers of the legacy flat shape.
    #[must_use]
    pub fn linear(&self) -> LinearDimensions {
        LinearDimensions {
            height: self.height.clone(),
            width: self.width.clone(),
            length: self.length.clone(),
        }
    }

    #[must_use]
    pub fn is_estimated(&self) -> bool {
        self.source == DimensionSource::Estimated
    }
}

/// Legacy `dimensionsDetails` projection (no weight, no source).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LinearDimensions {
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub length: String,
}

/// A competing listing found next to the extracted one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SimilarAd {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub url: String,
}

/// Structured listing data derived from a marketplace URL.
///
/// Produced by the extraction task and completed by the normalizer; treated
/// as read-only for the rest of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedListing {
    pub title: String,
    pub price: String,
    pub description: String,
    pub platform: Platform,
    pub seller: Option<String>,
    pub stock: Option<String>,
    pub rating: Option<String>,
    pub reviews_count: Option<String>,
    pub item_location: Option<String>,
    pub product_dimensions: Option<DimensionSet>,
    pub package_dimensions: Option<DimensionSet>,
    /// Legacy linear projection of `product_dimensions`.
    pub dimensions_details: Option<LinearDimensions>,
    /// Legacy weight projection: product weight, else package weight.
    pub weight: Option<String>,
    pub logistics: Option<String>,
    pub listing_age: Option<String>,
    pub sales_estimate: Option<String>,
    #[serde(default)]
    pub similar_ads: Vec<SimilarAd>,
    #[serde(default)]
    pub actionable_insights: Vec<String>,
}

impl ExtractedListing {
    /// Product dimensions, falling back to the legacy flat projection for
    /// listings saved before dimension sets existed.
    #[must_use]
    pub fn product_linear(&self) -> Option<LinearDimensions> {
        self.product_dimensions
            .as_ref()
            .map(DimensionSet::linear)
            .or_else(|| self.dimensions_details.clone())
    }

    /// Package dimensions with the same legacy fallback as [`Self::product_linear`].
    #[must_use]
    pub fn package_linear(&self) -> Option<LinearDimensions> {
        self.package_dimensions
            .as_ref()
            .map(DimensionSet::linear)
            .or_else(|| self.dimensions_details.clone())
    }

    /// Product weight or the legacy weight field.
    #[must_use]
    pub fn product_weight(&self) -> Option<&str> {
        non_empty(self.product_dimensions.as_ref().map(|d| d.weight.as_str()))
            .or(self.weight.as_deref())
    }

    /// Package weight or the legacy weight field.
    #[must_use]
    pub fn package_weight(&self) -> Option<&str> {
        non_empty(self.package_dimensions.as_ref().map(|d| d.weight.as_str()))
            .or(self.weight.as_deref())
    }

    #[must_use]
    pub fn product_source(&self) -> DimensionSource {
        self.product_dimensions
            .as_ref()
            .map_or(DimensionSource::Extracted, |d| d.source)
    }

    #[must_use]
    pub fn package_source(&self) -> DimensionSource {
        self.package_dimensions
            .as_ref()
            .map_or(DimensionSource::Extracted, |d| d.source)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
