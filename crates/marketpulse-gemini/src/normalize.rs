//! Normalization of raw AI payloads into the domain types of
//! `marketpulse-core`.
//!
//! The central piece is dimension completion: after
//! [`normalize_extraction`] both the product and the package dimension sets
//! exist and every field in them is non-empty.

use std::sync::LazyLock;

use marketpulse_core::{
    normalize_listing_url, shopping_search_url, CatalogItem, CompetitionLevel, CompetitorTitle,
    DimensionSet, DimensionSource, ExtractedListing, GeoTrendResult, GroundingSource,
    OpportunityLevel, Platform, RegionInterest, TitleBenchmarkResult, TrendBoardEntry, TrendResult,
};
use regex::Regex;

use crate::types::{
    RawCatalogItem, RawDimensionSet, RawExtraction, RawGeoTrends, RawTitleBenchmark, RawTrends,
};

/// Centimetres added to each linear measure of a synthesized package.
pub const PACKAGE_PADDING_CM: f64 = 3.0;
/// Weight multiplier of a synthesized package.
pub const PACKAGE_WEIGHT_FACTOR: f64 = 1.15;
/// Maximum related queries kept from a geo answer.
pub const MAX_RELATED_QUERIES: usize = 10;
/// Rows on the trend board.
pub const TREND_BOARD_SIZE: usize = 5;

static MEASURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:[.,]\d+)?)\s*(.*?)\s*$").expect("valid measure regex")
});

static BOX_DIMENSIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d+(?:[.,]\d+)?)\s*(?:cm)?\s*[x×]\s*(\d+(?:[.,]\d+)?)\s*(?:cm)?\s*[x×]\s*(\d+(?:[.,]\d+)?)\s*(cm|mm|m)?",
    )
    .expect("valid box dimensions regex")
});

static WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(kg|g)\b").expect("valid weight regex")
});

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Turns a raw extraction into an [`ExtractedListing`] with complete
/// dimension sets and refreshed legacy projections.
#[must_use]
pub fn normalize_extraction(raw: RawExtraction) -> ExtractedListing {
    let platform = Platform::from_label(raw.platform.as_deref().unwrap_or_default());
    let (product, package) = complete_dimensions(&raw);

    let weight = Some(product.weight.clone())
        .filter(|w| !w.trim().is_empty())
        .or_else(|| Some(package.weight.clone()).filter(|w| !w.trim().is_empty()))
        .or(raw.weight);

    ExtractedListing {
        title: raw.title.unwrap_or_default(),
        price: raw.price.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        platform,
        seller: non_blank(raw.seller),
        stock: non_blank(raw.stock),
        rating: non_blank(raw.rating),
        reviews_count: non_blank(raw.reviews_count),
        item_location: non_blank(raw.item_location),
        dimensions_details: Some(product.linear()),
        product_dimensions: Some(product),
        package_dimensions: Some(package),
        weight,
        logistics: non_blank(raw.logistics),
        listing_age: non_blank(raw.listing_age),
        sales_estimate: non_blank(raw.sales_estimate),
        similar_ads: raw.similar_ads.unwrap_or_default(),
        actionable_insights: raw.actionable_insights.unwrap_or_default(),
    }
}

/// A dimension set under construction; `None` marks a missing field.
#[derive(Debug, Clone, Default)]
struct PartialSet {
    height: Option<String>,
    width: Option<String>,
    length: Option<String>,
    weight: Option<String>,
    estimated: bool,
}

impl PartialSet {
    fn from_raw(raw: &RawDimensionSet) -> Option<Self> {
        let set = Self {
            height: non_blank(raw.height.clone()),
            width: non_blank(raw.width.clone()),
            length: non_blank(raw.length.clone()),
            weight: non_blank(raw.weight.clone()),
            estimated: raw
                .source
                .as_deref()
                .is_some_and(|s| s.trim().eq_ignore_ascii_case("estimated")),
        };
        set.has_any().then_some(set)
    }

    fn has_any(&self) -> bool {
        self.fields().iter().any(|f| f.is_some())
    }

    fn fields(&self) -> [&Option<String>; 4] {
        [&self.height, &self.width, &self.length, &self.weight]
    }

    /// Fills missing fields from `sibling`; marks the set estimated if any
    /// field was borrowed.
    fn fill_from(&mut self, sibling: &PartialSet) {
        let pairs = [
            (&mut self.height, &sibling.height),
            (&mut self.width, &sibling.width),
            (&mut self.length, &sibling.length),
            (&mut self.weight, &sibling.weight),
        ];
        for (own, theirs) in pairs {
            if own.is_none() && theirs.is_some() {
                own.clone_from(theirs);
                self.estimated = true;
            }
        }
    }

    /// Fills whatever is still missing from the generic parcel estimate.
    fn finish(self) -> DimensionSet {
        let generic = generic_parcel();
        let estimated = self.estimated
            || self.height.is_none()
            || self.width.is_none()
            || self.length.is_none()
            || self.weight.is_none();
        DimensionSet {
            height: self.height.unwrap_or(generic.height),
            width: self.width.unwrap_or(generic.width),
            length: self.length.unwrap_or(generic.length),
            weight: self.weight.unwrap_or(generic.weight),
            source: if estimated {
                DimensionSource::Estimated
            } else {
                DimensionSource::Extracted
            },
        }
    }
}

fn complete_dimensions(raw: &RawExtraction) -> (DimensionSet, DimensionSet) {
    let product = raw.product_dimensions.as_ref().and_then(PartialSet::from_raw);
    let package = raw.package_dimensions.as_ref().and_then(PartialSet::from_raw);

    match (product, package) {
        (Some(mut product), Some(mut package)) => {
            product.fill_from(&package);
            package.fill_from(&product);
            (product.finish(), package.finish())
        }
        (Some(product), None) => {
            let product = product.finish();
            let package = synthesize_package(&product);
            (product, package)
        }
        (None, Some(package)) => {
            let package = package.finish();
            let product = DimensionSet {
                source: DimensionSource::Estimated,
                ..package.clone()
            };
            (product, package)
        }
        (None, None) => {
            let product = seed_from_legacy(raw).map_or_else(generic_parcel, PartialSet::finish);
            let package = synthesize_package(&product);
            (product, package)
        }
    }
}

/// Builds a product set from the flat legacy fields or from free-text
/// measures in `dimensions` / `logistics`.
fn seed_from_legacy(raw: &RawExtraction) -> Option<PartialSet> {
    let mut seed = PartialSet::default();

    if let Some(details) = &raw.dimensions_details {
        seed.height = non_blank(Some(details.height.clone()));
        seed.width = non_blank(Some(details.width.clone()));
        seed.length = non_blank(Some(details.length.clone()));
    }
    seed.weight = non_blank(raw.weight.clone());

    let texts = [raw.dimensions.as_deref(), raw.logistics.as_deref()];
    for text in texts.into_iter().flatten() {
        if seed.height.is_none() && seed.width.is_none() && seed.length.is_none() {
            if let Some(caps) = BOX_DIMENSIONS.captures(text) {
                let unit = caps.get(4).map_or("cm", |m| m.as_str());
                seed.height = Some(format!("{} {unit}", &caps[1]));
                seed.width = Some(format!("{} {unit}", &caps[2]));
                seed.length = Some(format!("{} {unit}", &caps[3]));
            }
        }
        if seed.weight.is_none() {
            if let Some(caps) = WEIGHT.captures(text) {
                seed.weight = Some(format!("{} {}", &caps[1], caps[2].to_lowercase()));
            }
        }
    }

    seed.has_any().then_some(seed)
}

/// Last-resort parcel used when nothing in the answer describes the item.
fn generic_parcel() -> DimensionSet {
    DimensionSet {
        height: "10 cm".to_string(),
        width: "15 cm".to_string(),
        length: "20 cm".to_string(),
        weight: "0.5 kg".to_string(),
        source: DimensionSource::Estimated,
    }
}

/// Package estimate: +3 cm per linear measure and +15 % weight, keeping the
/// unit. Values that do not start with a number are copied unchanged.
#[must_use]
pub fn synthesize_package(product: &DimensionSet) -> DimensionSet {
    let pad = |value: &str| adjust_measure(value, |n| n + PACKAGE_PADDING_CM);
    DimensionSet {
        height: pad(&product.height),
        width: pad(&product.width),
        length: pad(&product.length),
        weight: adjust_measure(&product.weight, |n| n * PACKAGE_WEIGHT_FACTOR),
        source: DimensionSource::Estimated,
    }
}

fn adjust_measure(value: &str, f: impl Fn(f64) -> f64) -> String {
    let Some(caps) = MEASURE.captures(value) else {
        return value.to_string();
    };
    let number = &caps[1];
    let unit = &caps[2];
    let decimal_comma = number.contains(',');
    let Ok(parsed) = number.replace(',', ".").parse::<f64>() else {
        return value.to_string();
    };

    let mut formatted = format_number(f(parsed));
    if decimal_comma {
        formatted = formatted.replace('.', ",");
    }
    if unit.is_empty() {
        formatted
    } else {
        format!("{formatted} {unit}")
    }
}

fn format_number(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

/// Completes a trend answer. `sources` come from the grounding metadata of
/// the search phase; entries without a real URI are dropped.
#[must_use]
pub fn normalize_trends(raw: RawTrends, sources: Vec<GroundingSource>) -> TrendResult {
    let opportunity_level = match raw.opportunity_level.as_deref() {
        Some(label) => OpportunityLevel::from_label(label).unwrap_or_else(|| {
            tracing::warn!(label, "unknown opportunity level, assuming medium");
            OpportunityLevel::Medium
        }),
        None => OpportunityLevel::Medium,
    };

    TrendResult {
        overview: raw.overview.unwrap_or_default(),
        trending_products: raw.trending_products.unwrap_or_default(),
        price_range: raw.price_range.unwrap_or_default(),
        opportunity_level,
        sources: sources
            .into_iter()
            .filter(|s| {
                let uri = s.uri.trim();
                !uri.is_empty() && uri != "#"
            })
            .collect(),
        marketplace_specifics: raw.marketplace_specifics.unwrap_or_default(),
    }
}

/// Top trending products tagged with the marketplaces whose best-seller
/// list mentions them.
#[must_use]
pub fn trend_board(trends: &TrendResult) -> Vec<TrendBoardEntry> {
    trends
        .trending_products
        .iter()
        .take(TREND_BOARD_SIZE)
        .map(|product| {
            let needle = product.to_lowercase();
            let tags: Vec<&str> = Platform::MARKETPLACES
                .iter()
                .filter(|p| {
                    trends
                        .marketplace_specifics
                        .for_platform(**p)
                        .iter()
                        .any(|item| item.to_lowercase().contains(&needle))
                })
                .map(|p| p.short_tag())
                .collect();
            let platforms = if tags.is_empty() {
                "Mercado Livre/Geral".to_string()
            } else {
                tags.join("/")
            };
            TrendBoardEntry {
                name: product.clone(),
                trend: "Alta".to_string(),
                platforms,
                shopping_url: shopping_search_url(product, None),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Catalog items with normalized click-through URLs. Items without a name
/// are dropped.
#[must_use]
pub fn normalize_catalog(raw: Vec<RawCatalogItem>) -> Vec<CatalogItem> {
    raw.into_iter()
        .filter_map(|item| {
            let product_name = non_blank(item.product_name)?;
            let competition_level = item
                .competition_level
                .as_deref()
                .and_then(CompetitionLevel::from_label)
                .unwrap_or_default();
            let product_url = normalize_listing_url(
                item.product_url.as_deref(),
                &product_name,
                Platform::MercadoLivre,
            );
            Some(CatalogItem {
                product_name,
                winning_price: item.winning_price.unwrap_or_default(),
                competition_level,
                tip_to_win: item.tip_to_win.unwrap_or_default(),
                product_url,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Title benchmark
// ---------------------------------------------------------------------------

#[must_use]
pub fn normalize_titles(raw: RawTitleBenchmark) -> TitleBenchmarkResult {
    let competitor_titles = raw
        .competitor_titles
        .into_iter()
        .filter_map(|t| {
            let title = non_blank(t.title)?;
            let platform = Platform::from_label(t.platform.as_deref().unwrap_or_default());
            let url = normalize_listing_url(t.url.as_deref(), &title, platform);
            Some(CompetitorTitle {
                title,
                url,
                platform,
                seller_name: non_blank(t.seller_name),
                item_location: non_blank(t.item_location),
            })
        })
        .collect();

    TitleBenchmarkResult {
        competitor_titles,
        pattern_analysis: raw.pattern_analysis.unwrap_or_default(),
        suggested_titles: raw.suggested_titles,
        high_volume_keywords: raw.high_volume_keywords,
    }
}

// ---------------------------------------------------------------------------
// Geo demand
// ---------------------------------------------------------------------------

#[must_use]
pub fn normalize_geo(raw: RawGeoTrends) -> GeoTrendResult {
    let top_regions = raw
        .top_regions
        .into_iter()
        .filter_map(|r| {
            Some(RegionInterest {
                region: non_blank(r.region)?,
                interest_level: r.interest_level.unwrap_or(0.0),
            })
        })
        .collect();

    let mut related_queries = raw.related_queries;
    related_queries.truncate(MAX_RELATED_QUERIES);

    GeoTrendResult {
        top_regions,
        related_queries,
        seasonal_insight: raw.seasonal_insight.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use marketpulse_core::{LinearDimensions, MarketplaceSpecifics};

    use super::*;
    use crate::types::RawCompetitorTitle;

    fn raw_set(h: &str, w: &str, l: &str, weight: &str) -> RawDimensionSet {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        RawDimensionSet {
            height: opt(h),
            width: opt(w),
            length: opt(l),
            weight: opt(weight),
            source: Some("extracted".into()),
        }
    }

    fn assert_complete(set: &DimensionSet) {
        for field in [&set.height, &set.width, &set.length, &set.weight] {
            assert!(!field.trim().is_empty(), "empty field in {set:?}");
        }
    }

    #[test]
    fn synthesizes_package_from_product() {
        let listing = normalize_extraction(RawExtraction {
            title: Some("Garrafa".into()),
            product_dimensions: Some(raw_set("10 cm", "20 cm", "30 cm", "1 kg")),
            ..RawExtraction::default()
        });

        let product = listing.product_dimensions.as_ref().unwrap();
        let package = listing.package_dimensions.as_ref().unwrap();
        assert_eq!(product.source, DimensionSource::Extracted);
        assert_eq!(package.source, DimensionSource::Estimated);
        assert_eq!(package.height, "13 cm");
        assert_eq!(package.width, "23 cm");
        assert_eq!(package.length, "33 cm");
        assert_eq!(package.weight, "1.15 kg");
        assert_eq!(listing.weight.as_deref(), Some("1 kg"));
        assert_eq!(listing.dimensions_details.as_ref().unwrap().height, "10 cm");
    }

    #[test]
    fn copies_product_from_package() {
        let listing = normalize_extraction(RawExtraction {
            package_dimensions: Some(raw_set("12 cm", "22 cm", "32 cm", "2 kg")),
            ..RawExtraction::default()
        });
        let product = listing.product_dimensions.unwrap();
        let package = listing.package_dimensions.unwrap();
        assert_eq!(product.source, DimensionSource::Estimated);
        assert_eq!(package.source, DimensionSource::Extracted);
        assert_eq!(product.height, "12 cm");
        assert_eq!(product.weight, "2 kg");
    }

    #[test]
    fn fills_missing_fields_from_sibling() {
        let listing = normalize_extraction(RawExtraction {
            product_dimensions: Some(raw_set("10 cm", "", "30 cm", "1 kg")),
            package_dimensions: Some(raw_set("12 cm", "22 cm", "32 cm", "")),
            ..RawExtraction::default()
        });
        let product = listing.product_dimensions.unwrap();
        let package = listing.package_dimensions.unwrap();
        assert_eq!(product.width, "22 cm");
        assert_eq!(package.weight, "1 kg");
        assert!(product.is_estimated());
        assert!(package.is_estimated());
    }

    #[test]
    fn seeds_from_free_text_measures() {
        let listing = normalize_extraction(RawExtraction {
            logistics: Some("Caixa de 20 x 30 x 10 cm, peso 1,2 kg".into()),
            ..RawExtraction::default()
        });
        let product = listing.product_dimensions.unwrap();
        let package = listing.package_dimensions.unwrap();
        assert_eq!(product.height, "20 cm");
        assert_eq!(product.width, "30 cm");
        assert_eq!(product.length, "10 cm");
        assert_eq!(product.weight, "1,2 kg");
        assert_eq!(product.source, DimensionSource::Extracted);
        assert_eq!(package.height, "23 cm");
        assert_eq!(package.weight, "1,38 kg");
        // The free-text field itself is kept.
        assert!(listing.logistics.unwrap().contains("20 x 30"));
    }

    #[test]
    fn seeds_from_legacy_details() {
        let listing = normalize_extraction(RawExtraction {
            dimensions_details: Some(LinearDimensions {
                height: "5 cm".into(),
                width: "6 cm".into(),
                length: "7 cm".into(),
            }),
            weight: Some("300 g".into()),
            ..RawExtraction::default()
        });
        let product = listing.product_dimensions.unwrap();
        assert_eq!(product.height, "5 cm");
        assert_eq!(product.weight, "300 g");
        assert_eq!(listing.package_dimensions.unwrap().weight, "345 g");
    }

    #[test]
    fn falls_back_to_generic_parcel() {
        let listing = normalize_extraction(RawExtraction::default());
        let product = listing.product_dimensions.unwrap();
        let package = listing.package_dimensions.unwrap();
        assert_complete(&product);
        assert_complete(&package);
        assert!(product.is_estimated());
        assert!(package.is_estimated());
        assert_eq!(listing.platform, Platform::Generic);
    }

    #[test]
    fn unparseable_measures_are_copied() {
        let product = DimensionSet {
            height: "médio".into(),
            width: "10".into(),
            length: "2.5 m".into(),
            weight: "leve".into(),
            source: DimensionSource::Extracted,
        };
        let package = synthesize_package(&product);
        assert_eq!(package.height, "médio");
        assert_eq!(package.width, "13");
        assert_eq!(package.length, "5.5 m");
        assert_eq!(package.weight, "leve");
    }

    #[test]
    fn every_completion_path_yields_complete_sets() {
        let cases = [
            RawExtraction::default(),
            RawExtraction {
                product_dimensions: Some(raw_set("", "", "", "1 kg")),
                ..RawExtraction::default()
            },
            RawExtraction {
                package_dimensions: Some(raw_set("1 cm", "", "", "")),
                ..RawExtraction::default()
            },
            RawExtraction {
                product_dimensions: Some(raw_set("", "", "", "")),
                dimensions: Some("15x8x5cm".into()),
                ..RawExtraction::default()
            },
        ];
        for raw in cases {
            let listing = normalize_extraction(raw);
            assert_complete(listing.product_dimensions.as_ref().unwrap());
            assert_complete(listing.package_dimensions.as_ref().unwrap());
            assert!(listing.weight.is_some());
            assert!(listing.dimensions_details.is_some());
        }
    }

    #[test]
    fn extraction_canonicalizes_platform_and_keeps_fields() {
        let listing = normalize_extraction(RawExtraction {
            title: Some("Fone".into()),
            platform: Some("mercadolibre.com.br".into()),
            seller: Some("  ".into()),
            rating: Some("4.8".into()),
            ..RawExtraction::default()
        });
        assert_eq!(listing.platform, Platform::MercadoLivre);
        assert!(listing.seller.is_none());
        assert_eq!(listing.rating.as_deref(), Some("4.8"));
    }

    #[test]
    fn trends_drop_placeholder_sources_and_default_specifics() {
        let raw = RawTrends {
            overview: Some("Mercado aquecido".into()),
            opportunity_level: Some("Enorme".into()),
            ..RawTrends::default()
        };
        let sources = vec![
            GroundingSource {
                title: "G1".into(),
                uri: "https://g1.globo.com".into(),
            },
            GroundingSource {
                title: "Fonte Web".into(),
                uri: "#".into(),
            },
            GroundingSource {
                title: "Vazio".into(),
                uri: " ".into(),
            },
        ];
        let trends = normalize_trends(raw, sources);
        assert_eq!(trends.sources.len(), 1);
        assert_eq!(trends.opportunity_level, OpportunityLevel::Medium);
        assert_eq!(trends.marketplace_specifics, MarketplaceSpecifics::default());
        assert!(trends.trending_products.is_empty());
    }

    #[test]
    fn trends_parse_accented_opportunity() {
        let trends = normalize_trends(
            RawTrends {
                opportunity_level: Some("Alta".into()),
                ..RawTrends::default()
            },
            Vec::new(),
        );
        assert_eq!(trends.opportunity_level, OpportunityLevel::High);
    }

    #[test]
    fn trend_board_tags_marketplaces() {
        let trends = TrendResult {
            overview: String::new(),
            trending_products: vec![
                "Air Fryer".into(),
                "Mop Giratório".into(),
                "Chaleira".into(),
                "A".into(),
                "B".into(),
                "C".into(),
            ],
            price_range: String::new(),
            opportunity_level: OpportunityLevel::High,
            sources: Vec::new(),
            marketplace_specifics: MarketplaceSpecifics {
                mercado_livre: vec!["Air Fryer Mondial 4L".into()],
                amazon: vec!["air fryer philco".into(), "Mop Giratório Flash".into()],
                shopee: Vec::new(),
            },
        };
        let board = trend_board(&trends);
        assert_eq!(board.len(), 5);
        assert_eq!(board[0].platforms, "ML/Amazon");
        assert_eq!(board[1].platforms, "Amazon");
        assert_eq!(board[2].platforms, "Mercado Livre/Geral");
        assert_eq!(board[0].trend, "Alta");
        assert!(board[0].shopping_url.contains("Air%20Fryer"));
    }

    #[test]
    fn catalog_urls_are_normalized() {
        let items = normalize_catalog(vec![
            RawCatalogItem {
                product_name: Some("Kit Ferramentas".into()),
                winning_price: Some("R$ 199,90".into()),
                competition_level: Some("Extrema".into()),
                tip_to_win: Some("Focar no Full".into()),
                product_url: Some(
                    "https://www.google.com/url?q=https://www.mercadolivre.com.br/p/MLB123%3Fx%3D1".into(),
                ),
            },
            RawCatalogItem {
                product_name: Some("Furadeira".into()),
                product_url: Some("#".into()),
                ..RawCatalogItem::default()
            },
            RawCatalogItem::default(),
        ]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_url, "https://www.mercadolivre.com.br/p/MLB123");
        assert_eq!(items[0].competition_level, CompetitionLevel::Extreme);
        assert_eq!(
            items[1].product_url,
            "https://lista.mercadolivre.com.br/Furadeira"
        );
        assert_eq!(items[1].competition_level, CompetitionLevel::Medium);
    }

    #[test]
    fn titles_use_platform_specific_fallbacks() {
        let result = normalize_titles(RawTitleBenchmark {
            competitor_titles: vec![
                RawCompetitorTitle {
                    title: Some("Fone Bluetooth".into()),
                    url: Some("https://www.amazon.com.br/s?k=fone".into()),
                    platform: Some("Amazon".into()),
                    seller_name: Some("N/A".into()),
                    item_location: None,
                },
                RawCompetitorTitle {
                    title: Some("Fone TWS".into()),
                    url: Some(String::new()),
                    platform: Some("Shopee".into()),
                    ..RawCompetitorTitle::default()
                },
            ],
            pattern_analysis: None,
            suggested_titles: vec!["Fone Bluetooth Original".into()],
            high_volume_keywords: Vec::new(),
        });
        assert_eq!(
            result.competitor_titles[0].url,
            "https://www.amazon.com.br/s/field-keywords=Fone%20Bluetooth"
        );
        assert_eq!(
            result.competitor_titles[1].url,
            "https://shopee.com.br/search/Fone%20TWS"
        );
        assert_eq!(result.titles_for(Platform::Shopee).count(), 1);
        assert_eq!(result.pattern_analysis, "");
    }

    #[test]
    fn geo_truncates_related_queries() {
        let raw = RawGeoTrends {
            top_regions: vec![crate::types::RawRegion {
                region: Some("São Paulo".into()),
                interest_level: Some(140.0),
            }],
            related_queries: (0..15).map(|i| format!("q{i}")).collect(),
            seasonal_insight: None,
        };
        let geo = normalize_geo(raw);
        assert_eq!(geo.related_queries.len(), 10);
        assert_eq!(geo.top_regions[0].interest_level, 140.0);
        assert_eq!(geo.top_regions[0].display_level(), 100.0);
    }
}
