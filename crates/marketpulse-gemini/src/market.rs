//! Market-level tasks: category trends, catalog winners, title benchmarks,
//! ad audits and geographic demand.

use marketpulse_core::{
    CatalogItem, GeoTrendResult, Platform, TitleBenchmarkResult, TrendBoardEntry, TrendResult,
};

use crate::client::{GeminiClient, GenerateRequest, Mode};
use crate::error::GeminiError;
use crate::normalize::{
    normalize_catalog, normalize_geo, normalize_titles, normalize_trends, trend_board,
};
use crate::types::{RawCatalogItem, RawGeoTrends, RawTitleBenchmark, RawTrends};
use crate::{fallback, prompts, schema};

/// Shown when an ad audit comes back without text.
pub const EMPTY_AUDIT_MESSAGE: &str =
    "Não foi possível gerar a auditoria. Tente detalhar mais os dados.";

impl GeminiClient {
    /// Searches current trends for a category and structures them.
    ///
    /// # Errors
    ///
    /// Any [`GeminiError`]; this task has no fallback.
    pub async fn analyze_trends(&self, category: &str) -> Result<TrendResult, GeminiError> {
        let search = self
            .generate(
                "analyze_trends.search",
                &GenerateRequest::new(prompts::trends_search(category), Mode::WebSearch),
            )
            .await?;

        let raw: RawTrends = self
            .generate_json(
                "analyze_trends",
                &GenerateRequest::new(
                    prompts::trends_format(&search.text),
                    Mode::Structured(schema::trends()),
                ),
            )
            .await?;

        let trends = normalize_trends(raw, search.sources);
        tracing::info!(
            category,
            products = trends.trending_products.len(),
            sources = trends.sources.len(),
            opportunity = trends.opportunity_level.label(),
            "trends analyzed"
        );
        Ok(trends)
    }

    /// Category trend board: the top trending products tagged with the
    /// marketplaces that list them.
    ///
    /// # Errors
    ///
    /// Any [`GeminiError`] from [`Self::analyze_trends`].
    pub async fn trend_board(
        &self,
        category: &str,
    ) -> Result<(TrendResult, Vec<TrendBoardEntry>), GeminiError> {
        let trends = self.analyze_trends(category).await?;
        let board = trend_board(&trends);
        Ok((trends, board))
    }

    /// Finds catalog winners (buy-box leaders) for a Mercado Livre category.
    ///
    /// # Errors
    ///
    /// Any [`GeminiError`]; this task has no fallback.
    pub async fn search_catalog(&self, category: &str) -> Result<Vec<CatalogItem>, GeminiError> {
        let search = self
            .generate(
                "search_catalog.search",
                &GenerateRequest::new(prompts::catalog_search(category), Mode::WebSearch),
            )
            .await?;

        let raw: Vec<RawCatalogItem> = self
            .generate_json(
                "search_catalog",
                &GenerateRequest::new(
                    prompts::catalog_format(&search.text),
                    Mode::Structured(schema::catalog()),
                ),
            )
            .await?;

        let items = normalize_catalog(raw);
        tracing::info!(category, items = items.len(), "catalog searched");
        Ok(items)
    }

    /// Benchmarks best-selling titles for `keyword` across the marketplaces.
    ///
    /// Never fails: any error is logged and replaced by
    /// [`fallback::title_benchmark`].
    pub async fn benchmark_titles(&self, platform: Platform, keyword: &str) -> TitleBenchmarkResult {
        match self.try_benchmark_titles(platform, keyword).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(keyword, error = %e, "title benchmark failed, using fallback");
                fallback::title_benchmark(keyword)
            }
        }
    }

    async fn try_benchmark_titles(
        &self,
        platform: Platform,
        keyword: &str,
    ) -> Result<TitleBenchmarkResult, GeminiError> {
        let search = self
            .generate(
                "benchmark_titles.search",
                &GenerateRequest::new(
                    prompts::titles_search(platform.display_name(), keyword),
                    Mode::WebSearch,
                ),
            )
            .await?;

        let raw: RawTitleBenchmark = self
            .generate_json(
                "benchmark_titles",
                &GenerateRequest::new(
                    prompts::titles_format(&search.text),
                    Mode::Structured(schema::title_benchmark()),
                ),
            )
            .await?;

        let result = normalize_titles(raw);
        tracing::info!(
            keyword,
            competitors = result.competitor_titles.len(),
            "titles benchmarked"
        );
        Ok(result)
    }

    /// Free-text audit of an ad campaign description.
    ///
    /// An empty answer becomes [`EMPTY_AUDIT_MESSAGE`].
    ///
    /// # Errors
    ///
    /// Any [`GeminiError`] from the call itself.
    pub async fn audit_ads(&self, context: &str) -> Result<String, GeminiError> {
        let response = self
            .generate(
                "audit_ads",
                &GenerateRequest::new(prompts::ads_audit(context), Mode::Plain),
            )
            .await?;

        if response.text.trim().is_empty() {
            tracing::warn!("ads audit returned no text");
            return Ok(EMPTY_AUDIT_MESSAGE.to_string());
        }
        Ok(response.text)
    }

    /// Estimates where and how Brazilians search for `product`.
    ///
    /// Never fails: any error is logged and replaced by
    /// [`fallback::geo_trends`].
    pub async fn analyze_geo_trends(&self, product: &str) -> GeoTrendResult {
        match self.try_analyze_geo_trends(product).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(product, error = %e, "geo analysis failed, using fallback");
                fallback::geo_trends(product)
            }
        }
    }

    async fn try_analyze_geo_trends(&self, product: &str) -> Result<GeoTrendResult, GeminiError> {
        let search = self
            .generate(
                "analyze_geo_trends.search",
                &GenerateRequest::new(prompts::geo_search(product), Mode::WebSearch),
            )
            .await?;

        let text = prompts::truncate_chars(&search.text, prompts::GEO_TEXT_LIMIT);
        let raw: RawGeoTrends = self
            .generate_json(
                "analyze_geo_trends",
                &GenerateRequest::new(
                    prompts::geo_format(text),
                    Mode::Structured(schema::geo_trends()),
                ),
            )
            .await?;

        Ok(normalize_geo(raw))
    }
}
