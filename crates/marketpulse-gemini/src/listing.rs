//! Tasks that work on a single listing: x-ray analysis, URL extraction,
//! copywriting and the complete listing draft.

use marketpulse_core::{
    url_keywords, AnalysisResult, CopywritingResult, ExtractedListing, FullListingResult, Platform,
};

use crate::client::{GeminiClient, GenerateRequest, Mode};
use crate::error::GeminiError;
use crate::normalize::normalize_extraction;
use crate::types::RawExtraction;
use crate::{prompts, schema};

impl GeminiClient {
    /// Scores a listing and lists strengths, weaknesses, tags and an action plan.
    ///
    /// # Errors
    ///
    /// Any [`GeminiError`]; this task has no fallback.
    pub async fn analyze_listing(
        &self,
        title: &str,
        description: &str,
        price: &str,
        platform: Platform,
    ) -> Result<AnalysisResult, GeminiError> {
        let request = GenerateRequest::new(
            prompts::analysis(title, description, price, platform.display_name()),
            Mode::Structured(schema::analysis()),
        )
        .with_system_instruction(prompts::ANALYST_INSTRUCTION);

        let analysis: AnalysisResult = self.generate_json("analyze_listing", &request).await?;
        tracing::info!(score = analysis.score, tags = analysis.tags.len(), "listing analyzed");
        Ok(analysis)
    }

    /// Extracts structured listing data from a marketplace URL.
    ///
    /// Two web searches run concurrently: one on the URL itself and one on the
    /// product name recovered from the URL path. Their texts are merged and
    /// converted by a structured call, then dimension sets are completed.
    ///
    /// # Errors
    ///
    /// - Any [`GeminiError`] from the three calls.
    /// - [`GeminiError::NoSearchData`] when neither search produced text.
    pub async fn extract_listing(&self, url: &str) -> Result<ExtractedListing, GeminiError> {
        let url = url.trim();
        let keywords = url_keywords(url).unwrap_or_default();

        let url_request = GenerateRequest::new(
            prompts::extraction_url_search(url, &keywords),
            Mode::WebSearch,
        );
        let keyword_request = (!keywords.trim().is_empty()).then(|| {
            GenerateRequest::new(prompts::extraction_keyword_search(&keywords), Mode::WebSearch)
        });

        let url_search = self.generate("extract_listing.url_search", &url_request);
        let keyword_search = async {
            match &keyword_request {
                Some(request) => self
                    .generate("extract_listing.keyword_search", request)
                    .await
                    .map(|r| r.text),
                None => Ok(String::new()),
            }
        };

        let (url_response, keyword_text) = tokio::try_join!(url_search, keyword_search)?;
        let url_text = url_response.text;

        tracing::debug!(
            url,
            keywords = %keywords,
            url_text_len = url_text.len(),
            keyword_text_len = keyword_text.len(),
            "extraction searches finished"
        );

        if url_text.trim().is_empty() && keyword_text.trim().is_empty() {
            return Err(GeminiError::NoSearchData {
                url: url.to_string(),
            });
        }

        let format_request = GenerateRequest::new(
            prompts::extraction_format(&url_text, &keyword_text),
            Mode::Structured(schema::extraction()),
        );
        let raw: RawExtraction = self.generate_json("extract_listing", &format_request).await?;
        let listing = normalize_extraction(raw);

        tracing::info!(
            url,
            platform = %listing.platform,
            product_source = ?listing.product_source(),
            package_source = ?listing.package_source(),
            "listing extracted"
        );
        Ok(listing)
    }

    /// Writes optimized titles, benefit bullet points and a sales pitch.
    ///
    /// # Errors
    ///
    /// Any [`GeminiError`]; this task has no fallback.
    pub async fn generate_copywriting(
        &self,
        listing: &ExtractedListing,
    ) -> Result<CopywritingResult, GeminiError> {
        let request = GenerateRequest::new(
            prompts::copywriting(
                &listing.title,
                &listing.description,
                listing.platform.display_name(),
            ),
            Mode::Structured(schema::copywriting()),
        );
        self.generate_json("generate_copywriting", &request).await
    }

    /// Drafts a complete listing (titles, markdown description, technical
    /// sheet) from a product name.
    ///
    /// # Errors
    ///
    /// Any [`GeminiError`]; this task has no fallback.
    pub async fn generate_full_listing(
        &self,
        product_name: &str,
        characteristics: &str,
        category: &str,
    ) -> Result<FullListingResult, GeminiError> {
        let request = GenerateRequest::new(
            prompts::full_listing(product_name, characteristics, category),
            Mode::Structured(schema::full_listing()),
        );
        let result: FullListingResult =
            self.generate_json("generate_full_listing", &request).await?;
        tracing::info!(
            titles = result.titles.len(),
            specs = result.specs.len(),
            "full listing generated"
        );
        Ok(result)
    }
}
