//! Market intelligence commands. None of these touch the analyzer session.

use marketpulse_core::Platform;

use crate::context::AppContext;
use crate::output::{
    self, alert, emit, AUDIT_FAILED, CATALOG_FAILED, LISTING_FAILED, TRENDS_FAILED,
};

/// # Errors
///
/// Returns the trends alert if the service call fails.
pub(crate) async fn run_trends(ctx: &AppContext, category: &str) -> anyhow::Result<()> {
    let trends = ctx
        .gemini()?
        .analyze_trends(category)
        .await
        .map_err(|e| alert("trends", TRENDS_FAILED, e))?;
    tracing::info!(category, sources = trends.sources.len(), "trends fetched");
    emit(ctx.json, &trends, output::render_trends)
}

/// # Errors
///
/// Returns the trends alert if the service call fails.
pub(crate) async fn run_board(ctx: &AppContext, category: &str) -> anyhow::Result<()> {
    let (trends, board) = ctx
        .gemini()?
        .trend_board(category)
        .await
        .map_err(|e| alert("board", TRENDS_FAILED, e))?;
    if ctx.json {
        let value = serde_json::json!({ "trends": trends, "board": board });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    println!("{}\n", trends.overview);
    print!("{}", output::render_board(&board));
    Ok(())
}

/// # Errors
///
/// Returns the catalog alert if the service call fails.
pub(crate) async fn run_catalog(ctx: &AppContext, category: &str) -> anyhow::Result<()> {
    let items = ctx
        .gemini()?
        .search_catalog(category)
        .await
        .map_err(|e| alert("catalog", CATALOG_FAILED, e))?;
    if items.is_empty() && !ctx.json {
        println!("Nenhuma oportunidade de catálogo encontrada para \"{category}\".");
        return Ok(());
    }
    emit(ctx.json, items.as_slice(), output::render_catalog)
}

/// Title benchmark. Service failures fall back to a template result, so
/// this only fails when the client cannot be built.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub(crate) async fn run_titles(
    ctx: &AppContext,
    platform: Platform,
    keyword: &str,
) -> anyhow::Result<()> {
    let result = ctx.gemini()?.benchmark_titles(platform, keyword).await;
    emit(ctx.json, &result, |r| output::render_titles(r, platform))
}

/// Regional interest. Falls back to a neutral template on failure.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub(crate) async fn run_geo(ctx: &AppContext, product: &str) -> anyhow::Result<()> {
    let result = ctx.gemini()?.analyze_geo_trends(product).await;
    emit(ctx.json, &result, output::render_geo)
}

/// # Errors
///
/// Returns the audit alert if the service call fails.
pub(crate) async fn run_audit(ctx: &AppContext, context: &str) -> anyhow::Result<()> {
    let report = ctx
        .gemini()?
        .audit_ads(context)
        .await
        .map_err(|e| alert("audit", AUDIT_FAILED, e))?;
    emit(ctx.json, &report, |r| format!("{r}\n"))
}

/// # Errors
///
/// Returns the listing alert if the service call fails.
pub(crate) async fn run_listing(
    ctx: &AppContext,
    name: &str,
    characteristics: &str,
    category: &str,
) -> anyhow::Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Informe o nome do produto.");
    }
    let listing = ctx
        .gemini()?
        .generate_full_listing(name, characteristics, category)
        .await
        .map_err(|e| alert("listing", LISTING_FAILED, e))?;
    emit(ctx.json, &listing, output::render_full_listing)
}
