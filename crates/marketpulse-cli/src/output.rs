//! Text rendering for command results and the Portuguese alert messages
//! shown when a task fails.

use std::fmt::{self, Write as _};

use marketpulse_core::calculator::round_display;
use marketpulse_core::{
    AdEfficiency, AnalysisResult, CatalogItem, CopywritingResult, ExtractedListing,
    FullListingResult, GeoTrendResult, MarginBreakdown, MarginHealth, Platform, Role,
    TitleBenchmarkResult, TrendBoardEntry, TrendResult, User,
};
use marketpulse_export::render_value;
use rust_decimal::Decimal;
use serde::Serialize;

pub(crate) const EXTRACTION_FAILED: &str =
    "Não conseguimos extrair os dados desse link automaticamente. Por favor, preencha manualmente.";
pub(crate) const ANALYSIS_FAILED: &str = "Falha ao analisar o anúncio. Verifique sua chave API.";
pub(crate) const COPY_FAILED: &str = "Erro ao gerar copy.";
pub(crate) const TRENDS_FAILED: &str = "Erro ao buscar tendências. Tente novamente.";
pub(crate) const CATALOG_FAILED: &str = "Erro ao buscar dados do catálogo. Tente novamente.";
pub(crate) const AUDIT_FAILED: &str = "Erro ao auditar campanha. Tente novamente.";
pub(crate) const LISTING_FAILED: &str = "Erro ao gerar anúncio. Tente novamente.";
pub(crate) const EXPORT_FAILED: &str = "Erro ao gerar relatório. Tente novamente.";
pub(crate) const UNEXPECTED_ERROR: &str = "Ocorreu um erro inesperado.";

/// Logs the underlying failure of `task` and returns the user-facing alert.
pub(crate) fn alert(task: &'static str, message: &'static str, error: impl fmt::Display) -> anyhow::Error {
    tracing::error!(task, error = %error, "task failed");
    anyhow::anyhow!(message)
}

/// Prints `value` as pretty JSON or through its text renderer.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub(crate) fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", render(value));
    }
    Ok(())
}

/// `R$ 1234,50` style amount.
pub(crate) fn brl(value: Decimal) -> String {
    format!("R$ {:.2}", round_display(value, 2)).replace('.', ",")
}

pub(crate) fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Administrador",
        Role::User => "Usuário",
    }
}

fn bullets(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{heading}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

pub(crate) fn render_listing(listing: &ExtractedListing) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", listing.title);
    let _ = writeln!(out, "Plataforma: {}", listing.platform);
    let _ = writeln!(out, "Preço: {}", render_value(Some(&listing.price)));
    for (label, value) in [
        ("Vendedor", &listing.seller),
        ("Estoque", &listing.stock),
        ("Avaliação", &listing.rating),
        ("Avaliações", &listing.reviews_count),
        ("Localização", &listing.item_location),
        ("Vendas", &listing.sales_estimate),
        ("Logística", &listing.logistics),
    ] {
        let _ = writeln!(out, "{label}: {}", render_value(value.as_deref()));
    }

    for (label, dims, weight, source) in [
        (
            "Produto",
            listing.product_linear(),
            listing.product_weight(),
            listing.product_source(),
        ),
        (
            "Embalagem",
            listing.package_linear(),
            listing.package_weight(),
            listing.package_source(),
        ),
    ] {
        if let Some(dims) = dims {
            let _ = writeln!(
                out,
                "{label}: {} x {} x {} | {} ({})",
                render_value(Some(&dims.height)),
                render_value(Some(&dims.width)),
                render_value(Some(&dims.length)),
                render_value(weight),
                source.report_label(),
            );
        }
    }

    if !listing.similar_ads.is_empty() {
        let _ = writeln!(out, "Anúncios semelhantes:");
        for ad in &listing.similar_ads {
            let _ = writeln!(out, "  - {} | {} | {}", ad.title, ad.price, ad.url);
        }
    }
    bullets(&mut out, "Ações sugeridas", &listing.actionable_insights);
    out
}

pub(crate) fn render_analysis(analysis: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Nota: {}/100", analysis.score);
    bullets(&mut out, "Pontos fortes", &analysis.strengths);
    bullets(&mut out, "Pontos fracos", &analysis.weaknesses);
    bullets(&mut out, "Palavras-chave SEO", &analysis.seo_keywords);
    if !analysis.tags.is_empty() {
        let labels: Vec<&str> = analysis.tags.iter().map(|t| t.label.as_str()).collect();
        let _ = writeln!(out, "Tags: {}", labels.join(", "));
    }
    let _ = writeln!(out, "Descrição: {}", analysis.description_improvement);
    let _ = writeln!(out, "Preço: {}", analysis.price_analysis);
    bullets(&mut out, "Plano de ação", &analysis.action_plan);
    out
}

pub(crate) fn render_copy(copy: &CopywritingResult) -> String {
    let mut out = String::new();
    bullets(&mut out, "Títulos otimizados", &copy.optimized_titles);
    bullets(&mut out, "Bullet points", &copy.bullet_points);
    let _ = writeln!(out, "Pitch: {}", copy.sales_pitch);
    out
}

pub(crate) fn render_margin(margin: &MarginBreakdown) -> String {
    let badge = match margin.health() {
        MarginHealth::Healthy => "saudável",
        MarginHealth::Thin => "apertada",
        MarginHealth::Loss => "prejuízo",
    };
    let mut out = String::new();
    let _ = writeln!(out, "Preço de venda: {}", brl(margin.sale_price));
    let _ = writeln!(out, "Impostos: {}", brl(margin.tax_amount));
    let _ = writeln!(out, "Comissão: {}", brl(margin.fee_amount));
    let _ = writeln!(out, "Custo total: {}", brl(margin.total_cost));
    let _ = writeln!(out, "Lucro: {}", brl(margin.profit));
    let _ = writeln!(out, "Margem: {} ({badge})", margin.display_margin());
    out
}

pub(crate) fn render_ad_efficiency(efficiency: &AdEfficiency) -> String {
    let roas = efficiency
        .roas
        .map_or_else(|| "-".to_string(), |r| format!("{r:.2}x"));
    let acos = efficiency
        .acos_percent
        .map_or_else(|| "-".to_string(), |a| format!("{a:.1}%"));
    format!("ROAS: {roas}\nACoS: {acos}\n")
}

// ---------------------------------------------------------------------------
// Market intelligence
// ---------------------------------------------------------------------------

pub(crate) fn render_trends(trends: &TrendResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", trends.overview);
    let _ = writeln!(out, "Faixa de preço: {}", trends.price_range);
    let _ = writeln!(out, "Oportunidade: {}", trends.opportunity_level.label());
    bullets(&mut out, "Em alta", &trends.trending_products);
    for platform in [Platform::MercadoLivre, Platform::Amazon, Platform::Shopee] {
        bullets(
            &mut out,
            platform.display_name(),
            trends.marketplace_specifics.for_platform(platform),
        );
    }
    if !trends.sources.is_empty() {
        let _ = writeln!(out, "Fontes:");
        for source in &trends.sources {
            let _ = writeln!(out, "  - {} <{}>", source.title, source.uri);
        }
    }
    out
}

pub(crate) fn render_board(entries: &[TrendBoardEntry]) -> String {
    let mut out = format!("{:<4}{:<40}{:<10}{:<24}LINK\n", "#", "PRODUTO", "TENDÊNCIA", "PLATAFORMAS");
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4}{:<40}{:<10}{:<24}{}",
            i + 1,
            truncate(&entry.name, 38),
            entry.trend,
            entry.platforms,
            entry.shopping_url
        );
    }
    out
}

pub(crate) fn render_catalog(items: &[CatalogItem]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{}", item.product_name);
        let _ = writeln!(
            out,
            "  Preço vencedor: {} | Concorrência: {}",
            item.winning_price,
            item.competition_level.label()
        );
        let _ = writeln!(out, "  Dica: {}", item.tip_to_win);
        let _ = writeln!(out, "  {}", item.product_url);
    }
    out
}

pub(crate) fn render_titles(result: &TitleBenchmarkResult, platform: Platform) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Concorrentes ({}):", platform.display_name());
    for competitor in result.titles_for(platform) {
        let _ = writeln!(out, "  - {}", competitor.title);
        let _ = writeln!(out, "    {}", competitor.url);
    }
    let _ = writeln!(out, "Padrões: {}", result.pattern_analysis);
    bullets(&mut out, "Títulos sugeridos", &result.suggested_titles);
    bullets(&mut out, "Palavras de alto volume", &result.high_volume_keywords);
    out
}

pub(crate) fn render_geo(result: &GeoTrendResult) -> String {
    let mut out = String::new();
    for region in &result.top_regions {
        let level = region.display_level();
        // One block per 5 points of interest.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bar = "#".repeat((level / 5.0).round() as usize);
        let _ = writeln!(out, "{:<24}{:>5.0} {bar}", region.region, level);
    }
    bullets(&mut out, "Buscas relacionadas", &result.related_queries);
    let _ = writeln!(out, "Sazonalidade: {}", result.seasonal_insight);
    out
}

pub(crate) fn render_full_listing(result: &FullListingResult) -> String {
    let mut out = String::new();
    bullets(&mut out, "Títulos", &result.titles);
    let _ = writeln!(out, "\n{}\n", result.description);
    if !result.specs.is_empty() {
        let _ = writeln!(out, "Ficha técnica:");
        for (key, value) in &result.specs {
            let _ = writeln!(out, "  {key}: {value}");
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

pub(crate) fn render_user(user: &User) -> String {
    format!("{} <{}> ({})\n", user.name, user.email, role_label(user.role))
}

pub(crate) fn render_users(users: &[User]) -> String {
    let mut out = format!("{:<38}{:<28}{:<34}{:<15}CRIADO EM\n", "ID", "NOME", "E-MAIL", "PERFIL");
    for user in users {
        let _ = writeln!(
            out,
            "{:<38}{:<28}{:<34}{:<15}{}",
            user.id,
            truncate(&user.name, 26),
            user.email,
            role_label(user.role),
            user.created_at.format("%d/%m/%Y")
        );
    }
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketpulse_core::{compute_margin, MarginInputs, RegionInterest};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn brl_uses_comma_and_two_places() {
        assert_eq!(brl(dec("28")), "R$ 28,00");
        assert_eq!(brl(dec("-5.125")), "R$ -5,13");
    }

    #[test]
    fn margin_report_flags_health() {
        let margin = compute_margin(&MarginInputs {
            sale_price: dec("200"),
            cost_price: dec("100"),
            tax_rate: dec("10"),
            platform_fee: dec("16"),
            shipping_cost: dec("20"),
        })
        .expect("margin in range");
        let text = render_margin(&margin);
        assert!(text.contains("Lucro: R$ 28,00"));
        assert!(text.contains("Margem: 14.0% (apertada)"));
    }

    #[test]
    fn ad_efficiency_shows_dash_when_undefined() {
        let text = render_ad_efficiency(&AdEfficiency {
            roas: None,
            acos_percent: Some(dec("25.0")),
        });
        assert_eq!(text, "ROAS: -\nACoS: 25.0%\n");
    }

    #[test]
    fn listing_placeholders_for_missing_fields() {
        let listing = ExtractedListing {
            title: "Fone X".into(),
            price: "R$ 99,90".into(),
            seller: Some("null".into()),
            ..ExtractedListing::default()
        };
        let text = render_listing(&listing);
        assert!(text.starts_with("Fone X\n"));
        assert!(text.contains("Vendedor: -"));
        assert!(text.contains("Preço: R$ 99,90"));
    }

    #[test]
    fn geo_bars_use_clamped_level() {
        let result = GeoTrendResult {
            top_regions: vec![RegionInterest {
                region: "São Paulo".into(),
                interest_level: 140.0,
            }],
            related_queries: vec![],
            seasonal_insight: "Pico no Natal".into(),
        };
        let text = render_geo(&result);
        assert!(text.contains(&"#".repeat(20)));
        assert!(!text.contains(&"#".repeat(21)));
    }

    #[test]
    fn roles_render_in_portuguese() {
        assert_eq!(role_label(Role::Admin), "Administrador");
        assert_eq!(role_label(Role::User), "Usuário");
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("abc", 6), "abc");
    }
}
