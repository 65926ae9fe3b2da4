//! Static payloads returned when a task that must never fail loses its
//! upstream call.

use marketpulse_core::{GeoTrendResult, RegionInterest, TitleBenchmarkResult};

/// Title suggestions built from the keyword alone.
#[must_use]
pub fn title_benchmark(keyword: &str) -> TitleBenchmarkResult {
    let keyword = keyword.trim();
    TitleBenchmarkResult {
        competitor_titles: Vec::new(),
        pattern_analysis: "Não foi possível analisar os padrões no momento devido a uma \
instabilidade na conexão com os marketplaces. Tente novamente em alguns segundos."
            .to_string(),
        suggested_titles: vec![
            format!("{keyword} Promoção"),
            format!("Oferta {keyword}"),
            format!("Melhor preço {keyword}"),
        ],
        high_volume_keywords: vec![
            keyword.to_string(),
            "oferta".to_string(),
            "original".to_string(),
            "novo".to_string(),
        ],
    }
}

/// Demand estimate that follows population density across the largest states.
#[must_use]
pub fn geo_trends(product: &str) -> GeoTrendResult {
    let product = product.trim();
    let regions = [
        ("São Paulo", 100.0),
        ("Minas Gerais", 85.0),
        ("Rio de Janeiro", 75.0),
        ("Paraná", 65.0),
        ("Rio Grande do Sul", 55.0),
    ];
    GeoTrendResult {
        top_regions: regions
            .into_iter()
            .map(|(region, interest_level)| RegionInterest {
                region: region.to_string(),
                interest_level,
            })
            .collect(),
        related_queries: vec![
            format!("{product} preço"),
            format!("melhor {product}"),
            format!("oferta {product}"),
            format!("loja {product}"),
            format!("{product} mercado livre"),
        ],
        seasonal_insight: "A demanda segue a densidade populacional e a frota de veículos \
(no caso de peças). Dados estimados devido a instabilidade momentânea na coleta em tempo real."
            .to_string(),
    }
}
