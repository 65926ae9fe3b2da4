//! Integration tests for the Gemini tasks using wiremock HTTP mocks.

use marketpulse_core::{CompetitionLevel, DimensionSource, OpportunityLevel, Platform};
use marketpulse_gemini::{GeminiClient, GeminiError, EMPTY_AUDIT_MESSAGE};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::with_base_url(Some("test-key"), "gemini-2.5-flash", Some(5), base_url)
        .expect("client construction should not fail")
}

fn text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
}

async fn mount_text(server: &MockServer, marker: &str, text: &str) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_string_contains(marker))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(text)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn analyze_listing_sends_schema_and_system_instruction() {
    let server = MockServer::start().await;
    let analysis = json!({
        "score": 72,
        "tags": [
            { "label": "Título SEO Otimizado", "type": "positive" },
            { "label": "Descrição Pobre", "type": "negative" }
        ],
        "actionPlan": ["Adicionar ficha técnica completa"],
        "strengths": ["Preço competitivo"],
        "weaknesses": ["Poucas fotos"],
        "seoKeywords": ["tênis corrida"],
        "descriptionImprovement": "Inclua medidas.",
        "priceAnalysis": "Dentro da média."
    });

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("systemInstruction"))
        .and(body_string_contains("responseSchema"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&analysis.to_string())))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .analyze_listing("Tênis X", "Leve", "R$ 200,00", Platform::MercadoLivre)
        .await
        .expect("analysis should parse");

    assert_eq!(result.score, 72);
    assert_eq!(result.tags.len(), 2);
    assert_eq!(result.action_plan, vec!["Adicionar ficha técnica completa"]);
}

#[tokio::test]
async fn api_errors_surface_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .analyze_listing("t", "d", "p", Platform::Generic)
        .await
        .unwrap_err();

    match err {
        GeminiError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_api_key_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = GeminiClient::with_base_url(None, "gemini-2.5-flash", None, &server.uri())
        .expect("client construction should not fail");
    let err = client.audit_ads("gastei 500").await.unwrap_err();
    assert!(matches!(err, GeminiError::MissingApiKey));
}

#[tokio::test]
async fn extract_listing_merges_searches_and_completes_dimensions() {
    let server = MockServer::start().await;
    mount_text(
        &server,
        "AUDITOR DE LOG",
        "Aditivo Radiador 1L, R$ 39,90, vendido por AutoPeças, enviado de Curitiba, PR.",
    )
    .await;
    mount_text(
        &server,
        "Pesquise especificamente",
        "Medidas do frasco: 25 x 10 x 8 cm, 1,1 kg.",
    )
    .await;

    let extraction = json!({
        "title": "Aditivo Radiador 1L",
        "price": "R$ 39,90",
        "description": "Aditivo concentrado",
        "platform": "Mercado Livre",
        "seller": "AutoPeças",
        "itemLocation": "Curitiba, PR",
        "productDimensions": {
            "height": "25 cm", "width": "10 cm", "length": "8 cm",
            "weight": "1.1 kg", "source": "extracted"
        }
    });
    mount_text(&server, "responseSchema", &extraction.to_string()).await;

    let client = test_client(&server.uri());
    let listing = client
        .extract_listing("https://produto.mercadolivre.com.br/MLB-123-aditivo-radiador-_JM")
        .await
        .expect("extraction should succeed");

    assert_eq!(listing.platform, Platform::MercadoLivre);
    assert_eq!(listing.item_location.as_deref(), Some("Curitiba, PR"));
    let package = listing.package_dimensions.expect("package synthesized");
    assert_eq!(package.source, DimensionSource::Estimated);
    assert_eq!(package.height, "28 cm");
    assert_eq!(listing.weight.as_deref(), Some("1.1 kg"));
    assert_eq!(
        listing.dimensions_details.expect("legacy projection").length,
        "8 cm"
    );
}

#[tokio::test]
async fn extract_listing_fails_when_searches_are_empty() {
    let server = MockServer::start().await;
    mount_text(&server, "google_search", "").await;
    Mock::given(method("POST"))
        .and(body_string_contains("responseSchema"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .extract_listing("https://www.amazon.com.br/dp/B0TEST")
        .await
        .unwrap_err();
    assert!(matches!(err, GeminiError::NoSearchData { .. }), "{err:?}");
}

#[tokio::test]
async fn analyze_trends_keeps_only_real_sources() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_string_contains("google_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Air fryers seguem em alta." }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "title": "G1", "uri": "https://g1.globo.com/economia" } },
                        { "web": { "title": "Sem link" } }
                    ]
                }
            }]
        })))
        .mount(&server)
        .await;

    let structured = json!({
        "overview": "Demanda forte",
        "trendingProducts": ["Air Fryer", "Mop"],
        "priceRange": "R$ 150 - R$ 400",
        "opportunityLevel": "Média"
    });
    mount_text(&server, "responseSchema", &structured.to_string()).await;

    let client = test_client(&server.uri());
    let (trends, board) = client.trend_board("Cozinha").await.expect("trends");

    assert_eq!(trends.opportunity_level, OpportunityLevel::Medium);
    assert_eq!(trends.sources.len(), 1);
    assert_eq!(trends.sources[0].title, "G1");
    assert!(trends.marketplace_specifics.amazon.is_empty());
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].platforms, "Mercado Livre/Geral");
}

#[tokio::test]
async fn search_catalog_normalizes_urls() {
    let server = MockServer::start().await;
    mount_text(&server, "google_search", "Kit chaves: R$ 89").await;
    let items = json!([
        {
            "productName": "Kit Chaves 40 peças",
            "winningPrice": "R$ 89,90",
            "competitionLevel": "Alta",
            "tipToWin": "Preço abaixo de R$ 90",
            "productUrl": "produto.mercadolivre.com.br/MLB-999-kit-chaves?tracking=1"
        }
    ]);
    mount_text(&server, "responseSchema", &items.to_string()).await;

    let client = test_client(&server.uri());
    let catalog = client.search_catalog("Ferramentas").await.expect("catalog");

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].competition_level, CompetitionLevel::High);
    assert_eq!(
        catalog[0].product_url,
        "https://produto.mercadolivre.com.br/MLB-999-kit-chaves"
    );
}

#[tokio::test]
async fn benchmark_titles_falls_back_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.benchmark_titles(Platform::Shopee, "fone bluetooth").await;

    assert!(result.competitor_titles.is_empty());
    assert_eq!(result.suggested_titles[1], "Oferta fone bluetooth");
}

#[tokio::test]
async fn geo_trends_fall_back_on_malformed_json() {
    let server = MockServer::start().await;
    mount_text(&server, "google_search", "SP e MG lideram").await;
    mount_text(&server, "responseSchema", "{ not json").await;

    let client = test_client(&server.uri());
    let result = client.analyze_geo_trends("pneu").await;

    assert_eq!(result.top_regions.len(), 5);
    assert_eq!(result.related_queries[0], "pneu preço");
}

#[tokio::test]
async fn geo_trends_truncate_related_queries() {
    let server = MockServer::start().await;
    mount_text(&server, "google_search", "Dados de demanda").await;
    let queries: Vec<String> = (0..14).map(|i| format!("termo {i}")).collect();
    let geo = json!({
        "topRegions": [{ "region": "Bahia", "interestLevel": 90 }],
        "relatedQueries": queries,
        "seasonalInsight": "Verão"
    });
    mount_text(&server, "responseSchema", &geo.to_string()).await;

    let client = test_client(&server.uri());
    let result = client.analyze_geo_trends("protetor solar").await;

    assert_eq!(result.related_queries.len(), 10);
    assert_eq!(result.top_regions[0].region, "Bahia");
}

#[tokio::test]
async fn audit_ads_replaces_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let audit = client.audit_ads("Gasto 500, vendas 1200").await.expect("audit");
    assert_eq!(audit, EMPTY_AUDIT_MESSAGE);
}

#[tokio::test]
async fn full_listing_keeps_spec_order() {
    let server = MockServer::start().await;
    let body = r#"{"titles":["A","B","C"],"description":"**Top**","specs":{"Peso":"1 kg","Voltagem":"Bivolt","Material":"Aço"}}"#;
    mount_text(&server, "responseSchema", body).await;

    let client = test_client(&server.uri());
    let result = client
        .generate_full_listing("Chaleira elétrica", "", "")
        .await
        .expect("full listing");

    let keys: Vec<&str> = result.specs.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["Peso", "Voltagem", "Material"]);
}
