//! Prompt texts sent to the service. All user-facing wording is Portuguese
//! because the answers are shown verbatim to Brazilian sellers.

/// Persona used for the listing x-ray.
pub const ANALYST_INSTRUCTION: &str = "Você é o ALGORITMO DE RANQUEAMENTO dos maiores marketplaces \
(Mercado Livre, Amazon, Shopee). Sua função é fazer um Raio-X técnico do anúncio. \
Você é o sistema que decide quem aparece na primeira página. \
Analise friamente Título, Preço, Descrição e SEO.";

/// Geo search text above this many characters is cut before formatting.
pub const GEO_TEXT_LIMIT: usize = 20_000;

#[must_use]
pub fn analysis(title: &str, description: &str, price: &str, platform: &str) -> String {
    format!(
        "Faça o Raio-X de Algoritmo deste anúncio do {platform}.
Título: {title}
Preço: {price}
Descrição: {description}

1. Score: 0 a 100.
2. Tags de Relevância (obrigatório): crie 4 a 6 etiquetas curtas que resumam a saúde do anúncio.
   - Positivas para o que ajuda no ranqueamento (ex: \"Título SEO Otimizado\", \"Elegível Catálogo\").
   - Negativas para o que derruba o alcance (ex: \"Título Curto Demais\", \"Descrição Pobre\").
3. Plano de Ação: 3 a 5 tarefas práticas e imperativas para executar agora.
4. Pontos fortes, fracos, palavras-chave SEO, melhoria de descrição e análise de preço."
    )
}

#[must_use]
pub fn extraction_url_search(url: &str, keywords: &str) -> String {
    format!(
        "Você é um AUDITOR DE LOGÍSTICA DE E-COMMERCE. Preciso extrair os dados técnicos deste produto.

URL DO PRODUTO: {url}
TERMOS DO PRODUTO (EXTRAÍDOS DA URL): {keywords}

ALVO PRINCIPAL: DIMENSÕES, PESO E LOCALIZAÇÃO DO ESTOQUE.

Execute buscas para encontrar:
1. O produto exato \"{keywords}\" no Mercado Livre/Amazon/Shopee e sua ficha técnica.
2. Padrões numéricos de medidas no texto: \"20x30x10\", \"20cm\", \"kg\", \"gramas\".
3. A localização do vendedor ou de onde o produto é enviado (Cidade/UF).
4. Se não achar no site original, produtos idênticos em outros sites para estimar as medidas.

Retorne um resumo com título, preço, vendedor, localização do estoque, \
as medidas encontradas (altura, largura, profundidade, peso) e se são do produto ou da embalagem."
    )
}

#[must_use]
pub fn extraction_keyword_search(keywords: &str) -> String {
    format!(
        "Pesquise especificamente por: Ficha Técnica, Dimensões e Preço de \"{keywords}\".
Preciso das medidas (altura, largura, comprimento) e peso do produto/embalagem."
    )
}

#[must_use]
pub fn extraction_format(url_text: &str, keyword_text: &str) -> String {
    let keyword_text = if keyword_text.trim().is_empty() {
        "Nenhuma informação adicional encontrada."
    } else {
        keyword_text
    };
    format!(
        "Analise os dados brutos abaixo e preencha o JSON de logística.

--- DADOS DA URL ESPECÍFICA ---
{url_text}

--- DADOS GERAIS DO PRODUTO (BUSCA POR NOME) ---
{keyword_text}

REGRAS PARA DIMENSÕES (NUNCA DEIXE VAZIO):
1. Extração: se houver medidas \"A x L x P\", preencha 'productDimensions'.
2. Embalagem: com medidas do produto mas sem as da embalagem, calcule a embalagem \
(+2 a +5 cm por medida, +10% a +20% no peso) e marque source='estimated'.
3. Último recurso: sem nenhuma medida, estime pelo tipo de produto. Não retorne null.
4. Localização: cidade e estado do vendedor/estoque no formato \"Cidade, UF\".

Se a busca foi genérica (pelo nome do produto), preencha 'seller' como 'Vários Vendedores' \
e 'itemLocation' como 'Brasil'."
    )
}

#[must_use]
pub fn copywriting(title: &str, description: &str, platform: &str) -> String {
    format!(
        "Atue como um Copywriter Expert em Conversão.
Com base nos dados abaixo, crie materiais de venda persuasivos.

Produto: {title}
Características: {description}
Plataforma: {platform}

Gere:
1. 3 variações de títulos otimizados para SEO e clique (máx. 60 caracteres).
2. 5 bullet points focados em benefícios.
3. Um parágrafo curto de sales pitch."
    )
}

#[must_use]
pub fn trends_search(category: &str) -> String {
    format!(
        "Pesquise no Google as tendências atuais de mercado no Brasil para a categoria: \"{category}\".

Descubra:
1. Os 5 produtos mais vendidos no MERCADO LIVRE nesta categoria.
2. Os 5 best sellers na AMAZON BRASIL nesta categoria.
3. Os 5 produtos populares na SHOPEE nesta categoria.

Retorne um resumo do cenário atual, uma lista geral de produtos em alta, a faixa de preço média, \
o nível de oportunidade e as listas específicas por marketplace. Use a ferramenta de busca."
    )
}

#[must_use]
pub fn trends_format(text: &str) -> String {
    format!(
        "Converta a seguinte análise de mercado em JSON estrito.
Texto da análise: {text}

Campos: overview, trendingProducts (lista geral), priceRange, \
opportunityLevel (\"Baixa\" | \"Média\" | \"Alta\"), \
marketplaceSpecifics {{ mercadoLivre, amazon, shopee }} (top 5 de cada)."
    )
}

#[must_use]
pub fn catalog_search(category: &str) -> String {
    format!(
        "Pesquise no Google por \"Mercado Livre Catálogo {category}\" e \"Mais Vendidos Mercado Livre {category}\".

Identifique produtos LÍDERES DE VENDAS com Buy Box; ignore produtos com poucas avaliações.
Liste entre 8 e 12 produtos distintos. Para cada um:
1. Nome exato do produto.
2. Preço para ganhar o destaque (winner price).
3. Nível de competição estimado.
4. Uma dica estratégica para ganhar a Buy Box.
5. A URL exata da página do produto (\"produto.mercadolivre.com.br/MLB-...\" ou \"/p/\"). \
Evite links \"google.com/url\" e nunca use listas de busca (\"lista.mercadolivre...\")."
    )
}

#[must_use]
pub fn catalog_format(text: &str) -> String {
    format!(
        "Converta a lista de produtos de catálogo encontrada em JSON.
Dados: {text}

Array de objetos com productName, winningPrice, \
competitionLevel (\"Baixa\" | \"Média\" | \"Alta\" | \"Extrema\"), tipToWin e productUrl (URL direta)."
    )
}

#[must_use]
pub fn titles_search(platform: &str, keyword: &str) -> String {
    format!(
        "Pesquise os PRODUTOS MAIS VENDIDOS para o termo \"{keyword}\" (foco principal: {platform}) \
e compare Mercado Livre, Amazon Brasil e Shopee.

Priorize anúncios com sinais claros de vendas altas (\"+1000 vendidos\", \"#1 Mais Vendido\") \
e vendedores fortes (lojas oficiais, MercadoLíder). Ignore patrocinados recentes com poucas vendas.
Selecione de 3 a 5 anúncios por plataforma.

Links: URL direta da página do produto começando com \"https://\"; no Mercado Livre prefira \
\"/p/\", \"/up/\" ou \"/MLB-\"; evite \"google.com/url?q=\"; nunca retorne listas de busca.
Identifique o nome da loja e a localização (Cidade/UF, \"Estoque Full\"); sem dados, use \"N/A\".

Retorne também uma análise de padrões e sugestões de títulos."
    )
}

#[must_use]
pub fn titles_format(text: &str) -> String {
    format!(
        "Converta a análise de títulos em JSON estrito.
Texto da análise: {text}

Campos: competitorTitles [{{ title, url (absoluta, sem redirecionamento), \
platform (Mercado Livre | Amazon | Shopee), sellerName, itemLocation }}], \
patternAnalysis, suggestedTitles, highVolumeKeywords."
    )
}

#[must_use]
pub fn ads_audit(context: &str) -> String {
    format!(
        "Você é um ESPECIALISTA SÊNIOR EM TRÁFEGO PAGO (Mercado Ads, Amazon Ads, Google Ads).
Analise os dados da campanha abaixo e faça uma auditoria estratégica rápida e direta.

DADOS DA CAMPANHA:
\"{context}\"

Responda neste formato:
1. Diagnóstico: status em uma frase (Crítico, Atenção ou Saudável).
2. Análise Financeira: ROI/ROAS implícito.
3. Ação Imediata 1: o que fazer hoje.
4. Ação Imediata 2: próximo passo.
5. Insight Extra: uma dica sobre conversão ou qualidade do anúncio.

Seja curto e focado em lucro."
    )
}

#[must_use]
pub fn geo_search(product: &str) -> String {
    format!(
        "Realize uma pesquisa de DEMANDA DE MERCADO GEOGRÁFICA para o produto: \"{product}\".

1. Geolocalização: pesquise \"vendas de {product} por estado brasil\" e liste 5 regiões \
(estados ou cidades) com um nível de interesse estimado de 0 a 100.
2. Termos relacionados: o que o usuário digita (\"preço\", \"melhor marca\", \"promoção\").
3. Sazonalidade: quando vende mais.

Seja direto."
    )
}

#[must_use]
pub fn geo_format(text: &str) -> String {
    format!(
        "Converta a análise geográfica em JSON estrito.
Dados: {text}

Regras:
1. No máximo 10 itens em 'relatedQueries'.
2. 'seasonalInsight' em um parágrafo curto.
3. Com dados vagos, estime a partir de grandes centros (SP, RJ, MG).

Campos: topRegions [{{ region, interestLevel (0-100) }}], relatedQueries, seasonalInsight."
    )
}

#[must_use]
pub fn full_listing(product_name: &str, characteristics: &str, category: &str) -> String {
    let category = non_blank_or(category, "Geral");
    let characteristics = non_blank_or(characteristics, "Produto padrão");
    format!(
        "Atue como um Especialista em Cadastro de Produtos em Marketplace.
Crie um anúncio completo para o produto: \"{product_name}\".
Categoria: \"{category}\".
Características fornecidas: \"{characteristics}\".

Gere:
1. 3 títulos SEO (um para Mercado Livre com menos de 60 caracteres, um para Amazon, um focado em conversão).
2. Uma descrição vendedora em markdown com bullet points e quebra de objeções.
3. Uma ficha técnica tentativa (specs): estime peso, medidas, voltagem e material se não informados."
    )
}

fn non_blank_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

/// Cuts `text` to at most `limit` characters on a char boundary.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
