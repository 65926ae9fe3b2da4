//! Click-through URL normalization shared by the catalog, title-benchmark
//! and export flows.
//!
//! The AI service frequently answers with search-engine redirect links,
//! tracking-laden URLs or bare hostnames. [`normalize_listing_url`] turns any
//! of those into a direct marketplace link, or into a marketplace-native
//! search when nothing usable survives.

use std::sync::LazyLock;

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use regex::Regex;
use url::Url;

use crate::platform::Platform;

/// Shortest string accepted as a usable destination.
pub const MIN_VIABLE_URL_LEN: usize = 10;

/// Paths that, once the query is gone, only lead to an empty search page.
const SEARCH_ROOTS: [&str; 3] = ["", "s", "search"];

/// Host fragments of the supported marketplaces.
const MARKETPLACE_HOSTS: [&str; 4] = [
    "mercadolivre.com",
    "mercadolibre.com",
    "amazon.com",
    "shopee.com",
];

static REDIRECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)google\.com(?:\.br)?/url").expect("valid redirector regex"));

static REDIRECT_URL_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]url=([^&#]+)").expect("valid redirect url regex"));

static REDIRECT_Q_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]q=([^&#]+)").expect("valid redirect q regex"));

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid scheme regex"));

/// Normalizes a product URL returned by the AI service.
///
/// 1. Search-engine redirect links are unwrapped to their `url`/`q` target.
/// 2. Everything from the first `?` on is dropped.
/// 3. `https://` is prepended when the scheme is missing.
/// 4. Results that are too short, unparseable, not hosted on a supported
///    marketplace, or left pointing at a bare search root such as `/s` are
///    replaced by [`marketplace_search_url`] for `display_name` on
///    `platform`.
///
/// Total over arbitrary input, idempotent, and the output never contains `?`.
#[must_use]
pub fn normalize_listing_url(raw: Option<&str>, display_name: &str, platform: Platform) -> String {
    let mut candidate: String = raw
        .unwrap_or_default()
        .trim()
        .chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .collect();

    if REDIRECTOR.is_match(&candidate) {
        if let Some(target) = unwrap_redirect(&candidate) {
            candidate = target;
        }
    }

    if let Some(idx) = candidate.find('?') {
        candidate.truncate(idx);
    }
    let candidate = candidate.trim();

    let with_scheme = if SCHEME.is_match(candidate) {
        candidate.to_string()
    } else {
        format!("https://{candidate}")
    };

    if candidate.chars().count() < MIN_VIABLE_URL_LEN {
        return marketplace_search_url(display_name, platform);
    }

    match Url::parse(&with_scheme) {
        Ok(url) if is_marketplace_host(&url) && !is_search_root(&url) => {
            let serialized = url.to_string();
            if serialized.contains('?') {
                marketplace_search_url(display_name, platform)
            } else {
                serialized
            }
        }
        _ => marketplace_search_url(display_name, platform),
    }
}

/// Marketplace-native search for `display_name`.
///
/// Catalog items and the generic platform use the Mercado Livre listing
/// search. Templates carry the term in the path so the result has no query
/// string.
#[must_use]
pub fn marketplace_search_url(display_name: &str, platform: Platform) -> String {
    let term = utf8_percent_encode(display_name.trim(), NON_ALPHANUMERIC).to_string();
    match platform {
        Platform::Amazon => format!("https://www.amazon.com.br/s/field-keywords={term}"),
        Platform::Shopee => format!("https://shopee.com.br/search/{term}"),
        Platform::MercadoLivre | Platform::Generic => {
            format!("https://lista.mercadolivre.com.br/{term}")
        }
    }
}

/// Google Shopping search link used by the trend views.
#[must_use]
pub fn shopping_search_url(product: &str, marketplace: Option<Platform>) -> String {
    let query = match marketplace {
        Some(p) if p != Platform::Generic => format!("{product} {}", p.display_name()),
        _ => product.to_string(),
    };
    let term = utf8_percent_encode(&query, NON_ALPHANUMERIC);
    format!("https://www.google.com/search?q={term}&tbm=shop")
}

/// Search terms derived from a product URL: the longest path segment with
/// `-` and `_` turned into spaces.
///
/// `https://produto.mercadolivre.com.br/MLB-123-aditivo-radiador-_JM` yields
/// `"MLB 123 aditivo radiador  JM"`. Returns `None` when the URL does not
/// parse or has no path.
#[must_use]
pub fn url_keywords(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let slug = url
        .path()
        .split('/')
        .max_by_key(|segment| segment.len())
        .filter(|segment| !segment.is_empty())?;
    let decoded = percent_decode_str(slug).decode_utf8_lossy();
    Some(decoded.replace(['-', '_'], " "))
}

fn is_marketplace_host(url: &Url) -> bool {
    url.host_str().is_some_and(|host| {
        let host = host.to_ascii_lowercase();
        MARKETPLACE_HOSTS.iter().any(|fragment| host.contains(fragment))
    })
}

fn is_search_root(url: &Url) -> bool {
    let path = url.path().trim_matches('/');
    SEARCH_ROOTS.iter().any(|root| path.eq_ignore_ascii_case(root))
}

fn unwrap_redirect(link: &str) -> Option<String> {
    let with_scheme = if SCHEME.is_match(link) {
        link.to_string()
    } else {
        format!("https://{link}")
    };

    match Url::parse(&with_scheme) {
        Ok(url) => {
            let param = |name: &str| {
                url.query_pairs()
                    .find(|(key, value)| key == name && !value.is_empty())
                    .map(|(_, value)| value.into_owned())
            };
            param("url").or_else(|| param("q"))
        }
        Err(_) => [&*REDIRECT_URL_PARAM, &*REDIRECT_Q_PARAM]
            .into_iter()
            .find_map(|pattern| pattern.captures(link)?.get(1))
            .map(|m| percent_decode_str(m.as_str()).decode_utf8_lossy().into_owned()),
    }
}
