use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marketplace a listing belongs to.
///
/// Values always come out of [`Platform::from_label`], so free-text labels
/// returned by the AI service never survive into a typed listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    MercadoLivre,
    Amazon,
    Shopee,
    #[default]
    Generic,
}

impl Platform {
    /// Canonicalizes a free-text platform label.
    ///
    /// Matching is a case-insensitive substring search: `"mercado"` or
    /// `"libre"` map to Mercado Livre, `"amazon"` to Amazon and `"shopee"` to
    /// Shopee. Anything else, including the empty string, is
    /// [`Platform::Generic`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("mercado") || lower.contains("libre") {
            Self::MercadoLivre
        } else if lower.contains("amazon") {
            Self::Amazon
        } else if lower.contains("shopee") {
            Self::Shopee
        } else {
            Self::Generic
        }
    }

    /// Display name used in prompts, tables and exported reports.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::MercadoLivre => "Mercado Livre",
            Self::Amazon => "Amazon",
            Self::Shopee => "Shopee",
            Self::Generic => "Geral",
        }
    }

    /// Short tag used on the trend board (`ML/Amazon/Shopee`).
    #[must_use]
    pub fn short_tag(self) -> &'static str {
        match self {
            Self::MercadoLivre => "ML",
            Self::Amazon => "Amazon",
            Self::Shopee => "Shopee",
            Self::Generic => "Geral",
        }
    }

    /// Estimated marketplace commission in percent, if the marketplace is known.
    #[must_use]
    pub fn default_fee_percent(self) -> Option<Decimal> {
        match self {
            Self::MercadoLivre => Some(Decimal::from(16)),
            Self::Amazon => Some(Decimal::from(15)),
            Self::Shopee => Some(Decimal::from(14)),
            Self::Generic => None,
        }
    }

    /// The three concrete marketplaces, in the order reports list them.
    pub const MARKETPLACES: [Platform; 3] = [Self::MercadoLivre, Self::Amazon, Self::Shopee];
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Generic, Self::from_label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_matches_mercado_livre_variants() {
        assert_eq!(Platform::from_label("Mercado Livre"), Platform::MercadoLivre);
        assert_eq!(Platform::from_label("MERCADOLIBRE.com"), Platform::MercadoLivre);
        assert_eq!(Platform::from_label("Libre"), Platform::MercadoLivre);
    }

    #[test]
    fn from_label_matches_amazon_and_shopee() {
        assert_eq!(Platform::from_label("Amazon Brasil"), Platform::Amazon);
        assert_eq!(Platform::from_label("shopee.com.br"), Platform::Shopee);
    }

    #[test]
    fn from_label_is_total() {
        for label in ["", "null", "undefined", "eBay", "   ", "🛒"] {
            assert_eq!(Platform::from_label(label), Platform::Generic, "label {label:?}");
        }
    }

    #[test]
    fn mercado_wins_over_later_fragments() {
        assert_eq!(
            Platform::from_label("mercado livre vs amazon"),
            Platform::MercadoLivre
        );
    }

    #[test]
    fn deserialize_canonicalizes_free_text() {
        let p: Platform = serde_json::from_str("\"amazon.com.br\"").unwrap();
        assert_eq!(p, Platform::Amazon);
        let p: Platform = serde_json::from_str("null").unwrap();
        assert_eq!(p, Platform::Generic);
    }

    #[test]
    fn serialize_uses_display_name() {
        let json = serde_json::to_string(&Platform::MercadoLivre).unwrap();
        assert_eq!(json, "\"Mercado Livre\"");
        let json = serde_json::to_string(&Platform::Generic).unwrap();
        assert_eq!(json, "\"Geral\"");
    }

    #[test]
    fn default_fee_is_known_for_marketplaces_only() {
        assert_eq!(
            Platform::MercadoLivre.default_fee_percent(),
            Some(Decimal::from(16))
        );
        assert_eq!(Platform::Amazon.default_fee_percent(), Some(Decimal::from(15)));
        assert_eq!(Platform::Shopee.default_fee_percent(), Some(Decimal::from(14)));
        assert_eq!(Platform::Generic.default_fee_percent(), None);
    }
}
