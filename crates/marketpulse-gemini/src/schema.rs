//! Response schemas for the structured phase of each task, in the OpenAPI
//! subset the service accepts.

use serde_json::{json, Value};

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn string_list() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn dimension_set() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "height": { "type": "STRING", "description": "Altura cm" },
            "width": { "type": "STRING", "description": "Largura cm" },
            "length": { "type": "STRING", "description": "Comp cm" },
            "weight": { "type": "STRING", "description": "Peso kg" },
            "source": { "type": "STRING", "enum": ["extracted", "estimated"] }
        }
    })
}

#[must_use]
pub fn analysis() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "INTEGER", "description": "Score from 0 to 100" },
            "tags": {
                "type": "ARRAY",
                "description": "Tags técnicas de algoritmo",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "label": { "type": "STRING", "description": "Nome da tag ex: Título Otimizado" },
                        "type": { "type": "STRING", "enum": ["positive", "negative", "neutral"] }
                    }
                }
            },
            "actionPlan": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Lista de tarefas práticas"
            },
            "strengths": string_list(),
            "weaknesses": string_list(),
            "seoKeywords": string_list(),
            "descriptionImprovement": string(),
            "priceAnalysis": string()
        },
        "required": [
            "score", "tags", "actionPlan", "strengths", "weaknesses",
            "seoKeywords", "descriptionImprovement", "priceAnalysis"
        ]
    })
}

#[must_use]
pub fn extraction() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": string(),
            "price": string(),
            "description": string(),
            "platform": string(),
            "seller": string(),
            "stock": string(),
            "rating": string(),
            "reviewsCount": string(),
            "itemLocation": {
                "type": "STRING",
                "description": "Cidade e Estado do estoque ex: São Paulo, SP"
            },
            "productDimensions": dimension_set(),
            "packageDimensions": dimension_set(),
            "logistics": string(),
            "listingAge": string(),
            "salesEstimate": string()
        },
        "required": ["title", "description"]
    })
}

#[must_use]
pub fn copywriting() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "optimizedTitles": string_list(),
            "bulletPoints": string_list(),
            "salesPitch": string()
        }
    })
}

#[must_use]
pub fn trends() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overview": string(),
            "trendingProducts": string_list(),
            "priceRange": string(),
            "opportunityLevel": { "type": "STRING", "enum": ["Baixa", "Média", "Alta"] },
            "marketplaceSpecifics": {
                "type": "OBJECT",
                "properties": {
                    "mercadoLivre": string_list(),
                    "amazon": string_list(),
                    "shopee": string_list()
                }
            }
        }
    })
}

#[must_use]
pub fn catalog() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "productName": string(),
                "winningPrice": string(),
                "competitionLevel": {
                    "type": "STRING",
                    "enum": ["Baixa", "Média", "Alta", "Extrema"]
                },
                "tipToWin": string(),
                "productUrl": string()
            }
        }
    })
}

#[must_use]
pub fn title_benchmark() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "competitorTitles": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": string(),
                        "url": string(),
                        "platform": string(),
                        "sellerName": string(),
                        "itemLocation": string()
                    }
                }
            },
            "patternAnalysis": string(),
            "suggestedTitles": string_list(),
            "highVolumeKeywords": string_list()
        }
    })
}

#[must_use]
pub fn geo_trends() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "topRegions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "region": string(),
                        "interestLevel": { "type": "NUMBER" }
                    }
                }
            },
            "relatedQueries": string_list(),
            "seasonalInsight": string()
        }
    })
}

#[must_use]
pub fn full_listing() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "titles": string_list(),
            "description": string(),
            "specs": {
                "type": "OBJECT",
                "properties": {},
                "additionalProperties": true
            }
        },
        "required": ["titles", "description", "specs"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_use_service_type_names() {
        for schema in [
            analysis(),
            extraction(),
            copywriting(),
            trends(),
            title_benchmark(),
            geo_trends(),
            full_listing(),
        ] {
            assert_eq!(schema["type"], "OBJECT");
        }
        assert_eq!(catalog()["type"], "ARRAY");
    }

    #[test]
    fn opportunity_enum_uses_portuguese_labels() {
        let labels = &trends()["properties"]["opportunityLevel"]["enum"];
        assert_eq!(labels, &json!(["Baixa", "Média", "Alta"]));
    }
}
