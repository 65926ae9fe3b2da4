//! HTTP client for the Gemini `generateContent` REST endpoint.
//!
//! Every task in this crate goes through [`GeminiClient::generate`]: one
//! prompt, an optional system instruction and exactly one [`Mode`]. Web
//! search and JSON-schema output are separate modes because the service does
//! not accept both on the same call.

use std::time::Duration;

use marketpulse_core::{AppConfig, GroundingSource};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::GeminiError;
use crate::wire::{
    Content, ErrorResponse, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GoogleSearch, Part, Tool,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// How the service should answer a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Free text, no tools.
    Plain,
    /// Free text grounded on Google Search results.
    WebSearch,
    /// JSON constrained by the given response schema.
    Structured(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub mode: Mode,
}

impl GenerateRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>, mode: Mode) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            mode,
        }
    }

    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

/// Text of the first candidate plus the web pages it was grounded on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    pub text: String,
    /// Unfiltered: chunks without a title or URI carry `"Fonte Web"` / `"#"`.
    pub sources: Vec<GroundingSource>,
}

/// Client for the Gemini REST API.
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<&str>,
        model: &str,
        timeout_secs: Option<u64>,
    ) -> Result<Self, GeminiError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// `timeout_secs = None` leaves requests without a deadline.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: Option<&str>,
        model: &str,
        timeout_secs: Option<u64>,
        base_url: &str,
    ) -> Result<Self, GeminiError> {
        let mut builder = Client::builder().user_agent("marketpulse/0.1 (marketplace-intelligence)");
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
            model: model.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Builds a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, GeminiError> {
        Self::with_base_url(
            config.gemini_api_key.as_deref(),
            &config.gemini_model,
            config.request_timeout_secs,
            &config.gemini_base_url,
        )
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Sends one `generateContent` call.
    ///
    /// `task` names the calling operation in logs and errors.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::MissingApiKey`] when no key is configured.
    /// - [`GeminiError::Http`] on network failure.
    /// - [`GeminiError::Api`] when the service answers with a non-2xx status.
    /// - [`GeminiError::Deserialize`] if the envelope does not parse.
    pub async fn generate(
        &self,
        task: &'static str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;

        let (tools, generation_config) = match &request.mode {
            Mode::Plain => (Vec::new(), None),
            Mode::WebSearch => (
                vec![Tool {
                    google_search: GoogleSearch {},
                }],
                None,
            ),
            Mode::Structured(schema) => (
                Vec::new(),
                Some(GenerationConfig {
                    response_mime_type: "application/json",
                    response_schema: schema,
                }),
            ),
        };

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            system_instruction: request.system_instruction.as_deref().map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
            tools,
            generation_config,
        };

        tracing::debug!(task, model = %self.model, mode = mode_name(&request.mode), "sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            tracing::warn!(task, status = status.as_u16(), %message, "Gemini request failed");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| GeminiError::Deserialize {
                context: format!("generateContent({task})"),
                source: e,
            })?;

        Ok(into_response(envelope))
    }

    /// Runs a structured call and deserializes the JSON answer into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`GeminiError`] from [`Self::generate`], plus
    /// [`GeminiError::EmptyResponse`] when no text came back and
    /// [`GeminiError::Deserialize`] when the text is not a `T`.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        task: &'static str,
        request: &GenerateRequest,
    ) -> Result<T, GeminiError> {
        let response = self.generate(task, request).await?;
        parse_json_text(task, &response.text)
    }
}

fn mode_name(mode: &Mode) -> &'static str {
    match mode {
        Mode::Plain => "plain",
        Mode::WebSearch => "web_search",
        Mode::Structured(_) => "structured",
    }
}

fn into_response(envelope: GenerateContentResponse) -> GenerateResponse {
    let Some(candidate) = envelope.candidates.into_iter().next() else {
        return GenerateResponse::default();
    };

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    let sources = candidate
        .grounding_metadata
        .map(|m| m.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|chunk| chunk.web)
        .map(|web| GroundingSource {
            title: web
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Fonte Web".to_string()),
            uri: web
                .uri
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| "#".to_string()),
        })
        .collect();

    GenerateResponse { text, sources }
}

/// Parses the text of a structured answer, tolerating a Markdown code fence.
pub(crate) fn parse_json_text<T: DeserializeOwned>(
    task: &'static str,
    text: &str,
) -> Result<T, GeminiError> {
    let trimmed = strip_code_fence(text.trim());
    if trimmed.is_empty() {
        return Err(GeminiError::EmptyResponse { task });
    }
    serde_json::from_str(trimmed).map_err(|e| GeminiError::Deserialize {
        context: task.to_string(),
        source: e,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{
        Candidate, CandidateContent, GroundingChunk, GroundingMetadata, ResponsePart, WebChunk,
    };

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::with_base_url(Some("test-key"), "gemini-2.5-flash", None, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = test_client("http://localhost:9999/");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn blank_api_key_is_treated_as_missing() {
        let client =
            GeminiClient::with_base_url(Some("  "), "m", None, "http://localhost").unwrap();
        assert!(client.api_key.is_none());
    }

    #[test]
    fn response_text_concatenates_parts_and_defaults_sources() {
        let envelope = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![
                        ResponsePart {
                            text: Some("Olá, ".into()),
                        },
                        ResponsePart { text: None },
                        ResponsePart {
                            text: Some("mundo".into()),
                        },
                    ],
                }),
                grounding_metadata: Some(GroundingMetadata {
                    grounding_chunks: vec![
                        GroundingChunk {
                            web: Some(WebChunk {
                                title: None,
                                uri: Some("https://g1.globo.com/x".into()),
                            }),
                        },
                        GroundingChunk {
                            web: Some(WebChunk {
                                title: Some("Sem link".into()),
                                uri: None,
                            }),
                        },
                        GroundingChunk { web: None },
                    ],
                }),
            }],
        };

        let response = into_response(envelope);
        assert_eq!(response.text, "Olá, mundo");
        assert_eq!(response.sources.len(), 2);
        assert_eq!(response.sources[0].title, "Fonte Web");
        assert_eq!(response.sources[1].uri, "#");
    }

    #[test]
    fn no_candidates_yields_empty_response() {
        let response = into_response(GenerateContentResponse::default());
        assert!(response.text.is_empty());
        assert!(response.sources.is_empty());
    }

    #[test]
    fn parse_json_text_accepts_fenced_json() {
        let value: serde_json::Value =
            parse_json_text("t", "```json\n{\"a\": 1}\n```").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn parse_json_text_rejects_empty_text() {
        let err = parse_json_text::<serde_json::Value>("copy", "   ").unwrap_err();
        assert!(matches!(err, GeminiError::EmptyResponse { task: "copy" }));
    }

    #[test]
    fn structured_request_serializes_schema_without_tools() {
        let schema = serde_json::json!({"type": "OBJECT"});
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: "oi" }],
            }],
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part { text: "sys" }],
            }),
            tools: Vec::new(),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &schema,
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "oi");
        assert!(json["systemInstruction"]["role"].is_null());
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(json.get("tools").is_none());
    }
}
