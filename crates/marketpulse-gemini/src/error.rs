use thiserror::Error;

/// Errors returned by the Gemini client and the tasks built on it.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The first candidate carried no text.
    #[error("empty response from Gemini for task {task}")]
    EmptyResponse { task: &'static str },

    /// The response text could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// No API key was configured.
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,

    /// Both extraction searches came back without text.
    #[error("web search returned no usable text for {url}")]
    NoSearchData { url: String },
}
