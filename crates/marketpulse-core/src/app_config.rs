use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which authentication back-end the application talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthBackend {
    /// Users persisted in the local key-value store.
    #[default]
    Local,
    /// Supabase-compatible hosted auth service.
    Hosted,
}

impl std::fmt::Display for AuthBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthBackend::Local => write!(f, "local"),
            AuthBackend::Hosted => write!(f, "hosted"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// `None` means requests never time out.
    pub request_timeout_secs: Option<u64>,
    pub auth_backend: AuthBackend,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
}

impl AppConfig {
    /// Credentials the selected features need but that are not configured.
    ///
    /// These are reported as warnings at startup; commands that actually
    /// need them fail later with a specific error.
    #[must_use]
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.gemini_api_key.is_none() {
            missing.push("GEMINI_API_KEY");
        }
        if self.auth_backend == AuthBackend::Hosted {
            if self.supabase_url.is_none() {
                missing.push("SUPABASE_URL");
            }
            if self.supabase_anon_key.is_none() {
                missing.push("SUPABASE_ANON_KEY");
            }
        }
        missing
    }

    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }

    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("auth_backend", &self.auth_backend)
            .field("supabase_url", &self.supabase_url)
            .field(
                "supabase_anon_key",
                &self.supabase_anon_key.as_ref().map(|_| "[redacted]"),
            )
            .field("data_dir", &self.data_dir)
            .field("export_dir", &self.export_dir)
            .finish()
    }
}
