//! Per-invocation state shared by every command handler.

use marketpulse_auth::{build_auth_gate, AuthGate, FileStore};
use marketpulse_core::{AppConfig, Session, User};
use marketpulse_gemini::GeminiClient;

pub(crate) struct AppContext {
    pub(crate) config: AppConfig,
    pub(crate) gate: Box<dyn AuthGate>,
    pub(crate) json: bool,
}

impl AppContext {
    /// Opens the auth gate over the on-disk store.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected auth back-end is not configured or
    /// the store cannot be read.
    pub(crate) fn new(config: AppConfig, json: bool) -> anyhow::Result<Self> {
        let store = FileStore::new(config.store_path());
        let gate = build_auth_gate(&config, store)?;
        tracing::debug!(backend = ?gate.backend(), "auth gate ready");
        Ok(Self { config, gate, json })
    }

    /// # Errors
    ///
    /// Returns an error when nobody is signed in.
    pub(crate) async fn require_user(&self) -> anyhow::Result<User> {
        match self.gate.current_user().await? {
            Some(user) => Ok(user),
            None => anyhow::bail!("Faça login para continuar: marketpulse auth login <e-mail>"),
        }
    }

    /// # Errors
    ///
    /// Returns an error when nobody is signed in or the user is not an
    /// administrator.
    pub(crate) async fn require_admin(&self) -> anyhow::Result<User> {
        let user = self.require_user().await?;
        if !user.is_admin() {
            tracing::warn!(user_id = %user.id, "admin command refused");
            anyhow::bail!("Acesso restrito a administradores.");
        }
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub(crate) fn gemini(&self) -> anyhow::Result<GeminiClient> {
        Ok(GeminiClient::from_config(&self.config)?)
    }

    /// # Errors
    ///
    /// Returns an error if the session file exists but cannot be read.
    pub(crate) fn load_session(&self) -> anyhow::Result<Session> {
        Ok(Session::load(&self.config.session_path())?)
    }

    /// # Errors
    ///
    /// Returns an error if the session file cannot be written.
    pub(crate) fn save_session(&self, session: &Session) -> anyhow::Result<()> {
        session.save(&self.config.session_path())?;
        tracing::debug!(path = %self.config.session_path().display(), "session saved");
        Ok(())
    }
}
