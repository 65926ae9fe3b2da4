//! Authentication gate with two interchangeable back-ends.
//!
//! [`LocalAuthGate`] keeps accounts in the injected [`KeyValueStore`];
//! [`HostedAuthGate`] talks to a Supabase-compatible service and keeps only
//! its session in the store. [`build_auth_gate`] picks one from
//! configuration.

pub mod error;
pub mod gate;
pub mod hosted;
pub mod local;
pub mod password;
pub mod store;

use marketpulse_core::{AppConfig, AuthBackend};

pub use error::AuthError;
pub use gate::AuthGate;
pub use hosted::HostedAuthGate;
pub use local::{LocalAuthGate, RECOVERY_ADMIN_EMAIL, SEED_PASSWORD};
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Builds the gate selected by `config.auth_backend` over `store`.
///
/// # Errors
///
/// - [`AuthError::NotConfigured`] when the hosted back-end is selected
///   without `SUPABASE_URL` or `SUPABASE_ANON_KEY`.
/// - Store errors raised while seeding the local back-end.
pub fn build_auth_gate<S>(config: &AppConfig, store: S) -> Result<Box<dyn AuthGate>, AuthError>
where
    S: KeyValueStore + 'static,
{
    match config.auth_backend {
        AuthBackend::Local => Ok(Box::new(LocalAuthGate::new(store)?)),
        AuthBackend::Hosted => {
            let (Some(url), Some(anon_key)) = (&config.supabase_url, &config.supabase_anon_key)
            else {
                let missing: Vec<&str> = config
                    .missing_credentials()
                    .into_iter()
                    .filter(|var| var.starts_with("SUPABASE"))
                    .collect();
                return Err(AuthError::NotConfigured(missing.join(", ")));
            };
            tracing::debug!(url = %url, "using hosted auth back-end");
            Ok(Box::new(HostedAuthGate::new(
                url,
                anon_key,
                config.request_timeout_secs,
                store,
            )?))
        }
    }
}
