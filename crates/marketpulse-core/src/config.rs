use std::path::PathBuf;

use crate::app_config::{AppConfig, AuthBackend, Environment};
use crate::ConfigError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Nothing is strictly required: the API key and hosted-auth credentials are
/// optional here and reported through [`AppConfig::missing_credentials`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_optional_u64 = |var: &str| -> Result<Option<u64>, ConfigError> {
        optional(var)
            .map(|raw| {
                raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    };

    let env = parse_environment(&or_default("MARKETPULSE_ENV", "development"));
    let log_level = or_default("MARKETPULSE_LOG_LEVEL", "info");

    let gemini_api_key = optional("GEMINI_API_KEY");
    let gemini_model = or_default("MARKETPULSE_GEMINI_MODEL", DEFAULT_GEMINI_MODEL);
    let gemini_base_url = or_default("MARKETPULSE_GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL);
    let request_timeout_secs = parse_optional_u64("MARKETPULSE_REQUEST_TIMEOUT_SECS")?;

    let auth_backend = parse_auth_backend(&or_default("MARKETPULSE_AUTH_BACKEND", "local"))?;
    let supabase_url = optional("SUPABASE_URL");
    let supabase_anon_key = optional("SUPABASE_ANON_KEY");

    let data_dir = PathBuf::from(or_default("MARKETPULSE_DATA_DIR", "./.marketpulse"));
    let export_dir = PathBuf::from(or_default("MARKETPULSE_EXPORT_DIR", "."));

    Ok(AppConfig {
        env,
        log_level,
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        request_timeout_secs,
        auth_backend,
        supabase_url,
        supabase_anon_key,
        data_dir,
        export_dir,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_auth_backend(s: &str) -> Result<AuthBackend, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "local" => Ok(AuthBackend::Local),
        "hosted" => Ok(AuthBackend::Hosted),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MARKETPULSE_AUTH_BACKEND".to_string(),
            reason: format!("expected 'local' or 'hosted', got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.gemini_model, "gemini-2.5-flash");
        assert_eq!(
            cfg.gemini_base_url,
            "https://generativelanguage.googleapis.com"
        );
        assert!(cfg.gemini_api_key.is_none());
        assert!(cfg.request_timeout_secs.is_none());
        assert_eq!(cfg.auth_backend, AuthBackend::Local);
        assert_eq!(cfg.data_dir, PathBuf::from("./.marketpulse"));
        assert_eq!(cfg.export_dir, PathBuf::from("."));
        assert_eq!(cfg.missing_credentials(), vec!["GEMINI_API_KEY"]);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut map = HashMap::new();
        map.insert("GEMINI_API_KEY", "   ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.gemini_api_key.is_none());
    }

    #[test]
    fn request_timeout_override() {
        let mut map = HashMap::new();
        map.insert("MARKETPULSE_REQUEST_TIMEOUT_SECS", "45");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, Some(45));
    }

    #[test]
    fn request_timeout_invalid() {
        let mut map = HashMap::new();
        map.insert("MARKETPULSE_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MARKETPULSE_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(MARKETPULSE_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn hosted_backend_reports_missing_supabase_credentials() {
        let mut map = HashMap::new();
        map.insert("MARKETPULSE_AUTH_BACKEND", "Hosted");
        map.insert("GEMINI_API_KEY", "key");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.auth_backend, AuthBackend::Hosted);
        assert_eq!(
            cfg.missing_credentials(),
            vec!["SUPABASE_URL", "SUPABASE_ANON_KEY"]
        );
    }

    #[test]
    fn unknown_auth_backend_is_rejected() {
        let mut map = HashMap::new();
        map.insert("MARKETPULSE_AUTH_BACKEND", "ldap");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MARKETPULSE_AUTH_BACKEND"),
            "expected InvalidEnvVar(MARKETPULSE_AUTH_BACKEND), got: {result:?}"
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut map = HashMap::new();
        map.insert("GEMINI_API_KEY", "super-secret-key");
        map.insert("SUPABASE_ANON_KEY", "anon-secret");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("super-secret-key"));
        assert!(!debug.contains("anon-secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn store_and_session_paths_live_in_data_dir() {
        let mut map = HashMap::new();
        map.insert("MARKETPULSE_DATA_DIR", "/tmp/mp");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.store_path(), PathBuf::from("/tmp/mp/store.json"));
        assert_eq!(cfg.session_path(), PathBuf::from("/tmp/mp/session.json"));
    }
}
