//! Accounts managed by a Supabase-compatible hosted service.
//!
//! Sign-in goes through the GoTrue endpoints under `/auth/v1`; names and
//! roles come from the `profiles` table exposed by PostgREST under
//! `/rest/v1`. The access token and the signed-in user live in the injected
//! store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marketpulse_core::{AuthBackend, NewUser, Role, User};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AuthError;
use crate::gate::{validate_new_user, validate_password, AuthGate};
use crate::store::{get_json, set_json, KeyValueStore};

pub const SESSION_KEY: &str = "marketpulse_hosted_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostedSession {
    access_token: String,
    user: User,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Profile {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<Role>,
    #[serde(default, skip_serializing)]
    created_at: Option<DateTime<Utc>>,
}

impl Profile {
    fn into_user(self) -> User {
        let email = self.email.unwrap_or_default();
        User {
            name: self.name.unwrap_or_else(|| email.clone()),
            email,
            id: self.id,
            role: self.role.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

pub struct HostedAuthGate<S> {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    store: S,
}

impl<S: KeyValueStore> HostedAuthGate<S> {
    /// # Errors
    ///
    /// Returns [`AuthError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        anon_key: &str,
        timeout_secs: Option<u64>,
        store: S,
    ) -> Result<Self, AuthError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            store,
        })
    }

    fn session(&self) -> Result<Option<HostedSession>, AuthError> {
        get_json(&self.store, SESSION_KEY)
    }

    fn require_session(&self) -> Result<HostedSession, AuthError> {
        self.session()?.ok_or(AuthError::NotSignedIn)
    }

    fn request(&self, method: reqwest::Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let bearer = token.unwrap_or(&self.anon_key);
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    async fn fetch_profile(&self, id: &str, token: &str) -> Result<Option<Profile>, AuthError> {
        let response = self
            .request(reqwest::Method::GET, "/rest/v1/profiles", Some(token))
            .query(&[("id", format!("eq.{id}").as_str()), ("select", "*")])
            .send()
            .await?;
        let mut profiles: Vec<Profile> = read_json(response, "profiles").await?;
        Ok(profiles.pop())
    }
}

/// Maps non-success responses to [`AuthError::Api`] and parses the body.
async fn read_json<T: serde::de::DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, AuthError> {
    let response = check_status(response).await?;
    let raw = response.text().await?;
    serde_json::from_str(&raw).map_err(|source| AuthError::Deserialize {
        context: context.to_string(),
        source,
    })
}

async fn check_status(response: Response) -> Result<Response, AuthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let raw = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&raw)
        .ok()
        .and_then(|b| b.msg.or(b.error_description).or(b.message))
        .unwrap_or(raw);
    tracing::warn!(status = status.as_u16(), %message, "auth service request failed");
    Err(AuthError::Api {
        status: status.as_u16(),
        message,
    })
}

fn user_from_auth(auth: AuthUser, profile: Option<Profile>) -> User {
    match profile {
        Some(profile) => profile.into_user(),
        None => {
            let email = auth.email.unwrap_or_default();
            User {
                name: auth.user_metadata.name.unwrap_or_else(|| email.clone()),
                email,
                id: auth.id,
                role: auth.user_metadata.role.unwrap_or_default(),
                created_at: auth.created_at.unwrap_or_else(Utc::now),
            }
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> AuthGate for HostedAuthGate<S> {
    fn backend(&self) -> AuthBackend {
        AuthBackend::Hosted
    }

    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.session()?.map(|s| s.user))
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let response = self
            .request(reqwest::Method::POST, "/auth/v1/token?grant_type=password", None)
            .json(&json!({ "email": email.trim(), "password": password }))
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED
        ) {
            tracing::warn!(email = email.trim(), "hosted login rejected");
            return Err(AuthError::InvalidCredentials);
        }
        let token: TokenResponse = read_json(response, "token").await?;

        let profile = self.fetch_profile(&token.user.id, &token.access_token).await?;
        let user = user_from_auth(token.user, profile);
        set_json(
            &self.store,
            SESSION_KEY,
            &HostedSession {
                access_token: token.access_token,
                user: user.clone(),
            },
        )?;
        tracing::info!(user_id = %user.id, "hosted login");
        Ok(user)
    }

    async fn logout(&self) -> Result<(), AuthError> {
        if let Some(session) = self.session()? {
            let result = self
                .request(reqwest::Method::POST, "/auth/v1/logout", Some(session.access_token.as_str()))
                .send()
                .await;
            match result {
                Ok(response) => {
                    if let Err(e) = check_status(response).await {
                        tracing::warn!(error = %e, "remote sign-out failed");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "remote sign-out failed"),
            }
        }
        self.store.remove(SESSION_KEY)
    }

    async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        let session = self.require_session()?;
        let response = self
            .request(
                reqwest::Method::GET,
                "/rest/v1/profiles?select=*&order=created_at.asc",
                Some(session.access_token.as_str()),
            )
            .send()
            .await?;
        let profiles: Vec<Profile> = read_json(response, "profiles").await?;
        Ok(profiles.into_iter().map(Profile::into_user).collect())
    }

    async fn register_user(&self, new_user: NewUser) -> Result<User, AuthError> {
        let new_user = validate_new_user(new_user)?;
        let session = self.require_session()?;

        let response = self
            .request(reqwest::Method::POST, "/auth/v1/signup", None)
            .json(&json!({
                "email": new_user.email,
                "password": new_user.password,
                "data": { "name": new_user.name, "role": new_user.role },
            }))
            .send()
            .await?;
        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
        ) {
            let err = check_status(response).await.err();
            if let Some(AuthError::Api { message, .. }) = &err {
                if message.to_lowercase().contains("already") {
                    return Err(AuthError::EmailTaken);
                }
            }
            return Err(err.unwrap_or(AuthError::EmailTaken));
        }

        let signup: SignupResponse = read_json(response, "signup").await?;
        let (id, created_at) = match signup.user {
            Some(user) => (user.id, user.created_at),
            None => (
                signup.id.ok_or(AuthError::UserNotFound)?,
                signup.created_at,
            ),
        };
        let email = signup.email.unwrap_or(new_user.email);

        let profile = Profile {
            id: id.clone(),
            name: Some(new_user.name.clone()),
            email: Some(email.clone()),
            role: Some(new_user.role),
            created_at: None,
        };
        let response = self
            .request(reqwest::Method::POST, "/rest/v1/profiles", Some(session.access_token.as_str()))
            .header("Prefer", "resolution=merge-duplicates")
            .json(&profile)
            .send()
            .await?;
        check_status(response).await?;

        let user = User {
            id,
            name: new_user.name,
            email,
            role: new_user.role,
            created_at: created_at.unwrap_or_else(Utc::now),
        };
        tracing::info!(user_id = %user.id, role = %user.role, "hosted user registered");
        Ok(user)
    }

    async fn update_password(&self, id: &str, new_password: &str) -> Result<(), AuthError> {
        validate_password(new_password)?;
        let session = self.require_session()?;
        if session.user.id != id {
            return Err(AuthError::Unsupported(
                "alterar a senha de outro usuário",
            ));
        }

        let response = self
            .request(reqwest::Method::PUT, "/auth/v1/user", Some(session.access_token.as_str()))
            .json(&json!({ "password": new_password }))
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(user_id = id, "hosted password updated");
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<(), AuthError> {
        let session = self.require_session()?;
        let profile = self
            .fetch_profile(id, &session.access_token)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        if profile.into_user().is_root_admin() {
            return Err(AuthError::RootAdminProtected);
        }

        let response = self
            .request(
                reqwest::Method::DELETE,
                "/rest/v1/profiles",
                Some(session.access_token.as_str()),
            )
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await?;
        check_status(response).await?;
        tracing::info!(user_id = id, "hosted profile deleted");
        Ok(())
    }

    async fn reset_system(&self) -> Result<(), AuthError> {
        Err(AuthError::Unsupported("reiniciar o sistema"))
    }
}
