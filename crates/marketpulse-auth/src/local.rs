//! Accounts kept in the injected [`KeyValueStore`].

use async_trait::async_trait;
use chrono::Utc;
use marketpulse_core::{AuthBackend, NewUser, Role, User, ROOT_ADMIN_EMAIL};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::gate::{validate_new_user, validate_password, AuthGate};
use crate::password::{hash_password, verify_password};
use crate::store::{get_json, set_json, KeyValueStore};

pub const USERS_KEY: &str = "marketpulse_users";
pub const CURRENT_USER_KEY: &str = "marketpulse_current_user";

/// Second seeded administrator, kept so access survives a forgotten root password.
pub const RECOVERY_ADMIN_EMAIL: &str = "recovery@marketpulse.com";
/// Password given to both seed accounts.
pub const SEED_PASSWORD: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    #[serde(flatten)]
    user: User,
    password_hash: String,
}

pub struct LocalAuthGate<S> {
    store: S,
}

impl<S: KeyValueStore> LocalAuthGate<S> {
    /// Opens the gate over `store`, seeding the administrators if absent.
    ///
    /// # Errors
    ///
    /// Any store error raised while reading or seeding the user list.
    pub fn new(store: S) -> Result<Self, AuthError> {
        let gate = Self { store };
        gate.bootstrap()?;
        Ok(gate)
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds each seed account whose e-mail is missing. Existing accounts are
    /// never touched.
    fn bootstrap(&self) -> Result<(), AuthError> {
        let mut users = self.users()?;
        let mut added = 0;

        for (id, name, email) in [
            ("1", "Administrador", ROOT_ADMIN_EMAIL),
            ("2", "Administrador de Recuperação", RECOVERY_ADMIN_EMAIL),
        ] {
            if find_by_email(&users, email).is_none() {
                users.push(StoredUser {
                    user: User {
                        id: id.to_string(),
                        name: name.to_string(),
                        email: email.to_string(),
                        role: Role::Admin,
                        created_at: Utc::now(),
                    },
                    password_hash: hash_password(SEED_PASSWORD),
                });
                added += 1;
            }
        }

        if added > 0 {
            tracing::info!(added, "seeded administrator accounts");
            self.save_users(&users)?;
        }
        Ok(())
    }

    fn users(&self) -> Result<Vec<StoredUser>, AuthError> {
        Ok(get_json(&self.store, USERS_KEY)?.unwrap_or_default())
    }

    fn save_users(&self, users: &[StoredUser]) -> Result<(), AuthError> {
        set_json(&self.store, USERS_KEY, users)
    }
}

fn find_by_email<'a>(users: &'a [StoredUser], email: &str) -> Option<&'a StoredUser> {
    let email = email.trim();
    users.iter().find(|u| u.user.email.eq_ignore_ascii_case(email))
}

#[async_trait]
impl<S: KeyValueStore> AuthGate for LocalAuthGate<S> {
    fn backend(&self) -> AuthBackend {
        AuthBackend::Local
    }

    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        get_json(&self.store, CURRENT_USER_KEY)
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let users = self.users()?;
        let Some(stored) = find_by_email(&users, email)
            .filter(|u| verify_password(password, &u.password_hash))
        else {
            tracing::warn!(email = email.trim(), "local login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        set_json(&self.store, CURRENT_USER_KEY, &stored.user)?;
        tracing::info!(user_id = %stored.user.id, "local login");
        Ok(stored.user.clone())
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(CURRENT_USER_KEY)
    }

    async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.users()?.into_iter().map(|u| u.user).collect())
    }

    async fn register_user(&self, new_user: NewUser) -> Result<User, AuthError> {
        let new_user = validate_new_user(new_user)?;
        let mut users = self.users()?;
        if find_by_email(&users, &new_user.email).is_some() {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: new_user.name,
            email: new_user.email,
            role: new_user.role,
            created_at: Utc::now(),
        };
        users.push(StoredUser {
            user: user.clone(),
            password_hash: hash_password(&new_user.password),
        });
        self.save_users(&users)?;
        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    async fn update_password(&self, id: &str, new_password: &str) -> Result<(), AuthError> {
        validate_password(new_password)?;
        let mut users = self.users()?;
        let stored = users
            .iter_mut()
            .find(|u| u.user.id == id)
            .ok_or(AuthError::UserNotFound)?;
        stored.password_hash = hash_password(new_password);
        self.save_users(&users)?;
        tracing::info!(user_id = id, "password updated");
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<(), AuthError> {
        let mut users = self.users()?;
        let index = users
            .iter()
            .position(|u| u.user.id == id)
            .ok_or(AuthError::UserNotFound)?;
        if users[index].user.is_root_admin() {
            return Err(AuthError::RootAdminProtected);
        }

        users.remove(index);
        self.save_users(&users)?;

        let signed_in: Option<User> = get_json(&self.store, CURRENT_USER_KEY)?;
        if signed_in.is_some_and(|u| u.id == id) {
            self.store.remove(CURRENT_USER_KEY)?;
        }
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }

    async fn reset_system(&self) -> Result<(), AuthError> {
        self.store.remove(USERS_KEY)?;
        self.store.remove(CURRENT_USER_KEY)?;
        tracing::warn!("local auth store reset");
        self.bootstrap()
    }
}
