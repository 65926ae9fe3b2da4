use async_trait::async_trait;
use marketpulse_core::{AuthBackend, NewUser, User};

use crate::error::AuthError;

/// The authentication contract the rest of the application depends on.
///
/// Implementations differ only in where accounts live; callers never see
/// storage details.
#[async_trait]
pub trait AuthGate: Send + Sync {
    fn backend(&self) -> AuthBackend;

    /// The signed-in user, if any. Reads persisted state only.
    async fn current_user(&self) -> Result<Option<User>, AuthError>;

    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;

    async fn list_users(&self) -> Result<Vec<User>, AuthError>;

    async fn register_user(&self, new_user: NewUser) -> Result<User, AuthError>;

    async fn update_password(&self, id: &str, new_password: &str) -> Result<(), AuthError>;

    /// Must reject the root administrator with [`AuthError::RootAdminProtected`].
    async fn delete_user(&self, id: &str) -> Result<(), AuthError>;

    /// Clears every account and re-creates the seed administrators.
    async fn reset_system(&self) -> Result<(), AuthError>;
}

/// Trims and checks the fields every registration needs.
pub(crate) fn validate_new_user(new_user: NewUser) -> Result<NewUser, AuthError> {
    let NewUser {
        name,
        email,
        password,
        role,
    } = new_user;
    let (name, email) = (name.trim().to_string(), email.trim().to_string());
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AuthError::Validation("Preencha nome, e-mail e senha."));
    }
    if !email.contains('@') {
        return Err(AuthError::Validation("E-mail inválido."));
    }
    Ok(NewUser {
        name,
        email,
        password,
        role,
    })
}

pub(crate) fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::Validation("A nova senha não pode ser vazia."));
    }
    Ok(())
}
