use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the auth gates and their stores.
///
/// Validation variants carry the Portuguese message shown to the user.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("E-mail ou senha inválidos.")]
    InvalidCredentials,

    #[error("E-mail já cadastrado.")]
    EmailTaken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Não é possível excluir o administrador raiz.")]
    RootAdminProtected,

    #[error("Nenhum usuário conectado.")]
    NotSignedIn,

    /// A required registration or password field was blank.
    #[error("{0}")]
    Validation(&'static str),

    /// The back-end cannot perform this operation.
    #[error("Operação não suportada por este serviço de autenticação: {0}")]
    Unsupported(&'static str),

    /// Hosted back-end selected without its URL or anon key.
    #[error("Serviço de autenticação não configurado: defina {0}")]
    NotConfigured(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The hosted service answered with a non-success status.
    #[error("auth service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to access auth store at {path}: {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
