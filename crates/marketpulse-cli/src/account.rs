//! Sign-in and user administration commands.
//!
//! `users` handlers run only after `main` has checked that the signed-in
//! user is an administrator.

use clap::Subcommand;
use marketpulse_auth::AuthError;
use marketpulse_core::{NewUser, Role};

use crate::context::AppContext;
use crate::output::{self, emit, UNEXPECTED_ERROR};

const DELETE_CONFIRMATION: &str =
    "Tem certeza que deseja excluir este usuário? Esta ação não pode ser desfeita.";
const RESET_CONFIRMATION: &str =
    "Tem certeza que deseja reiniciar o sistema? Todos os usuários e sessões serão apagados.";

/// Sub-commands available under `auth`.
#[derive(Debug, Subcommand)]
pub enum AuthCommands {
    /// Sign in with e-mail and password
    Login {
        email: String,
        #[arg(long, env = "MARKETPULSE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
}

/// Sub-commands available under `users`.
#[derive(Debug, Subcommand)]
pub enum UsersCommands {
    /// List every account
    List,
    /// Create an account
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// admin or user
        #[arg(long, default_value = "user")]
        role: Role,
    },
    /// Set a new password for an account
    Passwd {
        id: String,
        #[arg(long)]
        password: String,
    },
    /// Delete an account
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Delete every account and session, then recreate the seed administrators
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

/// Turns an [`AuthError`] into the message shown to the user.
///
/// Domain errors already carry Portuguese text; transport and storage
/// failures are logged and replaced by a generic alert.
fn auth_alert(error: AuthError) -> anyhow::Error {
    match error {
        AuthError::InvalidCredentials
        | AuthError::EmailTaken
        | AuthError::UserNotFound
        | AuthError::RootAdminProtected
        | AuthError::NotSignedIn
        | AuthError::Validation(_)
        | AuthError::Unsupported(_)
        | AuthError::NotConfigured(_) => anyhow::anyhow!(error.to_string()),
        other => {
            tracing::error!(error = %other, "auth operation failed");
            anyhow::anyhow!(UNEXPECTED_ERROR)
        }
    }
}

/// # Errors
///
/// Returns the sign-in alert on bad credentials or service failure.
pub(crate) async fn run_auth(ctx: &AppContext, command: AuthCommands) -> anyhow::Result<()> {
    match command {
        AuthCommands::Login { email, password } => {
            let user = ctx
                .gate
                .login(&email, &password)
                .await
                .map_err(auth_alert)?;
            print!("Bem-vindo(a), {}", output::render_user(&user));
        }
        AuthCommands::Logout => {
            ctx.gate.logout().await.map_err(auth_alert)?;
            println!("Sessão encerrada.");
        }
        AuthCommands::Whoami => match ctx.gate.current_user().await.map_err(auth_alert)? {
            Some(user) => emit(ctx.json, &user, output::render_user)?,
            None => println!("{}", AuthError::NotSignedIn),
        },
    }
    Ok(())
}

/// # Errors
///
/// Returns the auth error message on validation failures, protected
/// accounts or unsupported operations.
pub(crate) async fn run_users(ctx: &AppContext, command: UsersCommands) -> anyhow::Result<()> {
    let gate = &ctx.gate;
    match command {
        UsersCommands::List => {
            let users = gate.list_users().await.map_err(auth_alert)?;
            emit(ctx.json, users.as_slice(), output::render_users)?;
        }
        UsersCommands::Add {
            name,
            email,
            password,
            role,
        } => {
            let user = gate
                .register_user(NewUser {
                    name,
                    email,
                    password,
                    role,
                })
                .await
                .map_err(auth_alert)?;
            println!("Usuário criado com sucesso! ID: {}", user.id);
        }
        UsersCommands::Passwd { id, password } => {
            gate.update_password(&id, &password)
                .await
                .map_err(auth_alert)?;
            println!("Senha atualizada com sucesso!");
        }
        UsersCommands::Delete { id, yes } => {
            if !yes {
                anyhow::bail!("{DELETE_CONFIRMATION} Repita o comando com --yes para confirmar.");
            }
            gate.delete_user(&id).await.map_err(auth_alert)?;
            println!("Usuário excluído.");
        }
        UsersCommands::Reset { yes } => {
            if !yes {
                anyhow::bail!("{RESET_CONFIRMATION} Repita o comando com --yes para confirmar.");
            }
            gate.reset_system().await.map_err(auth_alert)?;
            println!("Sistema reiniciado. Entre novamente com uma conta de administrador.");
        }
    }
    Ok(())
}
