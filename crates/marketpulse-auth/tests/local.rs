//! Contract tests for the local back-end over memory and file stores.

use std::path::PathBuf;

use marketpulse_auth::{
    build_auth_gate, AuthError, AuthGate, FileStore, LocalAuthGate, MemoryStore,
    RECOVERY_ADMIN_EMAIL, SEED_PASSWORD,
};
use marketpulse_core::{AppConfig, AuthBackend, Environment, NewUser, Role, ROOT_ADMIN_EMAIL};

fn gate() -> LocalAuthGate<MemoryStore> {
    LocalAuthGate::new(MemoryStore::new()).expect("memory store never fails")
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "Vendedora Teste".into(),
        email: email.into(),
        password: "segredo".into(),
        role: Role::User,
    }
}

fn config(backend: AuthBackend) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "info".into(),
        gemini_api_key: None,
        gemini_model: "gemini-2.5-flash".into(),
        gemini_base_url: "http://localhost".into(),
        request_timeout_secs: None,
        auth_backend: backend,
        supabase_url: None,
        supabase_anon_key: None,
        data_dir: PathBuf::from("."),
        export_dir: PathBuf::from("."),
    }
}

#[tokio::test]
async fn seed_admins_can_log_in() {
    let gate = gate();
    let users = gate.list_users().await.unwrap();
    assert_eq!(users.len(), 2);

    let admin = gate.login("ADMIN@marketpulse.com", SEED_PASSWORD).await.unwrap();
    assert!(admin.is_root_admin());
    assert_eq!(gate.current_user().await.unwrap(), Some(admin));

    let recovery = gate.login(RECOVERY_ADMIN_EMAIL, SEED_PASSWORD).await.unwrap();
    assert!(recovery.is_admin());
}

#[tokio::test]
async fn wrong_password_is_rejected_without_session() {
    let gate = gate();
    let err = gate.login(ROOT_ADMIN_EMAIL, "errada").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(gate.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn logout_clears_current_user() {
    let gate = gate();
    gate.login(ROOT_ADMIN_EMAIL, SEED_PASSWORD).await.unwrap();
    gate.logout().await.unwrap();
    assert!(gate.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let gate = gate();
    gate.register_user(new_user("loja@exemplo.com")).await.unwrap();
    let err = gate
        .register_user(new_user("LOJA@exemplo.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::EmailTaken));
    assert_eq!(err.to_string(), "E-mail já cadastrado.");
    assert_eq!(gate.list_users().await.unwrap().len(), 3);
}

#[tokio::test]
async fn blank_fields_fail_validation() {
    let gate = gate();
    let mut user = new_user("loja@exemplo.com");
    user.name = "   ".into();
    let err = gate.register_user(user).await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

#[tokio::test]
async fn root_admin_cannot_be_deleted() {
    let gate = gate();
    let root = gate
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .find(|u| u.is_root_admin())
        .unwrap();

    let err = gate.delete_user(&root.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Não é possível excluir o administrador raiz.");
    assert_eq!(gate.list_users().await.unwrap().len(), 2);
}

#[tokio::test]
async fn deleting_signed_in_user_signs_them_out() {
    let gate = gate();
    let user = gate.register_user(new_user("loja@exemplo.com")).await.unwrap();
    gate.login("loja@exemplo.com", "segredo").await.unwrap();

    gate.delete_user(&user.id).await.unwrap();
    assert!(gate.current_user().await.unwrap().is_none());
    assert!(matches!(
        gate.delete_user(&user.id).await.unwrap_err(),
        AuthError::UserNotFound
    ));
}

#[tokio::test]
async fn password_update_takes_effect() {
    let gate = gate();
    let user = gate.register_user(new_user("loja@exemplo.com")).await.unwrap();
    gate.update_password(&user.id, "nova-senha").await.unwrap();

    assert!(gate.login("loja@exemplo.com", "segredo").await.is_err());
    assert!(gate.login("loja@exemplo.com", "nova-senha").await.is_ok());
    assert!(matches!(
        gate.update_password("inexistente", "x").await.unwrap_err(),
        AuthError::UserNotFound
    ));
}

#[tokio::test]
async fn reset_restores_only_seed_accounts() {
    let gate = gate();
    gate.register_user(new_user("loja@exemplo.com")).await.unwrap();
    gate.login(ROOT_ADMIN_EMAIL, SEED_PASSWORD).await.unwrap();

    gate.reset_system().await.unwrap();

    let emails: Vec<String> = gate
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.email)
        .collect();
    assert_eq!(emails, vec![ROOT_ADMIN_EMAIL, RECOVERY_ADMIN_EMAIL]);
    assert!(gate.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn file_store_keeps_session_between_gates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let first = LocalAuthGate::new(FileStore::new(&path)).unwrap();
    first.register_user(new_user("loja@exemplo.com")).await.unwrap();
    first.login("loja@exemplo.com", "segredo").await.unwrap();

    let second = LocalAuthGate::new(FileStore::new(&path)).unwrap();
    let current = second.current_user().await.unwrap().unwrap();
    assert_eq!(current.email, "loja@exemplo.com");
    assert_eq!(second.list_users().await.unwrap().len(), 3);
}

#[tokio::test]
async fn builder_selects_backend() {
    let local = build_auth_gate(&config(AuthBackend::Local), MemoryStore::new()).unwrap();
    assert_eq!(local.backend(), AuthBackend::Local);

    let err = build_auth_gate(&config(AuthBackend::Hosted), MemoryStore::new())
        .err()
        .unwrap();
    match err {
        AuthError::NotConfigured(vars) => assert_eq!(vars, "SUPABASE_URL, SUPABASE_ANON_KEY"),
        other => panic!("expected NotConfigured, got {other:?}"),
    }

    let mut hosted_config = config(AuthBackend::Hosted);
    hosted_config.supabase_url = Some("https://projeto.supabase.co".into());
    hosted_config.supabase_anon_key = Some("anon".into());
    let hosted = build_auth_gate(&hosted_config, MemoryStore::new()).unwrap();
    assert_eq!(hosted.backend(), AuthBackend::Hosted);
}
