use log::{info, warn};

use crate::{auth::AuthSession, AppState};

fn validate(email: &str, password: &str) -> Result<(), String> {
    if email.trim().is_empty() || password.is_empty() {
        return Err("Email and password are required".into());
    }
    Ok(())
}

pub async fn sign_in(state: &AppState, email: String, password: String) -> Result<AuthSession, String> {
    validate(&email, &password)?;
    let auth = state
        .auth
        .as_ref()
        .ok_or_else(|| "Authentication is not configured".to_string())?;

    let session = auth.sign_in(email.trim(), &password).await.map_err(|e| {
        warn!("Sign-in failed for {}: {e}", email.trim());
        e.to_string()
    })?;

    state.install_session(Some(session.clone())).await;
    info!("Signed in as {}", session.email);
    Ok(session)
}

pub async fn sign_up(state: &AppState, email: String, password: String) -> Result<AuthSession, String> {
    validate(&email, &password)?;
    let auth = state
        .auth
        .as_ref()
        .ok_or_else(|| "Authentication is not configured".to_string())?;

    let session = auth
        .sign_up(email.trim(), &password)
        .await
        .map_err(|e| e.to_string())?;

    state.install_session(Some(session.clone())).await;
    info!("Created account {}", session.email);
    Ok(session)
}

pub async fn sign_out(state: &AppState) -> Result<(), String> {
    state.install_session(None).await;
    Ok(())
}

pub async fn current_user(state: &AppState) -> Result<Option<String>, String> {
    Ok(state.session.lock().await.as_ref().map(|s| s.email.clone()))
}
