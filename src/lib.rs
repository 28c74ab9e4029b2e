pub mod alerts;
pub mod auth;
pub mod backend;
pub mod dashboard;
pub mod history;
pub mod models;
pub mod settings;
pub mod settings_commands;
pub mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::sync::Mutex;
use tokio::time::Duration;

use alerts::{LogNotifier, Notifier};
use auth::{AuthClient, AuthSession, IdentityToolkit};
use backend::{Backend, FirebaseRest};
use dashboard::{Dashboard, DashboardController};
use settings::{default_settings_path, SettingsStore};

pub const EMAIL_ENV: &str = "AGRISENSE_EMAIL";
pub const PASSWORD_ENV: &str = "AGRISENSE_PASSWORD";

/// Shared state handed to every command.
pub struct AppState {
    pub(crate) backend: Backend,
    pub(crate) settings: Arc<SettingsStore>,
    pub(crate) dashboard: Dashboard,
    pub(crate) controller: Mutex<DashboardController>,
    pub(crate) auth: Option<Arc<dyn AuthClient>>,
    pub(crate) session: Mutex<Option<AuthSession>>,
    firebase: Option<Arc<FirebaseRest>>,
}

impl AppState {
    pub fn new(
        backend: Backend,
        settings: Arc<SettingsStore>,
        notifier: Arc<dyn Notifier>,
        auth: Option<Arc<dyn AuthClient>>,
        firebase: Option<Arc<FirebaseRest>>,
    ) -> Self {
        let dashboard = Dashboard::new(backend.clone(), settings.clone(), notifier);
        Self {
            backend,
            settings,
            controller: Mutex::new(DashboardController::new(dashboard.clone())),
            dashboard,
            auth,
            session: Mutex::new(None),
            firebase,
        }
    }

    /// Records the signed-in user and forwards its token to the backend client.
    pub(crate) async fn install_session(&self, session: Option<AuthSession>) {
        if let Some(firebase) = &self.firebase {
            firebase.set_id_token(session.as_ref().map(|s| s.id_token.clone()));
        }
        *self.session.lock().await = session;
    }
}

fn build_state() -> Result<AppState> {
    let settings_path = default_settings_path();
    let settings = Arc::new(
        SettingsStore::new(settings_path.clone())
            .with_context(|| format!("failed to load settings from {}", settings_path.display()))?,
    );

    let config = settings.backend();
    if config.api_key.is_empty() {
        warn!("No API key configured; sign-in is disabled");
    }

    let firebase = Arc::new(FirebaseRest::new(config.clone())?);
    let auth: Arc<dyn AuthClient> = Arc::new(IdentityToolkit::new(firebase.http(), config.api_key));

    Ok(AppState::new(
        Backend::from_firebase(firebase.clone()),
        settings,
        Arc::new(LogNotifier),
        Some(auth),
        Some(firebase),
    ))
}

async fn serve(state: AppState) -> Result<()> {
    if let (Ok(email), Ok(password)) = (std::env::var(EMAIL_ENV), std::env::var(PASSWORD_ENV)) {
        if let Err(err) = auth::commands::sign_in(&state, email, password).await {
            warn!("Startup sign-in failed: {err}");
        }
    }

    let settings = state.settings.snapshot();
    state.controller.lock().await.start(
        Duration::from_secs(settings.refresh_interval_secs),
        Duration::from_secs(settings.fetch_timeout_secs),
    )?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("Shutting down...");

    state.controller.lock().await.stop().await
}

pub fn run() {
    utils::logging::init();

    info!("AgriSense starting up...");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    let result = runtime.block_on(async {
        let state = build_state()?;
        serve(state).await
    });

    if let Err(err) = result {
        log::error!("AgriSense exited with error: {err:#}");
        std::process::exit(1);
    }
}
