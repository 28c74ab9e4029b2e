use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use super::loop_worker::refresh_loop;
use super::{Dashboard, DashboardSnapshot, RefreshOutcome};

/// Owns the background refresh task.
pub struct DashboardController {
    dashboard: Dashboard,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl DashboardController {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            handle: None,
            cancel_token: None,
        }
    }

    pub async fn refresh_now(&self) -> RefreshOutcome {
        self.dashboard.refresh().await
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.dashboard.snapshot().await
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(&mut self, interval: Duration, timeout: Duration) -> Result<()> {
        if self.handle.is_some() {
            bail!("dashboard refresh already active");
        }
        if interval.is_zero() {
            bail!("refresh interval must be greater than zero");
        }
        if timeout.is_zero() {
            bail!("fetch timeout must be greater than zero");
        }

        info!(
            "Starting dashboard refresh every {}s (timeout {}s)",
            interval.as_secs(),
            timeout.as_secs()
        );

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(refresh_loop(
            self.dashboard.clone(),
            interval,
            timeout,
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("dashboard refresh task failed to join")
        } else {
            Ok(())
        }
    }
}
