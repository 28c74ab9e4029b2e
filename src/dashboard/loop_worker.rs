use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::{Dashboard, RefreshOutcome};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Refreshes the dashboard every `interval` until cancelled. The first tick
/// fires immediately so the dashboard is populated on start.
pub async fn refresh_loop(
    dashboard: Dashboard,
    interval: Duration,
    timeout: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match tokio::time::timeout(timeout, dashboard.refresh()).await {
                    Ok(RefreshOutcome::Refreshed { records, alerted }) => {
                        log_debug!("refresh tick: {records} records, alerted={alerted}");
                    }
                    Ok(RefreshOutcome::Skipped) => {
                        log_debug!("refresh tick skipped; previous refresh still running");
                    }
                    Err(_) => log_warn!("dashboard refresh timed out (> {}s)", timeout.as_secs()),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("dashboard refresh loop shutting down");
                break;
            }
        }
    }
}
