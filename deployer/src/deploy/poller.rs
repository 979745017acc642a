//! Deployment status polling

use std::time::Duration;

use mmc_models::DeploymentStatus;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::errors::DeployError;
use crate::http::api::MmcApi;
use crate::utils::{calc_exp_backoff, CooldownOptions};

/// Poller options
#[derive(Debug, Clone)]
pub struct Options {
    /// Delay between status checks
    pub interval: Duration,

    /// Grow the delay exponentially instead of using the fixed interval
    pub backoff: Option<CooldownOptions>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(50),
            backoff: None,
        }
    }
}

/// Paces status checks and enforces the polling deadline
pub struct Ticker {
    options: Options,
    started: Instant,
    timeout: Option<Duration>,
    ticks: u32,
}

impl Ticker {
    /// Create a ticker; `timeout = None` polls without a deadline
    pub fn new(options: Options, started: Instant, timeout: Option<Duration>) -> Self {
        Self {
            options,
            started,
            timeout,
            ticks: 0,
        }
    }

    /// Number of completed sleeps
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Fail with `Timeout` once the elapsed time exceeds the budget
    pub fn check_deadline(&self) -> Result<(), DeployError> {
        match self.timeout {
            Some(timeout) if self.started.elapsed() > timeout => Err(DeployError::Timeout(timeout)),
            _ => Ok(()),
        }
    }

    fn next_delay(&self) -> Duration {
        match &self.options.backoff {
            Some(cooldown) => calc_exp_backoff(cooldown, self.ticks),
            None => self.options.interval,
        }
    }

    /// Sleep until the next status check
    pub async fn tick(&mut self) {
        tokio::time::sleep(self.next_delay()).await;
        self.ticks += 1;
    }
}

/// Poll a deployment until its status is terminal
///
/// The first check happens right away; the ticker only sleeps after a
/// non-terminal status. The deadline is checked once per iteration.
pub async fn await_terminal<A: MmcApi + ?Sized>(
    api: &A,
    deployment_id: &str,
    ticker: &mut Ticker,
) -> Result<DeploymentStatus, DeployError> {
    loop {
        let status = api.deployment_status(deployment_id).await?;
        info!("....retrieving status of {}: {}", deployment_id, status);

        if status.is_terminal() {
            debug!(
                "Deployment {} reached {} after {} tick(s)",
                deployment_id,
                status,
                ticker.ticks()
            );
            return Ok(status);
        }

        ticker.check_deadline()?;
        ticker.tick().await;
    }
}
