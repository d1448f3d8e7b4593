//! Periodic sweep of expired refresh tokens
//!
//! The engine exposes `sweep()` as a plain operation; this module owns the
//! timer that calls it.

use std::sync::Arc;

use ak_shared::config::SweepConfig;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::{AccountRepository, RefreshTokenRepository};

use super::lifecycle::TokenLifecycleEngine;

/// Runs the lifecycle engine's sweep on a fixed interval
pub struct TokenSweepService<R, A>
where
    R: RefreshTokenRepository + 'static,
    A: AccountRepository + 'static,
{
    engine: Arc<TokenLifecycleEngine<R, A>>,
    config: SweepConfig,
}

impl<R, A> TokenSweepService<R, A>
where
    R: RefreshTokenRepository + 'static,
    A: AccountRepository + 'static,
{
    pub fn new(engine: Arc<TokenLifecycleEngine<R, A>>, config: SweepConfig) -> Self {
        Self { engine, config }
    }

    /// Run a single sweep cycle
    ///
    /// # Returns
    /// * `Ok(SweepResult)` - Number of rows swept and timing
    /// * `Err(DomainError)` - The store failed
    pub async fn run_once(&self) -> Result<SweepResult, DomainError> {
        let started_at = Utc::now();
        let swept = self.engine.sweep().await?;

        Ok(SweepResult {
            swept,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Start the sweep as a background task
    ///
    /// The first cycle runs immediately, then every `interval_seconds`.
    /// A failed cycle is logged and the ticker keeps going. Returns `None`
    /// when the sweep is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token sweep service is disabled");
            return None;
        }

        let period = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                interval_seconds = period.as_secs(),
                "Token sweep service started"
            );

            let mut timer = tokio::time::interval(period);

            loop {
                timer.tick().await;

                match self.run_once().await {
                    Ok(result) => {
                        info!(swept = result.swept, "Token sweep cycle completed");
                    }
                    Err(e) => {
                        error!(error = %e, "Token sweep cycle failed");
                    }
                }
            }
        }))
    }
}

/// Result of one sweep cycle
#[derive(Debug, Clone)]
pub struct SweepResult {
    /// Number of expired refresh tokens soft-deleted
    pub swept: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
