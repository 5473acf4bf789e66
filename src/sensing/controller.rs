use anyhow::{bail, Result};
use log::{info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::loop_worker::{sampling_loop, SamplerContext};

/// Owns the sampling task of the active session.
pub struct SamplingController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SamplingController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn start_sampling(&mut self, ctx: SamplerContext) -> Result<()> {
        if self.handle.is_some() {
            bail!("sampling already active");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(sampling_loop(ctx, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        info!("Sampling loop started");
        Ok(())
    }

    /// Cancels the loop without waiting for it. A cycle still waiting on the
    /// estimator is detached; its result is discarded once it arrives.
    pub fn stop_sampling(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                warn!("Sampling loop still has a cycle in flight; detaching it");
            }
        }
    }
}

impl Default for SamplingController {
    fn default() -> Self {
        Self::new()
    }
}
