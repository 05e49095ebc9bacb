use crate::{
    CrossSafetyError,
    event::ChainEvent,
    reads::ReadAcquirer,
    safety_checker::{LinkChecker, traits::SafetyPromoter},
};
use alloy_primitives::ChainId;
use derive_more::Constructor;
use kona_supervisor_storage::CrossChainSafetyProvider;
use kona_supervisor_types::ErrorKind;
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, error, info, warn};

/// Requests a promotion attempt, e.g. after new local data was stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromotionTrigger;

/// A background job that promotes blocks to a target safety level on a given chain.
///
/// Makes one attempt per [`PromotionTrigger`], and another one whenever no trigger arrived within
/// the configured interval.
#[derive(Debug, Constructor)]
pub struct CrossSafetyCheckerJob<P, R, L, S> {
    chain_id: ChainId,
    provider: Arc<P>,
    reads: R,
    linker: Arc<L>,
    promoter: S,
    trigger_rx: mpsc::Receiver<PromotionTrigger>,
    event_tx: mpsc::Sender<ChainEvent>,
    cancel_token: CancellationToken,
    interval: Duration,
}

impl<P, R, L, S> CrossSafetyCheckerJob<P, R, L, S>
where
    P: CrossChainSafetyProvider + Send + Sync + 'static,
    R: ReadAcquirer + Send + Sync + 'static,
    L: LinkChecker + Send + Sync + 'static,
    S: SafetyPromoter,
{
    /// Runs the job loop until cancelled, or until the trigger channel is closed.
    pub async fn run(mut self) {
        let target_level = self.promoter.target_level();
        let chain_id = self.chain_id;

        info!(
            target: "supervisor::safety_checker",
            chain_id,
            %target_level,
            "Started safety checker"
        );

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    info!(
                        target: "supervisor::safety_checker",
                        chain_id,
                        %target_level,
                        "Canceled safety checker"
                    );
                    break;
                }
                trigger = self.trigger_rx.recv() => {
                    if trigger.is_none() {
                        debug!(
                            target: "supervisor::safety_checker",
                            chain_id,
                            %target_level,
                            "Trigger channel closed"
                        );
                        break;
                    }
                    self.attempt();
                }
                _ = tokio::time::sleep(self.interval) => self.attempt(),
            }
        }

        info!(
            target: "supervisor::safety_checker",
            chain_id,
            %target_level,
            "Stopped safety checker"
        );
    }

    fn attempt(&self) {
        match self.promote() {
            Ok(event) => {
                info!(
                    target: "supervisor::safety_checker",
                    chain_id = self.chain_id,
                    target_level = %self.promoter.target_level(),
                    ?event,
                    "Safety promotion attempt succeeded"
                );
                self.broadcast_event(event);
            }
            Err(err) => self.log_failure(&err),
        }
    }

    fn promote(&self) -> Result<ChainEvent, CrossSafetyError> {
        self.promoter.promote(self.chain_id, &*self.provider, &self.reads, &*self.linker)
    }

    fn log_failure(&self, err: &CrossSafetyError) {
        let chain_id = self.chain_id;
        let target_level = self.promoter.target_level();
        match failure_level(err.kind()) {
            Level::DEBUG => {
                debug!(
                    target: "supervisor::safety_checker",
                    chain_id,
                    %target_level,
                    %err,
                    "Nothing to promote yet"
                );
            }
            Level::INFO => {
                info!(
                    target: "supervisor::safety_checker",
                    chain_id,
                    %target_level,
                    %err,
                    "Awaiting replacement block"
                );
            }
            Level::WARN => {
                warn!(
                    target: "supervisor::safety_checker",
                    chain_id,
                    %target_level,
                    %err,
                    "Failed to promote candidate block"
                );
            }
            _ => {
                error!(
                    target: "supervisor::safety_checker",
                    chain_id,
                    %target_level,
                    %err,
                    "Unexpected error promoting candidate block"
                );
            }
        }
    }

    fn broadcast_event(&self, event: ChainEvent) {
        if let Err(err) = self.event_tx.try_send(event) {
            error!(
                target: "supervisor::safety_checker",
                chain_id = self.chain_id,
                target_level = %self.promoter.target_level(),
                %err,
                "Failed to broadcast safety update event",
            );
        }
    }
}

/// Severity at which a failed attempt with the given error kind is logged.
///
/// Only conflicts are expected failures worth a warning. Unresolved scope errors are not.
const fn failure_level(kind: ErrorKind) -> Level {
    match kind {
        ErrorKind::Future | ErrorKind::InvalidatedRead => Level::DEBUG,
        ErrorKind::AwaitReplacementBlock => Level::INFO,
        ErrorKind::Conflict => Level::WARN,
        ErrorKind::OutOfScope | ErrorKind::Other => Level::ERROR,
    }
}
