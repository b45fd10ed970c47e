//! Upgrade executor
//!
//! This module provides:
//! - Sequential application of a committed batch (the default)
//! - Opt-in bounded-concurrent application guarded by a semaphore
//! - Post-upgrade hook invocation
//!
//! Every module in the batch yields exactly one [`UpgradeOutcome`]; a failed
//! upgrade never stops the rest of the batch and nothing is rolled back.

use crate::domain::{Module, UpgradeOutcome};
use crate::source::{Hook, Upgrader};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};

/// Executor configuration
#[derive(Debug, Clone)]
pub struct ApplyConfig {
    /// Maximum concurrent upgrades; 1 applies in order
    pub concurrency: usize,
    /// Run after each successful upgrade
    pub hook: Option<Hook>,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            hook: None,
        }
    }
}

/// Event sent from the executor to the control loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyEvent {
    /// An upgrade was issued
    Started(String),
    /// An upgrade finished, successfully or not
    Outcome(UpgradeOutcome),
    /// Every module in the batch has an outcome
    Finished,
}

/// Applies a frozen batch of upgrades
pub struct Executor {
    upgrader: Arc<dyn Upgrader>,
    config: ApplyConfig,
}

impl Executor {
    /// Create an executor over `upgrader`
    pub fn new(upgrader: Arc<dyn Upgrader>, config: ApplyConfig) -> Self {
        Self { upgrader, config }
    }

    /// Returns true if upgrades run one at a time
    pub fn is_sequential(&self) -> bool {
        self.config.concurrency <= 1
    }

    /// Start applying `batch` and return immediately
    pub fn spawn(&self, batch: Vec<Module>, events: UnboundedSender<ApplyEvent>) -> JoinHandle<()> {
        let upgrader = Arc::clone(&self.upgrader);
        let hook = self.config.hook.clone().map(Arc::new);

        if self.is_sequential() {
            return tokio::spawn(async move {
                for module in batch {
                    let outcome = apply_one(upgrader.as_ref(), hook.as_deref(), &events, module).await;
                    let _ = events.send(ApplyEvent::Outcome(outcome));
                }
                let _ = events.send(ApplyEvent::Finished);
            });
        }

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        tokio::spawn(async move {
            let mut set = JoinSet::new();
            for module in batch {
                let semaphore = Arc::clone(&semaphore);
                let upgrader = Arc::clone(&upgrader);
                let hook = hook.clone();
                let events = events.clone();
                set.spawn(async move {
                    let outcome = match semaphore.acquire_owned().await {
                        Ok(_permit) => {
                            apply_one(upgrader.as_ref(), hook.as_deref(), &events, module).await
                        }
                        Err(_) => UpgradeOutcome::failure(module, "executor shut down"),
                    };
                    let _ = events.send(ApplyEvent::Outcome(outcome));
                });
            }
            while set.join_next().await.is_some() {}
            let _ = events.send(ApplyEvent::Finished);
        })
    }
}

async fn apply_one(
    upgrader: &dyn Upgrader,
    hook: Option<&Hook>,
    events: &UnboundedSender<ApplyEvent>,
    module: Module,
) -> UpgradeOutcome {
    let _ = events.send(ApplyEvent::Started(module.identifier.clone()));

    if let Err(e) = upgrader.apply_upgrade(&module.identifier, &module.latest).await {
        return UpgradeOutcome::failure(module, e.to_string());
    }
    if let Some(hook) = hook {
        if let Err(e) = hook.run(&module).await {
            return UpgradeOutcome::failure(module, e.to_string());
        }
    }
    UpgradeOutcome::success(module)
}
