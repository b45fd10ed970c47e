//! Bounded-concurrency scanner
//!
//! A fixed pool of workers drains the candidate queue, so at most
//! `concurrency` lookups are outstanding at any time. Results flow back to
//! the caller over a one-way channel; workers never touch caller state.

use super::{AuxiliaryMode, CandidateQueue, ScanEvent};
use crate::domain::{parse_version, Candidate, Module, SkipReason};
use crate::source::{CandidateInfo, CandidateSource};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::{JoinHandle, JoinSet};

/// Default number of concurrent lookups
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Scanner configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Maximum concurrent lookups (at least 1)
    pub concurrency: usize,
    /// How auxiliary candidates are scheduled
    pub auxiliary: AuxiliaryMode,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            auxiliary: AuxiliaryMode::default(),
        }
    }
}

/// Handle to a running scan
pub struct ScanHandle {
    queue: Arc<CandidateQueue>,
    task: JoinHandle<()>,
}

impl ScanHandle {
    /// Shared queue, for progress and in-flight reads
    pub fn queue(&self) -> &Arc<CandidateQueue> {
        &self.queue
    }

    /// Number of candidates this scan covers
    pub fn total(&self) -> usize {
        self.queue.progress().1
    }

    /// Wait until every worker has finished
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Runs one lookup per candidate with bounded concurrency
pub struct Scanner {
    source: Arc<dyn CandidateSource>,
    config: ScanConfig,
}

impl Scanner {
    /// Create a scanner over `source`
    pub fn new(source: Arc<dyn CandidateSource>, config: ScanConfig) -> Self {
        Self { source, config }
    }

    /// Configured concurrency limit
    pub fn concurrency(&self) -> usize {
        self.config.concurrency.max(1)
    }

    /// Start scanning and return immediately
    ///
    /// Every candidate produces exactly one terminal event followed by one
    /// `Progress`; `Finished` is sent once all of them are done. Sending stops
    /// quietly once the receiver is gone.
    pub fn spawn(
        &self,
        primary: Vec<Candidate>,
        auxiliary: Vec<Candidate>,
        events: UnboundedSender<ScanEvent>,
    ) -> ScanHandle {
        let queue = Arc::new(CandidateQueue::new());
        queue.enqueue(without_tools(primary, &auxiliary));
        let direct = match self.config.auxiliary {
            AuxiliaryMode::Batched => {
                queue.enqueue(auxiliary);
                Vec::new()
            }
            AuxiliaryMode::Unbatched => queue.register_direct(auxiliary),
        };

        let workers = self.concurrency().min(queue.pending());
        let source = Arc::clone(&self.source);
        let task_queue = Arc::clone(&queue);

        let task = tokio::spawn(async move {
            let mut set = JoinSet::new();
            for _ in 0..workers {
                set.spawn(run_worker(
                    Arc::clone(&task_queue),
                    Arc::clone(&source),
                    events.clone(),
                ));
            }
            for candidate in direct {
                let queue = Arc::clone(&task_queue);
                let source = Arc::clone(&source);
                let events = events.clone();
                set.spawn(async move {
                    lookup(&queue, source.as_ref(), &events, candidate).await;
                });
            }
            while set.join_next().await.is_some() {}
            let _ = events.send(ScanEvent::Finished);
        });

        ScanHandle { queue, task }
    }
}

/// Drop primary candidates that the tool listing also reports
///
/// A module in both listings is scanned once, as a tool.
fn without_tools(primary: Vec<Candidate>, auxiliary: &[Candidate]) -> Vec<Candidate> {
    let tools: HashSet<&str> = auxiliary.iter().map(|c| c.identifier.as_str()).collect();
    primary
        .into_iter()
        .filter(|c| !tools.contains(c.identifier.as_str()))
        .collect()
}

async fn run_worker(
    queue: Arc<CandidateQueue>,
    source: Arc<dyn CandidateSource>,
    events: UnboundedSender<ScanEvent>,
) {
    while let Some(candidate) = queue.take_next() {
        if !lookup(&queue, source.as_ref(), &events, candidate).await {
            break;
        }
    }
}

/// Look up one candidate; returns false once the receiver is gone
async fn lookup(
    queue: &CandidateQueue,
    source: &dyn CandidateSource,
    events: &UnboundedSender<ScanEvent>,
    candidate: Candidate,
) -> bool {
    let identifier = candidate.identifier.clone();
    queue.mark_in_flight(&identifier);
    if events.send(ScanEvent::Started(identifier.clone())).is_err() {
        return false;
    }

    let event = match source.query_candidate(&candidate).await {
        Ok(info) => match assess(&candidate, info) {
            Ok(module) => ScanEvent::Found(module),
            Err(reason) => ScanEvent::Skipped { identifier: identifier.clone(), reason },
        },
        Err(e) => ScanEvent::Failed {
            identifier: identifier.clone(),
            detail: e.to_string(),
        },
    };

    queue.mark_done(&identifier);
    events.send(event).is_ok() && events.send(ScanEvent::Progress).is_ok()
}

/// Turn a lookup result into an updatable module or a skip reason
///
/// Unparsable versions are skipped, never reported as failures.
pub fn assess(candidate: &Candidate, info: CandidateInfo) -> Result<Module, SkipReason> {
    let Some(latest) = info.latest else {
        return Err(SkipReason::AlreadyCurrent);
    };

    let current = match (info.current.trim(), &candidate.known_version) {
        ("", Some(known)) => known.clone(),
        (reported, _) => reported.to_string(),
    };

    let current_version =
        parse_version(&current).map_err(|_| SkipReason::Unparsable(current.clone()))?;
    let latest_version =
        parse_version(&latest).map_err(|_| SkipReason::Unparsable(latest.clone()))?;

    let module = Module::new(
        &candidate.identifier,
        current_version,
        latest_version,
        candidate.auxiliary,
    );
    if module.updatable {
        Ok(module)
    } else {
        Err(SkipReason::NotNewer)
    }
}
