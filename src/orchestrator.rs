//! Run orchestration for discovering, reviewing and applying upgrades
//!
//! This module provides:
//! - `RunConfig`, validated from CLI arguments
//! - `Machine`, the phase state machine that turns events into commands
//! - `Orchestrator`, the control loop that multiplexes scan, apply, input
//!   and interrupt sources into the machine
//!
//! The machine is the only owner of phase, counters and the selection
//! model. Workers report through channels and never touch it.

use crate::apply::{ApplyConfig, ApplyEvent, Executor};
use crate::cli::CliArgs;
use crate::domain::{Candidate, LookupFailure, Module, RunResult, RunSummary, UpgradeReport};
use crate::error::{ConfigError, EnumerationError};
use crate::output::{OutputConfig, Reporter};
use crate::scan::{ScanConfig, ScanEvent, ScanHandle, Scanner};
use crate::select::{FilterPolicy, SelectionModel, UserEvent, DEFAULT_PAGE_SIZE};
use crate::source::{CandidateSource, Hook, Upgrader};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::MissedTickBehavior;

/// Refresh interval for spinners and the in-flight list
const TICK_INTERVAL: Duration = Duration::from_millis(120);

/// Shown when the operator commits an empty selection
pub const NOTHING_SELECTED: &str = "No packages selected to update";

/// Review phase settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectConfig {
    /// How the filter matches identifiers
    pub policy: FilterPolicy,
    /// Rows per page
    pub page_size: usize,
    /// Select everything and commit without asking
    pub force: bool,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            policy: FilterPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
            force: false,
        }
    }
}

/// Everything one run needs, threaded explicitly into each component
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Module directory
    pub working_dir: PathBuf,
    pub scan: ScanConfig,
    pub apply: ApplyConfig,
    pub select: SelectConfig,
    /// Also enumerate `go tool` dependencies
    pub tools: bool,
    /// Offer indirect dependencies
    pub include_indirect: bool,
    pub dry_run: bool,
    pub output: OutputConfig,
}

impl RunConfig {
    /// Validate CLI arguments into a run configuration
    ///
    /// The hook is dropped in dry-run mode since nothing is upgraded.
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        if args.verbose && args.quiet {
            return Err(ConfigError::ConflictingOptions {
                message: "--verbose and --quiet cannot be used together".to_string(),
            });
        }

        for (option, value) in [
            ("--parallel", args.parallel),
            ("--pagesize", args.pagesize),
            ("--apply-parallel", args.apply_parallel),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidCount {
                    option: option.to_string(),
                    value: value.to_string(),
                });
            }
        }

        if !args.path.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: args.path.clone(),
                message: "not a directory".to_string(),
            });
        }

        let hook = match &args.hook {
            Some(path) => {
                let resolved = std::fs::canonicalize(path).map_err(|e| ConfigError::InvalidPath {
                    path: path.clone(),
                    message: format!("hook not found: {}", e),
                })?;
                (!args.dry_run).then(|| Hook::new(resolved, &args.path))
            }
            None => None,
        };

        Ok(Self {
            working_dir: args.path.clone(),
            scan: ScanConfig {
                concurrency: args.parallel,
                auxiliary: args.aux_mode,
            },
            apply: ApplyConfig {
                concurrency: args.apply_parallel,
                hook,
            },
            select: SelectConfig {
                policy: args.filter_mode,
                page_size: args.pagesize,
                force: args.force,
            },
            tools: !args.no_tools,
            include_indirect: args.indirect,
            dry_run: args.dry_run,
            output: OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.dry_run),
        })
    }
}

/// Why a run reached `Done`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    UpToDate,
    Applied,
    Cancelled,
}

/// Orchestrator phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Discover,
    Select,
    Apply,
    Done(DoneReason),
    /// Unrecoverable error; absorbing
    Failed(String),
}

impl Phase {
    /// Returns true for `Done` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done(_) | Phase::Failed(_))
    }
}

/// Scan counters; `completed` never decreases and never exceeds `total`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanProgress {
    pub total: usize,
    pub completed: usize,
}

/// Candidates produced by enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    pub primary: Vec<Candidate>,
    pub auxiliary: Vec<Candidate>,
}

/// Input to the state machine
#[derive(Debug)]
pub enum Event {
    /// Result of listing candidates
    Enumerated(Result<Enumeration, EnumerationError>),
    /// The scan is running over `total` distinct candidates
    ScanStarted { total: usize },
    Scan(ScanEvent),
    Apply(ApplyEvent),
    Input(UserEvent),
    /// No more operator input will arrive
    InputClosed,
    /// Ctrl-C
    Interrupt,
}

/// Side effect requested by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartScan(Enumeration),
    /// Render the current page of the selection
    ShowList,
    ShowHelp,
    Notice(String),
    /// Apply this frozen batch
    StartApply(Vec<Module>),
    Exit,
}

/// Phase state machine
///
/// Events that do not apply to the current phase are ignored, except scan
/// progress, which keeps updating the counters after discovery ends.
#[derive(Debug)]
pub struct Machine {
    config: SelectConfig,
    phase: Phase,
    scan_requested: bool,
    progress: ScanProgress,
    found: Vec<Module>,
    selection: Option<SelectionModel>,
    typed_ahead: VecDeque<UserEvent>,
    input_closed: bool,
    report: UpgradeReport,
    lookup_failures: Vec<LookupFailure>,
}

impl Machine {
    pub fn new(config: SelectConfig) -> Self {
        Self {
            config,
            phase: Phase::Discover,
            scan_requested: false,
            progress: ScanProgress::default(),
            found: Vec::new(),
            selection: None,
            typed_ahead: VecDeque::new(),
            input_closed: false,
            report: UpgradeReport::new(),
            lookup_failures: Vec::new(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn progress(&self) -> ScanProgress {
        self.progress
    }

    /// The review list, once discovery has finished
    pub fn selection(&self) -> Option<&SelectionModel> {
        self.selection.as_ref()
    }

    pub fn report(&self) -> &UpgradeReport {
        &self.report
    }

    /// Feed one event and collect the resulting commands
    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        if self.phase.is_terminal() {
            return Vec::new();
        }
        match event {
            Event::Interrupt | Event::Input(UserEvent::Quit) => self.finish(DoneReason::Cancelled),
            Event::Enumerated(result) => self.on_enumerated(result),
            Event::ScanStarted { total } => {
                if self.phase == Phase::Discover {
                    self.progress.total = total;
                }
                Vec::new()
            }
            Event::Scan(event) => self.on_scan(event),
            Event::Apply(event) => self.on_apply(event),
            Event::Input(input) => self.on_input(input),
            Event::InputClosed => self.on_input_closed(),
        }
    }

    fn on_enumerated(&mut self, result: Result<Enumeration, EnumerationError>) -> Vec<Command> {
        if self.phase != Phase::Discover || self.scan_requested {
            return Vec::new();
        }
        match result {
            Ok(enumeration) => {
                self.scan_requested = true;
                vec![Command::StartScan(enumeration)]
            }
            Err(e) => self.fail(e.to_string()),
        }
    }

    fn on_scan(&mut self, event: ScanEvent) -> Vec<Command> {
        if event == ScanEvent::Progress {
            self.progress.completed = (self.progress.completed + 1).min(self.progress.total);
            return Vec::new();
        }
        if self.phase != Phase::Discover {
            return Vec::new();
        }
        match event {
            ScanEvent::Found(module) => {
                if module.updatable {
                    self.found.push(module);
                }
                Vec::new()
            }
            ScanEvent::Failed { identifier, detail } => {
                self.lookup_failures.push(LookupFailure { identifier, detail });
                Vec::new()
            }
            ScanEvent::Finished => self.enter_select(),
            ScanEvent::Started(_) | ScanEvent::Skipped { .. } | ScanEvent::Progress => Vec::new(),
        }
    }

    fn enter_select(&mut self) -> Vec<Command> {
        let mut model = SelectionModel::new(std::mem::take(&mut self.found), self.config.policy)
            .with_page_size(self.config.page_size);
        if model.is_empty() {
            return self.finish(DoneReason::UpToDate);
        }

        self.phase = Phase::Select;
        if self.config.force {
            model.select_all();
            self.selection = Some(model);
            return self.commit();
        }
        self.selection = Some(model);

        let mut commands = vec![Command::ShowList];
        while let Some(input) = self.typed_ahead.pop_front() {
            if self.phase != Phase::Select {
                break;
            }
            commands.extend(self.on_input(input));
        }
        self.typed_ahead.clear();

        if self.phase == Phase::Select && self.input_closed {
            commands.extend(self.finish(DoneReason::Cancelled));
        }
        commands
    }

    fn on_input(&mut self, input: UserEvent) -> Vec<Command> {
        match self.phase {
            Phase::Discover => {
                self.typed_ahead.push_back(input);
                return Vec::new();
            }
            Phase::Select => {}
            _ => return Vec::new(),
        }

        match input {
            UserEvent::Commit => return self.commit(),
            UserEvent::Quit => return self.finish(DoneReason::Cancelled),
            UserEvent::Help => return vec![Command::ShowHelp],
            UserEvent::Unknown(text) => {
                return vec![Command::Notice(format!(
                    "Unknown command '{}', type ? for help",
                    text
                ))]
            }
            _ => {}
        }

        let Some(model) = self.selection.as_mut() else {
            return Vec::new();
        };
        match input {
            UserEvent::ToggleRows(rows) => {
                model.toggle_rows(&rows);
            }
            UserEvent::ToggleAll => {
                model.toggle_all_visible();
            }
            UserEvent::Filter(query) => model.set_filter(query),
            UserEvent::ClearFilter => model.clear_filter(),
            UserEvent::NextPage => {
                model.next_page();
            }
            UserEvent::PrevPage => {
                model.prev_page();
            }
            _ => {}
        }
        vec![Command::ShowList]
    }

    fn on_input_closed(&mut self) -> Vec<Command> {
        self.input_closed = true;
        if self.phase == Phase::Select {
            self.finish(DoneReason::Cancelled)
        } else {
            Vec::new()
        }
    }

    fn commit(&mut self) -> Vec<Command> {
        match self.selection.as_ref().and_then(SelectionModel::commit) {
            Some(batch) => {
                self.phase = Phase::Apply;
                vec![Command::StartApply(batch)]
            }
            None => vec![Command::Notice(NOTHING_SELECTED.to_string())],
        }
    }

    fn on_apply(&mut self, event: ApplyEvent) -> Vec<Command> {
        if self.phase != Phase::Apply {
            return Vec::new();
        }
        match event {
            ApplyEvent::Started(_) => Vec::new(),
            ApplyEvent::Outcome(outcome) => {
                self.report.record(outcome);
                Vec::new()
            }
            ApplyEvent::Finished => self.finish(DoneReason::Applied),
        }
    }

    fn finish(&mut self, reason: DoneReason) -> Vec<Command> {
        self.phase = Phase::Done(reason);
        vec![Command::Exit]
    }

    fn fail(&mut self, detail: String) -> Vec<Command> {
        self.phase = Phase::Failed(detail);
        vec![Command::Exit]
    }

    /// Summary of the run so far
    pub fn summary(&self, dry_run: bool) -> RunSummary {
        let result = match &self.phase {
            Phase::Done(DoneReason::UpToDate) => RunResult::UpToDate,
            Phase::Done(DoneReason::Applied) => RunResult::Applied,
            Phase::Failed(detail) => RunResult::Failed(detail.clone()),
            _ => RunResult::Cancelled,
        };
        let mut summary = RunSummary::new(result, dry_run);
        summary.scanned = self.progress.total;
        summary.updatable = self.selection.as_ref().map_or(0, SelectionModel::len);
        summary.report = self.report.clone();
        summary.lookup_failures = self.lookup_failures.clone();
        summary
    }
}

/// Drives one run over the given capabilities
pub struct Orchestrator {
    source: Arc<dyn CandidateSource>,
    upgrader: Arc<dyn Upgrader>,
    config: RunConfig,
}

impl Orchestrator {
    pub fn new(source: Arc<dyn CandidateSource>, upgrader: Arc<dyn Upgrader>, config: RunConfig) -> Self {
        Self {
            source,
            upgrader,
            config,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// List primary candidates and, when supported, tool candidates
    ///
    /// Only the primary listing is fatal; a failed tool listing leaves the
    /// run with the primary set.
    async fn enumerate(&self, reporter: &Reporter) -> Result<Enumeration, EnumerationError> {
        let primary: Vec<Candidate> = self
            .source
            .list_candidates()
            .await?
            .into_iter()
            .map(Candidate::primary)
            .collect();
        reporter.verbose(&format!("{} module(s) listed", primary.len()));

        let auxiliary = if !self.config.tools {
            Vec::new()
        } else if !self.source.auxiliary_supported().await {
            reporter.verbose("tool dependencies not supported by this toolchain");
            Vec::new()
        } else {
            match self.source.list_auxiliary_candidates().await {
                Ok(tools) => {
                    reporter.verbose(&format!("{} tool module(s) listed", tools.len()));
                    tools
                }
                Err(e) => {
                    reporter.verbose(&format!("ignoring tool listing: {}", e));
                    Vec::new()
                }
            }
        };

        Ok(Enumeration { primary, auxiliary })
    }

    /// Run until the machine reaches `Done` or `Failed`
    ///
    /// Outstanding lookups and upgrades are abandoned on exit; their late
    /// results are dropped with the channels.
    pub async fn run(&self, mut input: UnboundedReceiver<UserEvent>, reporter: &mut Reporter) -> RunSummary {
        let mut machine = Machine::new(self.config.select);
        let scanner = Scanner::new(Arc::clone(&self.source), self.config.scan);
        let executor = Executor::new(Arc::clone(&self.upgrader), self.config.apply.clone());

        let (scan_tx, mut scan_rx) = mpsc::unbounded_channel();
        let (apply_tx, mut apply_rx) = mpsc::unbounded_channel();
        let mut scan_tx = Some(scan_tx);
        let mut apply_tx = Some(apply_tx);
        let mut scan: Option<ScanHandle> = None;
        let mut input_open = true;

        let (interrupt_tx, mut interrupt_rx) = mpsc::unbounded_channel();
        let interrupt_task = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = interrupt_tx.send(());
            }
        });

        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        reporter.verbose(&format!("listing modules in {}", self.config.working_dir.display()));
        let first = tokio::select! {
            result = self.enumerate(reporter) => Event::Enumerated(result),
            Some(()) = interrupt_rx.recv() => Event::Interrupt,
        };
        let mut commands = machine.handle(first);

        loop {
            let mut exit = false;
            for command in commands {
                match command {
                    Command::StartScan(Enumeration { primary, auxiliary }) => {
                        if let Some(tx) = scan_tx.take() {
                            let handle = scanner.spawn(primary, auxiliary, tx);
                            let total = handle.total();
                            machine.handle(Event::ScanStarted { total });
                            reporter.scan_started(total);
                            scan = Some(handle);
                        }
                    }
                    Command::ShowList => {
                        reporter.scan_finished();
                        if let Some(model) = machine.selection() {
                            reporter.show_page(model);
                        }
                    }
                    Command::ShowHelp => reporter.help(),
                    Command::Notice(text) => reporter.notice(&text),
                    Command::StartApply(batch) => {
                        reporter.scan_finished();
                        if let Some(tx) = apply_tx.take() {
                            reporter.apply_started(batch.len());
                            executor.spawn(batch, tx);
                        }
                    }
                    Command::Exit => exit = true,
                }
            }
            if exit {
                break;
            }

            let event = tokio::select! {
                Some(event) = scan_rx.recv() => Event::Scan(event),
                Some(event) = apply_rx.recv() => Event::Apply(event),
                event = input.recv(), if input_open => match event {
                    Some(event) => Event::Input(event),
                    None => {
                        input_open = false;
                        Event::InputClosed
                    }
                },
                Some(()) = interrupt_rx.recv() => Event::Interrupt,
                _ = ticker.tick() => {
                    reporter.tick();
                    if let (Some(handle), Phase::Discover) = (&scan, machine.phase()) {
                        reporter.scan_progress(machine.progress().completed, &handle.queue().in_flight());
                    }
                    commands = Vec::new();
                    continue;
                }
            };

            match &event {
                Event::Scan(scan_event) => reporter.scan_event(scan_event),
                Event::Apply(apply_event) => reporter.apply_event(apply_event),
                _ => {}
            }
            let progress_tick = matches!(event, Event::Scan(ScanEvent::Progress))
                && *machine.phase() == Phase::Discover;
            commands = machine.handle(event);
            if progress_tick {
                if let Some(handle) = &scan {
                    reporter.scan_progress(machine.progress().completed, &handle.queue().in_flight());
                }
            }
        }

        interrupt_task.abort();
        reporter.clear();
        let summary = machine.summary(self.config.dry_run);
        if let RunResult::Failed(detail) = &summary.result {
            reporter.error(&format!("Error: {}", detail));
        }
        summary
    }
}
