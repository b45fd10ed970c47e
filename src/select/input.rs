//! Operator input for the review prompt
//!
//! Lines are read from stdin on a plain thread and parsed into
//! [`UserEvent`]s. A blocking read on that thread never holds up the
//! async runtime when the run ends.

use std::io::BufRead;
use std::thread;
use tokio::sync::mpsc::UnboundedSender;

/// Help text for the review prompt
pub const HELP: &str = "\
  <n> [<n>...]  toggle rows (e.g. `1 4 7`, ranges like `2-5` work too)
  a             toggle all visible rows
  /text         filter by text, `/` alone clears the filter
  n / p         next / previous page
  u or Enter    update the selected modules
  q             quit
  ?             show this help";

/// Longest row range accepted in one token
const MAX_RANGE_LEN: usize = 10_000;

/// One parsed line of operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    /// Toggle rows by 1-based position in the visible list
    ToggleRows(Vec<usize>),
    ToggleAll,
    Filter(String),
    ClearFilter,
    NextPage,
    PrevPage,
    /// Commit the selection and start applying
    Commit,
    Quit,
    Help,
    /// Anything unrecognised, kept for the hint
    Unknown(String),
}

impl UserEvent {
    /// Parse one input line
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if let Some(query) = line.strip_prefix('/') {
            let query = query.trim();
            return if query.is_empty() {
                UserEvent::ClearFilter
            } else {
                UserEvent::Filter(query.to_string())
            };
        }

        match line.to_lowercase().as_str() {
            "" | "u" => UserEvent::Commit,
            "a" => UserEvent::ToggleAll,
            "n" => UserEvent::NextPage,
            "p" => UserEvent::PrevPage,
            "q" => UserEvent::Quit,
            "?" | "h" => UserEvent::Help,
            _ => parse_rows(line)
                .map(UserEvent::ToggleRows)
                .unwrap_or_else(|| UserEvent::Unknown(line.to_string())),
        }
    }
}

/// Parse `1 4 7`, `1,4` or `2-5` into row numbers
fn parse_rows(line: &str) -> Option<Vec<usize>> {
    let mut rows = Vec::new();
    for token in line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        match token.split_once('-') {
            Some((start, end)) => {
                let start: usize = start.parse().ok()?;
                let end: usize = end.parse().ok()?;
                if start > end || end - start >= MAX_RANGE_LEN {
                    return None;
                }
                rows.extend(start..=end);
            }
            None => rows.push(token.parse().ok()?),
        }
    }
    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

/// Forward stdin lines as events until EOF or the receiver is dropped
///
/// The sender is dropped at EOF, which the receiver sees as a closed
/// channel.
pub fn spawn_stdin_reader(events: UnboundedSender<UserEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        forward_lines(stdin.lock(), &events);
    })
}

fn forward_lines(reader: impl BufRead, events: &UnboundedSender<UserEvent>) {
    for line in reader.lines() {
        let Ok(line) = line else { break };
        if events.send(UserEvent::parse(&line)).is_err() {
            return;
        }
    }
}
