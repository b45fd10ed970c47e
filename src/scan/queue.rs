//! Thread-safe candidate queue with in-flight and finished bookkeeping

use crate::domain::Candidate;
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<Candidate>,
    seen: HashSet<String>,
    in_flight: Vec<String>,
    total: usize,
    completed: usize,
}

impl QueueState {
    fn register(&mut self, candidate: &Candidate) -> bool {
        if self.seen.insert(candidate.identifier.clone()) {
            self.total += 1;
            true
        } else {
            false
        }
    }
}

/// Work queue that yields each identifier at most once per run
#[derive(Debug, Default)]
pub struct CandidateQueue {
    state: Mutex<QueueState>,
}

impl CandidateQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        // Bookkeeping stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue candidates for `take_next`, ignoring identifiers seen before
    ///
    /// Returns the number of candidates actually added.
    pub fn enqueue(&self, candidates: impl IntoIterator<Item = Candidate>) -> usize {
        let mut state = self.state();
        let mut added = 0;
        for candidate in candidates {
            if state.register(&candidate) {
                state.pending.push_back(candidate);
                added += 1;
            }
        }
        added
    }

    /// Register candidates that the caller dispatches itself
    ///
    /// They count towards the total but are never yielded by `take_next`.
    /// Returns the candidates not seen before.
    pub fn register_direct(&self, candidates: impl IntoIterator<Item = Candidate>) -> Vec<Candidate> {
        let mut state = self.state();
        candidates
            .into_iter()
            .filter(|c| state.register(c))
            .collect()
    }

    /// Pop the next candidate to look up
    pub fn take_next(&self) -> Option<Candidate> {
        self.state().pending.pop_front()
    }

    /// Record that a lookup for `identifier` started
    pub fn mark_in_flight(&self, identifier: &str) {
        let mut state = self.state();
        if !state.in_flight.iter().any(|p| p == identifier) {
            state.in_flight.push(identifier.to_string());
        }
    }

    /// Record that the lookup for `identifier` finished
    ///
    /// Returns the completed count. Identifiers that are not in flight do
    /// not count again.
    pub fn mark_done(&self, identifier: &str) -> usize {
        let mut state = self.state();
        if let Some(pos) = state.in_flight.iter().position(|p| p == identifier) {
            state.in_flight.remove(pos);
            state.completed += 1;
        }
        state.completed
    }

    /// Identifiers currently being looked up, oldest first
    pub fn in_flight(&self) -> Vec<String> {
        self.state().in_flight.clone()
    }

    /// Number of candidates not yet taken
    pub fn pending(&self) -> usize {
        self.state().pending.len()
    }

    /// `(completed, total)`
    pub fn progress(&self) -> (usize, usize) {
        let state = self.state();
        (state.completed, state.total)
    }

    /// Returns true once every registered candidate is done
    pub fn is_finished(&self) -> bool {
        let state = self.state();
        state.completed == state.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn primaries(names: &[&str]) -> Vec<Candidate> {
        names.iter().map(|n| Candidate::primary(*n)).collect()
    }

    #[test]
    fn test_enqueue_is_idempotent() {
        let queue = CandidateQueue::new();
        assert_eq!(queue.enqueue(primaries(&["a", "b"])), 2);
        assert_eq!(queue.enqueue(primaries(&["b", "c", "a"])), 1);
        assert_eq!(queue.progress(), (0, 3));
        assert_eq!(queue.pending(), 3);
    }

    #[test]
    fn test_duplicates_within_one_batch() {
        let queue = CandidateQueue::new();
        assert_eq!(queue.enqueue(primaries(&["a", "a", "a"])), 1);
        assert_eq!(queue.progress(), (0, 1));
    }

    #[test]
    fn test_first_registration_wins() {
        let queue = CandidateQueue::new();
        queue.enqueue(primaries(&["golang.org/x/tools"]));
        let added = queue.enqueue(vec![Candidate::auxiliary("golang.org/x/tools", "v0.1.0")]);
        assert_eq!(added, 0);
        let taken = queue.take_next().unwrap();
        assert!(!taken.auxiliary);
    }

    #[test]
    fn test_take_next_yields_each_once() {
        let queue = CandidateQueue::new();
        queue.enqueue(primaries(&["a", "b", "c"]));
        let mut taken = Vec::new();
        while let Some(c) = queue.take_next() {
            taken.push(c.identifier);
        }
        assert_eq!(taken, vec!["a", "b", "c"]);
        assert!(queue.take_next().is_none());
    }

    #[test]
    fn test_progress_bookkeeping() {
        let queue = CandidateQueue::new();
        queue.enqueue(primaries(&["a", "b"]));

        let a = queue.take_next().unwrap();
        queue.mark_in_flight(&a.identifier);
        assert_eq!(queue.in_flight(), vec!["a"]);
        assert_eq!(queue.mark_done(&a.identifier), 1);
        assert!(queue.in_flight().is_empty());
        assert!(!queue.is_finished());

        // done twice does not count twice
        assert_eq!(queue.mark_done("a"), 1);

        let b = queue.take_next().unwrap();
        queue.mark_in_flight(&b.identifier);
        assert_eq!(queue.mark_done(&b.identifier), 2);
        assert_eq!(queue.progress(), (2, 2));
        assert!(queue.is_finished());
    }

    #[test]
    fn test_register_direct() {
        let queue = CandidateQueue::new();
        queue.enqueue(primaries(&["a"]));
        let direct = queue.register_direct(vec![
            Candidate::auxiliary("a", "v1.0.0"),
            Candidate::auxiliary("tool", "v1.0.0"),
        ]);
        assert_eq!(direct.len(), 1);
        assert_eq!(direct[0].identifier, "tool");
        assert_eq!(queue.progress(), (0, 2));
        assert_eq!(queue.pending(), 1);
    }

    #[test]
    fn test_concurrent_takers_get_disjoint_items() {
        let queue = Arc::new(CandidateQueue::new());
        let names: Vec<String> = (0..200).map(|i| format!("mod{}", i)).collect();
        queue.enqueue(names.iter().map(Candidate::primary));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut mine = Vec::new();
                    while let Some(c) = queue.take_next() {
                        queue.mark_in_flight(&c.identifier);
                        queue.mark_done(&c.identifier);
                        mine.push(c.identifier);
                    }
                    mine
                })
            })
            .collect();

        let mut all: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        let mut expected = names.clone();
        expected.sort();
        assert_eq!(all, expected);
        assert_eq!(queue.progress(), (200, 200));
    }
}
