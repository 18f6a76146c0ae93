//! Search debouncing
//!
//! Keystrokes replace the pending term and push its deadline out; the term is released
//! once the host polls after the deadline. Only the last keystroke survives.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
struct PendingSearch {
    term: String,
    deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<PendingSearch>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Record a keystroke at `now`, superseding any pending term
    pub fn push(&mut self, term: impl Into<String>, now: Instant) {
        self.pending = Some(PendingSearch {
            term: term.into(),
            deadline: now + self.delay,
        });
    }

    /// Release the pending term if it has settled by `now`
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => self.pending.take().map(|p| p.term),
            _ => None,
        }
    }

    /// Release the pending term immediately (e.g. on Enter)
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|p| p.term)
    }

    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending_term(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.term.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_released_after_delay() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::from_millis(300);
        debouncer.push("mb", start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(299)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(300)).as_deref(),
            Some("mb")
        );
        assert_eq!(debouncer.pending_term(), None);
    }

    #[test]
    fn test_last_keystroke_wins() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::from_millis(300);
        debouncer.push("m", start);
        debouncer.push("mb", start + Duration::from_millis(200));
        debouncer.push("mb3", start + Duration::from_millis(400));

        // the first deadline passed, but it was superseded
        assert_eq!(debouncer.poll(start + Duration::from_millis(650)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(700)).as_deref(),
            Some("mb3")
        );
    }

    #[test]
    fn test_flush_and_cancel() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::from_millis(300);
        debouncer.push("edge", start);
        assert_eq!(debouncer.flush().as_deref(), Some("edge"));
        assert_eq!(debouncer.flush(), None);

        debouncer.push("edge", start);
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
    }
}
