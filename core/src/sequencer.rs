//! Request sequencing: the latest filter change wins.
//!
//! Every render request takes a token when it starts. A result is only
//! shown if its token is still the most recent one when it finishes;
//! anything older is dropped.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(pub u64);

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next token. Supersedes every token issued before it.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> RequestToken {
        RequestToken(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest() == token
    }

    /// Pass `value` through if `token` is still current, otherwise drop it.
    pub fn accept<T>(&self, token: RequestToken, value: T) -> Option<T> {
        if self.is_current(token) {
            Some(value)
        } else {
            log::debug!("Dropping stale result for request {}", token.0);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase_monotonically() {
        let seq = RequestSequencer::new();
        let a = seq.begin();
        let b = seq.begin();
        assert!(b > a);
        assert_eq!(seq.latest(), b);
    }

    #[test]
    fn only_latest_result_is_accepted() {
        let seq = RequestSequencer::new();
        let first = seq.begin();
        let second = seq.begin();
        assert_eq!(seq.accept(first, "stale"), None);
        assert_eq!(seq.accept(second, "fresh"), Some("fresh"));
    }

    #[test]
    fn fresh_sequencer_has_no_current_request() {
        let seq = RequestSequencer::new();
        assert_eq!(seq.latest(), RequestToken(0));
    }
}
