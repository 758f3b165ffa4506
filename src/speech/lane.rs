//! Single playback lane: starting an utterance cancels the one before it.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Token and sequence number handed to one utterance.
pub struct Turn {
    pub seq: u64,
    pub token: CancellationToken,
}

#[derive(Default)]
pub struct SpeechLane {
    current: Mutex<CancellationToken>,
    seq: AtomicU64,
}

impl SpeechLane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel whatever is playing and open a turn for the next utterance.
    pub fn supersede(&self) -> Turn {
        let token = CancellationToken::new();
        let previous = std::mem::replace(&mut *self.current.lock(), token.clone());
        previous.cancel();
        Turn {
            seq: self.seq.fetch_add(1, Ordering::SeqCst) + 1,
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_turn_cancels_previous_only() {
        let lane = SpeechLane::new();
        let first = lane.supersede();
        assert!(!first.token.is_cancelled());
        let second = lane.supersede();
        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());
        assert_eq!((first.seq, second.seq), (1, 2));
    }
}
