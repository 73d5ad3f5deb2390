use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Token handed out when a refresh starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing refresh tickets. Only the most recently
/// issued ticket is current; responses carrying an older ticket are stale.
#[derive(Debug, Default)]
pub struct RefreshSequencer {
    issued: AtomicU64,
}

impl RefreshSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RefreshTicket {
        RefreshTicket(self.issued.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        self.issued.load(Ordering::Acquire) == ticket.0
    }
}

/// Holds the value produced by the latest refresh, rejecting stale ones.
#[derive(Debug, Default)]
pub struct LatestSlot<T> {
    sequencer: RefreshSequencer,
    value: Mutex<Option<T>>,
}

impl<T: Clone> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            sequencer: RefreshSequencer::new(),
            value: Mutex::new(None),
        }
    }

    pub fn begin(&self) -> RefreshTicket {
        self.sequencer.issue()
    }

    /// Stores `value` if `ticket` is still the latest one issued. Returns
    /// whether it was applied.
    pub fn apply(&self, ticket: RefreshTicket, value: T) -> bool {
        let mut slot = self.value.lock().unwrap_or_else(|e| e.into_inner());
        // Checked under the lock so two completions cannot interleave.
        if !self.sequencer.is_current(ticket) {
            return false;
        }
        *slot = Some(value);
        true
    }

    pub fn get(&self) -> Option<T> {
        self.value.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
