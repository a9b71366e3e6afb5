use ember_core::constants::LOCK_WINDOW_SECS;
use ember_core::types::{Address, Timestamp};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Per-account anti-dump schedule.
///
/// An account is armed on its first qualifying receipt: a deadline of
/// arm-time + 36h is recorded, after which the account can neither send
/// nor receive. Partial activity never moves the deadline; only emptying
/// the balance clears it. Allowlisted addresses (treasury, liquidity
/// infrastructure) sit outside the schedule entirely.
#[derive(Debug, Default)]
pub struct LockSchedule {
    deadlines: HashMap<Address, Timestamp>,
    exempt: HashSet<Address>,
}

impl LockSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permanently exempt an address from lock enforcement.
    pub fn add_exempt(&mut self, addr: &Address) {
        self.exempt.insert(addr.clone());
    }

    pub fn is_exempt(&self, addr: &Address) -> bool {
        self.exempt.contains(addr)
    }

    /// True iff the account's window has elapsed. The lock engages only
    /// strictly after the deadline; at `now == deadline` the account may
    /// still transfer.
    pub fn is_locked(&self, addr: &Address, now: Timestamp) -> bool {
        if self.exempt.contains(addr) {
            return false;
        }
        match self.deadlines.get(addr) {
            Some(deadline) => now > *deadline,
            None => false,
        }
    }

    /// Seconds until the lock engages, saturating at zero. `None` means
    /// the account is not on a countdown at all (allowlisted or never
    /// armed).
    pub fn time_till_locked(&self, addr: &Address, now: Timestamp) -> Option<i64> {
        if self.exempt.contains(addr) {
            return None;
        }
        self.deadlines
            .get(addr)
            .map(|deadline| deadline.saturating_sub(now).max(0))
    }

    /// Start the countdown at `now + 36h` if none is running. A receipt
    /// never extends an existing deadline; dribbling tokens into an
    /// account cannot delay its lock.
    pub fn arm(&mut self, addr: &Address, now: Timestamp) {
        if self.exempt.contains(addr) || self.deadlines.contains_key(addr) {
            return;
        }
        let deadline = now.saturating_add(LOCK_WINDOW_SECS);
        self.deadlines.insert(addr.clone(), deadline);
        debug!(addr = %addr, deadline, "lock countdown armed");
    }

    /// Drop the countdown; the account emptied its balance and a later
    /// receipt arms it afresh.
    pub fn clear(&mut self, addr: &Address) {
        if self.deadlines.remove(addr).is_some() {
            debug!(addr = %addr, "lock countdown cleared");
        }
    }
}
