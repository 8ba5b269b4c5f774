use arc_swap::ArcSwapOption;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::unit::{CloseError, CodeUnit};

/// Owns the single active-unit slot and the queue of retired units awaiting
/// release.
///
/// Serving tasks share the slot; it is only ever updated through an atomic
/// exchange, and no lock is held anywhere near the slow reload check. Two
/// concurrent reload triggers may therefore both swap; the later exchange
/// wins and the earlier result goes straight into retirement.
pub struct UnitLifecycle {
    active: ArcSwapOption<CodeUnit>,
    retired: Mutex<VecDeque<Arc<CodeUnit>>>,
}

impl UnitLifecycle {
    pub fn new() -> Self {
        Self {
            active: ArcSwapOption::const_empty(),
            retired: Mutex::new(VecDeque::new()),
        }
    }

    /// Atomically replace the active unit, returning the previous occupant
    /// (None on the first swap of a session).
    ///
    /// Retirement of the returned unit is a separate, explicit step so the
    /// caller can sequence it around fallible work.
    pub fn swap_active(&self, unit: Arc<CodeUnit>) -> Option<Arc<CodeUnit>> {
        self.active.swap(Some(unit))
    }

    /// Queue a superseded unit for deferred closing.
    ///
    /// Units without backing resources are dropped here. The queue keeps the
    /// last strong handle once the serving tasks let go, so the unit stays
    /// reachable until its close turn comes; a unit that somehow got closed
    /// in the meantime drains as a no-op.
    pub fn retire(&self, unit: Arc<CodeUnit>) {
        if !unit.is_closable() {
            return;
        }
        debug!("📦 Retiring code unit {}", unit.id());
        self.retired
            .lock()
            .expect("retirement queue poisoned")
            .push_back(unit);
    }

    /// Close retired units strictly in retirement order.
    ///
    /// A replaced unit's symbols may still be in use while the request that
    /// triggered the swap unwinds, so a unit is closed on the reload check
    /// *after* the one that retired it, never in the same cycle. Stops at
    /// the first close failure; the failing entry is consumed and the
    /// remainder stays queued for the next drain. The active slot is never
    /// touched here.
    pub fn drain_retired(&self) -> Result<(), CloseError> {
        loop {
            let entry = {
                self.retired
                    .lock()
                    .expect("retirement queue poisoned")
                    .pop_front()
            };
            match entry {
                Some(unit) => unit.close()?,
                None => return Ok(()),
            }
        }
    }

    /// The unit currently serving requests, if any.
    pub fn active(&self) -> Option<Arc<CodeUnit>> {
        self.active.load_full()
    }

    pub fn retired_len(&self) -> usize {
        self.retired
            .lock()
            .expect("retirement queue poisoned")
            .len()
    }
}

impl Default for UnitLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
