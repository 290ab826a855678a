//! Origin tracking for mirrored views.
//!
//! Several widgets can display the same controller value (a curve editor and
//! a point table, a slider and a stepper). When one of them is edited the
//! controller pushes the new value into the others, and toolkit widgets
//! typically answer a programmatic update with their own change signal. A
//! [`ViewSync`] tracks which view a propagation started from; while one is in
//! flight every other entry point is inert, so each edit produces exactly one
//! propagation pass.

use std::fmt::Debug;

/// Propagation state of a group of mirrored views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState<O> {
    /// No propagation in progress.
    #[default]
    Idle,
    /// Propagating a change that originated from the given view.
    Propagating(O),
}

/// State machine guarding re-entrant view updates.
#[derive(Debug, Clone, Default)]
pub struct ViewSync<O> {
    state: SyncState<O>,
    passes: u64,
    suppressed: u64,
}

impl<O: Copy + PartialEq + Debug> ViewSync<O> {
    /// Creates an idle state machine.
    pub fn new() -> Self {
        Self {
            state: SyncState::Idle,
            passes: 0,
            suppressed: 0,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SyncState<O> {
        self.state
    }

    /// Returns whether no propagation is in flight.
    pub fn is_idle(&self) -> bool {
        self.state == SyncState::Idle
    }

    /// Starts a propagation from `origin`.
    ///
    /// Returns `false` (and leaves the state untouched) when another
    /// propagation is already in flight; the caller must then do nothing.
    pub fn begin(&mut self, origin: O) -> bool {
        match self.state {
            SyncState::Idle => {
                self.state = SyncState::Propagating(origin);
                self.passes += 1;
                true
            }
            SyncState::Propagating(active) => {
                log::trace!("ignoring {origin:?} update while propagating from {active:?}");
                self.suppressed += 1;
                false
            }
        }
    }

    /// Ends the propagation started by the matching [`begin`](Self::begin).
    pub fn end(&mut self) {
        self.state = SyncState::Idle;
    }

    /// Number of propagation passes started so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Number of entries ignored because a propagation was in flight.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }
}
