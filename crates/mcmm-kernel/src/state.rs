//! Per-role state machines.
//!
//! Both machines are strictly linear; there is no retry edge and no way
//! back out of `Idle`.

use core::fmt;

use foundation::CoreId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinatorState {
    Init,
    BroadcastStart,
    Compute,
    CollectCompletions,
    Report,
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeerState {
    AwaitStart,
    Compute,
    SignalCompletion,
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoreState {
    Coordinator(CoordinatorState),
    Peer(PeerState),
}

impl CoreState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Coordinator(CoordinatorState::Idle) | Self::Peer(PeerState::Idle)
        )
    }
}

impl From<CoordinatorState> for CoreState {
    fn from(state: CoordinatorState) -> Self {
        Self::Coordinator(state)
    }
}

impl From<PeerState> for CoreState {
    fn from(state: PeerState) -> Self {
        Self::Peer(state)
    }
}

impl fmt::Display for CoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinator(s) => write!(f, "coordinator/{s:?}"),
            Self::Peer(s) => write!(f, "peer/{s:?}"),
        }
    }
}

/// Hook called on every state entry. Shared by all cores of a run.
pub trait StateObserver: Sync {
    fn on_enter(&self, core: CoreId, state: CoreState);
}

impl<T: StateObserver + ?Sized> StateObserver for &T {
    fn on_enter(&self, core: CoreId, state: CoreState) {
        (**self).on_enter(core, state)
    }
}

/// Logs each transition at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl StateObserver for LogObserver {
    fn on_enter(&self, core: CoreId, state: CoreState) {
        log::debug!("[core {core}] -> {state}");
    }
}
