use core::fmt;

use foundation::{ChannelError, CoreId};

use crate::state::CoreState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KernelError {
    /// The platform's shared region does not match the configured matrix size.
    RegionMismatch { expected: usize, actual: usize },
    /// A mailbox could not be opened, or a send/receive failed. Fatal: the
    /// protocol is lock-step, so a missing signal leaves nothing to do.
    Channel {
        core: CoreId,
        state: CoreState,
        source: ChannelError,
    },
    Console,
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegionMismatch { expected, actual } => write!(
                f,
                "shared region is {actual}x{actual}, configuration expects {expected}x{expected}"
            ),
            Self::Channel {
                core,
                state,
                source,
            } => write!(f, "core {core} failed in {state}: {source}"),
            Self::Console => write!(f, "console write failed"),
        }
    }
}

impl core::error::Error for KernelError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Channel { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<fmt::Error> for KernelError {
    fn from(_: fmt::Error) -> Self {
        Self::Console
    }
}
