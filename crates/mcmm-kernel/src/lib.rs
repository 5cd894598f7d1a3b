//! mcmm core image.
//!
//! The same code runs on every core; behaviour branches on the
//! [`Role`](foundation::Role) resolved from the launch configuration.
//! The kernel owns no hardware. Platforms hand it a [`CoreResources`]
//! bundle (shared-memory port, mailbox registry, cycle counter, console)
//! and get a [`CoreExit`] back once the core reaches its terminal state.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod compute;
pub mod driver;
pub mod error;
pub mod protocol;
pub mod region;
pub mod report;
pub mod state;

pub use driver::{CoreExit, CoreResources, Kernel};
pub use error::KernelError;
pub use region::{
    CompletionsCollected, Operand, OperandWriter, OperandsPublished, ProductView, RowWriter,
    RowsPublished,
};
pub use state::{CoordinatorState, CoreState, LogObserver, PeerState, StateObserver};
