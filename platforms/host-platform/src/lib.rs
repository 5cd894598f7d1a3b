//! Host platform for mcmm.
//!
//! Stands in for the bare-metal board: each core image runs on its own OS
//! thread named `core-{id}`, the matrix region is a [`memory::SharedRegion`]
//! seen through per-core ports, and the mailboxes live on a
//! [`mailbox::MailboxBus`]. Cycle counts come from [`HostCycleCounter`].

pub mod counter;
pub mod launch;

pub use counter::HostCycleCounter;
pub use launch::{
    launch, launch_images, LaunchError, LaunchOptions, LaunchOptionsBuilder, RunOutcome,
};
