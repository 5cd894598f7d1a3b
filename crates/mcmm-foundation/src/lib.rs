//! Foundation layer shared by every mcmm core image.
//!
//! Nothing in here touches hardware. Platforms implement the collaborator
//! traits ([`SignalEndpoint`], [`EndpointRegistry`], [`SharedMemory`],
//! [`CycleCounter`]) and the kernel only ever talks to those.

#![cfg_attr(not(test), no_std)]

pub mod channel;
pub mod config;
pub mod counter;
pub mod memory;
pub mod partition;

pub use channel::{
    ChannelError, Direction, EndpointName, EndpointRegistry, Message, SignalEndpoint, Timeout,
};
pub use config::{
    region_cells, ClusterConfig, ConfigError, CoreConfig, CoreId, Role, DEFAULT_MAT_SIZE,
    MAIN_CORE, MAX_MAT_SIZE,
};
pub use counter::{combine_halves, CycleCounter};
pub use memory::{MatrixId, SharedMemory, VisibilityBarrier};
pub use partition::{row_range_for, RowRange};
