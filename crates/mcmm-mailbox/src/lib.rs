//! Host rendition of the per-core mailbox hardware.
//!
//! Each [`Mailbox`] is a single message slot. `send` polls until the slot is
//! free, `receive` polls until it is full; both honour a [`Timeout`]
//! (`Infinite` polls forever). [`MailboxBus`] creates every mailbox of a
//! cluster up front and resolves them by their `/dev/c{id}_mbox_{dir}` name.
//!
//! [`Timeout`]: foundation::Timeout

pub mod bus;
pub mod device;
pub mod poll;

pub use bus::{MailboxBus, MailboxHandle};
pub use device::Mailbox;
pub use poll::{poll_until, Backoff};
