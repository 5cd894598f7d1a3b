//! Point-to-point signal channels between the coordinator and its peers.
//!
//! A channel endpoint carries a two-word message, but only the fact of
//! delivery matters to the protocol. Each peer owns two endpoints:
//! `in` (coordinator to peer) and `out` (peer to coordinator).

use core::fmt;
use core::time::Duration;

use crate::config::CoreId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    /// Signals sent to the owning core.
    In,
    /// Signals sent by the owning core.
    Out,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// Discovery name of a mailbox endpoint, rendered as `/dev/c{core}_mbox_{in|out}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointName {
    pub core: CoreId,
    pub direction: Direction,
}

impl EndpointName {
    pub const fn new(core: CoreId, direction: Direction) -> Self {
        Self { core, direction }
    }

    pub const fn inbound(core: CoreId) -> Self {
        Self::new(core, Direction::In)
    }

    pub const fn outbound(core: CoreId) -> Self {
        Self::new(core, Direction::Out)
    }
}

impl fmt::Display for EndpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/dev/c{}_mbox_{}", self.core, self.direction.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Timeout {
    #[default]
    Infinite,
    After(Duration),
}

impl Timeout {
    /// `0` means wait forever, the mailbox driver convention.
    pub const fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            Self::Infinite
        } else {
            Self::After(Duration::from_millis(ms))
        }
    }

    pub const fn duration(self) -> Option<Duration> {
        match self {
            Self::Infinite => None,
            Self::After(d) => Some(d),
        }
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infinite => write!(f, "infinite"),
            Self::After(d) => write!(f, "{}ms", d.as_millis()),
        }
    }
}

/// Mailbox payload. The content is never inspected by the protocol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Message(pub [u32; 2]);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelError {
    NotFound(EndpointName),
    Timeout {
        endpoint: EndpointName,
        waited: Duration,
    },
    Disconnected(EndpointName),
}

impl ChannelError {
    pub fn endpoint(&self) -> EndpointName {
        match *self {
            Self::NotFound(e) | Self::Disconnected(e) => e,
            Self::Timeout { endpoint, .. } => endpoint,
        }
    }
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(e) => write!(f, "no mailbox named {e}"),
            Self::Timeout { endpoint, waited } => {
                write!(f, "mailbox {endpoint} timed out after {}ms", waited.as_millis())
            }
            Self::Disconnected(e) => write!(f, "mailbox {e} is disconnected"),
        }
    }
}

impl core::error::Error for ChannelError {}

/// One direction of a coordinator/peer link.
pub trait SignalEndpoint {
    fn name(&self) -> EndpointName;

    /// Deliver `message`, blocking while the endpoint cannot accept it.
    fn send(&mut self, message: Message, timeout: Timeout) -> Result<(), ChannelError>;

    /// Block until a message arrives.
    fn receive(&mut self, timeout: Timeout) -> Result<Message, ChannelError>;
}

impl<T: SignalEndpoint + ?Sized> SignalEndpoint for &mut T {
    fn name(&self) -> EndpointName {
        (**self).name()
    }

    fn send(&mut self, message: Message, timeout: Timeout) -> Result<(), ChannelError> {
        (**self).send(message, timeout)
    }

    fn receive(&mut self, timeout: Timeout) -> Result<Message, ChannelError> {
        (**self).receive(timeout)
    }
}

/// Resolves endpoint names to handles. Called once per endpoint at startup.
pub trait EndpointRegistry {
    type Endpoint: SignalEndpoint;

    fn open(&mut self, name: EndpointName) -> Result<Self::Endpoint, ChannelError>;
}
