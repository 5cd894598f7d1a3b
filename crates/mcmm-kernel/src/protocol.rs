//! Start and completion barriers.
//!
//! The topology is a star around the coordinator. For every peer the
//! coordinator holds the peer's `in` endpoint (to send "go") and its `out`
//! endpoint (to hear "done"). Peers never talk to each other.
//!
//! A delivered message only orders the mailbox's own bookkeeping. The data
//! a signal refers to must already have been flushed, which is why the
//! senders below take publication tokens.

use alloc::vec::Vec;

use foundation::{
    ChannelError, ClusterConfig, CoreId, EndpointName, EndpointRegistry, Message, SignalEndpoint,
    Timeout,
};

use crate::region::{CompletionsCollected, OperandsPublished, RowsPublished};

/// The coordinator's pair of endpoints for one peer.
pub struct PeerLink<E> {
    core: CoreId,
    to_peer: E,
    from_peer: E,
}

impl<E> PeerLink<E> {
    pub fn core(&self) -> CoreId {
        self.core
    }
}

/// Every peer link of the coordinator, in identity order.
pub struct PeerLinks<E> {
    links: Vec<PeerLink<E>>,
}

impl<E: SignalEndpoint> PeerLinks<E> {
    pub fn open<R>(registry: &mut R, cluster: &ClusterConfig) -> Result<Self, ChannelError>
    where
        R: EndpointRegistry<Endpoint = E>,
    {
        let mut links = Vec::with_capacity(cluster.peer_count());
        for core in cluster.peers() {
            links.push(PeerLink {
                core,
                to_peer: registry.open(EndpointName::inbound(core))?,
                from_peer: registry.open(EndpointName::outbound(core))?,
            });
        }
        Ok(Self { links })
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeerLink<E>> {
        self.links.iter()
    }
}

/// A peer's own endpoints.
pub struct OwnLink<E> {
    inbound: E,
    outbound: E,
}

impl<E: SignalEndpoint> OwnLink<E> {
    pub fn open<R>(registry: &mut R, core: CoreId) -> Result<Self, ChannelError>
    where
        R: EndpointRegistry<Endpoint = E>,
    {
        Ok(Self {
            outbound: registry.open(EndpointName::outbound(core))?,
            inbound: registry.open(EndpointName::inbound(core))?,
        })
    }
}

/// Send one "go" to every peer. Does not wait for the peers to pick it up.
pub fn broadcast_start<E: SignalEndpoint>(
    links: &mut PeerLinks<E>,
    _operands: &OperandsPublished,
    timeout: Timeout,
) -> Result<(), ChannelError> {
    for link in &mut links.links {
        link.to_peer.send(Message::default(), timeout)?;
        log::trace!("start signal posted to core {}", link.core);
    }
    Ok(())
}

/// Block once on the peer's inbound endpoint.
pub fn await_start<E: SignalEndpoint>(
    link: &mut OwnLink<E>,
    timeout: Timeout,
) -> Result<(), ChannelError> {
    link.inbound.receive(timeout)?;
    Ok(())
}

/// Tell the coordinator this peer's rows are flushed.
pub fn signal_completion<E: SignalEndpoint>(
    link: &mut OwnLink<E>,
    rows: RowsPublished,
    timeout: Timeout,
) -> Result<(), ChannelError> {
    link.outbound.send(Message::default(), timeout)?;
    log::trace!("completion posted for rows {:?}", rows.rows());
    Ok(())
}

/// Receive exactly one completion from every peer, in identity order.
pub fn collect_completions<E: SignalEndpoint>(
    links: &mut PeerLinks<E>,
    timeout: Timeout,
) -> Result<CompletionsCollected, ChannelError> {
    for link in &mut links.links {
        link.from_peer.receive(timeout)?;
        log::trace!("completion received from core {}", link.core);
    }
    Ok(CompletionsCollected::new(links.links.len()))
}
