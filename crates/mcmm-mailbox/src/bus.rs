use std::collections::BTreeMap;
use std::sync::Arc;

use foundation::{
    ChannelError, ClusterConfig, EndpointName, EndpointRegistry, Message, SignalEndpoint, Timeout,
};

use crate::device::Mailbox;
use crate::poll::poll_until;

/// Every mailbox of a cluster, keyed by device name.
///
/// Cloning is cheap; each core gets its own clone as its registry.
#[derive(Clone)]
pub struct MailboxBus {
    devices: Arc<BTreeMap<String, Arc<Mailbox>>>,
}

impl MailboxBus {
    /// One `in` and one `out` mailbox per peer of `cluster`.
    pub fn for_cluster(cluster: &ClusterConfig) -> Self {
        Self::with_endpoints(
            cluster
                .peers()
                .flat_map(|core| [EndpointName::inbound(core), EndpointName::outbound(core)]),
        )
    }

    pub fn with_endpoints(names: impl IntoIterator<Item = EndpointName>) -> Self {
        let devices = names
            .into_iter()
            .map(|name| (name.to_string(), Arc::new(Mailbox::new(name))))
            .collect::<BTreeMap<_, _>>();
        log::debug!("mailbox bus with {} devices", devices.len());
        Self {
            devices: Arc::new(devices),
        }
    }

    pub fn device_names(&self) -> impl Iterator<Item = &str> {
        self.devices.keys().map(String::as_str)
    }

    pub fn lookup(&self, path: &str) -> Option<Arc<Mailbox>> {
        self.devices.get(path).cloned()
    }
}

impl EndpointRegistry for MailboxBus {
    type Endpoint = MailboxHandle;

    fn open(&mut self, name: EndpointName) -> Result<MailboxHandle, ChannelError> {
        let path = name.to_string();
        let mailbox = self.lookup(&path).ok_or(ChannelError::NotFound(name))?;
        log::trace!("opened {path}");
        Ok(MailboxHandle { mailbox })
    }
}

/// An opened mailbox.
pub struct MailboxHandle {
    mailbox: Arc<Mailbox>,
}

impl MailboxHandle {
    pub fn device(&self) -> &Mailbox {
        &self.mailbox
    }
}

impl SignalEndpoint for MailboxHandle {
    fn name(&self) -> EndpointName {
        self.mailbox.name()
    }

    fn send(&mut self, message: Message, timeout: Timeout) -> Result<(), ChannelError> {
        let mailbox = &self.mailbox;
        poll_until(timeout, || mailbox.try_post(message).then_some(())).map_err(|waited| {
            ChannelError::Timeout {
                endpoint: mailbox.name(),
                waited,
            }
        })
    }

    fn receive(&mut self, timeout: Timeout) -> Result<Message, ChannelError> {
        let mailbox = &self.mailbox;
        poll_until(timeout, || mailbox.try_take()).map_err(|waited| ChannelError::Timeout {
            endpoint: mailbox.name(),
            waited,
        })
    }
}
