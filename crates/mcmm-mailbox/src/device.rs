use std::sync::atomic::{AtomicU64, Ordering};

use foundation::{EndpointName, Message};
use spin::Mutex;

/// One single-slot mailbox.
pub struct Mailbox {
    name: EndpointName,
    slot: Mutex<Option<Message>>,
    delivered: AtomicU64,
}

impl Mailbox {
    pub fn new(name: EndpointName) -> Self {
        Self {
            name,
            slot: Mutex::new(None),
            delivered: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> EndpointName {
        self.name
    }

    /// Post `message` if the slot is free.
    pub fn try_post(&self, message: Message) -> bool {
        let mut slot = self.slot.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(message);
        true
    }

    /// Take the pending message, if any.
    pub fn try_take(&self) -> Option<Message> {
        let message = self.slot.lock().take();
        if message.is_some() {
            self.delivered.fetch_add(1, Ordering::Relaxed);
        }
        message
    }

    pub fn is_full(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Messages taken out of this mailbox so far.
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }
}
