//! Publish/subscribe fan-out within and across execution contexts.
//!
//! # Responsibility
//! - Deliver same-context topic signals synchronously, in subscription
//!   order.
//! - Queue cross-context storage-change signals for an explicit,
//!   cooperative drain (`pump`).
//!
//! # Invariants
//! - Storage-change signals carry only the changed key; receivers
//!   re-read the store rather than trusting a payload.
//! - Double delivery of the same signal must be harmless; handlers
//!   re-derive state, they never apply incremental deltas.

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

/// Fired after any activity-aggregator mutation.
pub const TOPIC_ACTIVITY_UPDATED: &str = "activityUpdated";
/// Fired after question creation or deletion.
pub const TOPIC_QUESTION_UPDATED: &str = "questionUpdated";

type TopicHandler = Rc<dyn Fn(Option<&Value>)>;
type StorageHandler = Rc<dyn Fn(&str)>;

/// Handle for removing one bus subscription.
#[derive(Debug, PartialEq, Eq)]
pub struct BusToken(u64);

/// Signal fan-out for one execution context.
pub struct ContextBus {
    topic_handlers: RefCell<BTreeMap<String, Vec<(u64, TopicHandler)>>>,
    storage_handlers: RefCell<Vec<(u64, StorageHandler)>>,
    pending_storage: RefCell<VecDeque<String>>,
    next_token: Cell<u64>,
}

impl Default for ContextBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBus {
    pub fn new() -> Self {
        Self {
            topic_handlers: RefCell::new(BTreeMap::new()),
            storage_handlers: RefCell::new(Vec::new()),
            pending_storage: RefCell::new(VecDeque::new()),
            next_token: Cell::new(1),
        }
    }

    /// Registers a same-context handler for `topic`.
    pub fn subscribe(&self, topic: &str, handler: impl Fn(Option<&Value>) + 'static) -> BusToken {
        let token = self.take_token();
        self.topic_handlers
            .borrow_mut()
            .entry(topic.to_string())
            .or_default()
            .push((token, Rc::new(handler)));
        BusToken(token)
    }

    /// Registers a handler for the platform storage-change signal.
    ///
    /// The handler receives the changed key only.
    pub fn subscribe_storage(&self, handler: impl Fn(&str) + 'static) -> BusToken {
        let token = self.take_token();
        self.storage_handlers
            .borrow_mut()
            .push((token, Rc::new(handler)));
        BusToken(token)
    }

    pub fn unsubscribe(&self, token: BusToken) {
        for handlers in self.topic_handlers.borrow_mut().values_mut() {
            handlers.retain(|(id, _)| *id != token.0);
        }
        self.storage_handlers
            .borrow_mut()
            .retain(|(id, _)| *id != token.0);
    }

    /// Delivers `topic` to same-context subscribers, synchronously.
    pub fn publish(&self, topic: &str, payload: Option<&Value>) {
        let matching: Vec<TopicHandler> = self
            .topic_handlers
            .borrow()
            .get(topic)
            .map(|handlers| handlers.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();
        for handler in matching {
            handler(payload);
        }
    }

    /// Queues a storage-change signal from another context.
    pub fn enqueue_storage_change(&self, key: &str) {
        self.pending_storage.borrow_mut().push_back(key.to_string());
    }

    /// Drains queued storage-change signals to their subscribers.
    ///
    /// Returns the number of signals delivered. Cross-context delivery
    /// is asynchronous relative to the originating write; draining at an
    /// explicit point keeps single-context ordering deterministic.
    pub fn pump(&self) -> usize {
        let mut delivered = 0;
        loop {
            let Some(key) = self.pending_storage.borrow_mut().pop_front() else {
                return delivered;
            };
            let handlers: Vec<StorageHandler> = self
                .storage_handlers
                .borrow()
                .iter()
                .map(|(_, h)| Rc::clone(h))
                .collect();
            for handler in handlers {
                handler(&key);
            }
            delivered += 1;
        }
    }

    /// Number of queued, undelivered storage-change signals.
    pub fn pending_len(&self) -> usize {
        self.pending_storage.borrow().len()
    }

    fn take_token(&self) -> u64 {
        let token = self.next_token.get();
        self.next_token.set(token + 1);
        token
    }
}
