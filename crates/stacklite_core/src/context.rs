//! Execution-context wiring: shared storage, per-context store and bus.
//!
//! # Responsibility
//! - Model one browser tab/window as a `ForumContext` over a storage
//!   area shared through a `ContextHub`.
//! - Relay every durable write to the other contexts as a
//!   storage-change signal carrying the key only.
//!
//! # Invariants
//! - The originating context never receives its own storage signal;
//!   its subscribers already ran synchronously at write time.
//! - Cross-context signals are delivered only when the receiving
//!   context pumps its bus.

use crate::activity::ActivityAggregator;
use crate::bus::ContextBus;
use crate::notify::NotificationCenter;
use crate::service::answer_service::AnswerService;
use crate::service::question_service::QuestionService;
use crate::session::Session;
use crate::store::{MemoryBackend, Store, StoreBackend};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Shared storage area plus the set of contexts attached to it.
pub struct ContextHub {
    backend: Rc<dyn StoreBackend>,
    contexts: RefCell<Vec<(u64, Rc<ContextBus>)>>,
    next_id: Cell<u64>,
}

impl ContextHub {
    pub fn new(backend: Rc<dyn StoreBackend>) -> Rc<Self> {
        Rc::new(Self {
            backend,
            contexts: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        })
    }

    /// Hub over a fresh in-memory storage area.
    pub fn in_memory() -> Rc<Self> {
        Self::new(Rc::new(MemoryBackend::new()))
    }

    /// Opens one execution context over the shared storage area.
    pub fn open_context(self: &Rc<Self>) -> ForumContext {
        let context_id = self.next_id.get();
        self.next_id.set(context_id + 1);

        let bus = Rc::new(ContextBus::new());
        self.contexts
            .borrow_mut()
            .push((context_id, Rc::clone(&bus)));

        let store = Rc::new(Store::new(Rc::clone(&self.backend)));
        let hub: Weak<Self> = Rc::downgrade(self);
        store.set_write_hook(move |key| {
            if let Some(hub) = hub.upgrade() {
                hub.broadcast_storage_change(context_id, key);
            }
        });

        log::info!("event=context_open module=context status=ok context_id={context_id}");
        ForumContext { store, bus }
    }

    fn broadcast_storage_change(&self, origin: u64, key: &str) {
        for (id, bus) in self.contexts.borrow().iter() {
            if *id != origin {
                bus.enqueue_storage_change(key);
            }
        }
    }
}

/// One browser tab/window worth of state: a store view and a bus.
pub struct ForumContext {
    pub store: Rc<Store>,
    pub bus: Rc<ContextBus>,
}

impl ForumContext {
    /// Standalone context over a private in-memory storage area.
    pub fn in_memory() -> Self {
        ContextHub::in_memory().open_context()
    }

    /// Drains queued cross-context storage signals.
    pub fn pump(&self) -> usize {
        self.bus.pump()
    }

    pub fn session(&self) -> Session {
        Session::new(Rc::clone(&self.store))
    }

    pub fn questions(&self) -> QuestionService {
        QuestionService::new(Rc::clone(&self.store), Rc::clone(&self.bus))
    }

    pub fn answers(&self) -> AnswerService {
        AnswerService::new(Rc::clone(&self.store), Rc::clone(&self.bus))
    }

    pub fn notifications(&self) -> NotificationCenter {
        NotificationCenter::new(Rc::clone(&self.store))
    }

    pub fn activity(&self) -> ActivityAggregator {
        ActivityAggregator::new(Rc::clone(&self.store), Rc::clone(&self.bus))
    }
}
