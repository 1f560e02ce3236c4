//! Typed durable store with change notification.
//!
//! # Responsibility
//! - Validate persisted bytes against the expected shape at the read
//!   boundary; corrupt state never reaches a caller.
//! - Persist fully before notifying any subscriber (write-then-notify).
//!
//! # Invariants
//! - `read` is total: malformed or missing data yields the type's
//!   default value, with a recovery log event.
//! - Same-key subscribers run synchronously, in subscription order,
//!   after the bytes are durable.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub mod backend;
pub mod keys;
pub mod migrations;
mod sqlite;

pub use backend::{MemoryBackend, StoreBackend};
pub use sqlite::{open_store, open_store_in_memory, SqliteBackend};

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence-layer error for backend and serialization failures.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Serialize(serde_json::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize stored value: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "store schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Handle for removing one store subscription.
#[derive(Debug, PartialEq, Eq)]
pub struct SubscriptionToken(u64);

type KeyHandler = Rc<dyn Fn(&str)>;

/// Typed key/value store for one execution context.
///
/// Several contexts may share one backend; each context holds its own
/// `Store` with its own subscribers.
pub struct Store {
    backend: Rc<dyn StoreBackend>,
    subscribers: RefCell<Vec<(u64, String, KeyHandler)>>,
    write_hook: RefCell<Option<Box<dyn Fn(&str)>>>,
    next_token: Cell<u64>,
}

impl Store {
    pub fn new(backend: Rc<dyn StoreBackend>) -> Self {
        Self {
            backend,
            subscribers: RefCell::new(Vec::new()),
            write_hook: RefCell::new(None),
            next_token: Cell::new(1),
        }
    }

    /// Convenience constructor over a fresh private memory backend.
    pub fn in_memory() -> Self {
        Self::new(Rc::new(MemoryBackend::new()))
    }

    /// Reads the value stored under `key`, failing soft.
    ///
    /// Missing, unreadable, or malformed values yield `T::default()`;
    /// recovery is logged, never surfaced.
    pub fn read<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let raw = match self.backend.load(key) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    "event=store_read module=store status=recovered key={key} error_code=backend_unreadable error={err}"
                );
                return T::default();
            }
        };

        let Some(raw) = raw else {
            return T::default();
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=store_read module=store status=recovered key={key} error_code=malformed_value error={err}"
                );
                T::default()
            }
        }
    }

    /// Persists `value` under `key`, then notifies subscribers.
    ///
    /// Notification order: same-key subscribers (synchronous), then the
    /// cross-context write hook.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.save(key, &raw)?;
        self.notify(key);
        Ok(())
    }

    /// Removes `key` entirely, with the same notify ordering as `write`.
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        self.backend.remove(key)?;
        self.notify(key);
        Ok(())
    }

    /// Registers a same-context handler for writes to `key`.
    pub fn subscribe(&self, key: &str, handler: impl Fn(&str) + 'static) -> SubscriptionToken {
        let token = self.next_token.get();
        self.next_token.set(token + 1);
        self.subscribers
            .borrow_mut()
            .push((token, key.to_string(), Rc::new(handler)));
        SubscriptionToken(token)
    }

    pub fn unsubscribe(&self, token: SubscriptionToken) {
        self.subscribers
            .borrow_mut()
            .retain(|(id, _, _)| *id != token.0);
    }

    /// Installs the cross-context relay; one hook per store.
    pub(crate) fn set_write_hook(&self, hook: impl Fn(&str) + 'static) {
        *self.write_hook.borrow_mut() = Some(Box::new(hook));
    }

    fn notify(&self, key: &str) {
        // Snapshot first: handlers may re-enter subscribe/unsubscribe.
        let matching: Vec<KeyHandler> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|(_, subscribed, _)| subscribed == key)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in matching {
            handler(key);
        }

        if let Some(hook) = self.write_hook.borrow().as_ref() {
            hook(key);
        }
    }
}
