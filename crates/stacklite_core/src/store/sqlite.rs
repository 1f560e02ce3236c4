//! SQLite-backed key/value store.
//!
//! # Responsibility
//! - Open file or in-memory connections with required pragmas.
//! - Apply schema migrations before returning a usable backend.
//!
//! # Invariants
//! - Returned backends have `foreign_keys=ON` and migrations applied.
//! - `save` is a whole-key upsert; last write wins.

use crate::store::backend::StoreBackend;
use crate::store::migrations::apply_migrations;
use crate::store::StoreResult;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

/// Durable backend over one SQLite database.
pub struct SqliteBackend {
    conn: Connection,
}

/// Opens a database file and applies all pending migrations.
///
/// # Side effects
/// - Emits `store_open` logging events with duration and status.
pub fn open_store(path: impl AsRef<Path>) -> StoreResult<SqliteBackend> {
    let started_at = Instant::now();
    info!("event=store_open module=store status=start mode=file");

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=store_open module=store status=error mode=file duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    bootstrap(conn, started_at, "file")
}

/// Opens an in-memory database and applies all pending migrations.
pub fn open_store_in_memory() -> StoreResult<SqliteBackend> {
    let started_at = Instant::now();
    info!("event=store_open module=store status=start mode=memory");

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=store_open module=store status=error mode=memory duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    bootstrap(conn, started_at, "memory")
}

fn bootstrap(
    mut conn: Connection,
    started_at: Instant,
    mode: &'static str,
) -> StoreResult<SqliteBackend> {
    let result = (|| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        apply_migrations(&mut conn)
    })();

    match result {
        Ok(()) => {
            info!(
                "event=store_open module=store status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(SqliteBackend { conn })
        }
        Err(err) => {
            error!(
                "event=store_open module=store status=error mode={mode} duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

impl StoreBackend for SqliteBackend {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}
