// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent storage for the offline engine.
//!
//! The [`Store`] trait is everything the engine needs from durable storage:
//! the mutation queue, the URL-keyed response cache, projected domain
//! records, and a small metadata map. [`SqliteStore`] is the bundled
//! implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use futures_util::future::{self, BoxFuture, FutureExt};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{DomainKind, DomainRecord};
use crate::error::{Error, Result};
use crate::mutation::{MutationId, MutationUpdate, NewMutation, QueuedMutation};

/// SQL schema for the offline store.
pub const SCHEMA: &str = r#"
-- Outbox of writes awaiting replay, in insertion order
CREATE TABLE IF NOT EXISTS mutations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    method TEXT NOT NULL,
    url TEXT NOT NULL,
    body TEXT NOT NULL,
    headers TEXT NOT NULL,
    version_stamp TEXT,
    attempts INTEGER NOT NULL DEFAULT 0,
    last_error TEXT,
    last_attempt_at TEXT,
    created_at TEXT NOT NULL
);

-- Last known-good payload per normalized URL
CREATE TABLE IF NOT EXISTS responses (
    url TEXT PRIMARY KEY,
    payload TEXT NOT NULL,
    cached_at TEXT NOT NULL
);

-- Projected notebooks and notes
CREATE TABLE IF NOT EXISTS domain_records (
    position INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    id TEXT NOT NULL,
    revision TEXT NOT NULL,
    notebook_id TEXT,
    data TEXT NOT NULL,
    UNIQUE (kind, id)
);

-- Small key/value map (lastSyncedAt)
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_domain_notebook ON domain_records(kind, notebook_id);
"#;

/// Last known-good payload for a normalized URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedResponse {
    pub url: String,
    pub payload: Value,
    pub cached_at: DateTime<Utc>,
}

/// Durable storage consumed by the sync engine.
///
/// Every call is a suspension point for the engine. Implementations must
/// return mutations from [`Store::list_mutations`] in insertion order and
/// must reflect persisted state, never a cache that can diverge from it.
pub trait Store: Send + Sync {
    /// Appends a mutation and returns it with its assigned id.
    fn cache_mutation(&self, mutation: NewMutation) -> BoxFuture<'_, Result<QueuedMutation>>;

    /// Lists pending mutations, oldest first.
    fn list_mutations(&self) -> BoxFuture<'_, Result<Vec<QueuedMutation>>>;

    /// Applies bookkeeping fields to a pending mutation.
    fn update_mutation(&self, id: MutationId, update: MutationUpdate)
        -> BoxFuture<'_, Result<()>>;

    /// Removes a mutation. Removing an unknown id is not an error.
    fn remove_mutation(&self, id: MutationId) -> BoxFuture<'_, Result<()>>;

    /// Stores (or overwrites) the payload for a normalized URL.
    fn cache_response(&self, url: String, payload: Value) -> BoxFuture<'_, Result<()>>;

    /// Looks up the payload for a normalized URL.
    fn cached_response(&self, url: String) -> BoxFuture<'_, Result<Option<CachedResponse>>>;

    /// Upserts domain records by id.
    fn store_domain(
        &self,
        kind: DomainKind,
        records: Vec<DomainRecord>,
    ) -> BoxFuture<'_, Result<()>>;

    /// Makes `records` the complete set of `kind` records, within one
    /// notebook when `notebook` is given. Records missing from `records`
    /// are removed; the rest are upserted.
    fn replace_domain(
        &self,
        kind: DomainKind,
        notebook: Option<String>,
        records: Vec<DomainRecord>,
    ) -> BoxFuture<'_, Result<()>>;

    /// Lists domain records of a kind in first-stored order.
    fn domain_records(&self, kind: DomainKind) -> BoxFuture<'_, Result<Vec<DomainRecord>>>;

    /// Removes one domain record.
    fn remove_domain_record(&self, kind: DomainKind, id: String) -> BoxFuture<'_, Result<()>>;

    /// Reads a metadata value.
    fn metadata(&self, key: String) -> BoxFuture<'_, Result<Option<String>>>;

    /// Writes a metadata value.
    fn set_metadata(&self, key: String, value: String) -> BoxFuture<'_, Result<()>>;

    /// Removes every mutation, cached response, domain record and metadata value.
    fn clear_database(&self) -> BoxFuture<'_, Result<()>>;

    /// Upserts notebooks.
    fn store_notebooks(&self, records: Vec<DomainRecord>) -> BoxFuture<'_, Result<()>> {
        self.store_domain(DomainKind::Notebook, records)
    }

    /// Upserts notes.
    fn store_notes(&self, records: Vec<DomainRecord>) -> BoxFuture<'_, Result<()>> {
        self.store_domain(DomainKind::Note, records)
    }
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(value: &str, column: &str) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            conversion_failure(Error::CorruptedData(format!(
                "invalid timestamp '{value}' in column '{column}'"
            )))
        })
}

/// Parse a JSON column from the database.
fn parse_json<T: serde::de::DeserializeOwned>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    serde_json::from_str(value).map_err(|e| {
        conversion_failure(Error::CorruptedData(format!(
            "invalid JSON in column '{column}': {e}"
        )))
    })
}

fn parse_db<T: std::str::FromStr>(value: &str, column: &str) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        conversion_failure(Error::CorruptedData(format!(
            "invalid value '{value}' in column '{column}'"
        )))
    })
}

fn conversion_failure(error: Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(error))
}

fn mutation_from_row(row: &Row<'_>) -> std::result::Result<QueuedMutation, rusqlite::Error> {
    let method: String = row.get(1)?;
    let body: String = row.get(3)?;
    let headers: String = row.get(4)?;
    let last_attempt_at: Option<String> = row.get(8)?;
    let created_at: String = row.get(9)?;

    Ok(QueuedMutation {
        id: MutationId(row.get(0)?),
        method: parse_db(&method, "method")?,
        url: row.get(2)?,
        body: parse_json(&body, "body")?,
        headers: parse_json(&headers, "headers")?,
        version_stamp: row.get(5)?,
        attempts: row.get(6)?,
        last_error: row.get(7)?,
        last_attempt_at: last_attempt_at
            .map(|ts| parse_timestamp(&ts, "last_attempt_at"))
            .transpose()?,
        created_at: parse_timestamp(&created_at, "created_at")?,
    })
}

fn write_domain(conn: &Connection, kind: DomainKind, records: &[DomainRecord]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO domain_records (kind, id, revision, notebook_id, data)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(kind, id) DO UPDATE SET
            revision = excluded.revision,
            notebook_id = excluded.notebook_id,
            data = excluded.data",
    )?;
    for record in records {
        stmt.execute(params![
            kind.as_str(),
            record.id,
            record.revision,
            record.notebook_id,
            serde_json::to_string(&record.data)?,
        ])?;
    }
    Ok(())
}

fn domain_from_row(row: &Row<'_>) -> std::result::Result<DomainRecord, rusqlite::Error> {
    let data: String = row.get(3)?;
    Ok(DomainRecord {
        id: row.get(0)?,
        revision: row.get(1)?,
        notebook_id: row.get(2)?,
        data: parse_json(&data, "data")?,
    })
}

/// Run schema creation on a database connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// SQLite-backed [`Store`].
pub struct SqliteStore {
    /// The underlying SQLite connection. Never held across an await.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a store at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        run_migrations(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::StoreUnavailable("connection lock poisoned".to_string()))
    }

    fn insert_mutation(&self, mutation: NewMutation) -> Result<QueuedMutation> {
        let created_at = Utc::now();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO mutations (method, url, body, headers, version_stamp, attempts, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                mutation.method.as_str(),
                mutation.url,
                serde_json::to_string(&mutation.body)?,
                serde_json::to_string(&mutation.headers)?,
                mutation.version_stamp,
                created_at.to_rfc3339(),
            ],
        )?;
        let id = MutationId(conn.last_insert_rowid());

        Ok(QueuedMutation {
            id,
            method: mutation.method,
            url: mutation.url,
            body: mutation.body,
            headers: mutation.headers,
            version_stamp: mutation.version_stamp,
            attempts: 0,
            last_error: None,
            last_attempt_at: None,
            created_at,
        })
    }

    fn select_mutations(&self) -> Result<Vec<QueuedMutation>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, method, url, body, headers, version_stamp, attempts,
                    last_error, last_attempt_at, created_at
             FROM mutations ORDER BY id ASC",
        )?;
        let mutations = stmt
            .query_map([], mutation_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(mutations)
    }

    fn apply_update(&self, id: MutationId, update: MutationUpdate) -> Result<()> {
        self.conn()?.execute(
            "UPDATE mutations SET
                attempts = COALESCE(?2, attempts),
                last_error = COALESCE(?3, last_error),
                last_attempt_at = COALESCE(?4, last_attempt_at)
             WHERE id = ?1",
            params![
                id.0,
                update.attempts,
                update.last_error,
                update.last_attempt_at.map(|ts| ts.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    fn delete_mutation(&self, id: MutationId) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM mutations WHERE id = ?1", params![id.0])?;
        Ok(())
    }

    fn put_response(&self, url: &str, payload: &Value) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO responses (url, payload, cached_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(url) DO UPDATE SET payload = excluded.payload, cached_at = excluded.cached_at",
            params![url, serde_json::to_string(payload)?, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn get_response(&self, url: &str) -> Result<Option<CachedResponse>> {
        let response = self
            .conn()?
            .query_row(
                "SELECT url, payload, cached_at FROM responses WHERE url = ?1",
                params![url],
                |row| {
                    let payload: String = row.get(1)?;
                    let cached_at: String = row.get(2)?;
                    Ok(CachedResponse {
                        url: row.get(0)?,
                        payload: parse_json(&payload, "payload")?,
                        cached_at: parse_timestamp(&cached_at, "cached_at")?,
                    })
                },
            )
            .optional()?;
        Ok(response)
    }

    fn upsert_domain(&self, kind: DomainKind, records: &[DomainRecord]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        write_domain(&tx, kind, records)?;
        tx.commit()?;
        Ok(())
    }

    fn replace_domain_set(
        &self,
        kind: DomainKind,
        notebook: Option<&str>,
        records: &[DomainRecord],
    ) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut existing = Vec::new();
        {
            let mut stmt = tx.prepare(
                "SELECT id FROM domain_records
                 WHERE kind = ?1 AND (?2 IS NULL OR notebook_id = ?2)",
            )?;
            let rows = stmt.query_map(params![kind.as_str(), notebook], |row| {
                row.get::<_, String>(0)
            })?;
            for id in rows {
                existing.push(id?);
            }
        }
        for id in existing {
            if !records.iter().any(|record| record.id == id) {
                tx.execute(
                    "DELETE FROM domain_records WHERE kind = ?1 AND id = ?2",
                    params![kind.as_str(), id],
                )?;
            }
        }
        write_domain(&tx, kind, records)?;
        tx.commit()?;
        Ok(())
    }
    fn select_domain(&self, kind: DomainKind) -> Result<Vec<DomainRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, revision, notebook_id, data FROM domain_records
             WHERE kind = ?1 ORDER BY position ASC",
        )?;
        let records = stmt
            .query_map(params![kind.as_str()], domain_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn delete_domain(&self, kind: DomainKind, id: &str) -> Result<()> {
        self.conn()?.execute(
            "DELETE FROM domain_records WHERE kind = ?1 AND id = ?2",
            params![kind.as_str(), id],
        )?;
        Ok(())
    }

    fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()?
            .query_row(
                "SELECT value FROM metadata WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO metadata (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn clear_all(&self) -> Result<()> {
        self.conn()?.execute_batch(
            "BEGIN;
             DELETE FROM mutations;
             DELETE FROM responses;
             DELETE FROM domain_records;
             DELETE FROM metadata;
             COMMIT;",
        )?;
        Ok(())
    }
}

impl Store for SqliteStore {
    fn cache_mutation(&self, mutation: NewMutation) -> BoxFuture<'_, Result<QueuedMutation>> {
        future::ready(self.insert_mutation(mutation)).boxed()
    }

    fn list_mutations(&self) -> BoxFuture<'_, Result<Vec<QueuedMutation>>> {
        future::ready(self.select_mutations()).boxed()
    }

    fn update_mutation(
        &self,
        id: MutationId,
        update: MutationUpdate,
    ) -> BoxFuture<'_, Result<()>> {
        future::ready(self.apply_update(id, update)).boxed()
    }

    fn remove_mutation(&self, id: MutationId) -> BoxFuture<'_, Result<()>> {
        future::ready(self.delete_mutation(id)).boxed()
    }

    fn cache_response(&self, url: String, payload: Value) -> BoxFuture<'_, Result<()>> {
        future::ready(self.put_response(&url, &payload)).boxed()
    }

    fn cached_response(&self, url: String) -> BoxFuture<'_, Result<Option<CachedResponse>>> {
        future::ready(self.get_response(&url)).boxed()
    }

    fn store_domain(
        &self,
        kind: DomainKind,
        records: Vec<DomainRecord>,
    ) -> BoxFuture<'_, Result<()>> {
        future::ready(self.upsert_domain(kind, &records)).boxed()
    }

    fn replace_domain(
        &self,
        kind: DomainKind,
        notebook: Option<String>,
        records: Vec<DomainRecord>,
    ) -> BoxFuture<'_, Result<()>> {
        future::ready(self.replace_domain_set(kind, notebook.as_deref(), &records)).boxed()
    }

    fn domain_records(&self, kind: DomainKind) -> BoxFuture<'_, Result<Vec<DomainRecord>>> {
        future::ready(self.select_domain(kind)).boxed()
    }

    fn remove_domain_record(&self, kind: DomainKind, id: String) -> BoxFuture<'_, Result<()>> {
        future::ready(self.delete_domain(kind, &id)).boxed()
    }

    fn metadata(&self, key: String) -> BoxFuture<'_, Result<Option<String>>> {
        future::ready(self.get_metadata(&key)).boxed()
    }

    fn set_metadata(&self, key: String, value: String) -> BoxFuture<'_, Result<()>> {
        future::ready(self.put_metadata(&key, &value)).boxed()
    }

    fn clear_database(&self) -> BoxFuture<'_, Result<()>> {
        future::ready(self.clear_all()).boxed()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
