#![forbid(unsafe_code)]

mod error;
mod goals;
mod milestones;
mod profiles;
mod requests;
mod support;

pub use error::StoreError;
pub use requests::*;

pub(in crate::store) use goals::{goal_member_insert_tx, goal_member_remove_tx};
pub(in crate::store) use support::{counter_value_tx, next_counter_tx};

use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SCHEMA_VERSION: i64 = 1;
const MILESTONE_SEQ: &str = "milestone_seq";

/// Hard per-owner capacity limit. Aggregation walks candidate record ids
/// `1..=MAX`, so an id allocated past this ceiling would be invisible to
/// every aggregate; create enforces it as a capacity error instead.
pub const MAX_MILESTONES_PER_OWNER: u64 = 100;

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join("milepost.db");
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        preflight_gate(&conn)?;
        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}

fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }

    if tables.is_empty() {
        return Ok(());
    }

    let required: BTreeSet<&str> = [
        "store_state",
        "milestones",
        "counters",
        "goal_members",
        "profiles",
    ]
    .into_iter()
    .collect();

    if tables
        .iter()
        .any(|table| !required.contains(table.as_str()))
    {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: unsupported tables detected",
        ));
    }

    for table in required {
        if !tables.contains(table) {
            return Err(StoreError::InvalidInput(
                "RESET_REQUIRED: required table is missing",
            ));
        }
    }

    let version = conn
        .query_row(
            "SELECT schema_version FROM store_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;

    match version {
        Some(v) if v == SCHEMA_VERSION => Ok(()),
        Some(_) => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema version mismatch",
        )),
        None => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema state row is missing",
        )),
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS store_state (
          singleton INTEGER PRIMARY KEY CHECK(singleton = 1),
          schema_version INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS milestones (
          owner TEXT NOT NULL,
          record_id INTEGER NOT NULL,
          title TEXT NOT NULL,
          description TEXT NOT NULL,
          goal_id INTEGER,
          status INTEGER NOT NULL,
          progress INTEGER NOT NULL,
          target_date INTEGER NOT NULL,
          created_at INTEGER NOT NULL,
          updated_at INTEGER NOT NULL,
          PRIMARY KEY(owner, record_id),
          CHECK(record_id >= 1)
        );

        CREATE TABLE IF NOT EXISTS counters (
          owner TEXT NOT NULL,
          name TEXT NOT NULL,
          value INTEGER NOT NULL,
          PRIMARY KEY(owner, name)
        );

        CREATE TABLE IF NOT EXISTS goal_members (
          owner TEXT NOT NULL,
          goal_id INTEGER NOT NULL,
          record_id INTEGER NOT NULL,
          PRIMARY KEY(owner, goal_id, record_id),
          FOREIGN KEY(owner, record_id)
            REFERENCES milestones(owner, record_id)
            ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS profiles (
          owner TEXT PRIMARY KEY,
          display_name TEXT NOT NULL,
          bio TEXT NOT NULL,
          visibility INTEGER NOT NULL,
          created_at INTEGER NOT NULL,
          updated_at INTEGER NOT NULL
        );
        "#,
    )?;

    conn.execute(
        "INSERT INTO store_state(singleton, schema_version) VALUES (1, ?1) \
         ON CONFLICT(singleton) DO UPDATE SET schema_version=excluded.schema_version",
        params![SCHEMA_VERSION],
    )?;

    Ok(())
}

fn to_sqlite_i64(value: u64) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::InvalidInput("numeric overflow"))
}

fn from_sqlite_u64(value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::InvalidInput("invalid stored integer"))
}
