#![forbid(unsafe_code)]

use super::super::{StoreError, from_sqlite_u64, to_sqlite_i64};
use rusqlite::{OptionalExtension, Transaction, params};

/// Stored value is the last assigned id: seeded 0 implicitly, written back
/// as the id just handed out. Counters only ever advance.
pub(in crate::store) fn counter_value_tx(
    tx: &Transaction<'_>,
    owner: &str,
    name: &str,
) -> Result<u64, StoreError> {
    let current: i64 = tx
        .query_row(
            "SELECT value FROM counters WHERE owner=?1 AND name=?2",
            params![owner, name],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0);
    from_sqlite_u64(current)
}

pub(in crate::store) fn next_counter_tx(
    tx: &Transaction<'_>,
    owner: &str,
    name: &str,
) -> Result<u64, StoreError> {
    let current = counter_value_tx(tx, owner, name)?;
    let next = current + 1;
    tx.execute(
        r#"
        INSERT INTO counters(owner, name, value) VALUES (?1, ?2, ?3)
        ON CONFLICT(owner, name) DO UPDATE SET value=excluded.value
        "#,
        params![owner, name, to_sqlite_i64(next)?],
    )?;
    Ok(next)
}
