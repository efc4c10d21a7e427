#![forbid(unsafe_code)]

use super::{MAX_MILESTONES_PER_OWNER, SqliteStore, StoreError, from_sqlite_u64, to_sqlite_i64};
use mp_core::ids::OwnerId;
use rusqlite::{OptionalExtension, Transaction, params};

impl SqliteStore {
    /// Exact membership probe against the denormalized goal index.
    pub fn goal_member_exists(
        &self,
        owner: &OwnerId,
        goal_id: u64,
        record_id: u64,
    ) -> Result<bool, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT 1 FROM goal_members WHERE owner=?1 AND goal_id=?2 AND record_id=?3",
                params![
                    owner.as_str(),
                    to_sqlite_i64(goal_id)?,
                    to_sqlite_i64(record_id)?
                ],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .is_some())
    }

    /// Mean progress across the owner's milestones belonging to `goal_id`,
    /// floored; 0 when the goal has no members (absent goal and absent
    /// owner included — this read never fails).
    ///
    /// Candidate ids are walked over the fixed range `1..=MAX`, probing the
    /// membership index per slot; record bodies are fetched only for
    /// members. The fixed ceiling keeps the per-call cost constant no
    /// matter how many milestones the owner actually has.
    pub fn goal_progress(&self, owner: &OwnerId, goal_id: u64) -> Result<u64, StoreError> {
        let mut member_stmt = self.conn.prepare(
            "SELECT 1 FROM goal_members WHERE owner=?1 AND goal_id=?2 AND record_id=?3",
        )?;
        let mut progress_stmt = self
            .conn
            .prepare("SELECT progress FROM milestones WHERE owner=?1 AND record_id=?2")?;

        let owner = owner.as_str();
        let goal = to_sqlite_i64(goal_id)?;

        let mut sum: u64 = 0;
        let mut members: u64 = 0;
        for candidate in 1..=MAX_MILESTONES_PER_OWNER {
            let candidate = to_sqlite_i64(candidate)?;
            let is_member = member_stmt
                .query_row(params![owner, goal, candidate], |row| row.get::<_, i64>(0))
                .optional()?
                .is_some();
            if !is_member {
                continue;
            }

            let progress: Option<i64> = progress_stmt
                .query_row(params![owner, candidate], |row| row.get(0))
                .optional()?;
            // A membership row without its milestone would be an index
            // consistency bug; skip rather than poison the aggregate.
            let Some(progress) = progress else {
                continue;
            };

            sum = sum.saturating_add(from_sqlite_u64(progress)?);
            members += 1;
        }

        if members == 0 {
            return Ok(0);
        }
        Ok(sum / members)
    }
}

pub(in crate::store) fn goal_member_insert_tx(
    tx: &Transaction<'_>,
    owner: &str,
    goal_id: u64,
    record_id: u64,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT INTO goal_members(owner, goal_id, record_id) VALUES (?1, ?2, ?3)",
        params![owner, to_sqlite_i64(goal_id)?, to_sqlite_i64(record_id)?],
    )?;
    Ok(())
}

pub(in crate::store) fn goal_member_remove_tx(
    tx: &Transaction<'_>,
    owner: &str,
    goal_id: u64,
    record_id: u64,
) -> Result<(), StoreError> {
    tx.execute(
        "DELETE FROM goal_members WHERE owner=?1 AND goal_id=?2 AND record_id=?3",
        params![owner, to_sqlite_i64(goal_id)?, to_sqlite_i64(record_id)?],
    )?;
    Ok(())
}
