#![forbid(unsafe_code)]

use super::super::*;
use mp_core::ids::OwnerId;
use mp_core::model::{Milestone, MilestoneStatus};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    /// Public read path: no authorization check by contract.
    pub fn milestone_get(
        &self,
        owner: &OwnerId,
        record_id: u64,
    ) -> Result<Option<Milestone>, StoreError> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT title, description, goal_id, status, progress, target_date, created_at, updated_at
                FROM milestones
                WHERE owner = ?1 AND record_id = ?2
                "#,
                params![owner.as_str(), to_sqlite_i64(record_id)?],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, i64>(5)?,
                        row.get::<_, i64>(6)?,
                        row.get::<_, i64>(7)?,
                    ))
                },
            )
            .optional()?;

        let Some((
            title,
            description,
            goal_id,
            status,
            progress,
            target_date,
            created_at,
            updated_at,
        )) = row
        else {
            return Ok(None);
        };

        let status = u8::try_from(status)
            .ok()
            .and_then(MilestoneStatus::from_ordinal)
            .ok_or(StoreError::InvalidInput("invalid stored status"))?;

        let milestone = Milestone::try_new(
            owner.clone(),
            record_id,
            title,
            description,
            goal_id.map(from_sqlite_u64).transpose()?,
            status,
            from_sqlite_u64(progress)?,
            from_sqlite_u64(target_date)?,
            from_sqlite_u64(created_at)?,
            from_sqlite_u64(updated_at)?,
        )
        .map_err(|_| StoreError::InvalidInput("invalid milestone row"))?;

        Ok(Some(milestone))
    }

    /// Current counter value for `owner`: the number of milestones ever
    /// created, 0 when the owner has none.
    pub fn milestone_count(&self, owner: &OwnerId) -> Result<u64, StoreError> {
        let value: i64 = self
            .conn
            .query_row(
                "SELECT value FROM counters WHERE owner=?1 AND name=?2",
                params![owner.as_str(), MILESTONE_SEQ],
                |row| row.get(0),
            )
            .optional()?
            .unwrap_or(0);
        from_sqlite_u64(value)
    }
}
