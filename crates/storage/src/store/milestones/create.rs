#![forbid(unsafe_code)]

use super::super::*;
use mp_core::ids::OwnerId;
use mp_core::model::{Milestone, MilestoneStatus};
use rusqlite::params;

impl SqliteStore {
    /// Creates a milestone for `owner` and returns the assigned record id.
    /// The record row, the counter advance, and the membership row (when a
    /// goal is supplied) commit together or not at all.
    pub fn milestone_create(
        &mut self,
        owner: &OwnerId,
        request: MilestoneCreateRequest,
    ) -> Result<u64, StoreError> {
        let MilestoneCreateRequest {
            title,
            description,
            goal_id,
            target_date,
            now,
        } = request;

        if target_date <= now {
            return Err(StoreError::InvalidInput(
                "target date must be after the current ledger clock",
            ));
        }

        let tx = self.conn.transaction()?;

        let assigned = counter_value_tx(&tx, owner.as_str(), MILESTONE_SEQ)?;
        if assigned >= MAX_MILESTONES_PER_OWNER {
            return Err(StoreError::InvalidInput(
                "milestone capacity reached for owner",
            ));
        }

        let record_id = next_counter_tx(&tx, owner.as_str(), MILESTONE_SEQ)?;
        let milestone = Milestone::try_new(
            owner.clone(),
            record_id,
            title,
            description,
            goal_id,
            MilestoneStatus::Pending,
            0,
            target_date,
            now,
            now,
        )
        .map_err(|err| StoreError::InvalidInput(err.message()))?;

        tx.execute(
            r#"
            INSERT INTO milestones(owner, record_id, title, description, goal_id, status, progress, target_date, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                milestone.owner().as_str(),
                to_sqlite_i64(milestone.record_id())?,
                milestone.title(),
                milestone.description(),
                milestone.goal_id().map(to_sqlite_i64).transpose()?,
                i64::from(milestone.status().as_ordinal()),
                to_sqlite_i64(milestone.progress())?,
                to_sqlite_i64(milestone.target_date())?,
                to_sqlite_i64(milestone.created_at())?,
                to_sqlite_i64(milestone.updated_at())?,
            ],
        )?;

        if let Some(goal_id) = milestone.goal_id() {
            goal_member_insert_tx(&tx, owner.as_str(), goal_id, record_id)?;
        }

        tx.commit()?;
        Ok(record_id)
    }
}
