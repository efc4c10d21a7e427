#![forbid(unsafe_code)]

use super::super::*;
use mp_core::ids::OwnerId;
use mp_core::model::{Milestone, MilestoneStatus};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    /// Patch-style update. Omitted fields keep their stored value;
    /// `updated_at` always advances to `now`, even for an empty patch.
    /// A goal change keeps the membership index consistent inside the
    /// same transaction as the record write.
    pub fn milestone_update(
        &mut self,
        caller: &OwnerId,
        request: MilestoneUpdateRequest,
    ) -> Result<(), StoreError> {
        let MilestoneUpdateRequest {
            record_id,
            title,
            description,
            goal_id,
            status,
            progress,
            target_date,
            now,
        } = request;

        let tx = self.conn.transaction()?;

        let row = tx
            .query_row(
                r#"
                SELECT owner, title, description, goal_id, status, progress, target_date, created_at
                FROM milestones
                WHERE owner = ?1 AND record_id = ?2
                "#,
                params![caller.as_str(), to_sqlite_i64(record_id)?],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<i64>>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, i64>(5)?,
                        row.get::<_, i64>(6)?,
                        row.get::<_, i64>(7)?,
                    ))
                },
            )
            .optional()?;

        let Some((
            stored_owner,
            current_title,
            current_description,
            current_goal,
            current_status,
            current_progress,
            current_target,
            created_at,
        )) = row
        else {
            return Err(StoreError::NotFound);
        };

        // The lookup is keyed by the caller, so this only trips if the key
        // scheme ever changes to accept a separate owner parameter.
        if stored_owner != caller.as_str() {
            return Err(StoreError::Unauthorized);
        }

        let current_goal = current_goal.map(from_sqlite_u64).transpose()?;
        let current_status = u8::try_from(current_status)
            .ok()
            .and_then(MilestoneStatus::from_ordinal)
            .ok_or(StoreError::InvalidInput("invalid stored status"))?;

        let new_title = title.unwrap_or(current_title);
        let new_description = description.unwrap_or(current_description);
        let new_goal = match goal_id {
            Some(value) => value,
            None => current_goal,
        };
        let new_status = status.unwrap_or(current_status);
        let new_progress = match progress {
            Some(value) => value,
            None => from_sqlite_u64(current_progress)?,
        };
        let new_target = match target_date {
            Some(value) => value,
            None => from_sqlite_u64(current_target)?,
        };

        let milestone = Milestone::try_new(
            caller.clone(),
            record_id,
            new_title,
            new_description,
            new_goal,
            new_status,
            new_progress,
            new_target,
            from_sqlite_u64(created_at)?,
            now,
        )
        .map_err(|err| StoreError::InvalidInput(err.message()))?;

        tx.execute(
            r#"
            UPDATE milestones
            SET title = ?3,
                description = ?4,
                goal_id = ?5,
                status = ?6,
                progress = ?7,
                target_date = ?8,
                updated_at = ?9
            WHERE owner = ?1 AND record_id = ?2
            "#,
            params![
                caller.as_str(),
                to_sqlite_i64(record_id)?,
                milestone.title(),
                milestone.description(),
                milestone.goal_id().map(to_sqlite_i64).transpose()?,
                i64::from(milestone.status().as_ordinal()),
                to_sqlite_i64(milestone.progress())?,
                to_sqlite_i64(milestone.target_date())?,
                to_sqlite_i64(milestone.updated_at())?,
            ],
        )?;

        if milestone.goal_id() != current_goal {
            if let Some(old_goal) = current_goal {
                goal_member_remove_tx(&tx, caller.as_str(), old_goal, record_id)?;
            }
            if let Some(new_goal) = milestone.goal_id() {
                goal_member_insert_tx(&tx, caller.as_str(), new_goal, record_id)?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}
