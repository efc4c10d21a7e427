#![forbid(unsafe_code)]

use super::{ProfileSetRequest, SqliteStore, StoreError, from_sqlite_u64, to_sqlite_i64};
use mp_core::ids::OwnerId;
use mp_core::model::{Profile, ProfileVisibility};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    /// Upsert of the caller's profile row. `created_at` is set on first
    /// write and preserved on every later one; `updated_at` always
    /// becomes `now`.
    pub fn profile_set(
        &mut self,
        owner: &OwnerId,
        request: ProfileSetRequest,
    ) -> Result<(), StoreError> {
        let ProfileSetRequest {
            display_name,
            bio,
            visibility,
            now,
        } = request;

        let profile = Profile::try_new(owner.clone(), display_name, bio, visibility, now, now)
            .map_err(|err| StoreError::InvalidInput(err.message()))?;

        self.conn.execute(
            r#"
            INSERT INTO profiles(owner, display_name, bio, visibility, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(owner) DO UPDATE SET
              display_name=excluded.display_name,
              bio=excluded.bio,
              visibility=excluded.visibility,
              updated_at=excluded.updated_at
            "#,
            params![
                profile.owner().as_str(),
                profile.display_name(),
                profile.bio(),
                i64::from(profile.visibility().as_ordinal()),
                to_sqlite_i64(profile.created_at())?,
            ],
        )?;

        Ok(())
    }

    /// Visibility-filtered read: a Private profile resolves to `None` for
    /// every viewer except its owner, never to an error.
    pub fn profile_get(
        &self,
        owner: &OwnerId,
        viewer: Option<&OwnerId>,
    ) -> Result<Option<Profile>, StoreError> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT display_name, bio, visibility, created_at, updated_at
                FROM profiles
                WHERE owner = ?1
                "#,
                params![owner.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((display_name, bio, visibility, created_at, updated_at)) = row else {
            return Ok(None);
        };

        let visibility = u8::try_from(visibility)
            .ok()
            .and_then(ProfileVisibility::from_ordinal)
            .ok_or(StoreError::InvalidInput("invalid stored visibility"))?;

        if visibility == ProfileVisibility::Private && viewer != Some(owner) {
            return Ok(None);
        }

        let profile = Profile::try_new(
            owner.clone(),
            display_name,
            bio,
            visibility,
            from_sqlite_u64(created_at)?,
            from_sqlite_u64(updated_at)?,
        )
        .map_err(|_| StoreError::InvalidInput("invalid profile row"))?;

        Ok(Some(profile))
    }

    pub fn profile_delete(&mut self, owner: &OwnerId) -> Result<(), StoreError> {
        let deleted = self.conn.execute(
            "DELETE FROM profiles WHERE owner = ?1",
            params![owner.as_str()],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
