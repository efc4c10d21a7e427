#![forbid(unsafe_code)]

pub mod ids {
    /// Opaque caller handle. The host environment verifies the principal
    /// before any call reaches the store; this type only enforces shape.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct OwnerId(String);

    impl OwnerId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, OwnerIdError> {
            let value = value.into();
            validate_owner_id(&value)?;
            Ok(Self(value))
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum OwnerIdError {
        Empty,
        TooLong,
        InvalidFirstChar,
        InvalidChar { ch: char, index: usize },
    }

    fn validate_owner_id(value: &str) -> Result<(), OwnerIdError> {
        if value.is_empty() {
            return Err(OwnerIdError::Empty);
        }
        if value.len() > 128 {
            return Err(OwnerIdError::TooLong);
        }
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(OwnerIdError::Empty);
        };
        if !first.is_ascii_alphanumeric() {
            return Err(OwnerIdError::InvalidFirstChar);
        }
        for (index, ch) in value.chars().enumerate() {
            if index == 0 {
                continue;
            }
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                continue;
            }
            return Err(OwnerIdError::InvalidChar { ch, index });
        }
        Ok(())
    }
}

pub mod limits {
    pub const TITLE_MAX_UNITS: usize = 100;
    pub const DESCRIPTION_MAX_UNITS: usize = 500;
    pub const DISPLAY_NAME_MAX_UNITS: usize = 100;
    pub const BIO_MAX_UNITS: usize = 500;
}

pub mod model {
    use super::ids::OwnerId;
    use super::limits::{
        BIO_MAX_UNITS, DESCRIPTION_MAX_UNITS, DISPLAY_NAME_MAX_UNITS, TITLE_MAX_UNITS,
    };

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum MilestoneStatus {
        Pending,
        InProgress,
        Completed,
        Verified,
    }

    impl MilestoneStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                MilestoneStatus::Pending => "pending",
                MilestoneStatus::InProgress => "in_progress",
                MilestoneStatus::Completed => "completed",
                MilestoneStatus::Verified => "verified",
            }
        }

        pub fn as_ordinal(self) -> u8 {
            match self {
                MilestoneStatus::Pending => 0,
                MilestoneStatus::InProgress => 1,
                MilestoneStatus::Completed => 2,
                MilestoneStatus::Verified => 3,
            }
        }

        pub fn from_ordinal(value: u8) -> Option<Self> {
            match value {
                0 => Some(MilestoneStatus::Pending),
                1 => Some(MilestoneStatus::InProgress),
                2 => Some(MilestoneStatus::Completed),
                3 => Some(MilestoneStatus::Verified),
                _ => None,
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum ProfileVisibility {
        Public,
        Private,
    }

    impl ProfileVisibility {
        pub fn as_str(self) -> &'static str {
            match self {
                ProfileVisibility::Public => "public",
                ProfileVisibility::Private => "private",
            }
        }

        pub fn as_ordinal(self) -> u8 {
            match self {
                ProfileVisibility::Public => 0,
                ProfileVisibility::Private => 1,
            }
        }

        pub fn from_ordinal(value: u8) -> Option<Self> {
            match value {
                0 => Some(ProfileVisibility::Public),
                1 => Some(ProfileVisibility::Private),
                _ => None,
            }
        }
    }

    /// A per-owner milestone record. `owner` and `record_id` form the primary
    /// key; `record_id` values are assigned monotonically from 1 and never
    /// reused. Timestamps are ledger-clock readings, not wall-clock time.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Milestone {
        owner: OwnerId,
        record_id: u64,
        title: String,
        description: String,
        goal_id: Option<u64>,
        status: MilestoneStatus,
        progress: u64,
        target_date: u64,
        created_at: u64,
        updated_at: u64,
    }

    impl Milestone {
        #[allow(clippy::too_many_arguments)]
        pub fn try_new(
            owner: OwnerId,
            record_id: u64,
            title: impl Into<String>,
            description: impl Into<String>,
            goal_id: Option<u64>,
            status: MilestoneStatus,
            progress: u64,
            target_date: u64,
            created_at: u64,
            updated_at: u64,
        ) -> Result<Self, MilestoneError> {
            if record_id == 0 {
                return Err(MilestoneError::RecordIdZero);
            }
            let title = title.into();
            let description = description.into();
            validate_title(&title)?;
            validate_description(&description)?;
            Ok(Self {
                owner,
                record_id,
                title,
                description,
                goal_id,
                status,
                progress,
                target_date,
                created_at,
                updated_at,
            })
        }

        pub fn owner(&self) -> &OwnerId {
            &self.owner
        }

        pub fn record_id(&self) -> u64 {
            self.record_id
        }

        pub fn title(&self) -> &str {
            &self.title
        }

        pub fn description(&self) -> &str {
            &self.description
        }

        pub fn goal_id(&self) -> Option<u64> {
            self.goal_id
        }

        pub fn status(&self) -> MilestoneStatus {
            self.status
        }

        pub fn progress(&self) -> u64 {
            self.progress
        }

        pub fn target_date(&self) -> u64 {
            self.target_date
        }

        pub fn created_at(&self) -> u64 {
            self.created_at
        }

        pub fn updated_at(&self) -> u64 {
            self.updated_at
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum MilestoneError {
        RecordIdZero,
        TitleEmpty,
        TitleTooLong,
        DescriptionEmpty,
        DescriptionTooLong,
    }

    impl MilestoneError {
        pub fn message(self) -> &'static str {
            match self {
                MilestoneError::RecordIdZero => "record id must be positive",
                MilestoneError::TitleEmpty => "title must not be empty",
                MilestoneError::TitleTooLong => "title exceeds 100 code units",
                MilestoneError::DescriptionEmpty => "description must not be empty",
                MilestoneError::DescriptionTooLong => "description exceeds 500 code units",
            }
        }
    }

    /// One row per identity; visibility gates reads by anyone other than the
    /// owner. Unlike milestones, profiles can be deleted.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Profile {
        owner: OwnerId,
        display_name: String,
        bio: String,
        visibility: ProfileVisibility,
        created_at: u64,
        updated_at: u64,
    }

    impl Profile {
        pub fn try_new(
            owner: OwnerId,
            display_name: impl Into<String>,
            bio: impl Into<String>,
            visibility: ProfileVisibility,
            created_at: u64,
            updated_at: u64,
        ) -> Result<Self, ProfileError> {
            let display_name = display_name.into();
            let bio = bio.into();
            if display_name.chars().count() == 0 {
                return Err(ProfileError::DisplayNameEmpty);
            }
            if display_name.chars().count() > DISPLAY_NAME_MAX_UNITS {
                return Err(ProfileError::DisplayNameTooLong);
            }
            if bio.chars().count() > BIO_MAX_UNITS {
                return Err(ProfileError::BioTooLong);
            }
            Ok(Self {
                owner,
                display_name,
                bio,
                visibility,
                created_at,
                updated_at,
            })
        }

        pub fn owner(&self) -> &OwnerId {
            &self.owner
        }

        pub fn display_name(&self) -> &str {
            &self.display_name
        }

        pub fn bio(&self) -> &str {
            &self.bio
        }

        pub fn visibility(&self) -> ProfileVisibility {
            self.visibility
        }

        pub fn created_at(&self) -> u64 {
            self.created_at
        }

        pub fn updated_at(&self) -> u64 {
            self.updated_at
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum ProfileError {
        DisplayNameEmpty,
        DisplayNameTooLong,
        BioTooLong,
    }

    impl ProfileError {
        pub fn message(self) -> &'static str {
            match self {
                ProfileError::DisplayNameEmpty => "display name must not be empty",
                ProfileError::DisplayNameTooLong => "display name exceeds 100 code units",
                ProfileError::BioTooLong => "bio exceeds 500 code units",
            }
        }
    }

    // Field lengths are measured in Unicode scalar values, not bytes, so
    // multibyte text gets the same budget as ASCII.
    fn validate_title(value: &str) -> Result<(), MilestoneError> {
        let units = value.chars().count();
        if units == 0 {
            return Err(MilestoneError::TitleEmpty);
        }
        if units > TITLE_MAX_UNITS {
            return Err(MilestoneError::TitleTooLong);
        }
        Ok(())
    }

    fn validate_description(value: &str) -> Result<(), MilestoneError> {
        let units = value.chars().count();
        if units == 0 {
            return Err(MilestoneError::DescriptionEmpty);
        }
        if units > DESCRIPTION_MAX_UNITS {
            return Err(MilestoneError::DescriptionTooLong);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
