#![forbid(unsafe_code)]

use crate::ids::{OwnerId, OwnerIdError};
use crate::model::{
    Milestone, MilestoneError, MilestoneStatus, Profile, ProfileError, ProfileVisibility,
};

fn owner(value: &str) -> OwnerId {
    OwnerId::try_new(value).expect("owner id")
}

#[test]
fn owner_id_accepts_typical_handles() {
    for value in ["alice", "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7", "node-7.sub_id"] {
        assert!(OwnerId::try_new(value).is_ok(), "rejected {value}");
    }
}

#[test]
fn owner_id_rejects_malformed_handles() {
    assert_eq!(OwnerId::try_new(""), Err(OwnerIdError::Empty));
    assert_eq!(
        OwnerId::try_new("a".repeat(129)),
        Err(OwnerIdError::TooLong)
    );
    assert_eq!(
        OwnerId::try_new("-leading"),
        Err(OwnerIdError::InvalidFirstChar)
    );
    assert_eq!(
        OwnerId::try_new("has space"),
        Err(OwnerIdError::InvalidChar { ch: ' ', index: 3 })
    );
}

#[test]
fn status_ordinals_round_trip() {
    for status in [
        MilestoneStatus::Pending,
        MilestoneStatus::InProgress,
        MilestoneStatus::Completed,
        MilestoneStatus::Verified,
    ] {
        assert_eq!(MilestoneStatus::from_ordinal(status.as_ordinal()), Some(status));
    }
    assert_eq!(MilestoneStatus::from_ordinal(4), None);
}

#[test]
fn visibility_ordinals_round_trip() {
    for visibility in [ProfileVisibility::Public, ProfileVisibility::Private] {
        assert_eq!(
            ProfileVisibility::from_ordinal(visibility.as_ordinal()),
            Some(visibility)
        );
    }
    assert_eq!(ProfileVisibility::from_ordinal(2), None);
}

#[test]
fn milestone_enforces_text_bounds() {
    let make = |title: String, description: String| {
        Milestone::try_new(
            owner("alice"),
            1,
            title,
            description,
            None,
            MilestoneStatus::Pending,
            0,
            100,
            10,
            10,
        )
    };

    assert!(make("T".repeat(100), "D".to_string()).is_ok());
    // Multibyte scalars count as one unit each.
    assert!(make("🦀".repeat(100), "D".to_string()).is_ok());
    assert_eq!(
        make("T".repeat(101), "D".to_string()),
        Err(MilestoneError::TitleTooLong)
    );
    assert_eq!(
        make(String::new(), "D".to_string()),
        Err(MilestoneError::TitleEmpty)
    );
    assert!(make("T".to_string(), "D".repeat(500)).is_ok());
    assert_eq!(
        make("T".to_string(), "D".repeat(501)),
        Err(MilestoneError::DescriptionTooLong)
    );
    assert_eq!(
        make("T".to_string(), String::new()),
        Err(MilestoneError::DescriptionEmpty)
    );
}

#[test]
fn milestone_rejects_zero_record_id() {
    let result = Milestone::try_new(
        owner("alice"),
        0,
        "T",
        "D",
        None,
        MilestoneStatus::Pending,
        0,
        100,
        10,
        10,
    );
    assert_eq!(result, Err(MilestoneError::RecordIdZero));
}

#[test]
fn milestone_progress_is_not_range_checked() {
    // Permissive by contract: the store trusts the caller for this field.
    let milestone = Milestone::try_new(
        owner("alice"),
        1,
        "T",
        "D",
        None,
        MilestoneStatus::Pending,
        100_000,
        100,
        10,
        10,
    )
    .expect("milestone");
    assert_eq!(milestone.progress(), 100_000);
}

#[test]
fn profile_enforces_text_bounds() {
    let make = |name: String, bio: String| {
        Profile::try_new(owner("alice"), name, bio, ProfileVisibility::Public, 5, 5)
    };

    assert!(make("A".repeat(100), String::new()).is_ok());
    assert_eq!(
        make("A".repeat(101), String::new()),
        Err(ProfileError::DisplayNameTooLong)
    );
    assert_eq!(
        make(String::new(), String::new()),
        Err(ProfileError::DisplayNameEmpty)
    );
    assert!(make("A".to_string(), "b".repeat(500)).is_ok());
    assert_eq!(
        make("A".to_string(), "b".repeat(501)),
        Err(ProfileError::BioTooLong)
    );
}
