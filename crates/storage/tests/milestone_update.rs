use mp_core::ids::OwnerId;
use mp_core::model::MilestoneStatus;
use mp_storage::{MilestoneCreateRequest, MilestoneUpdateRequest, SqliteStore, StoreError};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_storage_dir(label: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic enough for tests")
        .as_nanos();
    path.push(format!(
        "mp-storage-update-{label}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&path).expect("temp storage dir must be creatable");
    path
}

fn owner(value: &str) -> OwnerId {
    OwnerId::try_new(value).expect("owner id")
}

fn create(store: &mut SqliteStore, owner: &OwnerId, goal_id: Option<u64>, now: u64) -> u64 {
    store
        .milestone_create(
            owner,
            MilestoneCreateRequest {
                title: "Original title".to_string(),
                description: "Original description.".to_string(),
                goal_id,
                target_date: now + 1000,
                now,
            },
        )
        .expect("create should succeed")
}

fn empty_patch(record_id: u64, now: u64) -> MilestoneUpdateRequest {
    MilestoneUpdateRequest {
        record_id,
        title: None,
        description: None,
        goal_id: None,
        status: None,
        progress: None,
        target_date: None,
        now,
    }
}

#[test]
fn partial_update_replaces_only_supplied_fields() {
    let dir = temp_storage_dir("partial");
    let mut store = SqliteStore::open(&dir).expect("fresh storage should open");
    let alice = owner("alice");
    let id = create(&mut store, &alice, None, 10);

    store
        .milestone_update(
            &alice,
            MilestoneUpdateRequest {
                record_id: id,
                title: Some("Revised title".to_string()),
                progress: Some(40),
                ..empty_patch(id, 20)
            },
        )
        .expect("update should succeed");

    let milestone = store
        .milestone_get(&alice, id)
        .expect("get should succeed")
        .expect("milestone must exist");

    assert_eq!(milestone.title(), "Revised title");
    assert_eq!(milestone.description(), "Original description.");
    assert_eq!(milestone.progress(), 40);
    assert_eq!(milestone.status(), MilestoneStatus::Pending);
    assert_eq!(milestone.target_date(), 1010);
    assert_eq!(milestone.created_at(), 10);
    assert_eq!(milestone.updated_at(), 20);
}

#[test]
fn empty_patch_still_refreshes_updated_at() {
    let dir = temp_storage_dir("empty-patch");
    let mut store = SqliteStore::open(&dir).expect("fresh storage should open");
    let alice = owner("alice");
    let id = create(&mut store, &alice, Some(3), 10);

    store
        .milestone_update(&alice, empty_patch(id, 42))
        .expect("empty patch is valid");

    let milestone = store
        .milestone_get(&alice, id)
        .expect("get should succeed")
        .expect("milestone must exist");

    assert_eq!(milestone.title(), "Original title");
    assert_eq!(milestone.description(), "Original description.");
    assert_eq!(milestone.goal_id(), Some(3));
    assert_eq!(milestone.progress(), 0);
    assert_eq!(milestone.created_at(), 10);
    assert_eq!(milestone.updated_at(), 42);
}

#[test]
fn status_may_be_written_in_any_order() {
    let dir = temp_storage_dir("status-order");
    let mut store = SqliteStore::open(&dir).expect("fresh storage should open");
    let alice = owner("alice");
    let id = create(&mut store, &alice, None, 10);

    // No transition order is enforced: Pending straight to Verified is fine.
    store
        .milestone_update(
            &alice,
            MilestoneUpdateRequest {
                status: Some(MilestoneStatus::Verified),
                ..empty_patch(id, 11)
            },
        )
        .expect("status update should succeed");

    let milestone = store
        .milestone_get(&alice, id)
        .expect("get should succeed")
        .expect("milestone must exist");
    assert_eq!(milestone.status(), MilestoneStatus::Verified);
}

#[test]
fn goal_reassignment_moves_the_membership_row() {
    let dir = temp_storage_dir("goal-move");
    let mut store = SqliteStore::open(&dir).expect("fresh storage should open");
    let alice = owner("alice");
    let id = create(&mut store, &alice, Some(1), 10);

    store
        .milestone_update(
            &alice,
            MilestoneUpdateRequest {
                goal_id: Some(Some(2)),
                ..empty_patch(id, 11)
            },
        )
        .expect("goal reassignment should succeed");

    assert!(!store.goal_member_exists(&alice, 1, id).expect("probe g1"));
    assert!(store.goal_member_exists(&alice, 2, id).expect("probe g2"));
    let milestone = store
        .milestone_get(&alice, id)
        .expect("get should succeed")
        .expect("milestone must exist");
    assert_eq!(milestone.goal_id(), Some(2));
}

#[test]
fn clearing_and_setting_the_goal_maintain_the_index() {
    let dir = temp_storage_dir("goal-clear-set");
    let mut store = SqliteStore::open(&dir).expect("fresh storage should open");
    let alice = owner("alice");
    let id = create(&mut store, &alice, Some(5), 10);

    store
        .milestone_update(
            &alice,
            MilestoneUpdateRequest {
                goal_id: Some(None),
                ..empty_patch(id, 11)
            },
        )
        .expect("clearing the goal should succeed");
    assert!(!store.goal_member_exists(&alice, 5, id).expect("probe g5"));
    assert_eq!(
        store
            .milestone_get(&alice, id)
            .expect("get")
            .expect("exists")
            .goal_id(),
        None
    );

    store
        .milestone_update(
            &alice,
            MilestoneUpdateRequest {
                goal_id: Some(Some(9)),
                ..empty_patch(id, 12)
            },
        )
        .expect("setting a goal should succeed");
    assert!(store.goal_member_exists(&alice, 9, id).expect("probe g9"));
}

#[test]
fn update_of_a_missing_record_is_not_found() {
    let dir = temp_storage_dir("missing");
    let mut store = SqliteStore::open(&dir).expect("fresh storage should open");
    let alice = owner("alice");

    let err = store
        .milestone_update(&alice, empty_patch(1, 10))
        .expect_err("missing record must fail");
    assert!(matches!(err, StoreError::NotFound));
    assert_eq!(store.milestone_count(&alice).expect("count"), 0);
}

#[test]
fn records_are_invisible_to_updates_from_other_owners() {
    let dir = temp_storage_dir("foreign-owner");
    let mut store = SqliteStore::open(&dir).expect("fresh storage should open");
    let alice = owner("alice");
    let mallory = owner("mallory");
    let id = create(&mut store, &alice, None, 10);

    // Lookup is keyed by the caller, so another owner's id resolves to
    // nothing rather than to alice's record.
    let err = store
        .milestone_update(
            &mallory,
            MilestoneUpdateRequest {
                title: Some("Hijacked".to_string()),
                ..empty_patch(id, 11)
            },
        )
        .expect_err("foreign update must fail");
    assert!(matches!(err, StoreError::NotFound));

    let milestone = store
        .milestone_get(&alice, id)
        .expect("get should succeed")
        .expect("milestone must exist");
    assert_eq!(milestone.title(), "Original title");
}

#[test]
fn invalid_patch_leaves_the_record_byte_for_byte_unchanged() {
    let dir = temp_storage_dir("invalid-patch");
    let mut store = SqliteStore::open(&dir).expect("fresh storage should open");
    let alice = owner("alice");
    let id = create(&mut store, &alice, Some(4), 10);

    let err = store
        .milestone_update(
            &alice,
            MilestoneUpdateRequest {
                title: Some(String::new()),
                goal_id: Some(Some(8)),
                ..empty_patch(id, 99)
            },
        )
        .expect_err("empty title must fail");
    assert_eq!(err.code(), "INVALID_INPUT");

    let milestone = store
        .milestone_get(&alice, id)
        .expect("get should succeed")
        .expect("milestone must exist");
    assert_eq!(milestone.title(), "Original title");
    assert_eq!(milestone.goal_id(), Some(4));
    assert_eq!(
        milestone.updated_at(),
        10,
        "a rejected patch must not refresh updated_at"
    );
    assert!(
        store.goal_member_exists(&alice, 4, id).expect("probe g4"),
        "a rejected patch must not touch the membership index"
    );
    assert!(!store.goal_member_exists(&alice, 8, id).expect("probe g8"));
}
