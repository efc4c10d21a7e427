#![forbid(unsafe_code)]

use mp_core::model::{MilestoneStatus, ProfileVisibility};

/// Every mutating request carries `now`, the host-supplied ledger clock
/// reading for the call. The store never consults wall-clock time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MilestoneCreateRequest {
    pub title: String,
    pub description: String,
    pub goal_id: Option<u64>,
    pub target_date: u64,
    pub now: u64,
}

/// Patch semantics: `None` leaves a field untouched. `goal_id` is tri-state
/// so a goal association can be set, cleared, or left alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MilestoneUpdateRequest {
    pub record_id: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal_id: Option<Option<u64>>,
    pub status: Option<MilestoneStatus>,
    pub progress: Option<u64>,
    pub target_date: Option<u64>,
    pub now: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileSetRequest {
    pub display_name: String,
    pub bio: String,
    pub visibility: ProfileVisibility,
    pub now: u64,
}
