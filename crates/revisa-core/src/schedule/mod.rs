//! Schedule Module
//!
//! Hour-offset revision schedules.
//!
//! A schedule policy is an ordered table of hour offsets indexed by revision
//! number plus a user-chosen cap on how many revisions get scheduled at all.
//! Once the next index falls off the table or reaches the cap, the entity is
//! considered mastered and nothing further is scheduled.
//!
//! ## Core Formula:
//! - next_due = last_event + table[next_index] hours, if next_index < min(len(table), target_count)

mod calculator;
mod policy;

pub use calculator::{next_due, next_index_after};

pub use policy::{
    BatchFailurePolicy, PartialRevisionSettings, RevisionSettings, ScheduleMode, SchedulePolicy,
    BALANCED_HOURS, DEFAULT_MODE, DEFAULT_TARGET_COUNT, INTENSIVE_HOURS, RELAXED_HOURS,
};
