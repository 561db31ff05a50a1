//! Dealership registration lifecycle.
//!
//! ```text
//! (submit) --> pending --approve--> approved
//!                 |
//!                 +----reject----> rejected --resubmit--> pending
//! ```
//!
//! `approved` is terminal. A rejected registration is reused in place on the
//! next submission instead of creating a second row.

use crate::error::CoreError;
use crate::status::define_text_enum;
use crate::types::DbId;

define_text_enum! {
    /// Review status of a dealership registration.
    DealershipStatus ("dealership status") {
        Pending = "pending",
        Approved = "approved",
        Rejected = "rejected",
    }
}

define_text_enum! {
    /// Kind of business behind a registration.
    BusinessType ("business type") {
        Dealership = "dealership",
        ServiceCenter = "service_center",
        SparePartsDealership = "spare_parts_dealership",
        Showroom = "showroom",
    }
}

define_text_enum! {
    /// Whether the dealership is a brand-official agent or an independent one.
    DealershipType ("dealership type") {
        Official = "Official",
        Private = "Private",
    }
}

impl DealershipStatus {
    /// Whether a direct transition from `self` to `next` is allowed.
    pub fn can_transition_to(self, next: DealershipStatus) -> bool {
        use DealershipStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Rejected, Pending)
        )
    }

    /// Only approved dealerships may back a dashboard or a public showroom.
    pub fn is_live(self) -> bool {
        self == DealershipStatus::Approved
    }
}

/// Check a transition, returning [`CoreError::InvalidTransition`] if it is
/// not part of the lifecycle.
pub fn validate_transition(
    from: DealershipStatus,
    to: DealershipStatus,
) -> Result<(), CoreError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            entity: "dealership",
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// What a registration submission should do to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPlan {
    /// No prior registration: insert a fresh pending row.
    Insert,
    /// The latest registration was rejected: reset that row to pending.
    Resubmit { dealership_id: DbId },
}

/// Decide how to handle a registration given the caller's most recent row.
///
/// A pending or approved registration blocks a new submission.
pub fn plan_submission(
    latest: Option<(DbId, DealershipStatus)>,
) -> Result<SubmissionPlan, CoreError> {
    match latest {
        None => Ok(SubmissionPlan::Insert),
        Some((id, DealershipStatus::Rejected)) => {
            validate_transition(DealershipStatus::Rejected, DealershipStatus::Pending)?;
            Ok(SubmissionPlan::Resubmit { dealership_id: id })
        }
        Some((_, DealershipStatus::Pending)) => Err(CoreError::Conflict(
            "A dealership registration is already awaiting review".to_string(),
        )),
        Some((_, DealershipStatus::Approved)) => Err(CoreError::Conflict(
            "This account already has an approved dealership".to_string(),
        )),
    }
}

/// Decision an admin records on a pending registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn target_status(self) -> DealershipStatus {
        match self {
            ReviewDecision::Approve => DealershipStatus::Approved,
            ReviewDecision::Reject => DealershipStatus::Rejected,
        }
    }

    /// Notification type sent to the dealership owner.
    pub fn notification_type(self) -> &'static str {
        match self {
            ReviewDecision::Approve => crate::inbox::NOTIFICATION_DEALERSHIP_APPROVED,
            ReviewDecision::Reject => crate::inbox::NOTIFICATION_DEALERSHIP_REJECTED,
        }
    }

    /// Admin log action name.
    pub fn action(self) -> &'static str {
        match self {
            ReviewDecision::Approve => "approve_dealership",
            ReviewDecision::Reject => "reject_dealership",
        }
    }
}
