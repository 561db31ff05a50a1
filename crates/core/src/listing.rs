//! Car listing lifecycle and the public visibility gate.
//!
//! A listing carries its own status independent of the owning dealership.
//! It is publicly visible only when both gates pass; see
//! [`is_publicly_visible`].

use serde::Serialize;

use crate::dealership::DealershipStatus;
use crate::error::CoreError;
use crate::status::define_text_enum;

define_text_enum! {
    /// Review / sale status of a car listing.
    CarStatus ("car status") {
        Pending = "Pending",
        Approved = "Approved",
        Rejected = "Rejected",
        Sold = "Sold",
    }
}

impl CarStatus {
    /// Whether a direct transition from `self` to `next` is allowed.
    ///
    /// Approved and Rejected listings drop back to Pending when their owner
    /// edits them. Sold is terminal.
    pub fn can_transition_to(self, next: CarStatus) -> bool {
        use CarStatus::*;
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Rejected)
                | (Approved, Sold)
                | (Approved, Pending)
                | (Rejected, Pending)
        )
    }
}

/// Check a transition, returning [`CoreError::InvalidTransition`] if it is
/// not part of the lifecycle.
pub fn validate_transition(from: CarStatus, to: CarStatus) -> Result<(), CoreError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            entity: "car",
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// The approval gate for anything shown to the public.
///
/// `dealership` is `None` for individual-seller listings.
pub fn is_publicly_visible(car: CarStatus, dealership: Option<DealershipStatus>) -> bool {
    car == CarStatus::Approved && dealership.map_or(true, DealershipStatus::is_live)
}

/// Outcome of an owner edit on an existing listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// Status the listing ends up in after the edit.
    pub status: CarStatus,
    /// Whether the owner gets a `status_change` notification.
    pub notify_owner: bool,
}

/// Apply the re-approval policy to an owner edit.
///
/// Any edit of an Approved listing sends it back to review and notifies the
/// owner, whether the listing belongs to a dealership or an individual.
/// Editing a Rejected listing resubmits it silently. Sold listings are
/// frozen.
pub fn plan_owner_edit(current: CarStatus) -> Result<EditOutcome, CoreError> {
    match current {
        CarStatus::Pending => Ok(EditOutcome {
            status: CarStatus::Pending,
            notify_owner: false,
        }),
        CarStatus::Approved => Ok(EditOutcome {
            status: CarStatus::Pending,
            notify_owner: true,
        }),
        CarStatus::Rejected => Ok(EditOutcome {
            status: CarStatus::Pending,
            notify_owner: false,
        }),
        CarStatus::Sold => Err(CoreError::Conflict(
            "Sold listings can no longer be edited".to_string(),
        )),
    }
}

/// Per-status listing counts shown on the dealer dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub sold: i64,
    pub total_views: i64,
}

impl StatusCounts {
    /// Aggregate `(status, views)` pairs.
    pub fn tally<I>(listings: I) -> Self
    where
        I: IntoIterator<Item = (CarStatus, i64)>,
    {
        listings
            .into_iter()
            .fold(StatusCounts::default(), |mut acc, (status, views)| {
                acc.total += 1;
                acc.total_views += views;
                match status {
                    CarStatus::Pending => acc.pending += 1,
                    CarStatus::Approved => acc.approved += 1,
                    CarStatus::Rejected => acc.rejected += 1,
                    CarStatus::Sold => acc.sold += 1,
                }
                acc
            })
    }
}
