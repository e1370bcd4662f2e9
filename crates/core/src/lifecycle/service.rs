//! Lifecycle service for request state transitions.
//!
//! This module implements the pure state machine. It decides whether a
//! transition is allowed and what it must change; persisting the change
//! atomically is the store's job.

use chrono::{NaiveDate, Utc};
use furlough_shared::types::{EmployeeId, Location, RequestId};

use crate::blackout::BlackoutRegistry;
use crate::calendar::DateRange;
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::types::{LifecycleAction, RequestStatus, TimeOffRequest};

/// Everything an approval must apply in one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalPlan {
    /// The Pending → Approved transition.
    pub action: LifecycleAction,
    /// Employee whose balance is debited.
    pub employee_id: EmployeeId,
    /// Days to debit, recomputed from the stored dates.
    pub days: i32,
}

/// Stateless service for request lifecycle transitions.
pub struct LifecycleService;

impl LifecycleService {
    /// Validate a submission and build the new `Pending` request.
    ///
    /// The blackout check here is advisory: blackouts added later are
    /// caught again at approval time.
    ///
    /// # Errors
    /// * `Range` if `end < start`
    /// * `BlackoutConflict` if a blackout at `location` overlaps the dates
    pub fn plan_submission(
        employee_id: EmployeeId,
        location: Location,
        start: NaiveDate,
        end: NaiveDate,
        note: Option<String>,
        blackouts: &BlackoutRegistry<'_>,
    ) -> Result<TimeOffRequest, LifecycleError> {
        let range = DateRange::new(start, end)?;
        Self::check_blackouts(location, &range, blackouts)?;

        let now = Utc::now();
        Ok(TimeOffRequest {
            id: RequestId::new(),
            employee_id,
            location,
            start_date: range.start(),
            end_date: range.end(),
            days_requested: range.day_count(),
            note: note.filter(|n| !n.trim().is_empty()),
            status: RequestStatus::Pending,
            decided_by: None,
            decided_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Fails with `BlackoutConflict` if any blackout at `location` overlaps `range`.
    pub fn check_blackouts(
        location: Location,
        range: &DateRange,
        blackouts: &BlackoutRegistry<'_>,
    ) -> Result<(), LifecycleError> {
        match blackouts.first_conflict(location, range) {
            Some(conflict) => Err(LifecycleError::BlackoutConflict {
                blackout_id: conflict.id,
                start: conflict.range.start(),
                end: conflict.range.end(),
            }),
            None => Ok(()),
        }
    }

    /// Approve a pending request.
    ///
    /// # Arguments
    /// * `current_status` - The current status of the request
    /// * `decided_by` - The administrator approving the request
    ///
    /// # Returns
    /// * `Ok(LifecycleAction::Approve)` if the transition is valid
    /// * `Err(LifecycleError::InvalidTransition)` if not in Pending status
    pub fn approve(
        current_status: RequestStatus,
        decided_by: EmployeeId,
    ) -> Result<LifecycleAction, LifecycleError> {
        match current_status {
            RequestStatus::Pending => Ok(LifecycleAction::Approve {
                new_status: RequestStatus::Approved,
                decided_by,
                decided_at: Utc::now(),
            }),
            _ => Err(LifecycleError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Approved,
            }),
        }
    }

    /// Full approval check for a stored request.
    ///
    /// Runs the status check, re-validates blackouts against the current
    /// registry, and recomputes the day count from the stored dates so a
    /// stale `days_requested` is never trusted.
    pub fn plan_approval(
        request: &TimeOffRequest,
        decided_by: EmployeeId,
        blackouts: &BlackoutRegistry<'_>,
    ) -> Result<ApprovalPlan, LifecycleError> {
        let action = Self::approve(request.status, decided_by)?;
        let range = request.range()?;
        Self::check_blackouts(request.location, &range, blackouts)?;

        Ok(ApprovalPlan {
            action,
            employee_id: request.employee_id,
            days: range.day_count(),
        })
    }

    /// Deny a pending request.
    ///
    /// # Returns
    /// * `Ok(LifecycleAction::Deny)` if the transition is valid
    /// * `Err(LifecycleError::InvalidTransition)` if not in Pending status
    pub fn deny(
        current_status: RequestStatus,
        decided_by: EmployeeId,
    ) -> Result<LifecycleAction, LifecycleError> {
        match current_status {
            RequestStatus::Pending => Ok(LifecycleAction::Deny {
                new_status: RequestStatus::Denied,
                decided_by,
                decided_at: Utc::now(),
            }),
            _ => Err(LifecycleError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Denied,
            }),
        }
    }

    /// Cancel a pending request on behalf of the employee who submitted it.
    ///
    /// Approved requests cannot be cancelled here; reversing an approval is
    /// a ledger credit.
    ///
    /// # Returns
    /// * `Ok(LifecycleAction::Cancel)` if the transition is valid
    /// * `Err(LifecycleError::InvalidTransition)` if not in Pending status
    /// * `Err(LifecycleError::NotRequester)` if `cancelled_by` is not the requester
    pub fn cancel(
        request: &TimeOffRequest,
        cancelled_by: EmployeeId,
    ) -> Result<LifecycleAction, LifecycleError> {
        if request.status != RequestStatus::Pending {
            return Err(LifecycleError::InvalidTransition {
                from: request.status,
                to: RequestStatus::Cancelled,
            });
        }
        if request.employee_id != cancelled_by {
            return Err(LifecycleError::NotRequester {
                request_id: request.id,
                requester_id: cancelled_by,
            });
        }

        Ok(LifecycleAction::Cancel {
            new_status: RequestStatus::Cancelled,
            cancelled_by,
            cancelled_at: Utc::now(),
        })
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved (approve)
    /// - Pending → Denied (deny)
    /// - Pending → Cancelled (cancel)
    #[must_use]
    pub fn is_valid_transition(from: RequestStatus, to: RequestStatus) -> bool {
        matches!(
            (from, to),
            (
                RequestStatus::Pending,
                RequestStatus::Approved | RequestStatus::Denied | RequestStatus::Cancelled
            )
        )
    }
}
