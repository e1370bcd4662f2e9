//! Property-based tests for LifecycleService.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use uuid::Uuid;

use furlough_shared::types::{EmployeeId, Location};

use crate::blackout::{BlackoutRange, BlackoutRegistry};
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::service::LifecycleService;
use crate::lifecycle::types::RequestStatus;

/// Strategy for generating random RequestStatus values.
fn arb_status() -> impl Strategy<Value = RequestStatus> {
    prop_oneof![
        Just(RequestStatus::Pending),
        Just(RequestStatus::Approved),
        Just(RequestStatus::Denied),
        Just(RequestStatus::Cancelled),
    ]
}

/// Strategy for generating random employee IDs.
fn arb_employee() -> impl Strategy<Value = EmployeeId> {
    any::<u128>().prop_map(|n| EmployeeId::from_uuid(Uuid::from_u128(n)))
}

fn arb_location() -> impl Strategy<Value = Location> {
    prop_oneof![
        Just(Location::CompanyA),
        Just(Location::CompanyB),
        Just(Location::CompanyC),
    ]
}

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(offset))
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Approve succeeds exactly from Pending and never from a terminal status.
    #[test]
    fn prop_approve_only_from_pending(status in arb_status(), decider in arb_employee()) {
        let result = LifecycleService::approve(status, decider);
        if status == RequestStatus::Pending {
            prop_assert_eq!(result.unwrap().new_status(), RequestStatus::Approved);
        } else {
            let is_invalid = matches!(result, Err(LifecycleError::InvalidTransition { .. }));
            prop_assert!(is_invalid);
        }
    }

    /// Deny succeeds exactly from Pending.
    #[test]
    fn prop_deny_only_from_pending(status in arb_status(), decider in arb_employee()) {
        let result = LifecycleService::deny(status, decider);
        prop_assert_eq!(result.is_ok(), status == RequestStatus::Pending);
    }

    /// The transition table agrees with the transition functions.
    #[test]
    fn prop_transition_table_matches(status in arb_status(), decider in arb_employee()) {
        prop_assert_eq!(
            LifecycleService::is_valid_transition(status, RequestStatus::Approved),
            LifecycleService::approve(status, decider).is_ok()
        );
        prop_assert_eq!(
            LifecycleService::is_valid_transition(status, RequestStatus::Denied),
            LifecycleService::deny(status, decider).is_ok()
        );
        prop_assert!(!LifecycleService::is_valid_transition(status, RequestStatus::Pending));
    }

    /// A submission succeeds iff no blackout at the same location overlaps,
    /// and then its day count is the inclusive length of the range.
    #[test]
    fn prop_submission_respects_blackouts(
        employee in arb_employee(),
        location in arb_location(),
        blackout_location in arb_location(),
        start in 0u64..300,
        len in 0u64..20,
        b_start in 0u64..300,
        b_len in 0u64..20,
    ) {
        let blackouts = vec![
            BlackoutRange::new(blackout_location, day(b_start), day(b_start + b_len), None).unwrap(),
        ];
        let registry = BlackoutRegistry::new(&blackouts);
        let result = LifecycleService::plan_submission(
            employee, location, day(start), day(start + len), None, &registry,
        );

        let overlaps = location == blackout_location
            && start <= b_start + b_len
            && b_start <= start + len;

        match result {
            Ok(request) => {
                prop_assert!(!overlaps);
                prop_assert_eq!(i64::from(request.days_requested), i64::try_from(len).unwrap() + 1);
                prop_assert_eq!(request.status, RequestStatus::Pending);
            }
            Err(LifecycleError::BlackoutConflict { .. }) => prop_assert!(overlaps),
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }
}
