//! Property-based tests for the ledger policy.

use proptest::prelude::*;

use super::error::LedgerError;
use super::policy::LedgerPolicy;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A successful debit lowers the balance by exactly the amount.
    #[test]
    fn prop_debit_subtracts_exact_amount(remaining in 0i32..1000, amount in 1i32..1000) {
        match LedgerPolicy::default().check_debit(remaining, amount) {
            Ok(after) => {
                prop_assert_eq!(after, remaining - amount);
                prop_assert!(after >= 0);
            }
            Err(LedgerError::InsufficientBalance { requested, remaining: seen }) => {
                prop_assert!(amount > remaining);
                prop_assert_eq!(requested, amount);
                prop_assert_eq!(seen, remaining);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    /// The default policy never produces a negative balance.
    #[test]
    fn prop_default_floor_never_negative(remaining in -50i32..1000, amount in 1i32..1000) {
        if let Ok(after) = LedgerPolicy::default().check_debit(remaining, amount) {
            prop_assert!(after >= 0);
        }
    }

    /// The threshold predicate agrees with the in-memory check.
    #[test]
    fn prop_threshold_agrees_with_check(
        remaining in -100i32..100,
        amount in 1i32..100,
        floor in -20i32..20,
    ) {
        let policy = LedgerPolicy { allow_negative: false, floor };
        let threshold = policy.debit_threshold(amount).unwrap().unwrap();
        prop_assert_eq!(remaining >= threshold, policy.check_debit(remaining, amount).is_ok());
    }
}
