//! Debit and credit rules.

use furlough_shared::LedgerConfig;
use furlough_shared::types::RequestId;

use super::error::LedgerError;

/// Floor policy applied to debits.
///
/// With the defaults a debit may not take the balance below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerPolicy {
    /// Skip the floor check entirely.
    pub allow_negative: bool,
    /// Lowest balance a debit may leave behind.
    pub floor: i32,
}

impl From<LedgerConfig> for LedgerPolicy {
    fn from(config: LedgerConfig) -> Self {
        Self {
            allow_negative: config.allow_negative,
            floor: config.floor,
        }
    }
}

impl LedgerPolicy {
    /// Policy that never rejects a debit for lack of balance.
    #[must_use]
    pub const fn overdraft() -> Self {
        Self {
            allow_negative: true,
            floor: 0,
        }
    }

    /// Smallest balance from which a debit of `amount` may proceed.
    ///
    /// `None` means any balance is acceptable. The store uses this as the
    /// predicate of its conditional update so the check and the write are
    /// one statement.
    pub fn debit_threshold(&self, amount: i32) -> Result<Option<i32>, LedgerError> {
        ensure_positive(amount)?;
        if self.allow_negative {
            return Ok(None);
        }
        amount
            .checked_add(self.floor)
            .map(Some)
            .ok_or(LedgerError::Overflow)
    }

    /// Validates a debit against the current balance and returns the new one.
    pub fn check_debit(&self, remaining: i32, amount: i32) -> Result<i32, LedgerError> {
        if let Some(threshold) = self.debit_threshold(amount)?
            && remaining < threshold
        {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                remaining,
            });
        }
        remaining.checked_sub(amount).ok_or(LedgerError::Overflow)
    }

    /// Validates a credit reversing the debit recorded for `cause`.
    ///
    /// `prior_debit` is the amount of the earlier debit, `already_credited`
    /// whether a credit for the same cause exists.
    pub fn check_credit(
        cause: RequestId,
        amount: i32,
        prior_debit: Option<i32>,
        already_credited: bool,
    ) -> Result<(), LedgerError> {
        ensure_positive(amount)?;
        let debited = prior_debit.ok_or(LedgerError::NoPriorDebit(cause))?;
        if already_credited {
            return Err(LedgerError::AlreadyCredited(cause));
        }
        if debited != amount {
            return Err(LedgerError::CreditMismatch {
                debited,
                requested: amount,
            });
        }
        Ok(())
    }
}

fn ensure_positive(amount: i32) -> Result<(), LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::NonPositiveAmount(amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10, 3, Ok(7))]
    #[case(3, 3, Ok(0))]
    #[case(2, 3, Err(LedgerError::InsufficientBalance { requested: 3, remaining: 2 }))]
    #[case(-1, 1, Err(LedgerError::InsufficientBalance { requested: 1, remaining: -1 }))]
    #[case(5, 0, Err(LedgerError::NonPositiveAmount(0)))]
    #[case(5, -2, Err(LedgerError::NonPositiveAmount(-2)))]
    fn test_default_policy_debit(
        #[case] remaining: i32,
        #[case] amount: i32,
        #[case] expected: Result<i32, LedgerError>,
    ) {
        assert_eq!(LedgerPolicy::default().check_debit(remaining, amount), expected);
    }

    #[test]
    fn test_overdraft_policy_allows_negative() {
        let policy = LedgerPolicy::overdraft();
        assert_eq!(policy.check_debit(1, 4), Ok(-3));
        assert_eq!(policy.debit_threshold(4), Ok(None));
    }

    #[test]
    fn test_custom_floor() {
        let policy = LedgerPolicy {
            allow_negative: false,
            floor: -2,
        };
        assert_eq!(policy.check_debit(1, 3), Ok(-2));
        assert!(matches!(
            policy.check_debit(1, 4),
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(policy.debit_threshold(3), Ok(Some(1)));
    }

    #[test]
    fn test_from_config() {
        let config = LedgerConfig {
            allow_negative: true,
            floor: 3,
        };
        let policy = LedgerPolicy::from(config);
        assert!(policy.allow_negative);
        assert_eq!(policy.floor, 3);
    }

    #[test]
    fn test_threshold_overflow() {
        let policy = LedgerPolicy {
            allow_negative: false,
            floor: i32::MAX,
        };
        assert_eq!(policy.debit_threshold(1), Err(LedgerError::Overflow));
    }

    #[test]
    fn test_credit_requires_prior_debit() {
        let cause = RequestId::new();
        assert_eq!(
            LedgerPolicy::check_credit(cause, 3, None, false),
            Err(LedgerError::NoPriorDebit(cause))
        );
    }

    #[test]
    fn test_credit_never_doubles() {
        let cause = RequestId::new();
        assert_eq!(
            LedgerPolicy::check_credit(cause, 3, Some(3), true),
            Err(LedgerError::AlreadyCredited(cause))
        );
    }

    #[test]
    fn test_credit_must_match_debit() {
        let cause = RequestId::new();
        assert_eq!(
            LedgerPolicy::check_credit(cause, 2, Some(3), false),
            Err(LedgerError::CreditMismatch {
                debited: 3,
                requested: 2
            })
        );
        assert_eq!(LedgerPolicy::check_credit(cause, 3, Some(3), false), Ok(()));
    }
}
