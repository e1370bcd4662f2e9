//! Property-based tests for date ranges.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use crate::calendar::range::{DateRange, RangeError, export_end_exclusive, inclusive_day_count};

/// Strategy for dates between 2000-01-01 and roughly 2100.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..36_500).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

/// Strategy for valid ranges.
fn arb_range() -> impl Strategy<Value = DateRange> {
    (arb_date(), 0u64..400).prop_map(|(start, len)| {
        DateRange::new(start, start.checked_add_days(Days::new(len)).unwrap()).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The day count equals the number of dates produced by walking the range.
    #[test]
    fn prop_day_count_matches_iteration(range in arb_range()) {
        let walked = range.start().iter_days().take_while(|d| *d <= range.end()).count();
        prop_assert_eq!(range.day_count() as usize, walked);
        prop_assert_eq!(inclusive_day_count(range.start(), range.end()), Ok(range.day_count()));
    }

    /// Reversed ranges are always rejected.
    #[test]
    fn prop_reversed_range_rejected(start in arb_date(), back in 1u64..400) {
        let end = start.checked_sub_days(Days::new(back)).unwrap();
        prop_assert_eq!(
            inclusive_day_count(start, end),
            Err(RangeError::InvalidRange { start, end })
        );
    }

    /// Overlap is symmetric.
    #[test]
    fn prop_overlap_is_symmetric(a in arb_range(), b in arb_range()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    /// Overlap holds exactly when some day lies in both ranges.
    #[test]
    fn prop_overlap_means_shared_day(a in arb_range(), b in arb_range()) {
        let shared = a.start().max(b.start()) <= a.end().min(b.end());
        prop_assert_eq!(a.overlaps(&b), shared);
    }

    /// The exclusive end is always the next calendar day.
    #[test]
    fn prop_end_exclusive_is_next_day(end in arb_date()) {
        let exclusive = export_end_exclusive(end).unwrap();
        prop_assert_eq!((exclusive - end).num_days(), 1);
        prop_assert_eq!(exclusive.pred_opt(), Some(end));
    }
}
