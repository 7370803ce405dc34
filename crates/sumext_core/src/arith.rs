//! Integer addition behind the exported `sum` function.
//!
//! # Invariants
//! - `sum` is exact for every pair of `i64` operands.
//! - `checked_sum` returns `None` only when the result leaves `i64`.

/// Adds two operands, returning `None` when the result overflows `i64`.
///
/// The extension uses this as its fast path and widens through the host
/// runtime's big integers when it returns `None`.
pub fn checked_sum(a: i64, b: i64) -> Option<i64> {
    a.checked_add(b)
}

/// Exact sum of two `i64` operands.
pub fn sum(a: i64, b: i64) -> i128 {
    i128::from(a) + i128::from(b)
}

#[cfg(test)]
mod tests {
    use super::{checked_sum, sum};

    #[test]
    fn adds_small_operands() {
        assert_eq!(checked_sum(2, 3), Some(5));
        assert_eq!(checked_sum(-1, 1), Some(0));
        assert_eq!(sum(0, 0), 0);
    }

    #[test]
    fn checked_sum_reports_overflow() {
        assert_eq!(checked_sum(i64::MAX, 1), None);
        assert_eq!(checked_sum(i64::MIN, -1), None);
        assert_eq!(checked_sum(i64::MAX, i64::MIN), Some(-1));
    }

    #[test]
    fn sum_is_exact_past_i64_bounds() {
        assert_eq!(sum(i64::MAX, 1), i128::from(i64::MAX) + 1);
        assert_eq!(sum(i64::MIN, i64::MIN), -(1_i128 << 64));
    }
}
