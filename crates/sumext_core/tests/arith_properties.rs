use sumext_core::{checked_sum, sum};

const SAMPLES: [i64; 11] = [
    i64::MIN,
    i64::MIN + 1,
    -4_294_967_296,
    -1_000,
    -1,
    0,
    1,
    2,
    4_294_967_295,
    i64::MAX - 1,
    i64::MAX,
];

#[test]
fn sum_matches_wide_addition_for_every_sample_pair() {
    for a in SAMPLES {
        for b in SAMPLES {
            assert_eq!(sum(a, b), i128::from(a) + i128::from(b), "sum({a}, {b})");
        }
    }
}

#[test]
fn checked_sum_agrees_with_sum_whenever_it_fits() {
    for a in SAMPLES {
        for b in SAMPLES {
            let wide = sum(a, b);
            match checked_sum(a, b) {
                Some(total) => assert_eq!(i128::from(total), wide, "checked_sum({a}, {b})"),
                None => assert!(i64::try_from(wide).is_err(), "checked_sum({a}, {b}) overflowed"),
            }
        }
    }
}

#[test]
fn sum_is_commutative() {
    for a in SAMPLES {
        for b in SAMPLES {
            assert_eq!(sum(a, b), sum(b, a));
        }
    }
}
