/// This macro allows comparing float slices using [float_cmp::approx_eq].
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr $(,)?) => ({
        if !$crate::util::helpers::approx_eq_floats($left, $right) {
            panic!(r#"assertion failed: `(left == right)`
            left: `{:?}`,
           right: `{:?}`"#, $left, $right)
        }
    });
    ($left:expr, $right:expr, $($arg:tt)+) => ({
        if !$crate::util::helpers::approx_eq_floats($left, $right) {
            panic!(r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`: {}"#, $left, $right,
                           format_args!($($arg)+))
        }
    });
}

#[must_use]
pub fn approx_eq_floats(left: &[f64], right: &[f64]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    for (&l, &r) in left.iter().zip(right) {
        if !float_cmp::approx_eq!(f64, l, r) {
            return false;
        }
    }

    true
}

/// The smallest `i` with `start + i * step >= stop`, i.e., the index of the first element of
/// `start, start + step, ..` that reaches `stop`.
///
/// The elements are computed as `start + i * step`, so that the result agrees with callers placing
/// values this way. The result is a float so that callers can check it against a limit before
/// converting it to an index type. `step` must be positive and finite.
#[must_use]
pub fn steps_to_reach(start: f64, stop: f64, step: f64) -> f64 {
    let mut steps = ((stop - start) / step).ceil().max(0.);

    // the quotient may be off by one ulp in either direction
    if steps > 0. && start + (steps - 1.) * step >= stop {
        steps -= 1.;
    }
    if start + steps * step < stop {
        steps += 1.;
    }

    steps
}
