//! Quadratic equation solver.

use crate::error::CoreError;

/// Parses a user-supplied coefficient.
///
/// This is the text boundary of the solver: anything that does not read as
/// a number is a [`CoreError::TypeMismatch`], before any math happens.
pub fn parse_coefficient(raw: &str) -> Result<f64, CoreError> {
    raw.trim().parse::<f64>().map_err(|_| {
        CoreError::TypeMismatch(format!("coefficient '{raw}' is not numeric"))
    })
}

/// Real roots of `a*x^2 + b*x + c = 0`.
///
/// `x1` takes the `+sqrt(d)` branch and `x2` the `-sqrt(d)` branch; a zero
/// discriminant yields the repeated root `x1 == x2`. Coefficients must be
/// finite and `a` non-zero, and the discriminant non-negative.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Result<(f64, f64), CoreError> {
    for value in [a, b, c] {
        if !value.is_finite() {
            return Err(CoreError::TypeMismatch(
                "coefficients must be finite numbers".into(),
            ));
        }
    }

    if a == 0.0 {
        return Err(CoreError::InvalidArgument(
            "leading coefficient must be non-zero".into(),
        ));
    }

    let d = b * b - 4.0 * a * c;
    if d < 0.0 {
        return Err(CoreError::InvalidArgument(
            "discriminant is negative, no real roots".into(),
        ));
    }

    let sqrt_d = d.sqrt();
    let x1 = (-b + sqrt_d) / (2.0 * a);
    let x2 = (-b - sqrt_d) / (2.0 * a);
    Ok((x1, x2))
}
