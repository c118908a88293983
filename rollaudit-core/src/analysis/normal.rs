//! Standard normal tail probability

/// One-sided upper tail `P(Z >= |z|)` of the standard normal distribution.
///
/// Uses the Abramowitz & Stegun 7.1.26 rational approximation of `erfc`,
/// accurate to about 1.5e-7 absolute. The result is always in `[0, 0.5]`.
#[must_use]
pub fn upper_tail(z: f64) -> f64 {
    0.5 * erfc(z.abs() / std::f64::consts::SQRT_2)
}

/// Complementary error function for `x >= 0`.
fn erfc(x: f64) -> f64 {
    const P: f64 = 0.327_591_1;
    const A: [f64; 5] = [
        0.254_829_592,
        -0.284_496_736,
        1.421_413_741,
        -1.453_152_027,
        1.061_405_429,
    ];

    let t = 1.0 / P.mul_add(x, 1.0);
    let poly = A.iter().rev().fold(0.0_f64, |acc, a| acc.mul_add(t, *a)) * t;
    (poly * (-x * x).exp()).clamp(0.0, 1.0)
}
