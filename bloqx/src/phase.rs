//! Rotation angles encoded as an exact rational number of half-turns.

use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use num::complex::Complex64;
use num::{FromPrimitive, One, Rational64, ToPrimitive, Zero};

/// An angle, expressed in half-turns and encoded as a rational number.
///
/// Half-turns keep the common gate angles exact: `1` is a Pauli-Z angle,
/// `1/2` an S angle and `1/4` a T angle. The value is always normalized to
/// the range (-1,1], so equal angles compare and hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Phase {
    r: Rational64,
}

impl Phase {
    /// Creates a new phase.
    ///
    /// Normalizes the phase to be in the range (-1,1].
    pub fn new(r: impl Into<Rational64>) -> Self {
        Self { r: r.into() }.normalize()
    }

    /// Returns the phase as a rational number.
    pub fn to_rational(&self) -> Rational64 {
        self.r
    }

    /// The angle `1/2^k` of a half-turn, i.e. the `k`-th rung of a phase
    /// gradient: `0` gives a Z angle, `1` an S angle, `2` a T angle.
    ///
    /// # Panics
    ///
    /// Panics if `k >= 63`.
    pub fn from_pow2_denom(k: u32) -> Self {
        assert!(k < 63, "phase gradient rung {k} overflows the denominator");
        Self::new(Rational64::new(1, 1i64 << k))
    }

    /// Creates a new phase from a floating point number of half-turns.
    ///
    /// Rounds the floating point number to a rational number and
    /// normalizes it to be in the range (-1,1].
    pub fn from_f64(f: f64) -> Self {
        Self::new(Rational64::from_f64(f).unwrap())
    }

    /// Returns the phase as a floating point number of half-turns.
    pub fn to_f64(&self) -> f64 {
        self.r.to_f64().unwrap()
    }

    /// Returns the angle in radians.
    pub fn radians(&self) -> f64 {
        self.to_f64() * std::f64::consts::PI
    }

    /// The unit complex number `e^{i pi r}` for this phase `r`.
    pub fn to_complex(&self) -> Complex64 {
        Complex64::from_polar(1.0, self.radians())
    }

    /// Normalizes the phase to be in the range (-1,1] by adding or subtracting multiples of 2.
    fn normalize(&self) -> Phase {
        let denom = *self.r.denom();
        let mut num = *self.r.numer();
        if -denom < num && num <= denom {
            return *self;
        }
        num = num.rem_euclid(2 * denom);
        if num > denom {
            num -= 2 * denom;
        }
        Phase {
            r: Rational64::new(num, denom),
        }
    }

    /// Returns `true` if the phase is a multiple of 1/2.
    pub fn is_clifford(&self) -> bool {
        self.r.denom().abs() <= 2
    }

    /// Returns `true` if the phase is 0 or 1.
    pub fn is_pauli(&self) -> bool {
        self.is_zero() || self.is_one()
    }

    /// Returns `true` if the phase is a non-Clifford multiple of 1/4.
    pub fn is_t(&self) -> bool {
        self.r.denom().abs() == 4
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.r)
    }
}

impl From<Rational64> for Phase {
    fn from(r: Rational64) -> Phase {
        Phase::new(r)
    }
}

impl From<(i64, i64)> for Phase {
    fn from(i: (i64, i64)) -> Phase {
        let r: Rational64 = i.into();
        Phase::new(r)
    }
}

impl From<i64> for Phase {
    fn from(i: i64) -> Phase {
        Phase::new(Rational64::from_i64(i).unwrap())
    }
}

impl From<Phase> for Rational64 {
    fn from(phase: Phase) -> Rational64 {
        phase.to_rational()
    }
}

impl From<Phase> for f64 {
    fn from(phase: Phase) -> f64 {
        phase.to_f64()
    }
}

impl Zero for Phase {
    fn zero() -> Self {
        Phase::new(Rational64::zero())
    }

    fn is_zero(&self) -> bool {
        self.r.is_zero()
    }
}

impl One for Phase {
    fn one() -> Self {
        Phase::new(Rational64::one())
    }

    fn is_one(&self) -> bool {
        self.r.is_one()
    }
}

impl Neg for Phase {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.r)
    }
}

impl Add for Phase {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.r + other.r)
    }
}

impl AddAssign for Phase {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Phase {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.r - other.r)
    }
}

impl Mul for Phase {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self::new(self.r * other.r)
    }
}

impl Mul<i64> for Phase {
    type Output = Self;

    fn mul(self, other: i64) -> Self {
        Self::new(self.r * other)
    }
}

impl Div<i64> for Phase {
    type Output = Self;

    fn div(self, other: i64) -> Self {
        Self::new(self.r / other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case((3, 2), (-1, 2))]
    #[case((-3, 2), (1, 2))]
    #[case((7, 2), (-1, 2))]
    #[case((2, 1), (0, 1))]
    #[case((-1, 1), (1, 1))]
    #[case((5, 4), (-3, 4))]
    fn normalization(#[case] input: (i64, i64), #[case] expected: (i64, i64)) {
        assert_eq!(Phase::from(input), Phase::from(expected));
    }

    #[test]
    fn classification() {
        assert!(Phase::zero().is_pauli());
        assert!(Phase::one().is_pauli());
        assert!(Phase::from((1, 2)).is_clifford());
        assert!(!Phase::from((1, 2)).is_pauli());
        assert!(Phase::from((1, 4)).is_t());
        assert!(Phase::from((-1, 4)).is_t());
        assert!(!Phase::from((1, 4)).is_clifford());
        assert!(!Phase::from((1, 8)).is_t());
        assert!(!Phase::from((1, 8)).is_clifford());
    }

    #[test]
    fn pow2_rungs() {
        assert_eq!(Phase::from_pow2_denom(0), Phase::one());
        assert_eq!(Phase::from_pow2_denom(1), Phase::from((1, 2)));
        assert_eq!(Phase::from_pow2_denom(2), Phase::from((1, 4)));
        assert!(Phase::from_pow2_denom(5).to_rational() == Rational64::new(1, 32));
    }

    #[test]
    fn arithmetic_stays_normalized() {
        let a = Phase::from((3, 4));
        let b = Phase::from((1, 2));
        assert_eq!(a + b, Phase::from((-3, 4)));
        assert_eq!(a - b, Phase::from((1, 4)));
        assert_eq!(-Phase::one(), Phase::one());
        assert_eq!(a * 2, Phase::from((-1, 2)));
        assert_eq!(a / 3, Phase::from((1, 4)));
    }

    #[test]
    fn unit_complex() {
        let c = Phase::from((1, 2)).to_complex();
        assert_abs_diff_eq!(c.re, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.im, 1.0, epsilon = 1e-12);
        let c = Phase::one().to_complex();
        assert_abs_diff_eq!(c.re, -1.0, epsilon = 1e-12);
    }
}
