//! Exact rational arithmetic on arbitrary-precision integers.
//!
//! `Rational` is `num_rational::BigRational`, which keeps every value reduced with a
//! positive denominator. The helpers here add the checked and exact operations the
//! rest of the engine relies on: division that reports a zero divisor instead of
//! panicking, integer powers, and exact roots.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{CasError, Result};

pub type Rational = BigRational;

/// Trial-division bound used when pulling square factors out of integer radicands.
const SQUARE_FACTOR_LIMIT: u64 = 10_000;

pub fn integer(value: impl Into<BigInt>) -> Rational {
    Rational::from_integer(value.into())
}

pub fn ratio(num: i64, den: i64) -> Rational {
    Rational::new(num.into(), den.into())
}

pub fn add(a: &Rational, b: &Rational) -> Rational {
    a + b
}

pub fn sub(a: &Rational, b: &Rational) -> Rational {
    a - b
}

pub fn mul(a: &Rational, b: &Rational) -> Rational {
    a * b
}

pub fn div(a: &Rational, b: &Rational) -> Result<Rational> {
    if b.is_zero() {
        return Err(CasError::DivisionByZero);
    }
    Ok(a / b)
}

pub fn recip(a: &Rational) -> Result<Rational> {
    div(&Rational::one(), a)
}

/// `base^exp` for an integer exponent.
pub fn pow(base: &Rational, exp: i64) -> Result<Rational> {
    let magnitude = exp
        .unsigned_abs()
        .to_u32()
        .ok_or_else(|| CasError::unsupported(format!("exponent {exp} is too large")))?;
    let num = base.numer().pow(magnitude);
    let den = base.denom().pow(magnitude);
    if exp < 0 {
        if num.is_zero() {
            return Err(CasError::DivisionByZero);
        }
        Ok(Rational::new(den, num))
    } else {
        Ok(Rational::new(num, den))
    }
}

/// Returns the exact square root when `value` is the square of a rational.
pub fn sqrt_exact(value: &Rational) -> Option<Rational> {
    if value.is_negative() {
        return None;
    }
    let num = value.numer().sqrt();
    let den = value.denom().sqrt();
    if &(&num * &num) == value.numer() && &(&den * &den) == value.denom() {
        Some(Rational::new(num, den))
    } else {
        None
    }
}

/// Returns the exact `n`-th root when it exists over the reals.
pub fn nth_root_exact(value: &Rational, n: u32) -> Option<Rational> {
    if n == 0 {
        return None;
    }
    if n == 2 {
        return sqrt_exact(value);
    }
    if value.is_negative() && n.is_even() {
        return None;
    }
    let num = value.numer().nth_root(n);
    let den = value.denom().nth_root(n);
    if &num.pow(n) == value.numer() && &den.pow(n) == value.denom() {
        Some(Rational::new(num, den))
    } else {
        None
    }
}

/// Splits a positive integer into `outside^2 * inside`, pulling out square factors up to
/// a fixed trial-division bound.
pub fn square_factor(value: &BigInt) -> (BigInt, BigInt) {
    let mut outside = BigInt::one();
    let mut inside = value.clone();
    if !inside.is_positive() {
        return (outside, inside);
    }
    let mut p: u64 = 2;
    while p <= SQUARE_FACTOR_LIMIT {
        let p_big = BigInt::from(p);
        let square = &p_big * &p_big;
        if square > inside {
            break;
        }
        while (&inside % &square).is_zero() {
            inside /= &square;
            outside *= &p_big;
        }
        p += if p == 2 { 1 } else { 2 };
    }
    (outside, inside)
}

/// Parses `123` or `12.375` into an exact fraction.
pub fn parse_decimal(text: &str) -> Option<Rational> {
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    let digits = format!("{whole}{frac}");
    let num: BigInt = digits.parse().ok()?;
    let scale = frac
        .len()
        .to_u32()
        .map(|len| BigInt::from(10u32).pow(len))?;
    Some(Rational::new(num, scale))
}

pub fn to_f64(value: &Rational) -> f64 {
    match (value.numer().to_f64(), value.denom().to_f64()) {
        (Some(n), Some(d)) if n.is_finite() && d.is_finite() => n / d,
        _ => value.to_f64().unwrap_or(f64::NAN),
    }
}

pub fn is_integer(value: &Rational) -> bool {
    value.is_integer()
}

pub fn to_i64(value: &Rational) -> Option<i64> {
    if value.is_integer() {
        value.numer().to_i64()
    } else {
        None
    }
}

pub fn factorial(n: u32) -> BigInt {
    (1..=n).fold(BigInt::one(), |acc, k| acc * BigInt::from(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_by_zero_is_reported() {
        assert_eq!(div(&ratio(1, 2), &Rational::zero()), Err(CasError::DivisionByZero));
        assert_eq!(div(&ratio(1, 2), &ratio(3, 4)), Ok(ratio(2, 3)));
    }

    #[test]
    fn values_stay_reduced() {
        let r = add(&ratio(1, 6), &ratio(1, 3));
        assert_eq!(r.numer(), &BigInt::from(1));
        assert_eq!(r.denom(), &BigInt::from(2));
        let neg = mul(&ratio(-2, 4), &ratio(3, 1));
        assert_eq!(neg, ratio(-3, 2));
        assert!(neg.denom().is_positive());
    }

    #[test]
    fn integer_powers() {
        assert_eq!(pow(&ratio(2, 3), 3), Ok(ratio(8, 27)));
        assert_eq!(pow(&ratio(2, 3), -2), Ok(ratio(9, 4)));
        assert_eq!(pow(&Rational::zero(), -1), Err(CasError::DivisionByZero));
        assert_eq!(pow(&ratio(5, 7), 0), Ok(Rational::one()));
    }

    #[test]
    fn exact_square_roots() {
        assert_eq!(sqrt_exact(&ratio(9, 4)), Some(ratio(3, 2)));
        assert_eq!(sqrt_exact(&ratio(2, 1)), None);
        assert_eq!(sqrt_exact(&ratio(-4, 1)), None);
        assert_eq!(sqrt_exact(&Rational::zero()), Some(Rational::zero()));
    }

    #[test]
    fn exact_odd_roots_of_negatives() {
        assert_eq!(nth_root_exact(&ratio(-8, 27), 3), Some(ratio(-2, 3)));
        assert_eq!(nth_root_exact(&ratio(-16, 1), 4), None);
    }

    #[test]
    fn square_factors() {
        assert_eq!(square_factor(&BigInt::from(72)), (BigInt::from(6), BigInt::from(2)));
        assert_eq!(square_factor(&BigInt::from(13)), (BigInt::from(1), BigInt::from(13)));
    }

    #[test]
    fn decimals_become_fractions() {
        assert_eq!(parse_decimal("0.25"), Some(ratio(1, 4)));
        assert_eq!(parse_decimal("12"), Some(ratio(12, 1)));
        assert_eq!(parse_decimal("1.50"), Some(ratio(3, 2)));
        assert_eq!(parse_decimal("."), None);
    }
}
