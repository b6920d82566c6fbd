//! Exact rational arithmetic.
//!
//! All numbers are exact `BigRational`s; operations that the surface language
//! restricts to integers or naturals receive operands the type checker has
//! already shaped, so a fractional operand where an integer is required is an
//! upstream bug (a panic-class error), while division by zero, natural
//! underflow and fixed-width overflow are ordinary, reachable failures.

use crate::evaluator::{EvalError, EvalErrorKind};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Division, failing when the divisor is exactly zero.
pub fn checked_div(a: &BigRational, b: &BigRational) -> Result<BigRational, EvalError> {
    if b.is_zero() {
        return Err(EvalErrorKind::DivisionByZero.into());
    }
    Ok(a / b)
}

/// Subtraction; when `natural` is set the result must not go negative.
pub fn sub(a: &BigRational, b: &BigRational, natural: bool) -> Result<BigRational, EvalError> {
    let r = a - b;
    if natural && r.is_negative() {
        return Err(EvalErrorKind::Underflow.into());
    }
    Ok(r)
}

/// Floor modulo: `a - b * floor(a / b)`.
pub fn modulo(a: &BigRational, b: &BigRational) -> Result<BigRational, EvalError> {
    if b.is_zero() {
        return Err(EvalErrorKind::DivisionByZero.into());
    }
    Ok(a - b * (a / b).floor())
}

/// Does `a` divide `b` evenly? Zero divides only zero.
pub fn divides(a: &BigRational, b: &BigRational) -> bool {
    if a.is_zero() {
        b.is_zero()
    } else {
        (b / a).is_integer()
    }
}

/// Exact exponentiation by an integer exponent. The exponent must fit `i32`
/// (the language's bounded exponent range); a negative exponent inverts,
/// which fails on a zero base.
pub fn exp(base: &BigRational, exponent: &BigRational) -> Result<BigRational, EvalError> {
    if !exponent.is_integer() {
        return Err(EvalError::panic("exponent is not an integer"));
    }
    let e = exponent
        .to_integer()
        .to_i32()
        .ok_or(EvalErrorKind::Overflow)?;
    if e < 0 && base.is_zero() {
        return Err(EvalErrorKind::DivisionByZero.into());
    }
    Ok(base.pow(e))
}

/// Integer square root of a natural: `⌊√n⌋`.
pub fn int_sqrt(n: &BigRational) -> Result<BigRational, EvalError> {
    let i = n.floor().to_integer();
    if i.is_negative() {
        return Err(EvalError::panic("square root of a negative number"));
    }
    Ok(BigRational::from_integer(i.sqrt()))
}

pub fn floor(q: &BigRational) -> BigRational {
    q.floor()
}

pub fn ceil(q: &BigRational) -> BigRational {
    q.ceil()
}

pub fn abs(q: &BigRational) -> BigRational {
    q.abs()
}

/// Factorial of a natural. The operand must fit `u64`.
pub fn factorial(n: &BigRational) -> Result<BigRational, EvalError> {
    if !n.is_integer() || n.is_negative() {
        return Err(EvalError::panic("factorial of a non-natural"));
    }
    let n = n.to_integer().to_u64().ok_or(EvalErrorKind::Overflow)?;
    let mut acc = BigInt::one();
    for i in 2..=n {
        acc *= i;
    }
    Ok(BigRational::from_integer(acc))
}

/// Multinomial coefficient `C(n; k1, …, km) = C(n, k1) · C(n − k1; k2, …)`.
/// Zero when the `k`s take more than `n` offers.
pub fn multinomial(n: &BigRational, ks: &[BigRational]) -> Result<BigRational, EvalError> {
    if !n.is_integer() {
        return Err(EvalError::panic("multinomial of a non-integer"));
    }
    let mut rem = n.to_integer();
    let mut acc = BigInt::one();
    for k in ks {
        if !k.is_integer() {
            return Err(EvalError::panic("multinomial of a non-integer"));
        }
        let k = k.to_integer();
        acc *= binomial(&rem, &k)?;
        rem -= k;
    }
    Ok(BigRational::from_integer(acc))
}

/// Binomial coefficient, zero outside `0 <= k <= n`. `k` must fit `u64`.
pub fn binomial(n: &BigInt, k: &BigInt) -> Result<BigInt, EvalError> {
    if k.is_negative() || k > n {
        return Ok(BigInt::zero());
    }
    let k = k.to_u64().ok_or(EvalErrorKind::Overflow)?;
    let mut acc = BigInt::one();
    for i in 1..=k {
        acc = acc * (n - BigInt::from(k) + i) / i;
    }
    Ok(acc)
}

/// Trial-division primality test for an integer.
pub fn is_prime(n: &BigRational) -> Result<bool, EvalError> {
    if !n.is_integer() {
        return Err(EvalError::panic("primality test of a non-integer"));
    }
    let n = n.to_integer();
    let two = BigInt::from(2);
    let three = BigInt::from(3);
    if n < two {
        return Ok(false);
    }
    if n == two || n == three {
        return Ok(true);
    }
    if n.is_multiple_of(&two) || n.is_multiple_of(&three) {
        return Ok(false);
    }
    let mut i = BigInt::from(5);
    while &i * &i <= n {
        if n.is_multiple_of(&i) || n.is_multiple_of(&(&i + 2)) {
            return Ok(false);
        }
        i += 6;
    }
    Ok(true)
}

/// Prime factorization of a positive integer, as `(prime, multiplicity)`
/// pairs in ascending order. `factor(1)` is empty.
pub fn factor(n: &BigRational) -> Result<Vec<(BigInt, u64)>, EvalError> {
    if !n.is_integer() || !n.is_positive() {
        return Err(EvalError::panic("factorization of a non-positive integer"));
    }
    let mut n = n.to_integer();
    let mut out: Vec<(BigInt, u64)> = Vec::new();
    let push = |p: &BigInt, count: u64, out: &mut Vec<(BigInt, u64)>| {
        if count > 0 {
            out.push((p.clone(), count));
        }
    };
    let strip = |n: &mut BigInt, p: &BigInt| -> u64 {
        let mut count = 0;
        while n.is_multiple_of(p) {
            *n /= p;
            count += 1;
        }
        count
    };
    let two = BigInt::from(2);
    let count = strip(&mut n, &two);
    push(&two, count, &mut out);
    let three = BigInt::from(3);
    let count = strip(&mut n, &three);
    push(&three, count, &mut out);
    let mut i = BigInt::from(5);
    while &i * &i <= n {
        let count = strip(&mut n, &i);
        push(&i, count, &mut out);
        let next = &i + 2;
        let count = strip(&mut n, &next);
        push(&next, count, &mut out);
        i += 6;
    }
    if n > BigInt::one() {
        push(&n, 1, &mut out);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::EvalErrorKind;

    fn q(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn div_by_zero_is_an_error() {
        let err = checked_div(&q(1), &q(0)).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::DivisionByZero));
    }

    #[test]
    fn natural_subtraction_underflows() {
        assert_eq!(sub(&q(5), &q(3), true).unwrap(), q(2));
        let err = sub(&q(3), &q(5), true).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::Underflow));
        // Integer subtraction is allowed to go negative.
        assert_eq!(sub(&q(3), &q(5), false).unwrap(), q(-2));
    }

    #[test]
    fn floor_modulo() {
        assert_eq!(modulo(&q(7), &q(3)).unwrap(), q(1));
        assert_eq!(modulo(&q(-7), &q(3)).unwrap(), q(2));
        let err = modulo(&q(7), &q(0)).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::DivisionByZero));
    }

    #[test]
    fn divides_handles_zero() {
        assert!(divides(&q(3), &q(12)));
        assert!(!divides(&q(5), &q(12)));
        assert!(divides(&q(0), &q(0)));
        assert!(!divides(&q(0), &q(3)));
    }

    #[test]
    fn exp_negative_inverts() {
        assert_eq!(exp(&q(2), &q(10)).unwrap(), q(1024));
        assert_eq!(exp(&q(2), &q(-2)).unwrap(), ratio(1, 4));
        let err = exp(&q(0), &q(-1)).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::DivisionByZero));
    }

    #[test]
    fn sqrt_floor_ceil() {
        assert_eq!(int_sqrt(&q(17)).unwrap(), q(4));
        assert_eq!(floor(&ratio(7, 2)), q(3));
        assert_eq!(ceil(&ratio(7, 2)), q(4));
        assert_eq!(abs(&q(-3)), q(3));
    }

    #[test]
    fn factorial_and_multinomial() {
        assert_eq!(factorial(&q(0)).unwrap(), q(1));
        assert_eq!(factorial(&q(6)).unwrap(), q(720));
        // C(5; 2, 3) = 10, C(4; 2) = C(4,2) = 6.
        assert_eq!(multinomial(&q(5), &[q(2), q(3)]).unwrap(), q(10));
        assert_eq!(multinomial(&q(4), &[q(2)]).unwrap(), q(6));
        // Asking for more than n offers gives zero.
        assert_eq!(multinomial(&q(2), &[q(3)]).unwrap(), q(0));
    }

    #[test]
    fn primes_and_factorization() {
        assert!(is_prime(&q(2)).unwrap());
        assert!(is_prime(&q(97)).unwrap());
        assert!(!is_prime(&q(1)).unwrap());
        assert!(!is_prime(&q(91)).unwrap()); // 7 * 13

        let f = factor(&q(360)).unwrap();
        let view: Vec<(i64, u64)> = f
            .iter()
            .map(|(p, c)| (p.to_i64().unwrap(), *c))
            .collect();
        assert_eq!(view, vec![(2, 3), (3, 2), (5, 1)]);
        assert!(factor(&q(1)).unwrap().is_empty());
    }
}
