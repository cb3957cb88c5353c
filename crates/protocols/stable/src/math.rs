//! Invariant Math
//!
//! StableSwap invariant solvers for plain and meta pools, and the
//! constant-product rule used for crypto pools. Everything works on balances
//! normalized to 18 decimals and runs over `BigUint`, so nothing overflows.
//! Solvers return `None` when the invariant is undefined (an empty coin) or
//! fails to converge.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::constants::{FEE_DENOMINATOR, MAX_ITERATIONS};

fn within_one(a: &BigUint, b: &BigUint) -> bool {
    if a > b {
        a - b <= BigUint::one()
    } else {
        b - a <= BigUint::one()
    }
}

/// Invariant `D` for normalized balances `xp` and amplification `amp`.
pub fn get_d(xp: &[BigUint], amp: u64) -> Option<BigUint> {
    let n = BigUint::from(xp.len());
    let sum: BigUint = xp.iter().sum();
    if sum.is_zero() {
        return Some(BigUint::zero());
    }
    if amp == 0 || xp.iter().any(|x| x.is_zero()) {
        return None;
    }

    let ann = BigUint::from(amp) * &n;
    let mut d = sum.clone();
    for _ in 0..MAX_ITERATIONS {
        let mut d_p = d.clone();
        for x in xp {
            d_p = d_p * &d / (x * &n);
        }
        let previous = d.clone();
        let numerator = (&ann * &sum + &d_p * &n) * &d;
        let denominator = (&ann - 1u32) * &d + (&n + 1u32) * &d_p;
        if denominator.is_zero() {
            return None;
        }
        d = numerator / denominator;
        if within_one(&d, &previous) {
            return Some(d);
        }
    }
    None
}

/// New balance of coin `j` once coin `i` is set to `x`, holding `D` fixed.
pub fn get_y(i: usize, j: usize, x: &BigUint, xp: &[BigUint], amp: u64) -> Option<BigUint> {
    let coins = xp.len();
    if i == j || i >= coins || j >= coins {
        return None;
    }

    let d = get_d(xp, amp)?;
    let n = BigUint::from(coins);
    let ann = BigUint::from(amp) * &n;

    let mut c = d.clone();
    let mut sum = BigUint::zero();
    for (k, balance) in xp.iter().enumerate() {
        let x_k = if k == i {
            x
        } else if k != j {
            balance
        } else {
            continue;
        };
        if x_k.is_zero() {
            return None;
        }
        sum += x_k;
        c = c * &d / (x_k * &n);
    }
    c = c * &d / (&ann * &n);
    let b = sum + &d / &ann;

    let mut y = d.clone();
    for _ in 0..MAX_ITERATIONS {
        let previous = y.clone();
        let denominator = BigUint::from(2u8) * &y + &b;
        if denominator <= d {
            return None;
        }
        y = (&y * &y + &c) / (denominator - &d);
        if within_one(&y, &previous) {
            return Some(y);
        }
    }
    None
}

/// StableSwap output in normalized units, before the fee.
///
/// One unit is held back for rounding, as the invariant solver rounds `y`
/// down.
pub fn stable_dy(i: usize, j: usize, dx: &BigUint, xp: &[BigUint], amp: u64) -> Option<BigUint> {
    let x = &xp[i] + dx;
    let y = get_y(i, j, &x, xp, amp)?;
    let floor = y + BigUint::one();
    if xp[j] <= floor {
        return Some(BigUint::zero());
    }
    Some(&xp[j] - floor)
}

/// Constant-product output in normalized units, before the fee.
pub fn crypto_dy(i: usize, j: usize, dx: &BigUint, xp: &[BigUint]) -> Option<BigUint> {
    if xp[i].is_zero() || xp[j].is_zero() {
        return None;
    }
    Some(&xp[j] * dx / (&xp[i] + dx))
}

/// Deduct a fee expressed over 1e10.
pub fn apply_fee(dy: &BigUint, fee: u64) -> BigUint {
    let charged = dy * BigUint::from(fee) / BigUint::from(FEE_DENOMINATOR);
    dy - charged
}

pub(crate) fn to_amount(value: BigUint) -> Option<u128> {
    value.to_u128()
}
