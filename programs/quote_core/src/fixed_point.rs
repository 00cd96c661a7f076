//! # Q64.64 fixed-point core
//!
//! Sqrt prices and other Q64.64 values are carried as plain `u128` throughout
//! this crate (`raw value / 2^64`); this module supplies the three
//! arithmetic primitives everything else is built on:
//!
//! - [`mul_div`]: `⌊x·y/d⌋` or `⌈x·y/d⌉`, carrying the `x·y` product through
//!   a 256-bit intermediate (`ethnum::U256`) so it never wraps before the
//!   division runs — a sqrt price times a liquidity value alone already
//!   exceeds 128 bits.
//! - [`shift_right_round_up_if`]: a rounding-aware logical right shift over
//!   the same 256-bit intermediate.
//! - [`checked_mul_shift_right_64`]: the `⌊(x·y) >> 64⌋` fold used whenever
//!   a Q64.64 value is multiplied by a plain `u128` (liquidity, typically).

use ethnum::U256;

use crate::error::{QuoteError, Result};

/// `⌊x·y/d⌋` (round_up = false) or `⌈x·y/d⌉` (round_up = true), computed
/// through a 256-bit intermediate product so two 128-bit factors never
/// overflow before the division runs.
#[inline(always)]
pub fn mul_div(x: u128, y: u128, d: u128, round_up: bool) -> Result<u128> {
    if d == 0 {
        return Err(QuoteError::DivideByZero);
    }
    // `d == 2^64, round_up == false` is by far the most common call shape on
    // this crate's hot path (every bit of `tick_index_to_sqrt_price_x64`'s
    // loop folds a Q64.64 coefficient this way); route it through the
    // dedicated shift fold instead of the generic 256-bit division.
    if d == crate::constants::ONE_X64 && !round_up {
        return checked_mul_shift_right_64(x, y);
    }
    let prod = U256::from(x) * U256::from(y);
    div_round_u256(prod, U256::from(d), round_up)
}

/// `⌊num/denom⌋` or `⌈num/denom⌉` over 256-bit operands, failing if the
/// (possibly rounded) quotient does not fit a `u128`. `PositionMath` reaches
/// for this directly when its denominator (`sqrt_price_lower · sqrt_price_upper`)
/// is itself wider than 128 bits, which [`mul_div`]'s `u128` divisor can't
/// express.
#[inline(always)]
pub fn div_round_u256(num: U256, denom: U256, round_up: bool) -> Result<u128> {
    if denom == U256::ZERO {
        return Err(QuoteError::DivideByZero);
    }
    let (q, r) = (num / denom, num % denom);
    let result = if round_up && r != U256::ZERO { q + U256::ONE } else { q };
    if result > U256::from(u128::MAX) {
        return Err(QuoteError::MathOverflow);
    }
    Ok(result.as_u128())
}

/// Logical right-shift of a 256-bit value by `n` bits, with optional
/// round-up on any truncated low bits. Fails if the shifted (and possibly
/// rounded) result does not fit in a `u128`.
#[inline(always)]
pub fn shift_right_round_up_if(x: U256, n: u32, round_up: bool) -> Result<u128> {
    let mask = (U256::ONE << n) - U256::ONE;
    let truncated = x & mask;
    let mut shifted = x >> n;
    if round_up && truncated != U256::ZERO {
        shifted += U256::ONE;
    }
    if shifted > U256::from(u128::MAX) {
        return Err(QuoteError::MathOverflow);
    }
    Ok(shifted.as_u128())
}

/// `⌊(x·y) >> 64⌋`, the fold used when multiplying a Q64.64 price by a
/// plain-integer liquidity value. Kept distinct from [`mul_div`] because it
/// sits on `SwapStep`'s hot path and skips the divisor-present branch.
#[inline(always)]
pub fn checked_mul_shift_right_64(x: u128, y: u128) -> Result<u128> {
    let prod = U256::from(x) * U256::from(y);
    shift_right_round_up_if(prod, crate::constants::FRAC_BITS, false)
}
