//! # Single tick-to-tick swap step
//!
//! The innermost loop body `SwapSimulator` drives repeatedly. A step never
//! crosses a tick boundary on its own — it either reaches `sqrt_price_target`
//! exactly (the caller decides afterward whether that was a real tick or the
//! swap's own limit) or lands short of it, fully consuming `amount_remaining`.

use crate::constants::FEE_RATE_DIVISOR;
use crate::error::{QuoteError, Result};
use crate::fixed_point::mul_div;
use crate::position_math::{amount_a_delta, amount_b_delta};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapStepResult {
    pub next_sqrt_price: u128,
    pub amount_in: u128,
    pub amount_out: u128,
    pub fee_amount: u128,
}

/// `a_to_b` means price decreases (token A flows in, B flows out); the "A"
/// side of a step is always the one whose delta is rounded against the
/// direction of travel's current/target ordering, matching
/// [`amount_a_delta`]/[`amount_b_delta`]'s `(lower, upper)` convention.
#[allow(clippy::too_many_arguments)]
pub fn compute_swap_step(
    sqrt_price_current: u128,
    sqrt_price_target: u128,
    liquidity: u128,
    amount_remaining: u64,
    fee_rate: u64,
    a_to_b: bool,
    amount_specified_is_input: bool,
) -> Result<SwapStepResult> {
    let (lower, upper) = if a_to_b {
        (sqrt_price_target, sqrt_price_current)
    } else {
        (sqrt_price_current, sqrt_price_target)
    };

    // `in_fixed` is the token whose delta is pinned by `amount_specified_is_input`'s
    // direction: for a_to_b that's token A on the way in, token B on the way out.
    let specified_is_a = a_to_b == amount_specified_is_input;

    let amount_remaining_less_fee = if amount_specified_is_input {
        mul_div(
            amount_remaining as u128,
            FEE_RATE_DIVISOR - fee_rate,
            FEE_RATE_DIVISOR,
            false,
        )?
    } else {
        amount_remaining as u128
    };

    let max_delta_for_full_step = if specified_is_a {
        amount_a_delta(liquidity, lower, upper, amount_specified_is_input)?
    } else {
        amount_b_delta(liquidity, lower, upper, amount_specified_is_input)?
    };

    let is_full_step = amount_remaining_less_fee >= max_delta_for_full_step;

    let next_sqrt_price = if is_full_step {
        sqrt_price_target
    } else {
        next_sqrt_price_from_amount(
            sqrt_price_current,
            liquidity,
            amount_remaining_less_fee,
            a_to_b,
            specified_is_a,
        )?
    };

    let (step_lower, step_upper) = if a_to_b {
        (next_sqrt_price, sqrt_price_current)
    } else {
        (sqrt_price_current, next_sqrt_price)
    };

    let amount_in = if a_to_b {
        amount_a_delta(liquidity, step_lower, step_upper, true)?
    } else {
        amount_b_delta(liquidity, step_lower, step_upper, true)?
    };
    let amount_out = if a_to_b {
        amount_b_delta(liquidity, step_lower, step_upper, false)?
    } else {
        amount_a_delta(liquidity, step_lower, step_upper, false)?
    };

    let amount_in_u64 = u64::try_from(amount_in).map_err(|_| QuoteError::TokenMaxExceeded)?;

    let fee_amount = if amount_specified_is_input {
        if is_full_step {
            mul_div(amount_in, fee_rate as u128, (FEE_RATE_DIVISOR - fee_rate) as u128, true)?
        } else {
            amount_remaining.saturating_sub(amount_in_u64) as u128
        }
    } else {
        mul_div(amount_in, fee_rate as u128, (FEE_RATE_DIVISOR - fee_rate) as u128, true)?
    };

    Ok(SwapStepResult {
        next_sqrt_price,
        amount_in,
        amount_out,
        fee_amount,
    })
}

/// Solve for the `sqrt_price` that a partial step with `amount` remaining
/// (net of fee, if input-specified) would reach.
fn next_sqrt_price_from_amount(
    sqrt_price_current: u128,
    liquidity: u128,
    amount: u128,
    a_to_b: bool,
    specified_is_a: bool,
) -> Result<u128> {
    if specified_is_a {
        next_sqrt_price_from_a(sqrt_price_current, liquidity, amount, a_to_b)
    } else {
        next_sqrt_price_from_b(sqrt_price_current, liquidity, amount, a_to_b)
    }
}

/// `next = L·p / (L ± amount·p/2^64)`, the closed-form inverse of
/// [`amount_a_delta`] solved for the unknown endpoint. `a_to_b` (token A
/// flowing into the pool) pushes price down, so the term is added to the
/// denominator; the reverse direction subtracts it. Always rounds up,
/// matching the convention `amount_a_delta` itself uses for deposits.
fn next_sqrt_price_from_a(sqrt_price: u128, liquidity: u128, amount: u128, a_to_b: bool) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price);
    }
    use ethnum::U256;

    let term = mul_div(amount, sqrt_price, crate::constants::ONE_X64, true)?;
    let denominator = if a_to_b {
        liquidity.checked_add(term).ok_or(QuoteError::MathOverflow)?
    } else {
        liquidity.checked_sub(term).ok_or(QuoteError::MathOverflow)?
    };

    let numerator = U256::from(liquidity) * U256::from(sqrt_price);
    crate::fixed_point::div_round_u256(numerator, U256::from(denominator), true)
}

/// `next = sqrt_price ∓ amount·2^64/L`, the closed-form inverse of
/// [`amount_b_delta`]. Always rounds the delta down, matching the
/// convention `amount_b_delta` uses for withdrawals.
fn next_sqrt_price_from_b(sqrt_price: u128, liquidity: u128, amount: u128, a_to_b: bool) -> Result<u128> {
    let delta = mul_div(amount, crate::constants::ONE_X64, liquidity, false)?;
    if a_to_b {
        sqrt_price.checked_sub(delta).ok_or(QuoteError::MathOverflow)
    } else {
        sqrt_price.checked_add(delta).ok_or(QuoteError::MathOverflow)
    }
}
