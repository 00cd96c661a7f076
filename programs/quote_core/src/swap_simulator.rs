//! # Swap simulator
//!
//! Drives [`compute_swap_step`] across tick boundaries until the requested
//! amount is consumed, the price hits its limit, or the tick-array window
//! runs out. Pure and synchronous — every tick the loop might cross is
//! already materialized in the [`TickArraySequence`] the caller built.

use crate::constants::{MAX_SQRT_PRICE, MIN_SQRT_PRICE};
use crate::error::{QuoteError, Result};
use crate::swap_step::compute_swap_step;
use crate::tick_array::{apply_liquidity_net, TickArraySequence};
use crate::tick_math::sqrt_price_x64_to_tick_index;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapSimulationResult {
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    pub end_sqrt_price: u128,
    pub end_tick_index: i32,
    pub partial_fill: bool,
}

/// Run a swap of `amount` to completion.
///
/// `sqrt_price_limit == 0` is treated as "no limit" and replaced by the
/// domain boundary in the swap's direction (`MIN_SQRT_PRICE` for `a_to_b`,
/// `MAX_SQRT_PRICE` otherwise) — a pool can never trade through its own
/// price domain, so that boundary is always a safe default limit.
#[allow(clippy::too_many_arguments)]
pub fn simulate_swap(
    sequence: &TickArraySequence,
    starting_sqrt_price: u128,
    starting_tick: i32,
    starting_liquidity: u128,
    amount: u64,
    fee_rate: u64,
    a_to_b: bool,
    amount_specified_is_input: bool,
    sqrt_price_limit: u128,
) -> Result<SwapSimulationResult> {
    let sqrt_price_limit = if sqrt_price_limit == 0 {
        if a_to_b { MIN_SQRT_PRICE } else { MAX_SQRT_PRICE }
    } else {
        sqrt_price_limit
    };

    let mut sqrt_price = starting_sqrt_price;
    let mut tick_current = starting_tick;
    let mut liquidity = starting_liquidity;
    let mut amount_remaining = amount;
    let mut amount_in_accum: u128 = 0;
    let mut amount_out_accum: u128 = 0;
    let mut fee_accum: u128 = 0;

    while amount_remaining > 0 && sqrt_price != sqrt_price_limit {
        let next_tick = sequence.next_initialized_tick(tick_current, a_to_b)?;

        let target_sqrt_price = match next_tick {
            Some((index, _)) => {
                let candidate_price = crate::tick_math::tick_index_to_sqrt_price_x64(index)?;
                if a_to_b {
                    candidate_price.max(sqrt_price_limit)
                } else {
                    candidate_price.min(sqrt_price_limit)
                }
            }
            None => sqrt_price_limit,
        };

        let step = compute_swap_step(
            sqrt_price,
            target_sqrt_price,
            liquidity,
            amount_remaining,
            fee_rate,
            a_to_b,
            amount_specified_is_input,
        )?;

        let in_step = u64::try_from(step.amount_in).map_err(|_| QuoteError::TokenMaxExceeded)?;
        let out_step = u64::try_from(step.amount_out).map_err(|_| QuoteError::TokenMaxExceeded)?;
        let fee_step = u64::try_from(step.fee_amount).map_err(|_| QuoteError::TokenMaxExceeded)?;

        sqrt_price = step.next_sqrt_price;
        amount_in_accum += in_step as u128;
        amount_out_accum += out_step as u128;
        fee_accum += fee_step as u128;

        if amount_specified_is_input {
            amount_remaining = amount_remaining.saturating_sub(in_step.saturating_add(fee_step));
        } else {
            amount_remaining = amount_remaining.saturating_sub(out_step);
        }

        match next_tick {
            Some((index, tick)) if sqrt_price == crate::tick_math::tick_index_to_sqrt_price_x64(index)? => {
                // Exact landing on a tick boundary always applies that tick's
                // liquidity delta. `tick_current` advances to the landed index
                // directly when increasing, but to `index - 1` when `a_to_b`:
                // a tick's liquidity_net takes effect for prices at or above
                // its own index, so decreasing through it must leave
                // `tick_current` one below the boundary just crossed.
                liquidity = apply_liquidity_net(liquidity, tick.liquidity_net, a_to_b)?;
                tick_current = if a_to_b { index - 1 } else { index };
            }
            _ => {
                tick_current = sqrt_price_x64_to_tick_index(sqrt_price)?;
                break;
            }
        }
    }

    // The trader pays `in_step + fee_step` on the input side regardless of
    // which side was the one they specified an exact amount for.
    let total_in = amount_in_accum
        .checked_add(fee_accum)
        .ok_or(QuoteError::MathOverflow)?;

    Ok(SwapSimulationResult {
        amount_in: u64::try_from(total_in).map_err(|_| QuoteError::TokenMaxExceeded)?,
        amount_out: u64::try_from(amount_out_accum).map_err(|_| QuoteError::TokenMaxExceeded)?,
        fee_amount: u64::try_from(fee_accum).map_err(|_| QuoteError::TokenMaxExceeded)?,
        end_sqrt_price: sqrt_price,
        end_tick_index: tick_current,
        partial_fill: amount_remaining > 0,
    })
}
