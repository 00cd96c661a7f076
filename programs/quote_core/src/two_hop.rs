//! # Two-hop route composition
//!
//! Combines two independently computed [`SwapQuote`]s — one per pool — into
//! a single atomic route through a shared intermediate token. The chain
//! enforces strict conservation on that intermediate: composing two legs
//! whose amounts don't line up, or whose partial-fill behavior would strand
//! tokens with the owner, is a quoting error the caller should see before
//! ever building the route instruction.

use crate::address::Address;
use crate::error::{QuoteError, Result};
use crate::pool::Pool;
use crate::position_math::slippage;
use crate::quote::SwapQuote;
use crate::tick_array::candidate_array_starts;

/// A composed two-hop route. `tick_array_one`/`tick_array_two` are the
/// start-tick-index triples each leg's simulation needs as accounts (see
/// [`candidate_array_starts`]) — resolving those into actual account
/// addresses is the caller's `PoolStore`/PDA-derivation layer, not this
/// crate's concern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TwoHopQuote {
    pub whirlpool_one: Address,
    pub whirlpool_two: Address,
    pub amount: u64,
    pub other_amount_threshold: u64,
    pub amount_specified_is_input: bool,
    pub sqrt_price_limit_one: u128,
    pub sqrt_price_limit_two: u128,
    pub a_to_b_one: bool,
    pub a_to_b_two: bool,
    pub tick_array_one: [i32; 3],
    pub tick_array_two: [i32; 3],
    pub estimated_amount_in: u64,
    pub estimated_amount_out: u64,
}

fn intermediate_mint_out(pool: &Pool, a_to_b: bool) -> Address {
    if a_to_b {
        pool.token_mint_b
    } else {
        pool.token_mint_a
    }
}

fn intermediate_mint_in(pool: &Pool, a_to_b: bool) -> Address {
    if a_to_b {
        pool.token_mint_a
    } else {
        pool.token_mint_b
    }
}

/// Compose `q1` (on `pool_one`) and `q2` (on `pool_two`) into an atomic
/// two-hop route, applying `slippage_bps` to the route's own outer
/// threshold. `q1` and `q2` must already be computed against the same
/// specification direction (both exact-in or both exact-out) with `q2`'s
/// specified amount set to `q1`'s estimated output (exact-in) or `q1`'s
/// specified amount set to `q2`'s estimated input (exact-out) — this
/// function only validates and composes, it does not re-simulate either
/// leg.
pub fn compose_two_hop_swap_quote(
    pool_one: &Pool,
    pool_two: &Pool,
    q1: &SwapQuote,
    q2: &SwapQuote,
    slippage_bps: u32,
) -> Result<TwoHopQuote> {
    if intermediate_mint_out(pool_one, q1.a_to_b) != intermediate_mint_in(pool_two, q2.a_to_b) {
        return Err(QuoteError::InvalidIntermediaryMint);
    }

    if q1.estimated_amount_out != q2.estimated_amount_in {
        return Err(QuoteError::IntermediateTokenAmountMismatch);
    }

    if q1.amount_specified_is_input != q2.amount_specified_is_input {
        return Err(QuoteError::IntermediateTokenAmountMismatch);
    }

    let amount_specified_is_input = q1.amount_specified_is_input;

    // Partial fill is only ever legal on the leg adjacent to the user's
    // specified amount, and only when the *other* leg's sqrt_price_limit
    // signals the caller explicitly planned for it. The leg that would
    // strand unconsumed or phantom intermediate tokens can never partially
    // fill.
    if amount_specified_is_input {
        if q2.partial_fill {
            return Err(QuoteError::PartialFillNotAllowed);
        }
        if q1.partial_fill && q2.sqrt_price_limit == 0 {
            return Err(QuoteError::PartialFillNotAllowed);
        }
    } else {
        if q1.partial_fill {
            return Err(QuoteError::PartialFillNotAllowed);
        }
        if q2.partial_fill && q1.sqrt_price_limit == 0 {
            return Err(QuoteError::PartialFillNotAllowed);
        }
    }

    let (amount, other_amount_threshold) = if amount_specified_is_input {
        let threshold = slippage::adjust_amount_for_slippage(q2.estimated_amount_out, slippage_bps, false)?;
        (q1.amount, threshold)
    } else {
        let threshold = slippage::adjust_amount_for_slippage(q1.estimated_amount_in, slippage_bps, true)?;
        (q2.amount, threshold)
    };

    Ok(TwoHopQuote {
        whirlpool_one: pool_one.address,
        whirlpool_two: pool_two.address,
        amount,
        other_amount_threshold,
        amount_specified_is_input,
        sqrt_price_limit_one: q1.sqrt_price_limit,
        sqrt_price_limit_two: q2.sqrt_price_limit,
        a_to_b_one: q1.a_to_b,
        a_to_b_two: q2.a_to_b,
        tick_array_one: candidate_array_starts(pool_one.tick_current_index, pool_one.tick_spacing, q1.a_to_b),
        tick_array_two: candidate_array_starts(pool_two.tick_current_index, pool_two.tick_spacing, q2.a_to_b),
        estimated_amount_in: q1.estimated_amount_in,
        estimated_amount_out: q2.estimated_amount_out,
    })
}

/// Check a computed amount against a caller-supplied threshold — the
/// execution-time counterpart to the slippage bound a [`TwoHopQuote`] (or a
/// plain [`SwapQuote`]) carries. `is_minimum` selects which direction is
/// unsafe: `true` rejects an output that fell below `threshold`
/// ([`QuoteError::BelowOutMinimum`]), `false` rejects an input that rose
/// above it ([`QuoteError::AboveInMaximum`]).
pub fn verify_amount_against_threshold(amount: u64, threshold: u64, is_minimum: bool) -> Result<()> {
    if is_minimum {
        if amount < threshold {
            return Err(QuoteError::BelowOutMinimum);
        }
    } else if amount > threshold {
        return Err(QuoteError::AboveInMaximum);
    }
    Ok(())
}
