//! # Quote builder
//!
//! The four public entry points the rest of an SDK built on this crate would
//! call: two swap quotes and two liquidity quotes, each slippage-adjusted.

use crate::address::Address;
use crate::error::{QuoteError, Result};
use crate::pool::{validate_tick_range, Pool, Position};
use crate::position_math::{self, slippage, tokens_from_liquidity};
use crate::swap_simulator::simulate_swap;
use crate::tick_array::TickArrayFetcher;
use crate::tick_math::tick_index_to_sqrt_price_x64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapQuote {
    pub amount: u64,
    pub other_amount_threshold: u64,
    pub sqrt_price_limit: u128,
    pub amount_specified_is_input: bool,
    pub a_to_b: bool,
    pub estimated_amount_in: u64,
    pub estimated_amount_out: u64,
    pub estimated_end_sqrt_price: u128,
    pub estimated_end_tick_index: i32,
    pub estimated_fee_amount: u64,
    pub partial_fill: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IncreaseLiquidityQuote {
    pub liquidity: u128,
    pub token_est_a: u64,
    pub token_est_b: u64,
    pub token_max_a: u64,
    pub token_max_b: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecreaseLiquidityQuote {
    pub token_est_a: u64,
    pub token_est_b: u64,
    pub token_min_a: u64,
    pub token_min_b: u64,
}

fn run_swap(
    pool: &Pool,
    fetcher: &dyn TickArrayFetcher,
    amount: u64,
    a_to_b: bool,
    amount_specified_is_input: bool,
    sqrt_price_limit: u128,
) -> Result<crate::swap_simulator::SwapSimulationResult> {
    // Every candidate array in this window belongs to the same pool; the
    // fetcher is keyed by account address, which the caller's `PoolStore`
    // layer derives from `(pool, start_tick_index)` — the core only needs
    // equality on that address, so a pool-scoped stand-in is sufficient here.
    let pool_address_of = |_start_tick: i32| pool.address;
    let sequence = crate::tick_array::TickArraySequence::from_fetcher(
        fetcher,
        pool.address,
        pool_address_of,
        pool.tick_current_index,
        pool.tick_spacing,
        a_to_b,
    )?;

    let result = simulate_swap(
        &sequence,
        pool.sqrt_price,
        pool.tick_current_index,
        pool.liquidity,
        amount,
        pool.fee_rate,
        a_to_b,
        amount_specified_is_input,
        sqrt_price_limit,
    )?;

    if result.partial_fill {
        tracing::debug!(amount, a_to_b, "swap terminated with partial fill");
    }

    Ok(result)
}

/// Quote a swap specifying the exact input amount. `other_amount_threshold`
/// is the minimum acceptable output after widening by `slippage_bps`.
pub fn swap_quote_by_input_token(
    pool: &Pool,
    fetcher: &dyn TickArrayFetcher,
    input_mint: Address,
    input_amount: u64,
    slippage_bps: u32,
    sqrt_price_limit: u128,
) -> Result<SwapQuote> {
    let a_to_b = pool.a_to_b_for_input(input_mint)?;
    let sim = run_swap(pool, fetcher, input_amount, a_to_b, true, sqrt_price_limit)?;

    let other_amount_threshold = slippage::adjust_amount_for_slippage(sim.amount_out, slippage_bps, false)?;

    Ok(SwapQuote {
        amount: input_amount,
        other_amount_threshold,
        sqrt_price_limit,
        amount_specified_is_input: true,
        a_to_b,
        estimated_amount_in: sim.amount_in,
        estimated_amount_out: sim.amount_out,
        estimated_end_sqrt_price: sim.end_sqrt_price,
        estimated_end_tick_index: sim.end_tick_index,
        estimated_fee_amount: sim.fee_amount,
        partial_fill: sim.partial_fill,
    })
}

/// Quote a swap specifying the exact output amount. `other_amount_threshold`
/// is the maximum acceptable input after widening by `slippage_bps`.
pub fn swap_quote_by_output_token(
    pool: &Pool,
    fetcher: &dyn TickArrayFetcher,
    output_mint: Address,
    output_amount: u64,
    slippage_bps: u32,
    sqrt_price_limit: u128,
) -> Result<SwapQuote> {
    let a_to_b = pool.a_to_b_for_output(output_mint)?;
    let sim = run_swap(pool, fetcher, output_amount, a_to_b, false, sqrt_price_limit)?;

    let other_amount_threshold = slippage::adjust_amount_for_slippage(sim.amount_in, slippage_bps, true)?;

    Ok(SwapQuote {
        amount: output_amount,
        other_amount_threshold,
        sqrt_price_limit,
        amount_specified_is_input: false,
        a_to_b,
        estimated_amount_in: sim.amount_in,
        estimated_amount_out: sim.amount_out,
        estimated_end_sqrt_price: sim.end_sqrt_price,
        estimated_end_tick_index: sim.end_tick_index,
        estimated_fee_amount: sim.fee_amount,
        partial_fill: sim.partial_fill,
    })
}

/// Quote the liquidity (and both token amounts) a deposit of `amount` of
/// `token_mint` supports over `[tick_lower_index, tick_upper_index]`.
pub fn increase_liquidity_quote_by_input_token(
    pool: &Pool,
    token_mint: Address,
    amount: u64,
    tick_lower_index: i32,
    tick_upper_index: i32,
    slippage_bps: u32,
) -> Result<IncreaseLiquidityQuote> {
    validate_tick_range(pool, tick_lower_index, tick_upper_index)?;

    let sqrt_price_lower = tick_index_to_sqrt_price_x64(tick_lower_index)?;
    let sqrt_price_upper = tick_index_to_sqrt_price_x64(tick_upper_index)?;
    let is_token_a = if token_mint == pool.token_mint_a {
        true
    } else if token_mint == pool.token_mint_b {
        false
    } else {
        return Err(QuoteError::InvalidIntermediaryMint);
    };

    let liquidity = position_math::liquidity_from_single_sided(
        pool.sqrt_price,
        sqrt_price_lower,
        sqrt_price_upper,
        is_token_a,
        amount,
    )?;

    let (token_est_a, token_est_b) = tokens_from_liquidity(liquidity, pool.sqrt_price, sqrt_price_lower, sqrt_price_upper, true)?;

    let sqrt_price_upper_widened = slippage::adjust_sqrt_price_for_slippage(sqrt_price_upper, slippage_bps, true)?;
    let sqrt_price_lower_widened = slippage::adjust_sqrt_price_for_slippage(sqrt_price_lower, slippage_bps, false)?;
    let sqrt_price_current_widened_up = slippage::adjust_sqrt_price_for_slippage(pool.sqrt_price, slippage_bps, true)?;
    let sqrt_price_current_widened_down = slippage::adjust_sqrt_price_for_slippage(pool.sqrt_price, slippage_bps, false)?;

    let (token_max_a_hi, token_max_b_hi) =
        tokens_from_liquidity(liquidity, sqrt_price_current_widened_down, sqrt_price_lower_widened, sqrt_price_upper_widened, true)?;
    let (token_max_a_lo, token_max_b_lo) =
        tokens_from_liquidity(liquidity, sqrt_price_current_widened_up, sqrt_price_lower_widened, sqrt_price_upper_widened, true)?;

    Ok(IncreaseLiquidityQuote {
        liquidity,
        token_est_a: u64::try_from(token_est_a).map_err(|_| QuoteError::TokenMaxExceeded)?,
        token_est_b: u64::try_from(token_est_b).map_err(|_| QuoteError::TokenMaxExceeded)?,
        token_max_a: u64::try_from(token_max_a_hi.max(token_max_a_lo)).map_err(|_| QuoteError::TokenMaxExceeded)?,
        token_max_b: u64::try_from(token_max_b_hi.max(token_max_b_lo)).map_err(|_| QuoteError::TokenMaxExceeded)?,
    })
}

/// Quote the token amounts withdrawing `liquidity` from `position` yields.
/// `liquidity` need not be `position.liquidity` in full — a caller may quote
/// a partial withdrawal — but `position` supplies the range itself.
pub fn decrease_liquidity_quote_by_liquidity(
    pool: &Pool,
    position: &Position,
    liquidity: u128,
    slippage_bps: u32,
) -> Result<DecreaseLiquidityQuote> {
    let tick_lower_index = position.tick_lower_index;
    let tick_upper_index = position.tick_upper_index;
    validate_tick_range(pool, tick_lower_index, tick_upper_index)?;

    let sqrt_price_lower = tick_index_to_sqrt_price_x64(tick_lower_index)?;
    let sqrt_price_upper = tick_index_to_sqrt_price_x64(tick_upper_index)?;

    let (token_est_a, token_est_b) = tokens_from_liquidity(liquidity, pool.sqrt_price, sqrt_price_lower, sqrt_price_upper, false)?;

    let sqrt_price_current_lo = slippage::adjust_sqrt_price_for_slippage(pool.sqrt_price, slippage_bps, false)?;
    let sqrt_price_current_hi = slippage::adjust_sqrt_price_for_slippage(pool.sqrt_price, slippage_bps, true)?;

    let (token_min_a_at_lo, token_min_b_at_lo) = tokens_from_liquidity(liquidity, sqrt_price_current_lo, sqrt_price_lower, sqrt_price_upper, false)?;
    let (token_min_a_at_hi, token_min_b_at_hi) = tokens_from_liquidity(liquidity, sqrt_price_current_hi, sqrt_price_lower, sqrt_price_upper, false)?;

    Ok(DecreaseLiquidityQuote {
        token_est_a: u64::try_from(token_est_a).map_err(|_| QuoteError::TokenMaxExceeded)?,
        token_est_b: u64::try_from(token_est_b).map_err(|_| QuoteError::TokenMaxExceeded)?,
        token_min_a: u64::try_from(token_min_a_at_lo.min(token_min_a_at_hi)).map_err(|_| QuoteError::TokenMaxExceeded)?,
        token_min_b: u64::try_from(token_min_b_at_lo.min(token_min_b_at_hi)).map_err(|_| QuoteError::TokenMaxExceeded)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tick_array::TickArray;

    struct EmptyFetcher;
    impl TickArrayFetcher for EmptyFetcher {
        fn get_tick_array(&self, _address: Address) -> Result<Option<TickArray>> {
            Ok(None)
        }
    }

    fn full_range_splash_pool() -> Pool {
        Pool {
            address: Address([7; 32]),
            token_mint_a: Address([1; 32]),
            token_mint_b: Address([2; 32]),
            tick_spacing: 64,
            fee_rate: 1000,
            protocol_fee_rate: 0,
            liquidity: 1 << 33,
            sqrt_price: tick_index_to_sqrt_price_x64(0).unwrap(),
            tick_current_index: 0,
        }
    }

    #[test]
    fn s1_exact_in_basic_swap_quote() {
        let pool = full_range_splash_pool();
        let fetcher = EmptyFetcher;
        let quote = swap_quote_by_input_token(&pool, &fetcher, pool.token_mint_b, 20_000, 0, 0).unwrap();
        assert_eq!(quote.partial_fill, false);
        assert!(quote.estimated_amount_out > 0);
    }

    #[test]
    fn s2_exact_in_with_tiny_liquidity_partial_fills() {
        let mut pool = full_range_splash_pool();
        pool.liquidity = 1 << 10;
        let fetcher = EmptyFetcher;
        let quote = swap_quote_by_input_token(&pool, &fetcher, pool.token_mint_b, u64::MAX, 0, 0).unwrap();
        assert!(quote.partial_fill);
        assert!(quote.estimated_amount_in < u64::MAX);
        assert_eq!(quote.estimated_end_sqrt_price, crate::constants::MAX_SQRT_PRICE);
    }

    #[test]
    fn s6_zero_slippage_zero_current_price_at_lower_bound() {
        let pool = full_range_splash_pool();
        let quote = increase_liquidity_quote_by_input_token(&pool, pool.token_mint_b, 1000, 0, 64, 0).unwrap();
        assert_eq!(quote.liquidity, 0);
        assert_eq!(quote.token_est_a, 0);
        assert_eq!(quote.token_est_b, 0);
        assert_eq!(quote.token_max_a, 0);
        assert_eq!(quote.token_max_b, 0);
    }

    #[test]
    fn increase_liquidity_quote_widens_max_with_more_slippage() {
        let pool = full_range_splash_pool();
        let tight = increase_liquidity_quote_by_input_token(&pool, pool.token_mint_a, 1_000_000, -6400, 6400, 50).unwrap();
        let wide = increase_liquidity_quote_by_input_token(&pool, pool.token_mint_a, 1_000_000, -6400, 6400, 500).unwrap();
        assert!(wide.token_max_a >= tight.token_max_a);
        assert!(wide.token_max_b >= tight.token_max_b);
    }

    #[test]
    fn decrease_liquidity_quote_zero_slippage_is_identity() {
        let pool = full_range_splash_pool();
        let position = Position {
            pool: pool.address,
            tick_lower_index: -6400,
            tick_upper_index: 6400,
            liquidity: 1_000_000_000,
        };
        let quote = decrease_liquidity_quote_by_liquidity(&pool, &position, 1_000_000_000, 0).unwrap();
        assert_eq!(quote.token_min_a, quote.token_est_a);
        assert_eq!(quote.token_min_b, quote.token_est_b);
    }

    #[test]
    fn decrease_liquidity_quote_allows_partial_withdrawal() {
        let pool = full_range_splash_pool();
        let position = Position {
            pool: pool.address,
            tick_lower_index: -6400,
            tick_upper_index: 6400,
            liquidity: 1_000_000_000,
        };
        let full = decrease_liquidity_quote_by_liquidity(&pool, &position, position.liquidity, 0).unwrap();
        let half = decrease_liquidity_quote_by_liquidity(&pool, &position, position.liquidity / 2, 0).unwrap();
        assert!(half.token_est_a <= full.token_est_a);
        assert!(half.token_est_b <= full.token_est_b);
    }
}
