//! # Liquidity ⇄ token-amount conversions
//!
//! A position is bounded by `(sqrt_price_lower, sqrt_price_upper)`; its token
//! composition depends on where the pool's current price sits relative to
//! that range. Three cases, mirrored directly from the concentrated-liquidity
//! identity `amount_a = L·(1/√p_l − 1/√p_u)`, `amount_b = L·(√p_u − √p_l)`.

use crate::constants::ONE_X64;
use crate::error::{QuoteError, Result};
use crate::fixed_point::mul_div;

fn order(sqrt_price_lower: u128, sqrt_price_upper: u128) -> Result<(u128, u128)> {
    if sqrt_price_lower >= sqrt_price_upper {
        return Err(QuoteError::TickOrder);
    }
    Ok((sqrt_price_lower, sqrt_price_upper))
}

/// `token_a` delta for `liquidity` spread over `[sqrt_price_lower,
/// sqrt_price_upper]`. Round up when quoting a deposit, down when quoting a
/// withdrawal.
///
/// `L·(p_u − p_l)/(p_l·p_u)` computed as two sequential [`mul_div`] calls
/// (`L·2^64/p_u`, then `·(p_u−p_l)/p_l`) rather than one combined
/// `(L·Δp)<<64 / (p_l·p_u)`: the combined numerator can need close to 289
/// bits for liquidity and price values near the top of their `u128`/
/// `MAX_SQRT_PRICE` ranges, which silently loses bits shifted into a
/// 256-bit intermediate. Splitting the division keeps every intermediate
/// product within 256 bits, at the cost of a second rounding step in the
/// same direction as `round_up` — never the opposite one.
pub fn amount_a_delta(liquidity: u128, sqrt_price_lower: u128, sqrt_price_upper: u128, round_up: bool) -> Result<u128> {
    let (pl, pu) = order(sqrt_price_lower, sqrt_price_upper)?;
    let scaled = mul_div(liquidity, ONE_X64, pu, round_up)?;
    mul_div(scaled, pu - pl, pl, round_up)
}

/// `token_b` delta for `liquidity` spread over `[sqrt_price_lower,
/// sqrt_price_upper]`.
pub fn amount_b_delta(liquidity: u128, sqrt_price_lower: u128, sqrt_price_upper: u128, round_up: bool) -> Result<u128> {
    let (pl, pu) = order(sqrt_price_lower, sqrt_price_upper)?;
    mul_div(liquidity, pu - pl, ONE_X64, round_up)
}

/// The `(token_a, token_b)` composition of `liquidity` given where the
/// current price sits relative to the position's range — the three-case
/// table every concentrated-liquidity position follows.
pub fn tokens_from_liquidity(
    liquidity: u128,
    sqrt_price_current: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    round_up: bool,
) -> Result<(u128, u128)> {
    let (pl, pu) = order(sqrt_price_lower, sqrt_price_upper)?;
    if sqrt_price_current < pl {
        Ok((amount_a_delta(liquidity, pl, pu, round_up)?, 0))
    } else if sqrt_price_current < pu {
        let a = amount_a_delta(liquidity, sqrt_price_current, pu, round_up)?;
        let b = amount_b_delta(liquidity, pl, sqrt_price_current, round_up)?;
        Ok((a, b))
    } else {
        Ok((0, amount_b_delta(liquidity, pl, pu, round_up)?))
    }
}

/// Liquidity supported by an exact `amount_a` over `[sqrt_price_lower,
/// sqrt_price_upper]` — the inverse of [`amount_a_delta`]. Use `round_up =
/// false` when deriving liquidity from a caller-supplied deposit, so the
/// position never claims more liquidity than the amount actually backs.
pub fn liquidity_from_amount_a(amount_a: u64, sqrt_price_lower: u128, sqrt_price_upper: u128, round_up: bool) -> Result<u128> {
    let (pl, pu) = order(sqrt_price_lower, sqrt_price_upper)?;
    let intermediate = mul_div(pl, pu, ONE_X64, !round_up)?;
    mul_div(amount_a as u128, intermediate, pu - pl, round_up)
}

/// Liquidity supported by an exact `amount_b` over `[sqrt_price_lower,
/// sqrt_price_upper]` — the inverse of [`amount_b_delta`].
pub fn liquidity_from_amount_b(amount_b: u64, sqrt_price_lower: u128, sqrt_price_upper: u128, round_up: bool) -> Result<u128> {
    let (pl, pu) = order(sqrt_price_lower, sqrt_price_upper)?;
    mul_div(amount_b as u128, ONE_X64, pu - pl, round_up)
}

/// Liquidity a single-sided deposit of exactly one token supports, given
/// where the current price sits relative to the range. Mirrors the same
/// three-case split as [`tokens_from_liquidity`]: supplying the token the
/// range doesn't want at the current price (B above `sqrt_price_current`'s
/// range, A below it) yields zero liquidity rather than a division by a
/// degenerate (possibly zero-width) bound — most visibly when
/// `sqrt_price_current` sits exactly on `sqrt_price_lower` and the caller
/// offers token B, which the position cannot accept at that exact price.
pub fn liquidity_from_single_sided(
    sqrt_price_current: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    is_token_a: bool,
    amount: u64,
) -> Result<u128> {
    let (pl, pu) = order(sqrt_price_lower, sqrt_price_upper)?;

    if sqrt_price_current < pl {
        if is_token_a {
            liquidity_from_amount_a(amount, pl, pu, false)
        } else {
            Ok(0)
        }
    } else if sqrt_price_current < pu {
        if is_token_a {
            liquidity_from_amount_a(amount, sqrt_price_current, pu, false)
        } else if sqrt_price_current == pl {
            Ok(0)
        } else {
            liquidity_from_amount_b(amount, pl, sqrt_price_current, false)
        }
    } else if is_token_a {
        Ok(0)
    } else {
        liquidity_from_amount_b(amount, pl, pu, false)
    }
}

/// Liquidity a single-sided or dual-sided deposit of `(amount_a, amount_b)`
/// supports at `sqrt_price_current` — the minimum of what each side can
/// back, per the same three-case split as [`tokens_from_liquidity`].
pub fn max_liquidity_from_tokens(
    sqrt_price_current: u128,
    sqrt_price_lower: u128,
    sqrt_price_upper: u128,
    amount_a: u64,
    amount_b: u64,
) -> Result<u128> {
    let (pl, pu) = order(sqrt_price_lower, sqrt_price_upper)?;
    if sqrt_price_current < pl {
        liquidity_from_amount_a(amount_a, pl, pu, false)
    } else if sqrt_price_current < pu {
        let from_a = liquidity_from_amount_a(amount_a, sqrt_price_current, pu, false)?;
        let from_b = liquidity_from_amount_b(amount_b, pl, sqrt_price_current, false)?;
        Ok(from_a.min(from_b))
    } else {
        liquidity_from_amount_b(amount_b, pl, pu, false)
    }
}

pub mod slippage {
    use super::*;

    /// Widen (`increase = true`) or tighten (`false`) `sqrt_price` by
    /// `slippage_bps` out of 10,000. This is the same linear
    /// price-proportional adjustment the reference off-chain SDK applies at
    /// quote time — slippage tolerances are small enough in practice that
    /// the true `√(1±slippage)` correction and this linear one agree to
    /// within the sqrt-price's own integer resolution.
    pub fn adjust_sqrt_price_for_slippage(sqrt_price: u128, slippage_bps: u32, increase: bool) -> Result<u128> {
        let factor = slippage_factor(slippage_bps, increase)?;
        mul_div(sqrt_price, factor, 10_000, increase)
    }

    /// Widen or tighten a raw token amount by `slippage_bps` out of 10,000.
    pub fn adjust_amount_for_slippage(amount: u64, slippage_bps: u32, increase: bool) -> Result<u64> {
        let factor = slippage_factor(slippage_bps, increase)?;
        let adjusted = mul_div(amount as u128, factor, 10_000, increase)?;
        u64::try_from(adjusted).map_err(|_| QuoteError::TokenMaxExceeded)
    }

    fn slippage_factor(slippage_bps: u32, increase: bool) -> Result<u128> {
        if increase {
            10_000u128.checked_add(slippage_bps as u128).ok_or(QuoteError::MathOverflow)
        } else {
            Ok(10_000u128.saturating_sub(slippage_bps as u128))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tick_math::tick_index_to_sqrt_price_x64;

    fn price(tick: i32) -> u128 {
        tick_index_to_sqrt_price_x64(tick).unwrap()
    }

    #[test]
    fn below_range_is_all_token_a() {
        let (a, b) = tokens_from_liquidity(1_000_000, price(-100), price(0), price(100), true).unwrap();
        assert!(a > 0);
        assert_eq!(b, 0);
    }

    #[test]
    fn above_range_is_all_token_b() {
        let (a, b) = tokens_from_liquidity(1_000_000, price(200), price(0), price(100), true).unwrap();
        assert_eq!(a, 0);
        assert!(b > 0);
    }

    #[test]
    fn in_range_uses_both_tokens() {
        let (a, b) = tokens_from_liquidity(1_000_000, price(50), price(0), price(100), true).unwrap();
        assert!(a > 0);
        assert!(b > 0);
    }

    #[test]
    fn max_liquidity_from_tokens_is_bound_by_the_scarcer_side() {
        let pl = price(-100);
        let pu = price(100);
        let pc = price(0);

        // Plenty of token A, very little token B: the B side caps it.
        let capped = max_liquidity_from_tokens(pc, pl, pu, u64::MAX, 10).unwrap();
        let from_b_only = liquidity_from_amount_b(10, pl, pc, false).unwrap();
        assert_eq!(capped, from_b_only);

        // Outside the range entirely, only the relevant side matters.
        let below = max_liquidity_from_tokens(price(-200), pl, pu, 5_000, 0).unwrap();
        assert!(below > 0);
        let above = max_liquidity_from_tokens(price(200), pl, pu, 0, 5_000).unwrap();
        assert!(above > 0);
    }

    #[test]
    fn lower_must_precede_upper() {
        assert_eq!(
            tokens_from_liquidity(1, price(0), price(100), price(0), true),
            Err(QuoteError::TickOrder)
        );
    }

    #[test]
    fn liquidity_round_trip_stays_close() {
        let pl = price(-6400);
        let pu = price(6400);
        let liquidity = 5_000_000_000u128;
        let (amount_a, _) = tokens_from_liquidity(liquidity, pl, pl, pu, true).unwrap();
        let recovered = liquidity_from_amount_a(amount_a as u64, pl, pu, false).unwrap();
        assert!(recovered <= liquidity);
        assert!(liquidity - recovered <= 1);
    }

    #[test]
    fn zero_slippage_is_identity() {
        let p = price(1000);
        assert_eq!(slippage::adjust_sqrt_price_for_slippage(p, 0, true).unwrap(), p);
        assert_eq!(slippage::adjust_sqrt_price_for_slippage(p, 0, false).unwrap(), p);
        assert_eq!(slippage::adjust_amount_for_slippage(1000, 0, true).unwrap(), 1000);
    }

    #[test]
    fn tighter_slippage_never_increases_the_max() {
        let wide = slippage::adjust_amount_for_slippage(10_000, 500, true).unwrap();
        let tight = slippage::adjust_amount_for_slippage(10_000, 100, true).unwrap();
        assert!(tight <= wide);
    }
}
