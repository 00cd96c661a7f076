//! # Tick ⇄ √price
//!
//! Two pure functions that are exact inverses on initializable ticks. Both
//! are integer-only — no `f64::powf`, no floating point anywhere in this
//! module — because the on-chain engine this core must agree with bit-exactly
//! is integer-only too, and any float rounding would silently desync the
//! two.

use crate::constants::{FRAC_BITS, MAX_SQRT_PRICE, MAX_TICK_INDEX, MIN_SQRT_PRICE, MIN_TICK_INDEX, ONE_X64};
use crate::error::{QuoteError, Result};
use crate::fixed_point::mul_div;

/// `1.0001^(2^i)` in Q64.64, for `i` in `[0, 18]`. Folding these in on the
/// bits of `|tick|` builds `1.0001^|tick|` one power-of-two factor at a
/// time; this is the sole acceptable way to get from a tick index to a
/// price — the alternative (`1.0001f64.powi(tick)`) drifts from the
/// on-chain result by enough ulps to misprice a swap.
const POW2_COEFF: [u128; 19] = [
    0xfffcb933bd6fad38,
    0xfff97272373d4132,
    0xfff2e50f5f656933,
    0xffe5caca7e10e4e6,
    0xffcb9843d60f615a,
    0xff973b41fa98c081,
    0xff2ea16466c96a38,
    0xfe5dee046a99a2a8,
    0xfcbe86c7900a88af,
    0xf987a7253ac41317,
    0xf3392b0822b70006,
    0xe7159475a2c29b74,
    0xd097f3bdfd2022b9,
    0xa9f746462d870fe0,
    0x70d869a156d2a1b9,
    0x31be135f97d08fda,
    0x09aa508b5b7a84e2,
    0x005d6af8dedb8119,
    0x00002216e584f5fa,
];

/// Convert a tick index to its Q64.64 square-root price.
pub fn tick_index_to_sqrt_price_x64(tick: i32) -> Result<u128> {
    if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick) {
        return Err(QuoteError::InvalidTickIndex);
    }

    let abs_tick = tick.unsigned_abs();
    let mut ratio: u128 = ONE_X64;
    for (i, coeff) in POW2_COEFF.iter().enumerate() {
        if abs_tick & (1 << i) != 0 {
            ratio = mul_div(ratio, *coeff, ONE_X64, false)?;
        }
    }

    if tick > 0 {
        ratio = mul_div(ONE_X64, ONE_X64, ratio, false)?;
    }

    Ok(ratio.clamp(MIN_SQRT_PRICE, MAX_SQRT_PRICE))
}

/// Convert a Q64.64 square-root price to the unique tick `t` such that
/// `tick_index_to_sqrt_price_x64(t) <= sqrt_price < tick_index_to_sqrt_price_x64(t+1)`.
///
/// Implemented as a binary search over `[MIN_TICK_INDEX, MAX_TICK_INDEX]`:
/// each iteration fixes one more bit of the answer, which is the integer
/// analogue of the bit-length decomposition a continuous `log` would give.
pub fn sqrt_price_x64_to_tick_index(sqrt_price: u128) -> Result<i32> {
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price) {
        return Err(QuoteError::InvalidTickIndex);
    }

    let mut low = MIN_TICK_INDEX;
    let mut high = MAX_TICK_INDEX;

    while low < high {
        // Bias the midpoint high so the loop converges on the greatest
        // tick whose price does not exceed the target.
        let mid = low + (high - low + 1) / 2;
        let mid_price = tick_index_to_sqrt_price_x64(mid)?;
        if mid_price <= sqrt_price {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    Ok(low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_zero_is_one() {
        assert_eq!(tick_index_to_sqrt_price_x64(0).unwrap(), ONE_X64);
    }

    #[test]
    fn bounds_reject_out_of_range_ticks() {
        assert_eq!(
            tick_index_to_sqrt_price_x64(MAX_TICK_INDEX + 1),
            Err(QuoteError::InvalidTickIndex)
        );
        assert_eq!(
            tick_index_to_sqrt_price_x64(MIN_TICK_INDEX - 1),
            Err(QuoteError::InvalidTickIndex)
        );
    }

    #[test]
    fn monotone_increasing() {
        let mut prev = tick_index_to_sqrt_price_x64(MIN_TICK_INDEX).unwrap();
        for tick in (MIN_TICK_INDEX..MAX_TICK_INDEX).step_by(4001) {
            let price = tick_index_to_sqrt_price_x64(tick).unwrap();
            assert!(price >= prev);
            prev = price;
        }
    }

    #[test]
    fn bijection_round_trips() {
        for tick in (-443_636i32..=443_636).step_by(3137) {
            let price = tick_index_to_sqrt_price_x64(tick).unwrap();
            assert_eq!(sqrt_price_x64_to_tick_index(price).unwrap(), tick);
        }
    }

    #[test]
    fn inverse_floors_between_adjacent_ticks() {
        let price = tick_index_to_sqrt_price_x64(1000).unwrap();
        let next_price = tick_index_to_sqrt_price_x64(1001).unwrap();
        if next_price > price + 1 {
            let between = price + 1;
            assert_eq!(sqrt_price_x64_to_tick_index(between).unwrap(), 1000);
        }
    }

    #[test]
    fn extreme_ticks_stay_within_sqrt_price_bounds() {
        let lo = tick_index_to_sqrt_price_x64(MIN_TICK_INDEX).unwrap();
        let hi = tick_index_to_sqrt_price_x64(MAX_TICK_INDEX).unwrap();
        assert!((MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&lo));
        assert!((MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&hi));
        assert!(lo < hi);
    }
}
