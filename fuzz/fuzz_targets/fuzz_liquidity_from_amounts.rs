#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use clamm_quote_core::constants::{MAX_TICK_INDEX, MIN_TICK_INDEX};
use clamm_quote_core::position_math::{liquidity_from_amount_a, liquidity_from_amount_b, tokens_from_liquidity};
use clamm_quote_core::tick_math::tick_index_to_sqrt_price_x64;
use honggfuzz::fuzz;

#[derive(Debug, Clone)]
struct LiquidityInput {
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    liquidity: u128,
}

impl<'a> Arbitrary<'a> for LiquidityInput {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let a = u.int_in_range(MIN_TICK_INDEX..=MAX_TICK_INDEX)?;
        let b = u.int_in_range(MIN_TICK_INDEX..=MAX_TICK_INDEX)?;
        let (tick_lower, tick_upper) = if a <= b { (a, b) } else { (b, a) };
        let tick_current = u.int_in_range(MIN_TICK_INDEX..=MAX_TICK_INDEX)?;
        let liquidity = u.int_in_range(0u128..=(1u128 << 100))?;
        Ok(LiquidityInput { tick_lower, tick_upper, tick_current, liquidity })
    }
}

fn fuzz_liquidity_from_amounts(input: LiquidityInput) {
    if input.tick_lower == input.tick_upper {
        return;
    }

    let pl = tick_index_to_sqrt_price_x64(input.tick_lower).unwrap();
    let pu = tick_index_to_sqrt_price_x64(input.tick_upper).unwrap();
    let pc = tick_index_to_sqrt_price_x64(input.tick_current).unwrap();

    let Ok((amount_a, amount_b)) = tokens_from_liquidity(input.liquidity, pc, pl, pu, true) else {
        return;
    };

    // Below range: all token A, zero token B. Above range: the reverse.
    if pc < pl {
        assert_eq!(amount_b, 0);
    } else if pc >= pu {
        assert_eq!(amount_a, 0);
    }

    // Recovering liquidity from the rounded-up deposit amount never claims
    // more than we started with.
    if amount_a <= u64::MAX as u128 && amount_a > 0 {
        if let Ok(recovered) = liquidity_from_amount_a(amount_a as u64, pl.max(pc), pu, false) {
            if pc < pu {
                assert!(recovered <= input.liquidity);
            }
        }
    }
    if amount_b <= u64::MAX as u128 && amount_b > 0 {
        if let Ok(recovered) = liquidity_from_amount_b(amount_b as u64, pl, pu.min(pc), false) {
            if pc > pl {
                assert!(recovered <= input.liquidity);
            }
        }
    }
}

fn main() {
    loop {
        fuzz!(|data: LiquidityInput| {
            fuzz_liquidity_from_amounts(data);
        });
    }
}
