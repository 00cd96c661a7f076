#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use clamm_quote_core::constants::{MAX_SQRT_PRICE, MAX_TICK_INDEX, MIN_SQRT_PRICE, MIN_TICK_INDEX};
use clamm_quote_core::error::QuoteError;
use clamm_quote_core::tick_math::{sqrt_price_x64_to_tick_index, tick_index_to_sqrt_price_x64};
use honggfuzz::fuzz;

#[derive(Debug, Clone)]
struct TickInput {
    tick: i32,
}

impl<'a> Arbitrary<'a> for TickInput {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let tick = match u.int_in_range(0..=100)? {
            0..=80 => u.int_in_range(MIN_TICK_INDEX..=MAX_TICK_INDEX)?,
            81..=90 => *u.choose(&[MIN_TICK_INDEX, MAX_TICK_INDEX, 0, -1, 1])?,
            _ => u.arbitrary::<i32>()?,
        };

        Ok(TickInput { tick })
    }
}

fn fuzz_tick_to_sqrt(input: TickInput) {
    let result = tick_index_to_sqrt_price_x64(input.tick);

    match result {
        Ok(sqrt_price) => {
            assert!((MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&input.tick));
            assert!((MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price));

            // The inverse must land back on the same tick.
            assert_eq!(sqrt_price_x64_to_tick_index(sqrt_price).unwrap(), input.tick);

            if input.tick < MAX_TICK_INDEX {
                let next_sqrt_price = tick_index_to_sqrt_price_x64(input.tick + 1).unwrap();
                assert!(next_sqrt_price > sqrt_price);
            }

            if input.tick == 0 {
                assert_eq!(sqrt_price, 1u128 << 64);
            }
        }
        Err(e) => {
            assert_eq!(e, QuoteError::InvalidTickIndex);
            assert!(input.tick < MIN_TICK_INDEX || input.tick > MAX_TICK_INDEX);
        }
    }
}

fn main() {
    loop {
        fuzz!(|data: TickInput| {
            fuzz_tick_to_sqrt(data);
        });
    }
}
