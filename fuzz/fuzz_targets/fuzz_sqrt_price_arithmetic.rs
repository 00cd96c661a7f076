#![no_main]

use arbitrary::Arbitrary;
use clamm_quote_core::constants::ONE_X64;
use clamm_quote_core::error::QuoteError;
use clamm_quote_core::fixed_point::{checked_mul_shift_right_64, mul_div};
use honggfuzz::fuzz;

#[derive(Debug, Clone, Arbitrary)]
struct SqrtPriceInput {
    a: u128,
    b: u128,
}

fn fuzz_sqrt_price_arithmetic(input: SqrtPriceInput) {
    match mul_div(input.a, input.b, ONE_X64, false) {
        Ok(product) => {
            if input.a == 0 || input.b == 0 {
                assert_eq!(product, 0);
            }
            // `mul_div`'s dedicated shift fold must agree with its generic
            // 256-bit-division path for the one divisor shape they overlap on.
            assert_eq!(checked_mul_shift_right_64(input.a, input.b).unwrap(), product);
        }
        Err(e) => assert_eq!(e, QuoteError::MathOverflow),
    }

    match mul_div(input.a, input.b, input.a.max(input.b).max(1), true) {
        Ok(quotient) => {
            assert!(quotient <= input.a.max(input.b));
        }
        Err(e) => assert_eq!(e, QuoteError::MathOverflow),
    }

    // Dividing by the Q64.64 representation of one is always the identity
    // (when it doesn't overflow the round-up path).
    if let Ok(product) = mul_div(input.a, ONE_X64, ONE_X64, true) {
        assert_eq!(product, input.a);
    }
}

fn main() {
    loop {
        fuzz!(|data: SqrtPriceInput| {
            fuzz_sqrt_price_arithmetic(data);
        });
    }
}
