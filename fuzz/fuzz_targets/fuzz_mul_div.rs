#![no_main]

use arbitrary::Arbitrary;
use clamm_quote_core::error::QuoteError;
use clamm_quote_core::fixed_point::mul_div;
use honggfuzz::fuzz;

#[derive(Debug, Clone, Arbitrary)]
struct MulDivInput {
    x: u128,
    y: u128,
    d: u128,
}

fn fuzz_mul_div(input: MulDivInput) {
    let MulDivInput { x, y, d } = input;

    let down = mul_div(x, y, d, false);
    let up = mul_div(x, y, d, true);

    match (down, up) {
        (Ok(down), Ok(up)) => {
            assert!(up >= down);
            assert!(up - down <= 1);
            if x == 0 || y == 0 {
                assert_eq!(down, 0);
                assert_eq!(up, 0);
            }
            if d == 1 {
                if let Some(expected) = x.checked_mul(y) {
                    assert_eq!(down, expected);
                    assert_eq!(up, expected);
                }
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            assert!(matches!(e, QuoteError::DivideByZero | QuoteError::MathOverflow));
            if d == 0 {
                assert_eq!(e, QuoteError::DivideByZero);
            }
        }
    }
}

fn main() {
    loop {
        fuzz!(|data: MulDivInput| {
            fuzz_mul_div(data);
        });
    }
}
