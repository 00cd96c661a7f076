//! # Pool and position value types
//!
//! Plain-value entities the rest of the crate operates on. Nothing here owns
//! I/O — `Pool` and `Position` are produced by [`crate::codec`] or by test
//! fixtures and passed into `QuoteBuilder` by value.

use crate::address::Address;
use crate::constants::FULL_RANGE_ONLY_TICK_SPACING;
use crate::error::{QuoteError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pool {
    pub address: Address,
    pub token_mint_a: Address,
    pub token_mint_b: Address,
    pub tick_spacing: u16,
    /// Hundredths of a basis point; divisor [`crate::constants::FEE_RATE_DIVISOR`].
    pub fee_rate: u64,
    /// Basis points; divisor [`crate::constants::PROTOCOL_FEE_RATE_DIVISOR`].
    pub protocol_fee_rate: u64,
    pub liquidity: u128,
    pub sqrt_price: u128,
    pub tick_current_index: i32,
}

impl Pool {
    /// `true` when the only legal position on this pool spans its entire
    /// tick domain — the reserved sentinel spacing used by adaptive-fee and
    /// splash-style pools.
    pub fn is_full_range_only(&self) -> bool {
        self.tick_spacing == FULL_RANGE_ONLY_TICK_SPACING
    }

    /// Which mint is "token A" for a given swap input, or `Err` if `mint`
    /// matches neither side of the pool.
    pub fn a_to_b_for_input(&self, input_mint: Address) -> Result<bool> {
        if input_mint == self.token_mint_a {
            Ok(true)
        } else if input_mint == self.token_mint_b {
            Ok(false)
        } else {
            Err(QuoteError::InvalidIntermediaryMint)
        }
    }

    /// Which mint is "token A" given the requested swap *output*.
    pub fn a_to_b_for_output(&self, output_mint: Address) -> Result<bool> {
        if output_mint == self.token_mint_b {
            Ok(true)
        } else if output_mint == self.token_mint_a {
            Ok(false)
        } else {
            Err(QuoteError::InvalidIntermediaryMint)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub pool: Address,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    pub liquidity: u128,
}

/// Read-through store `QuoteBuilder` pulls pools from.
pub trait PoolStore {
    fn get_pool(&self, address: Address) -> Result<Pool>;
}

/// Validate a prospective position's bounds against a pool's domain: lower
/// strictly below upper, both aligned to `tick_spacing`, both within
/// `[MIN_TICK_INDEX, MAX_TICK_INDEX]`, and — on a full-range-only pool —
/// exactly the full domain.
pub fn validate_tick_range(pool: &Pool, tick_lower_index: i32, tick_upper_index: i32) -> Result<()> {
    use crate::constants::{MAX_TICK_INDEX, MIN_TICK_INDEX};

    if tick_lower_index >= tick_upper_index {
        return Err(QuoteError::TickOrder);
    }
    if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick_lower_index)
        || !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick_upper_index)
    {
        return Err(QuoteError::InvalidTickIndex);
    }

    if pool.is_full_range_only() {
        if tick_lower_index != MIN_TICK_INDEX || tick_upper_index != MAX_TICK_INDEX {
            return Err(QuoteError::InvalidTickIndex);
        }
        return Ok(());
    }

    let spacing = pool.tick_spacing as i32;
    if tick_lower_index % spacing != 0 || tick_upper_index % spacing != 0 {
        return Err(QuoteError::InvalidTickIndex);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(tick_spacing: u16) -> Pool {
        Pool {
            address: Address::zeroed(),
            token_mint_a: Address([1; 32]),
            token_mint_b: Address([2; 32]),
            tick_spacing,
            fee_rate: 3000,
            protocol_fee_rate: 300,
            liquidity: 0,
            sqrt_price: crate::constants::ONE_X64,
            tick_current_index: 0,
        }
    }

    #[test]
    fn direction_depends_on_matched_mint() {
        let p = pool(64);
        assert_eq!(p.a_to_b_for_input(p.token_mint_a), Ok(true));
        assert_eq!(p.a_to_b_for_input(p.token_mint_b), Ok(false));
        assert_eq!(p.a_to_b_for_input(Address([9; 32])), Err(QuoteError::InvalidIntermediaryMint));
    }

    #[test]
    fn ticks_must_be_ordered_and_aligned() {
        let p = pool(64);
        assert_eq!(validate_tick_range(&p, 128, 64), Err(QuoteError::TickOrder));
        assert_eq!(validate_tick_range(&p, 10, 64), Err(QuoteError::InvalidTickIndex));
        assert_eq!(validate_tick_range(&p, 0, 64), Ok(()));
    }

    #[test]
    fn pool_store_resolves_by_address() {
        struct FixedStore(Pool);
        impl PoolStore for FixedStore {
            fn get_pool(&self, address: Address) -> Result<Pool> {
                if address == self.0.address {
                    Ok(self.0)
                } else {
                    Err(QuoteError::FetchError("no pool at that address"))
                }
            }
        }

        let p = pool(64);
        let store = FixedStore(p);
        assert_eq!(store.get_pool(p.address).unwrap(), p);
        assert_eq!(store.get_pool(Address([9; 32])), Err(QuoteError::FetchError("no pool at that address")));
    }

    #[test]
    fn full_range_only_pool_rejects_narrower_positions() {
        let p = pool(FULL_RANGE_ONLY_TICK_SPACING);
        assert_eq!(
            validate_tick_range(&p, 0, 64),
            Err(QuoteError::InvalidTickIndex)
        );
        assert_eq!(
            validate_tick_range(&p, crate::constants::MIN_TICK_INDEX, crate::constants::MAX_TICK_INDEX),
            Ok(())
        );
    }
}
