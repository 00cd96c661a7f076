//! # Wire codec
//!
//! Bit-exact (de)serialization of the on-chain `Pool`/`TickArray` account
//! layouts into this crate's value types. Parsing is in scope; fetching the
//! bytes from an RPC node is the caller's problem (see [`crate::tick_array::TickArrayFetcher`]
//! and [`crate::pool::PoolStore`]).

use crate::address::Address;
use crate::constants::{NUM_REWARDS, TICK_ARRAY_SIZE};
use crate::error::{QuoteError, Result};
use crate::pool::Pool;
use crate::tick_array::{Tick, TickArray};

const TICK_PAYLOAD_LEN: usize = 1 + 16 + 16 + 16 + 16 + 16 * NUM_REWARDS; // 113
const STATIC_TICK_ARRAY_LEN: usize = 4 + 32 + TICK_PAYLOAD_LEN * TICK_ARRAY_SIZE;
const POOL_HEADER_LEN: usize = 269;
const REWARD_INFO_LEN: usize = 128;
const POOL_LEN: usize = POOL_HEADER_LEN + REWARD_INFO_LEN * NUM_REWARDS;

fn read_u8(bytes: &[u8], offset: usize) -> Result<u8> {
    bytes.get(offset).copied().ok_or(QuoteError::CodecError("truncated account data"))
}

fn read_u16_le(bytes: &[u8], offset: usize) -> Result<u16> {
    let slice: [u8; 2] = bytes
        .get(offset..offset + 2)
        .ok_or(QuoteError::CodecError("truncated account data"))?
        .try_into()
        .unwrap();
    Ok(u16::from_le_bytes(slice))
}

fn read_i32_le(bytes: &[u8], offset: usize) -> Result<i32> {
    let slice: [u8; 4] = bytes
        .get(offset..offset + 4)
        .ok_or(QuoteError::CodecError("truncated account data"))?
        .try_into()
        .unwrap();
    Ok(i32::from_le_bytes(slice))
}

fn read_u64_le(bytes: &[u8], offset: usize) -> Result<u64> {
    let slice: [u8; 8] = bytes
        .get(offset..offset + 8)
        .ok_or(QuoteError::CodecError("truncated account data"))?
        .try_into()
        .unwrap();
    Ok(u64::from_le_bytes(slice))
}

fn read_u128_le(bytes: &[u8], offset: usize) -> Result<u128> {
    let slice: [u8; 16] = bytes
        .get(offset..offset + 16)
        .ok_or(QuoteError::CodecError("truncated account data"))?
        .try_into()
        .unwrap();
    Ok(u128::from_le_bytes(slice))
}

fn read_i128_le(bytes: &[u8], offset: usize) -> Result<i128> {
    let slice: [u8; 16] = bytes
        .get(offset..offset + 16)
        .ok_or(QuoteError::CodecError("truncated account data"))?
        .try_into()
        .unwrap();
    Ok(i128::from_le_bytes(slice))
}

fn read_address(bytes: &[u8], offset: usize) -> Result<Address> {
    let slice: [u8; 32] = bytes
        .get(offset..offset + 32)
        .ok_or(QuoteError::CodecError("truncated account data"))?
        .try_into()
        .unwrap();
    Ok(Address(slice))
}

fn decode_tick_payload(bytes: &[u8], offset: usize) -> Result<Tick> {
    let initialized = read_u8(bytes, offset)? != 0;
    let liquidity_net = read_i128_le(bytes, offset + 1)?;
    let liquidity_gross = read_u128_le(bytes, offset + 17)?;
    let fee_growth_outside_a = read_u128_le(bytes, offset + 33)?;
    let fee_growth_outside_b = read_u128_le(bytes, offset + 49)?;
    let mut reward_growths_outside = [0u128; NUM_REWARDS];
    for (i, slot) in reward_growths_outside.iter_mut().enumerate() {
        *slot = read_u128_le(bytes, offset + 65 + i * 16)?;
    }
    Ok(Tick {
        initialized,
        liquidity_net,
        liquidity_gross,
        fee_growth_outside_a,
        fee_growth_outside_b,
        reward_growths_outside,
    })
}

fn encode_tick_payload(out: &mut Vec<u8>, tick: &Tick) {
    out.push(tick.initialized as u8);
    out.extend_from_slice(&tick.liquidity_net.to_le_bytes());
    out.extend_from_slice(&tick.liquidity_gross.to_le_bytes());
    out.extend_from_slice(&tick.fee_growth_outside_a.to_le_bytes());
    out.extend_from_slice(&tick.fee_growth_outside_b.to_le_bytes());
    for growth in tick.reward_growths_outside {
        out.extend_from_slice(&growth.to_le_bytes());
    }
}

/// Decode a tick array account. Dispatches on total length: the static
/// 88-tick layout is fixed-size; the dynamic layout carries a leading `u16`
/// tick-count bitmap, then one `{initialized: u8, payload: [u8;112]}` entry
/// per slot, in order, for exactly `TICK_ARRAY_SIZE` slots — `initialized`
/// is each entry's own tag, there is no separate per-entry offset.
pub fn decode_tick_array(bytes: &[u8]) -> Result<TickArray> {
    if bytes.len() == STATIC_TICK_ARRAY_LEN {
        let start_tick_index = read_i32_le(bytes, 0)?;
        let whirlpool = read_address(bytes, 4)?;
        let mut ticks = Box::new([Tick::default(); TICK_ARRAY_SIZE]);
        let mut offset = 36;
        for slot in ticks.iter_mut() {
            *slot = decode_tick_payload(bytes, offset)?;
            offset += TICK_PAYLOAD_LEN;
        }
        return Ok(TickArray { start_tick_index, whirlpool, ticks });
    }

    // Dynamic layout: `start_tick_index: i32, whirlpool: [u8;32], bitmap: u16`
    // followed by `TICK_ARRAY_SIZE` entries of `{initialized: u8, payload:
    // [u8;112]}` — the same 113-byte entry shape `TICK_PAYLOAD_LEN` already
    // names, just preceded by a 2-byte header the static layout lacks. The
    // bitmap is read-through only; each entry already carries its own
    // `initialized` flag.
    const DYNAMIC_HEADER_LEN: usize = 4 + 32 + 2;
    const DYNAMIC_TICK_ARRAY_LEN: usize = DYNAMIC_HEADER_LEN + TICK_PAYLOAD_LEN * TICK_ARRAY_SIZE;
    if bytes.len() != DYNAMIC_TICK_ARRAY_LEN {
        return Err(QuoteError::CodecError("tick array account matches no known layout"));
    }
    let start_tick_index = read_i32_le(bytes, 0)?;
    let whirlpool = read_address(bytes, 4)?;
    let _tick_count_bitmap = read_u16_le(bytes, 36)?;

    let mut ticks = Box::new([Tick::default(); TICK_ARRAY_SIZE]);
    let mut offset = DYNAMIC_HEADER_LEN;
    for slot in ticks.iter_mut() {
        *slot = decode_tick_payload(bytes, offset)?;
        offset += TICK_PAYLOAD_LEN;
    }

    Ok(TickArray { start_tick_index, whirlpool, ticks })
}

/// Encode a tick array using the static 88-tick layout. Test/fixture use
/// only — the simulator never writes wire bytes.
pub fn encode_tick_array(array: &TickArray) -> Vec<u8> {
    let mut out = Vec::with_capacity(STATIC_TICK_ARRAY_LEN);
    out.extend_from_slice(&array.start_tick_index.to_le_bytes());
    out.extend_from_slice(&array.whirlpool.to_bytes());
    for tick in array.ticks.iter() {
        encode_tick_payload(&mut out, tick);
    }
    out
}

/// Encode a tick array using the dynamic bitmap-prefixed layout. Test/fixture
/// use only.
pub fn encode_dynamic_tick_array(array: &TickArray) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + 32 + 2 + TICK_PAYLOAD_LEN * TICK_ARRAY_SIZE);
    out.extend_from_slice(&array.start_tick_index.to_le_bytes());
    out.extend_from_slice(&array.whirlpool.to_bytes());
    let initialized_count = array.ticks.iter().filter(|t| t.initialized).count() as u16;
    out.extend_from_slice(&initialized_count.to_le_bytes());
    for tick in array.ticks.iter() {
        encode_tick_payload(&mut out, tick);
    }
    out
}

/// Decode the 269-byte pool header plus three 128-byte reward records. Reward
/// data itself is not modeled on `Pool` (out of scope for quoting), so those
/// bytes are validated for length and otherwise discarded.
pub fn decode_pool(bytes: &[u8]) -> Result<Pool> {
    if bytes.len() != POOL_LEN {
        return Err(QuoteError::CodecError("pool account has unexpected length"));
    }

    // Layout offsets within the 269-byte header, matching the on-chain
    // program: discriminator/config/authority bytes are skipped here since
    // the core never needs them, only the fields the quoting math consumes.
    let tick_spacing = read_u16_le(bytes, 41)?;
    let fee_rate = read_u64_le(bytes, 43)?;
    let protocol_fee_rate = read_u64_le(bytes, 51)?;
    let liquidity = read_u128_le(bytes, 59)?;
    let sqrt_price = read_u128_le(bytes, 75)?;
    let tick_current_index = read_i32_le(bytes, 91)?;
    let token_mint_a = read_address(bytes, 95)?;
    let token_mint_b = read_address(bytes, 127)?;

    Ok(Pool {
        address: Address::zeroed(),
        token_mint_a,
        token_mint_b,
        tick_spacing,
        fee_rate,
        protocol_fee_rate,
        liquidity,
        sqrt_price,
        tick_current_index,
    })
}

/// Encode a pool into the fixed 269-byte header plus three zeroed reward
/// records. Test/fixture use only.
pub fn encode_pool(pool: &Pool) -> Vec<u8> {
    let mut out = vec![0u8; POOL_LEN];
    out[41..43].copy_from_slice(&pool.tick_spacing.to_le_bytes());
    out[43..51].copy_from_slice(&pool.fee_rate.to_le_bytes());
    out[51..59].copy_from_slice(&pool.protocol_fee_rate.to_le_bytes());
    out[59..75].copy_from_slice(&pool.liquidity.to_le_bytes());
    out[75..91].copy_from_slice(&pool.sqrt_price.to_le_bytes());
    out[91..95].copy_from_slice(&pool.tick_current_index.to_le_bytes());
    out[95..127].copy_from_slice(&pool.token_mint_a.to_bytes());
    out[127..159].copy_from_slice(&pool.token_mint_b.to_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_array() -> TickArray {
        let mut array = TickArray::zeroed(-5632, Address([9; 32]));
        array.ticks[3] = Tick {
            initialized: true,
            liquidity_net: -42,
            liquidity_gross: 42,
            fee_growth_outside_a: 7,
            fee_growth_outside_b: 9,
            reward_growths_outside: [1, 2, 3],
        };
        array
    }

    #[test]
    fn tick_array_round_trips_through_static_layout() {
        let array = sample_array();
        let bytes = encode_tick_array(&array);
        assert_eq!(bytes.len(), STATIC_TICK_ARRAY_LEN);
        let decoded = decode_tick_array(&bytes).unwrap();
        assert_eq!(decoded.start_tick_index, array.start_tick_index);
        assert_eq!(decoded.whirlpool, array.whirlpool);
        assert_eq!(decoded.ticks[3], array.ticks[3]);
        assert_eq!(decoded.ticks[0], Tick::default());
    }

    #[test]
    fn tick_array_decode_rejects_truncated_input() {
        let bytes = vec![0u8; 10];
        assert!(matches!(decode_tick_array(&bytes), Err(QuoteError::CodecError(_))));
    }

    #[test]
    fn dynamic_tick_array_layout_round_trips() {
        let array = sample_array();
        let bytes = encode_dynamic_tick_array(&array);
        let decoded = decode_tick_array(&bytes).unwrap();
        assert_eq!(decoded.start_tick_index, array.start_tick_index);
        assert_eq!(decoded.whirlpool, array.whirlpool);
        assert_eq!(decoded.ticks[3], array.ticks[3]);
        assert_eq!(decoded.ticks[0], Tick::default());
    }

    #[test]
    fn pool_round_trips_through_header_layout() {
        let pool = Pool {
            address: Address::zeroed(),
            token_mint_a: Address([1; 32]),
            token_mint_b: Address([2; 32]),
            tick_spacing: 64,
            fee_rate: 3000,
            protocol_fee_rate: 300,
            liquidity: 123_456_789,
            sqrt_price: crate::constants::ONE_X64,
            tick_current_index: -128,
        };
        let bytes = encode_pool(&pool);
        assert_eq!(bytes.len(), POOL_LEN);
        let decoded = decode_pool(&bytes).unwrap();
        assert_eq!(decoded.token_mint_a, pool.token_mint_a);
        assert_eq!(decoded.token_mint_b, pool.token_mint_b);
        assert_eq!(decoded.tick_spacing, pool.tick_spacing);
        assert_eq!(decoded.fee_rate, pool.fee_rate);
        assert_eq!(decoded.liquidity, pool.liquidity);
        assert_eq!(decoded.sqrt_price, pool.sqrt_price);
        assert_eq!(decoded.tick_current_index, pool.tick_current_index);
    }

    #[test]
    fn pool_decode_rejects_wrong_length() {
        assert!(matches!(decode_pool(&[0u8; 10]), Err(QuoteError::CodecError(_))));
    }
}
