//! # Sparse tick storage
//!
//! Ticks are addressed indirectly through fixed-size [`TickArray`]s rather
//! than a flat map, mirroring how the on-chain program stores them. Most
//! ticks in a pool's domain are never initialized, so a pool only pays
//! storage (and the simulator only pays traversal time) for the ticks that
//! actually bound a position.

use crate::address::Address;
use crate::constants::TICK_ARRAY_SIZE;
use crate::error::{QuoteError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tick {
    pub initialized: bool,
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
    pub fee_growth_outside_a: u128,
    pub fee_growth_outside_b: u128,
    pub reward_growths_outside: [u128; crate::constants::NUM_REWARDS],
}

#[derive(Clone)]
pub struct TickArray {
    pub start_tick_index: i32,
    pub whirlpool: Address,
    pub ticks: Box<[Tick; TICK_ARRAY_SIZE]>,
}

impl TickArray {
    pub fn zeroed(start_tick_index: i32, whirlpool: Address) -> Self {
        Self {
            start_tick_index,
            whirlpool,
            ticks: Box::new([Tick::default(); TICK_ARRAY_SIZE]),
        }
    }

    /// Offset of `tick_index` within this array's slots, or `None` if the
    /// tick does not belong to this array.
    fn offset_of(&self, tick_index: i32, tick_spacing: u16) -> Option<usize> {
        let delta = tick_index.checked_sub(self.start_tick_index)?;
        let spacing = tick_spacing as i32;
        if delta < 0 || delta % spacing != 0 {
            return None;
        }
        let idx = (delta / spacing) as usize;
        if idx >= TICK_ARRAY_SIZE {
            return None;
        }
        Some(idx)
    }

    pub fn tick_at(&self, tick_index: i32, tick_spacing: u16) -> Option<&Tick> {
        self.offset_of(tick_index, tick_spacing).map(|i| &self.ticks[i])
    }
}

/// `⌊t / (s·88)⌋ · (s·88)`, floored toward negative infinity — the start
/// index of the array that would hold tick `t` under spacing `s`.
pub fn start_tick_index_for(tick_index: i32, tick_spacing: u16) -> i32 {
    let ticks_per_array = tick_spacing as i32 * TICK_ARRAY_SIZE as i32;
    tick_index.div_euclid(ticks_per_array) * ticks_per_array
}

/// The three consecutive array start indices a swap in `a_to_b`'s direction
/// will need, starting from the array containing `current_tick`. This is
/// exactly the account list the on-chain program requires for a swap.
pub fn candidate_array_starts(current_tick: i32, tick_spacing: u16, a_to_b: bool) -> [i32; 3] {
    let ticks_per_array = tick_spacing as i32 * TICK_ARRAY_SIZE as i32;
    let start = start_tick_index_for(current_tick, tick_spacing);
    if a_to_b {
        [start, start - ticks_per_array, start - 2 * ticks_per_array]
    } else {
        [start, start + ticks_per_array, start + 2 * ticks_per_array]
    }
}

/// Read-through store the simulator pulls tick arrays from. `Ok(None)`
/// means the account is not initialized on chain; the simulator treats that
/// as a zeroed array rather than an error.
pub trait TickArrayFetcher {
    fn get_tick_array(&self, address: Address) -> Result<Option<TickArray>>;
}

/// A materialized window of (at most) five consecutive tick arrays —
/// current ± 2 — built once per quote from whatever the fetcher returned.
/// `SwapSimulator` drives traversal entirely against this in-memory window;
/// no I/O happens once it is constructed.
pub struct TickArraySequence {
    arrays: Vec<TickArray>,
    tick_spacing: u16,
}

impl TickArraySequence {
    pub fn new(arrays: Vec<TickArray>, tick_spacing: u16) -> Self {
        let mut arrays = arrays;
        arrays.sort_by_key(|a| a.start_tick_index);
        Self { arrays, tick_spacing }
    }

    pub fn from_fetcher(
        fetcher: &dyn TickArrayFetcher,
        whirlpool: Address,
        pool_address_of: impl Fn(i32) -> Address,
        current_tick: i32,
        tick_spacing: u16,
        a_to_b: bool,
    ) -> Result<Self> {
        let starts = candidate_array_starts(current_tick, tick_spacing, a_to_b);

        let mut arrays = Vec::with_capacity(starts.len());
        for start in starts {
            let addr = pool_address_of(start);
            let array = match fetcher.get_tick_array(addr)? {
                Some(array) => array,
                None => {
                    tracing::debug!(start, "tick array not initialized on chain, synthesizing zeroed array");
                    TickArray::zeroed(start, whirlpool)
                }
            };
            arrays.push(array);
        }
        Ok(Self::new(arrays, tick_spacing))
    }

    /// The tick array in this sequence that would hold `tick_index`, if any.
    pub fn array_containing(&self, tick_index: i32) -> Option<&TickArray> {
        let start = start_tick_index_for(tick_index, self.tick_spacing);
        self.arrays.iter().find(|a| a.start_tick_index == start)
    }

    /// The next initialized tick strictly in the direction of motion
    /// (`a_to_b = true` ⇒ decreasing, `false` ⇒ increasing), or `None` if
    /// traversal runs off the edge of the materialized window.
    pub fn next_initialized_tick(&self, current_tick: i32, a_to_b: bool) -> Result<Option<(i32, Tick)>> {
        let spacing = self.tick_spacing as i32;
        let ticks_per_array = spacing * TICK_ARRAY_SIZE as i32;

        let mut start = start_tick_index_for(current_tick, self.tick_spacing);
        // Search within the current array first, then step to neighboring
        // arrays in the sequence until the window is exhausted.
        loop {
            let Some(array) = self.arrays.iter().find(|a| a.start_tick_index == start) else {
                return Ok(None);
            };

            let offsets: Box<dyn Iterator<Item = usize>> = if a_to_b {
                let upper = array
                    .offset_of(current_tick, self.tick_spacing)
                    .unwrap_or(TICK_ARRAY_SIZE);
                Box::new((0..upper).rev())
            } else {
                let lower = array
                    .offset_of(current_tick, self.tick_spacing)
                    .map(|o| o + 1)
                    .unwrap_or(0);
                Box::new(lower..TICK_ARRAY_SIZE)
            };

            for offset in offsets {
                let tick = &array.ticks[offset];
                if tick.initialized {
                    let index = array.start_tick_index + offset as i32 * spacing;
                    return Ok(Some((index, *tick)));
                }
            }

            start = if a_to_b { start - ticks_per_array } else { start + ticks_per_array };
            if !self.arrays.iter().any(|a| a.start_tick_index == start) {
                return Ok(None);
            }
        }
    }
}

/// Apply a crossed tick's `liquidity_net` to the running pool liquidity.
/// Crossing decreasing in price (`a_to_b`) subtracts it; increasing adds it.
pub fn apply_liquidity_net(current_liquidity: u128, liquidity_net: i128, a_to_b: bool) -> Result<u128> {
    let delta = if a_to_b { -liquidity_net } else { liquidity_net };
    if delta >= 0 {
        current_liquidity.checked_add(delta as u128).ok_or(QuoteError::MathOverflow)
    } else {
        current_liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(QuoteError::MathOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address([n; 32])
    }

    #[test]
    fn start_tick_rounds_toward_negative_infinity() {
        assert_eq!(start_tick_index_for(0, 64), 0);
        assert_eq!(start_tick_index_for(5632, 64), 5632); // 64 * 88
        assert_eq!(start_tick_index_for(5631, 64), 0);
        assert_eq!(start_tick_index_for(-1, 64), -5632);
    }

    #[test]
    fn candidate_arrays_follow_swap_direction() {
        let up = candidate_array_starts(0, 64, false);
        assert_eq!(up, [0, 5632, 11264]);
        let down = candidate_array_starts(0, 64, true);
        assert_eq!(down, [0, -5632, -11264]);
    }

    #[test]
    fn zeroed_array_has_no_initialized_ticks() {
        let array = TickArray::zeroed(0, addr(1));
        let seq = TickArraySequence::new(vec![array], 64);
        assert_eq!(seq.next_initialized_tick(0, false).unwrap(), None);
    }

    #[test]
    fn tick_at_looks_up_by_absolute_index() {
        let mut array = TickArray::zeroed(0, addr(1));
        array.ticks[10] = Tick {
            initialized: true,
            liquidity_net: 500,
            liquidity_gross: 500,
            ..Default::default()
        };
        assert_eq!(array.tick_at(640, 64).unwrap().liquidity_net, 500);
        assert_eq!(array.tick_at(0, 64).unwrap(), &Tick::default());
        assert!(array.tick_at(641, 64).is_none(), "unaligned tick");
        assert!(array.tick_at(-64, 64).is_none(), "tick before this array's start");
    }

    #[test]
    fn finds_initialized_tick_in_direction() {
        let mut array = TickArray::zeroed(0, addr(1));
        array.ticks[10] = Tick {
            initialized: true,
            liquidity_net: 500,
            liquidity_gross: 500,
            ..Default::default()
        };
        let seq = TickArraySequence::new(vec![array], 64);
        let (index, tick) = seq.next_initialized_tick(0, false).unwrap().unwrap();
        assert_eq!(index, 640);
        assert_eq!(tick.liquidity_net, 500);
    }

    #[test]
    fn liquidity_net_sign_depends_on_direction() {
        assert_eq!(apply_liquidity_net(1000, 500, false).unwrap(), 1500);
        assert_eq!(apply_liquidity_net(1000, 500, true).unwrap(), 500);
        assert_eq!(apply_liquidity_net(1000, -500, false).unwrap(), 500);
        assert_eq!(apply_liquidity_net(1000, -500, true).unwrap(), 1500);
    }
}
