//! Numeric constants mandated by the on-chain engine this core must agree
//! with bit-for-bit. Nothing here is a tuning knob — changing any of these
//! values changes which prices/ticks the simulator considers valid.

pub const FRAC_BITS: u32 = 64;
pub const ONE_X64: u128 = 1u128 << FRAC_BITS;

pub const TICK_ARRAY_SIZE: usize = 88;

pub const MAX_TICK_INDEX: i32 = 443_636;
pub const MIN_TICK_INDEX: i32 = -443_636;

pub const MAX_SQRT_PRICE: u128 = 79_226_673_515_401_279_992_447_579_055;
pub const MIN_SQRT_PRICE: u128 = 4_295_048_016;

pub const FEE_RATE_DIVISOR: u64 = 1_000_000;
pub const PROTOCOL_FEE_RATE_DIVISOR: u64 = 10_000;

pub const NUM_REWARDS: usize = 3;

/// A pool whose `tick_spacing` equals this sentinel only ever hosts a single
/// full-range position; any attempt to open a narrower position on it is
/// rejected with `InvalidTickIndex`.
pub const FULL_RANGE_ONLY_TICK_SPACING: u16 = u16::MAX;
