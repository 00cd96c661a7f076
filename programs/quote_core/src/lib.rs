//! # clamm-quote-core
//!
//! Off-chain quoting and routing core for a concentrated-liquidity AMM:
//! tick/price math, sparse tick-array traversal, swap simulation, liquidity
//! quoting, and two-hop route composition. Everything here is pure and
//! synchronous — no RPC client, no instruction encoding, no transaction
//! assembly. Callers plug in their own [`tick_array::TickArrayFetcher`] and
//! [`pool::PoolStore`] to materialize the account data this crate's math
//! consumes.

pub mod address;
pub mod codec;
pub mod constants;
pub mod error;
pub mod fixed_point;
pub mod pool;
pub mod position_math;
pub mod quote;
pub mod swap_simulator;
pub mod swap_step;
pub mod tick_array;
pub mod tick_math;
pub mod two_hop;


pub use address::Address;
pub use error::{QuoteError, Result};
pub use pool::{Pool, PoolStore, Position};
pub use quote::{
    decrease_liquidity_quote_by_liquidity, increase_liquidity_quote_by_input_token,
    swap_quote_by_input_token, swap_quote_by_output_token, DecreaseLiquidityQuote,
    IncreaseLiquidityQuote, SwapQuote,
};
pub use tick_array::{Tick, TickArray, TickArrayFetcher};
pub use two_hop::{compose_two_hop_swap_quote, TwoHopQuote};
