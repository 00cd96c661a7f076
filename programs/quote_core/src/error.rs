//! Crate-wide error taxonomy.
//!
//! Every fallible operation in this crate returns `Result<T, QuoteError>`.
//! No variant here is recovered internally — all of them are surfaced to
//! the caller, who may retry, adjust parameters, or translate the error
//! into a user-visible message.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteError {
    #[error("arithmetic overflow")]
    MathOverflow,

    #[error("division by zero")]
    DivideByZero,

    #[error("required input amount exceeds u64::MAX")]
    TokenMaxExceeded,

    #[error("tick index outside the valid domain, unaligned to spacing, or full-range-only violation")]
    InvalidTickIndex,

    #[error("lower tick must be strictly less than upper tick")]
    TickOrder,

    #[error("two-hop route legs do not share an intermediate mint")]
    InvalidIntermediaryMint,

    #[error("composed quote's intermediate amounts do not match under the no-partial-fill policy")]
    IntermediateTokenAmountMismatch,

    #[error("swap terminated with unconsumed amount but the caller disabled partial fill")]
    PartialFillNotAllowed,

    #[error("computed input exceeds the caller's maximum")]
    AboveInMaximum,

    #[error("computed output is below the caller's minimum")]
    BelowOutMinimum,

    #[error("account fetch failed: {0}")]
    FetchError(&'static str),

    #[error("malformed account data: {0}")]
    CodecError(&'static str),
}

pub type Result<T> = core::result::Result<T, QuoteError>;
