//! Lottery engine.
//!
//! Pure selection logic with no access to the store: an unbiased
//! Fisher–Yates shuffle over the pending pool, cut at the event's capacity.

pub mod draw;

pub use draw::{select_winners, shuffle, Draw, LotteryError, LotteryResult};
