//! Domain models for the lottery backend.
//!
//! Database-backed rows for events and applications, plus the
//! projections returned once a lottery has been drawn.

pub mod application;
pub mod event;
pub mod lottery;

pub use application::{Application, ApplicationStatus};
pub use event::{Event, EventState, EventSummary, NewEvent};
pub use lottery::{LotteryOutcome, LotteryResults};
