use super::{Application, Event};
use serde::Serialize;

/// Counts reported after a lottery commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LotteryOutcome {
    pub total: usize,
    pub winners: usize,
    pub losers: usize,
}

/// Persisted partition of an executed event, each side ordered by name
#[derive(Debug, Clone, Serialize)]
pub struct LotteryResults {
    pub event: Event,
    pub winners: Vec<Application>,
    pub losers: Vec<Application>,
}
