use rand::Rng;
use thiserror::Error;

/// Error types for lottery draws
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LotteryError {
    #[error("Cannot draw from an empty pool")]
    EmptyPool,
}

/// Result type for lottery draws
pub type LotteryResult<T> = Result<T, LotteryError>;

/// Partition of a pool into winners and losers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw<T> {
    pub winners: Vec<T>,
    pub losers: Vec<T>,
}

impl<T> Draw<T> {
    /// Number of entries the draw considered
    pub fn total(&self) -> usize {
        self.winners.len() + self.losers.len()
    }
}

/// Shuffle `items` in place with the Fisher–Yates algorithm
///
/// Walks i from n-1 down to 1 and swaps i with a uniform j in [0, i], so
/// every permutation is equally likely for a uniform `rng`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Select up to `capacity` winners uniformly at random from `pool`
///
/// # Arguments
/// * `pool` - Complete, duplicate-free snapshot of pending entries
/// * `capacity` - Number of seats; may exceed the pool size
/// * `rng` - Random source, injectable so draws can be reproduced
///
/// # Returns
/// * `Ok(Draw)` - `min(capacity, pool.len())` winners, the rest losers
/// * `Err(LotteryError::EmptyPool)` - The pool had no entries
pub fn select_winners<T, R: Rng + ?Sized>(
    mut pool: Vec<T>,
    capacity: usize,
    rng: &mut R,
) -> LotteryResult<Draw<T>> {
    if pool.is_empty() {
        return Err(LotteryError::EmptyPool);
    }

    shuffle(&mut pool, rng);

    let cut = capacity.min(pool.len());
    let losers = pool.split_off(cut);

    Ok(Draw {
        winners: pool,
        losers,
    })
}
