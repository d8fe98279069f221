//! Fitness-proportional (roulette wheel) parent selection.

use rand::Rng;

/// Picks one candidate with probability proportional to its fitness.
///
/// Draws `r` uniformly from `[0, total)` and returns the first candidate
/// whose cumulative fitness reaches `r`, so ties go to the candidate met
/// first. When the total fitness is not positive every candidate is equally
/// likely. If rounding keeps the
/// cumulative sum below `r`, the last candidate is returned.
///
/// # Arguments
///
/// * `pool` - Candidates, walked in order
/// * `fitness` - Fitness of a candidate (expected to be non-negative)
/// * `rng` - Random source
///
/// # Returns
///
/// The selected candidate, or `None` for an empty pool.
pub fn select_by_roulette<'a, T, R: Rng>(
    pool: &'a [T],
    fitness: impl Fn(&T) -> f32,
    rng: &mut R,
) -> Option<&'a T> {
    let last = pool.last()?;

    let total: f32 = pool.iter().map(&fitness).sum();
    if !total.is_finite() || total <= 0.0 {
        return Some(&pool[rng.random_range(0..pool.len())]);
    }

    let target = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for candidate in pool {
        cumulative += fitness(candidate);
        if cumulative >= target {
            return Some(candidate);
        }
    }

    Some(last)
}
