//! Random height assignment for new nodes.
//!
//! A new node starts at level 0 and is promoted one level for every
//! consecutive successful coin toss, where each toss succeeds with the
//! configured probability `p`. Promotion stops at `max_level - 1`, so the
//! probability of reaching level `h` (for `h < max_level - 1`) is `p^h`.
//!
//! The default source is `fastrand`'s thread-local generator, so threads never
//! share random state.

use fastrand::Rng;

/// Draw a level in `0..max_level` using the calling thread's generator.
///
/// The node built from this level has `level + 1` forward links.
#[inline]
#[must_use]
pub fn random_level(probability: f64, max_level: usize) -> usize {
    draw(probability, max_level, fastrand::f64)
}

/// Draw a level in `0..max_level` from an explicit generator.
///
/// Used with a seeded [`Rng`] when a reproducible sequence is needed.
#[inline]
#[must_use]
pub fn random_level_with(rng: &mut Rng, probability: f64, max_level: usize) -> usize {
    draw(probability, max_level, || rng.f64())
}

#[inline]
fn draw(probability: f64, max_level: usize, mut toss: impl FnMut() -> f64) -> usize {
    let mut level = 0;
    while level + 1 < max_level && toss() < probability {
        level += 1;
    }
    level
}

#[cfg(test)]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]
mod tests {
    use super::*;

    #[test]
    fn test_single_level_never_promotes() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..1_000 {
            assert_eq!(random_level_with(&mut rng, 0.99, 1), 0);
            assert_eq!(random_level(0.99, 1), 0);
        }
    }

    #[test]
    fn test_level_is_capped() {
        let mut rng = Rng::with_seed(11);
        let max_level = 4;

        let mut saw_top = false;
        for _ in 0..10_000 {
            let level = random_level_with(&mut rng, 0.9, max_level);
            assert!(level < max_level, "level {level} exceeds cap");
            saw_top |= level == max_level - 1;
        }

        assert!(saw_top, "p=0.9 should reach the top level");
    }

    #[test]
    fn test_toss_sequence_drives_level() {
        // Successes until the first failure decide the level.
        let mut tosses = [0.1, 0.2, 0.9, 0.0].into_iter();
        assert_eq!(draw(0.5, 16, || tosses.next().unwrap_or(1.0)), 2);

        let mut tosses = [0.7].into_iter();
        assert_eq!(draw(0.5, 16, || tosses.next().unwrap_or(1.0)), 0);

        // Cap stops tossing even while tosses keep succeeding.
        assert_eq!(draw(0.5, 3, || 0.0), 2);
    }

    #[test]
    fn test_geometric_distribution() {
        const SAMPLES: usize = 200_000;
        let probability = 0.5;
        let max_level = 16;

        let mut rng = Rng::with_seed(0x5eed);
        let mut at_least = [0usize; 16];
        for _ in 0..SAMPLES {
            let level = random_level_with(&mut rng, probability, max_level);
            for slot in at_least.iter_mut().take(level + 1) {
                *slot += 1;
            }
        }

        assert_eq!(at_least[0], SAMPLES);
        for (h, &count) in at_least.iter().enumerate().take(6) {
            let observed = count as f64 / SAMPLES as f64;
            let expected = probability.powi(h as i32);
            assert!(
                (observed - expected).abs() < 0.01,
                "h={h}: observed {observed:.4}, expected {expected:.4}"
            );
        }
    }
}
