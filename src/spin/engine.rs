//! Uniform winner selection and the rotation the animation should land on.

use rand::Rng;
use serde::Serialize;

use crate::{render, wheels::models::Segment};

/// Full turns added before the wheel settles. Cosmetic only.
pub const EXTRA_SPINS: u32 = 4;

pub const FULL_TURN_DEGREES: f64 = 360.0;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpinOutcome {
    pub index: usize,
    pub segment_id: String,
    pub label: String,
    pub target_rotation: f64,
}

/// Picks a winner uniformly over `segments` and computes where the wheel
/// should stop so the pointer rests inside the winner's wedge.
///
/// The winner is drawn before any geometry is computed, so the wedge layout
/// cannot bias the result. Returns `None` only for an empty slice.
pub fn spin<R: Rng + ?Sized>(segments: &[Segment], rng: &mut R) -> Option<SpinOutcome> {
    if segments.is_empty() {
        return None;
    }

    let count = segments.len();
    let index = rng.gen_range(0..count);
    let winner = &segments[index];

    let angle_per_segment = render::angle_per_segment(count);
    let offset = rng.gen_range(0.0..angle_per_segment);
    let base = EXTRA_SPINS as f64 * FULL_TURN_DEGREES;
    let wedge_start = index as f64 * angle_per_segment;

    let mut target_rotation = base + wedge_start + offset;
    // Rounding can carry an offset just below the wedge width onto the next wedge.
    if target_rotation >= base + FULL_TURN_DEGREES
        || render::segment_at_rotation(count, target_rotation) != Some(index)
    {
        target_rotation = base + wedge_start + angle_per_segment / 2.0;
    }

    Some(SpinOutcome {
        index,
        segment_id: winner.id.clone(),
        label: winner.label.clone(),
        target_rotation,
    })
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn segments(count: usize) -> Vec<Segment> {
        (0..count)
            .map(|n| Segment::new(format!("Segment {}", n + 1)))
            .collect()
    }

    #[test]
    fn empty_wheel_has_no_outcome() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(spin(&[], &mut rng).is_none());
    }

    #[test]
    fn winner_matches_index() {
        let mut rng = StdRng::seed_from_u64(7);
        let segments = segments(5);
        for _ in 0..200 {
            let outcome = spin(&segments, &mut rng).unwrap();
            assert_eq!(outcome.segment_id, segments[outcome.index].id);
            assert_eq!(outcome.label, segments[outcome.index].label);
        }
    }

    #[test]
    fn target_rotation_stays_within_final_turn() {
        let mut rng = StdRng::seed_from_u64(11);
        let lower = EXTRA_SPINS as f64 * FULL_TURN_DEGREES;
        let upper = lower + FULL_TURN_DEGREES;
        for count in 1..=13 {
            let segments = segments(count);
            for _ in 0..500 {
                let outcome = spin(&segments, &mut rng).unwrap();
                assert!(outcome.target_rotation >= lower, "{}", outcome.target_rotation);
                assert!(outcome.target_rotation < upper, "{}", outcome.target_rotation);
            }
        }
    }

    #[test]
    fn target_rotation_lands_on_winning_wedge() {
        let mut rng = StdRng::seed_from_u64(23);
        for count in 1..=12 {
            let segments = segments(count);
            for _ in 0..300 {
                let outcome = spin(&segments, &mut rng).unwrap();
                assert_eq!(
                    render::segment_at_rotation(count, outcome.target_rotation),
                    Some(outcome.index)
                );
            }
        }
    }

    #[test]
    fn selection_is_uniform() {
        const TRIALS: usize = 100_000;
        let mut rng = StdRng::seed_from_u64(42);

        for count in [2usize, 3, 7] {
            let segments = segments(count);
            let mut hits = vec![0usize; count];
            for _ in 0..TRIALS {
                hits[spin(&segments, &mut rng).unwrap().index] += 1;
            }

            let expected = TRIALS as f64 / count as f64;
            // Five standard deviations of a binomial count.
            let p = 1.0 / count as f64;
            let tolerance = 5.0 * (TRIALS as f64 * p * (1.0 - p)).sqrt();
            for (index, &hit) in hits.iter().enumerate() {
                assert!(
                    (hit as f64 - expected).abs() < tolerance,
                    "segment {index} of {count} won {hit} times, expected about {expected}"
                );
            }
        }
    }

    #[test]
    fn single_segment_always_wins() {
        let mut rng = StdRng::seed_from_u64(3);
        let segments = segments(1);
        for _ in 0..100 {
            let outcome = spin(&segments, &mut rng).unwrap();
            assert_eq!(outcome.index, 0);
        }
    }
}
