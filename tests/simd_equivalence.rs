#![cfg(feature = "simd")]

use detgrid::lowlevel::{ScalarScores, ScoreKernel, SimdScores};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn simd_scores_match_scalar_bit_for_bit() {
    let mut rng = StdRng::seed_from_u64(5);
    for num_classes in [1usize, 3, 8, 13, 80, 91] {
        for _ in 0..50 {
            let objectness = rng.random::<f32>();
            let threshold = rng.random::<f32>() * 0.5;
            let scores: Vec<f32> = (0..num_classes).map(|_| rng.random::<f32>()).collect();

            let mut scalar = Vec::new();
            let mut simd = Vec::new();
            ScalarScores::score_classes(objectness, &scores, threshold, |l, p| {
                scalar.push((l, p.to_bits()))
            });
            SimdScores::score_classes(objectness, &scores, threshold, |l, p| {
                simd.push((l, p.to_bits()))
            });
            assert_eq!(scalar, simd, "classes {num_classes}");
        }
    }
}
