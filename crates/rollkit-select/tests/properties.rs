use proptest::prelude::*;
use rollkit_core::XorShift1024Star;
use rollkit_select::{weighted_index, WeightedIndexGenerator};

proptest! {
    #[test]
    fn zero_weights_are_never_selected(
        seed in any::<u64>(),
        weights in prop::collection::vec(0u16..4, 1..64),
    ) {
        prop_assume!(weights.iter().any(|&w| w > 0));
        let mut rng = XorShift1024Star::seed_from_u64(seed);
        for _ in 0..32 {
            let i = weighted_index(&mut rng, weights.as_slice()).unwrap();
            prop_assert!(i < weights.len());
            prop_assert!(weights[i] > 0);
        }
    }

    #[test]
    fn float_walk_never_leaves_the_slice(
        seed in any::<u64>(),
        weights in prop::collection::vec(0.0f32..1.0, 1..256),
    ) {
        prop_assume!(weights.iter().any(|&w| w > 0.0));
        let generator = WeightedIndexGenerator::new(weights.clone()).unwrap();
        let mut rng = XorShift1024Star::seed_from_u64(seed);
        for _ in 0..32 {
            prop_assert!(generator.next(&mut rng) < weights.len());
        }
    }
}
