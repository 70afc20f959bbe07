use proptest::prelude::*;
use rollkit_core::XorShift1024Star;
use rollkit_dice::{
    roll_dice, roll_dice_drop_highest, roll_dice_drop_lowest, roll_dice_keep_highest,
    roll_dice_keep_lowest, roll_keep_partition, roll_selection, sum_roll_dice_drop_lowest, Keep,
    KeepDiceRoller, Selection,
};

fn batch() -> impl Strategy<Value = (u64, usize, u32, usize)> {
    (any::<u64>(), 1usize..12, 1u32..30).prop_flat_map(|(seed, quantity, sides)| {
        (Just(seed), Just(quantity), Just(sides), 0..quantity)
    })
}

proptest! {
    #[test]
    fn drop_is_keep_of_the_other_end((seed, quantity, sides, drop) in batch()) {
        let rng = XorShift1024Star::seed_from_u64(seed);
        let keep = quantity - drop;

        prop_assert_eq!(
            roll_dice_drop_lowest(&mut rng.clone(), quantity, sides, drop).unwrap(),
            roll_dice_keep_highest(&mut rng.clone(), quantity, sides, keep).unwrap()
        );
        prop_assert_eq!(
            roll_dice_drop_highest(&mut rng.clone(), quantity, sides, drop).unwrap(),
            roll_dice_keep_lowest(&mut rng.clone(), quantity, sides, keep).unwrap()
        );
    }

    #[test]
    fn drop_partitions_match_keep_partitions((seed, quantity, sides, drop) in batch()) {
        let rng = XorShift1024Star::seed_from_u64(seed);
        let keep = quantity - drop;

        for (selection, opposite) in [
            (Selection::DropHighest(drop), Keep::Lowest),
            (Selection::DropLowest(drop), Keep::Highest),
        ] {
            let dropped = roll_selection(&mut rng.clone(), quantity, sides, selection).unwrap();
            let kept = roll_keep_partition(&mut rng.clone(), quantity, sides, opposite, keep).unwrap();
            prop_assert_eq!(&dropped.kept, &kept.kept);
            prop_assert_eq!(&dropped.discarded, &kept.discarded);
            prop_assert_eq!(dropped.discarded.len(), drop);
        }

        let mut low = rng.clone();
        let mut roller = KeepDiceRoller::drop_highest(quantity, sides, drop).unwrap();
        roller.roll(&mut low);
        let reference = roll_keep_partition(&mut rng.clone(), quantity, sides, Keep::Lowest, keep).unwrap();
        prop_assert_eq!(roller.dice().unwrap(), reference.kept.as_slice());
        prop_assert_eq!(roller.discarded_dice().unwrap(), reference.discarded.as_slice());

        let mut high = rng.clone();
        let mut roller = KeepDiceRoller::drop_lowest(quantity, sides, drop).unwrap();
        roller.roll(&mut high);
        let reference = roll_keep_partition(&mut rng.clone(), quantity, sides, Keep::Highest, keep).unwrap();
        prop_assert_eq!(roller.dice().unwrap(), reference.kept.as_slice());
        prop_assert_eq!(roller.discarded_dice().unwrap(), reference.discarded.as_slice());
        prop_assert_eq!(low, high);
    }

    #[test]
    fn partition_covers_the_batch((seed, quantity, sides, drop) in batch()) {
        let rng = XorShift1024Star::seed_from_u64(seed);
        let keep = quantity - drop;
        let partition = roll_keep_partition(&mut rng.clone(), quantity, sides, Keep::Lowest, keep).unwrap();

        prop_assert_eq!(partition.kept.len(), keep);
        prop_assert_eq!(partition.discarded.len(), drop);
        let highest_kept = partition.kept.iter().copied().max().unwrap();
        prop_assert!(partition.discarded.iter().all(|&d| d >= highest_kept));

        let mut all: Vec<u32> = partition.kept.iter().chain(&partition.discarded).copied().collect();
        let mut batch = roll_dice(&mut rng.clone(), quantity, sides).unwrap();
        all.sort_unstable();
        batch.sort_unstable();
        prop_assert_eq!(all, batch);
    }

    #[test]
    fn drop_sum_matches_kept_dice((seed, quantity, sides, drop) in batch()) {
        let rng = XorShift1024Star::seed_from_u64(seed);
        let kept = roll_dice_drop_lowest(&mut rng.clone(), quantity, sides, drop).unwrap();
        let sum = sum_roll_dice_drop_lowest(&mut rng.clone(), quantity, sides, drop).unwrap();
        prop_assert_eq!(sum, kept.iter().map(|&d| u64::from(d)).sum::<u64>());
        prop_assert!(kept.iter().all(|&d| (1..=sides).contains(&d)));
    }
}
