use rollkit_core::{Error, XorShift1024Star};
use rollkit_dice::{
    roll_d100, roll_d20, roll_d6, roll_dice, roll_dice_append, roll_dice_drop_highest,
    roll_dice_into, roll_dice_keep_highest, roll_dice_keep_lowest, roll_keep_append,
    roll_keep_into, roll_keep_partition, sum_roll_dice, sum_roll_dice_keep_highest, DiceRoller,
    DiceSpec, FixedSink, Keep, KeepDiceRoller,
};

fn rng(seed: u64) -> XorShift1024Star {
    XorShift1024Star::seed_from_u64(seed)
}

#[test]
fn golden_rolls_from_seed_42() {
    assert_eq!(roll_dice(&mut rng(42), 4, 6).unwrap(), vec![1, 4, 6, 2]);

    let partition = roll_keep_partition(&mut rng(42), 4, 6, Keep::Highest, 3).unwrap();
    assert_eq!(partition.kept, vec![2, 4, 6]);
    assert_eq!(partition.discarded, vec![1]);

    let partition = roll_keep_partition(&mut rng(42), 4, 6, Keep::Lowest, 1).unwrap();
    assert_eq!(partition.kept, vec![1]);
    assert_eq!(partition.discarded, vec![4, 6, 2]);

    assert_eq!(roll_dice_drop_highest(&mut rng(42), 5, 6, 2).unwrap(), vec![1, 4, 2]);
}

#[test]
fn golden_common_dice() {
    assert_eq!(roll_d6(&mut rng(12345)), 1);
    assert_eq!(roll_d100(&mut rng(42)), 17);

    let mut r = rng(7);
    let rolls: Vec<u32> = (0..3).map(|_| roll_d20(&mut r)).collect();
    assert_eq!(rolls, vec![15, 3, 13]);
}

#[test]
fn keep_highest_matches_sorted_replay() {
    for seed in 0..200 {
        let partition = roll_keep_partition(&mut rng(seed), 5, 6, Keep::Highest, 3).unwrap();
        assert_eq!(partition.kept.len(), 3);
        assert_eq!(partition.discarded.len(), 2);

        let lowest_kept = *partition.kept.iter().min().unwrap();
        assert!(partition.discarded.iter().all(|&d| d <= lowest_kept));

        let mut batch = roll_dice(&mut rng(seed), 5, 6).unwrap();
        let mut union: Vec<u32> = partition.kept.iter().chain(&partition.discarded).copied().collect();
        batch.sort_unstable();
        union.sort_unstable();
        assert_eq!(union, batch);

        let mut kept = partition.kept.clone();
        kept.sort_unstable();
        assert_eq!(kept, batch[2..]);
    }
}

#[test]
fn keep_lowest_matches_sorted_replay() {
    for seed in 0..200 {
        let partition = roll_keep_partition(&mut rng(seed), 6, 10, Keep::Lowest, 2).unwrap();
        let mut batch = roll_dice(&mut rng(seed), 6, 10).unwrap();
        batch.sort_unstable();
        let mut kept = partition.kept.clone();
        kept.sort_unstable();
        assert_eq!(kept, batch[..2]);
    }
}

#[test]
fn sums_agree_with_their_dice() {
    for seed in 0..100 {
        let dice = roll_dice_keep_highest(&mut rng(seed), 4, 6, 3).unwrap();
        let sum = sum_roll_dice_keep_highest(&mut rng(seed), 4, 6, 3).unwrap();
        assert_eq!(sum, dice.iter().map(|&d| u64::from(d)).sum::<u64>());

        let dice = roll_dice(&mut rng(seed), 3, 8).unwrap();
        let sum = sum_roll_dice(&mut rng(seed), 3, 8).unwrap();
        assert_eq!(sum, dice.iter().map(|&d| u64::from(d)).sum::<u64>());
    }
}

#[test]
fn output_buffers() {
    let mut dice = [0_u32; 4];
    roll_dice_into(&mut rng(42), 6, &mut dice).unwrap();
    assert_eq!(dice, [1, 4, 6, 2]);

    let mut grown = vec![99];
    roll_dice_append(&mut rng(42), 2, 6, &mut grown).unwrap();
    assert_eq!(grown, vec![99, 1, 4]);

    let mut kept = [0_u32; 3];
    let mut discarded = [0_u32; 1];
    let mut sink = FixedSink::new(&mut discarded);
    roll_keep_into(&mut rng(42), 4, 6, Keep::Highest, &mut kept, &mut sink).unwrap();
    assert_eq!(sink.written(), &[1]);
    assert_eq!(kept, [2, 4, 6]);

    let mut kept = vec![0];
    let mut discarded = vec![7];
    roll_keep_append(&mut rng(42), 4, 6, Keep::Highest, 3, &mut kept, &mut discarded).unwrap();
    assert_eq!(kept, vec![0, 2, 4, 6]);
    assert_eq!(discarded, vec![7, 1]);
}

#[test]
fn argument_errors() {
    let mut r = rng(1);
    assert!(matches!(roll_dice(&mut r, 0, 6), Err(Error::Argument(_))));
    assert!(matches!(roll_dice(&mut r, 2, 0), Err(Error::Argument(_))));
    assert!(matches!(roll_dice_into(&mut r, 6, &mut []), Err(Error::Argument(_))));
    assert!(matches!(roll_dice_keep_highest(&mut r, 4, 6, 0), Err(Error::Argument(_))));
    assert!(matches!(roll_dice_keep_lowest(&mut r, 4, 6, 5), Err(Error::Argument(_))));
    assert!(matches!(roll_dice_drop_highest(&mut r, 4, 6, 4), Err(Error::Argument(_))));

    let mut kept = [0_u32; 3];
    let mut discarded = [0_u32; 2];
    let before = r.clone();
    let mut sink = FixedSink::new(&mut discarded);
    let result = roll_keep_into(&mut r, 4, 6, Keep::Highest, &mut kept, &mut sink);
    assert!(matches!(result, Err(Error::Argument(_))));
    // Rejected before any draw.
    assert_eq!(r, before);
}

#[test]
fn drop_zero_keeps_everything() {
    let kept = roll_dice_drop_highest(&mut rng(42), 4, 6, 0).unwrap();
    assert_eq!(kept, vec![1, 4, 6, 2]);
}

#[test]
fn rollers_match_one_shot_functions() {
    let mut plain = DiceRoller::new(4, 6).unwrap();
    assert_eq!(plain.dice(), None);
    assert_eq!(plain.roll(&mut rng(42)), 13);
    assert_eq!(plain.dice(), Some(&[1, 4, 6, 2][..]));

    let mut roller = KeepDiceRoller::keep_highest(4, 6, 3).unwrap();
    assert_eq!(roller.dice(), None);
    assert_eq!(roller.discarded_dice(), None);
    assert_eq!(roller.roll(&mut rng(42)), 12);
    assert_eq!(roller.dice(), Some(&[2, 4, 6][..]));
    assert_eq!(roller.discarded_dice(), Some(&[1][..]));

    let mut roller = KeepDiceRoller::drop_highest(5, 6, 2).unwrap();
    assert_eq!(roller.keep(), Keep::Lowest);
    assert_eq!(roller.keep_quantity(), 3);
    roller.roll(&mut rng(42));
    assert_eq!(roller.discarded_dice(), Some(&[6, 4][..]));

    let mut a = rng(9);
    let mut b = rng(9);
    let mut roller = KeepDiceRoller::keep_lowest(6, 20, 2).unwrap();
    for _ in 0..50 {
        let sum = roller.roll(&mut a);
        let partition = roll_keep_partition(&mut b, 6, 20, Keep::Lowest, 2).unwrap();
        assert_eq!(sum, partition.sum());
        assert_eq!(roller.dice().unwrap(), partition.kept.as_slice());
        assert_eq!(roller.discarded_dice().unwrap(), partition.discarded.as_slice());
    }

    assert!(KeepDiceRoller::drop_lowest(3, 6, 3).is_err());
    assert!(DiceRoller::new(0, 6).is_err());
}

#[test]
fn notation_rolls_through_the_engine() {
    let spec: DiceSpec = "4d6kh3+2".parse().unwrap();
    let outcome = spec.roll(&mut rng(42)).unwrap();
    assert_eq!(outcome.kept, vec![2, 4, 6]);
    assert_eq!(outcome.discarded, vec![1]);
    assert_eq!(outcome.total, 14);

    let outcome = "4d6-20".parse::<DiceSpec>().unwrap().roll(&mut rng(42)).unwrap();
    assert!(outcome.discarded.is_empty());
    assert_eq!(outcome.total, -7);
}
