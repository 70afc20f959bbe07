use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rollkit_core::XorShift1024Star;
use rollkit_dice::{roll_dice_keep_highest, KeepDiceRoller};

fn bench_keep_highest(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollkit-dice/keep_highest");
    let mut rng = XorShift1024Star::seed_from_u64(5);

    for &(quantity, keep) in &[(4usize, 3usize), (20, 5), (100, 10)] {
        let id = format!("{quantity}d6kh{keep}");
        group.bench_with_input(BenchmarkId::new("one_shot", &id), &quantity, |b, &q| {
            b.iter(|| black_box(roll_dice_keep_highest(&mut rng, q, 6, keep)))
        });

        let mut roller = KeepDiceRoller::keep_highest(quantity, 6, keep).expect("valid roller");
        group.bench_with_input(BenchmarkId::new("roller", &id), &quantity, |b, &_q| {
            b.iter(|| black_box(roller.roll(&mut rng)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_keep_highest);
criterion_main!(benches);
