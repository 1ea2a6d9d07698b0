use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dnd_dice::{parse, parse_dice_expression_with, roll_critical_with, RollOptions};
use rand::{rngs::StdRng, SeedableRng};

pub fn benchmark_parsing(c: &mut Criterion) {
    c.bench_function("parse cursed dice", |b| {
        b.iter(|| parse(black_box("100d1000")))
    });
    c.bench_function("parse multiple terms", |b| {
        b.iter(|| parse(black_box("3d8+2d6!r1+4d6dl1-1d4+12")))
    });
}

pub fn benchmark_rolling(c: &mut Criterion) {
    c.bench_function("roll cursed dice", |b| {
        let options = RollOptions::default();
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(1);
            parse_dice_expression_with(black_box("100d1000kh50"), &options, &mut rng)
        });
    });
    c.bench_function("roll exploding d2", |b| {
        let options = RollOptions::default();
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(1);
            parse_dice_expression_with(black_box("100d2!"), &options, &mut rng)
        });
    });
    c.bench_function("roll critical", |b| {
        let options = RollOptions::default();
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(1);
            roll_critical_with(black_box("2d6+1d8+5"), &options, &mut rng)
        });
    });
}

criterion_group!(benches, benchmark_parsing, benchmark_rolling);
criterion_main!(benches);
