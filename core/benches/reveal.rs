use clearfield_core::{Board, Difficulty, LayoutGenerator, RandomLayoutGenerator};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");
    for difficulty in Difficulty::ALL {
        let config = difficulty.config();
        let center = (config.rows() / 2, config.cols() / 2);
        group.bench_function(difficulty.name(), |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                black_box(RandomLayoutGenerator::new(seed, center).generate(config))
            })
        });
    }
    group.finish();
}

fn bench_first_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_reveal");
    for difficulty in Difficulty::ALL {
        let config = difficulty.config();
        group.bench_function(difficulty.name(), |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                let mut board = Board::new(config, seed);
                black_box(board.reveal((0, 0)))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_placement, bench_first_reveal);
criterion_main!(benches);
