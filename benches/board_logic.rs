use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockwars::core::{BattleGrid, SequentialIds, SimpleRng};
use blockwars::engine::{
    all_entries_idle_no_missing, generate_match_free_matrix, mark_matched_blocks,
    serialize_blocks,
};

fn seeded_grid(rows: usize, cols: usize, seed: u32) -> BattleGrid {
    let mut grid = BattleGrid::new(rows, cols);
    let colors = generate_match_free_matrix(&grid, None, &mut SimpleRng::new(seed));
    grid.apply_color_matrix(&colors, &mut SequentialIds::with_epoch(0));
    grid
}

fn bench_generate(c: &mut Criterion) {
    let grid = BattleGrid::new(8, 8);
    let mut rng = SimpleRng::new(12345);

    c.bench_function("generate_8x8", |b| {
        b.iter(|| generate_match_free_matrix(black_box(&grid), None, &mut rng))
    });
}

fn bench_mark_matches(c: &mut Criterion) {
    let mut grid = seeded_grid(8, 8, 7);

    c.bench_function("mark_matched_8x8", |b| {
        b.iter(|| mark_matched_blocks(black_box(&mut grid)))
    });
}

fn bench_idle_scan(c: &mut Criterion) {
    let mut grid = seeded_grid(8, 8, 7);

    c.bench_function("idle_no_missing_8x8", |b| {
        b.iter(|| all_entries_idle_no_missing(black_box(&mut grid)))
    });
}

fn bench_serialize(c: &mut Criterion) {
    let mut grid = seeded_grid(8, 8, 7);

    c.bench_function("serialize_8x8", |b| {
        b.iter(|| serialize_blocks(black_box(&mut grid)))
    });
}

criterion_group!(
    benches,
    bench_generate,
    bench_mark_matches,
    bench_idle_scan,
    bench_serialize
);
criterion_main!(benches);
