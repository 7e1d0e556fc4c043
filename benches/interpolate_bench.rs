use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pieplot::{ColorRangeInfo, interpolate_colors, palette};

fn bench_interpolate(c: &mut Criterion) {
  let mut group = c.benchmark_group("interpolate_colors");
  let range = ColorRangeInfo::new(0.1, 0.9);

  for &n in &[8usize, 256, 4096] {
    group.bench_with_input(BenchmarkId::new("rocket", n), &n, |b, &n| {
      b.iter(|| black_box(interpolate_colors(n, &palette::ROCKET, &range)));
    });
    group.bench_with_input(BenchmarkId::new("viridis", n), &n, |b, &n| {
      b.iter(|| black_box(interpolate_colors(n, &palette::VIRIDIS, &range)));
    });
  }
  group.finish();
}

criterion_group!(benches, bench_interpolate);
criterion_main!(benches);
