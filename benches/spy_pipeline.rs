//! Benchmarks for loading, conversion and spy layout

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stiffness_spy::io::read_matrix_market_from;
use stiffness_spy::spy::{markers, SpyConfig, SpyPlot};
use stiffness_spy::coo_to_csr;

/// 2D five-point Laplacian on an n x n grid, lower triangle, as Matrix Market text
fn laplacian_mtx(n: usize) -> String {
    let size = n * n;
    let mut lines = Vec::new();
    for i in 0..n {
        for j in 0..n {
            let k = i * n + j;
            lines.push(format!("{} {} 4.0", k + 1, k + 1));
            if j > 0 {
                lines.push(format!("{} {} -1.0", k + 1, k));
            }
            if i > 0 {
                lines.push(format!("{} {} -1.0", k + 1, k + 1 - n));
            }
        }
    }
    format!(
        "%%MatrixMarket matrix coordinate real symmetric\n{} {} {}\n{}\n",
        size,
        size,
        lines.len(),
        lines.join("\n")
    )
}

fn bench_spy_pipeline(c: &mut Criterion) {
    let text = laplacian_mtx(100);
    let config = SpyConfig::default();

    c.bench_function("load_10k_laplacian", |bench| {
        bench.iter(|| read_matrix_market_from(Cursor::new(black_box(&text))).unwrap())
    });

    let triplets = read_matrix_market_from(Cursor::new(&text))
        .unwrap()
        .into_triplets();
    c.bench_function("coo_to_csr_10k", |bench| {
        bench.iter(|| coo_to_csr(black_box(&triplets)))
    });

    let csr = coo_to_csr(&triplets);
    c.bench_function("markers_10k", |bench| {
        bench.iter(|| markers(black_box(&csr), config.precision))
    });
    c.bench_function("layout_10k", |bench| {
        bench.iter(|| SpyPlot::from_csr(black_box(&csr), &config).unwrap())
    });
}

criterion_group!(benches, bench_spy_pipeline);
criterion_main!(benches);
