use criterion::{black_box, criterion_group, criterion_main, Criterion};

use eclipse_path::config::{OutlineConfig, PathConfig};
use eclipse_path::outline::shadow_outline_path;
use eclipse_path::path::{compute_path_limit_line, LimitDirection};
use eclipse_path::{compute_global_eclipse_features, BesselianTable, ShadowType};

const TABLE: &str = include_str!("../data/2024-04-08.json");

fn load_table() -> BesselianTable {
    BesselianTable::from_json_str(TABLE).unwrap()
}

/// Full-circle umbra and partial penumbra at 1° steps
fn bench_outline(c: &mut Criterion) {
    let table = load_table();
    let config = OutlineConfig::default();
    let mid = table.elements_at(18.0);
    let early = table.elements_at(16.5);

    c.bench_function("shadow_outline_path/umbra_mid_eclipse", |b| {
        b.iter(|| shadow_outline_path(black_box(&mid), ShadowType::Umbra, &config))
    });
    c.bench_function("shadow_outline_path/penumbra_partial", |b| {
        b.iter(|| shadow_outline_path(black_box(&early), ShadowType::Penumbra, &config))
    });
}

/// One limit line across the whole path, two Newton solves per longitude
fn bench_limit_line(c: &mut Criterion) {
    let table = load_table();
    let config = PathConfig::default();

    c.bench_function("compute_path_limit_line/north", |b| {
        b.iter(|| {
            compute_path_limit_line(
                black_box(&table),
                -158.53,
                -19.79,
                LimitDirection::North,
                ShadowType::Umbra,
                &config,
            )
        })
    });
}

fn bench_global(c: &mut Criterion) {
    let table = load_table();

    c.bench_function("compute_global_eclipse_features", |b| {
        b.iter(|| compute_global_eclipse_features(black_box(&table)))
    });
}

criterion_group!(benches, bench_outline, bench_limit_line, bench_global);
criterion_main!(benches);
