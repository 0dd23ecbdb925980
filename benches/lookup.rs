//! Double-array benchmarks for libdarts
//!
//! Exact-match lookups are measured against a hash map holding the same
//! keys, which is the structure a double array usually replaces.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashbrown::HashMap;
use libdarts::darts::{build_double_array, AutomatonView, Builder};

const PHRASES: &[&str] = &[
    "簳面杖", "簸荡", "簿历", "簿录", "簿据", "籧篨戚施", "米价", "米克", "米克杰格",
    "米克森", "米克诺斯", "米利托", "米制", "米卤蛋", "米厘米突", "米德尔伯里",
    "米格式战斗机", "米纳谷", "米罗的维纳斯雕像", "米苏里", "米苏里州", "米虫",
    "米蛀虫", "米谷", "米里", "米雅托维奇", "米雕", "米面", "类似于", "类别",
    "类别的团体", "类同", "类同法", "类球面", "粉丝团", "粉丝谷", "粉团儿",
    "粉团儿似的", "粉彩", "粉拳绣腿", "粉板", "粉砂岩", "粉签子", "粉红色系",
    "粉面", "粉面朱脣", "粉面油头", "粉饰门面", "粒变岩", "粗制", "粗制品",
    "粗制滥造", "粗卤", "粗布", "粗布条", "粗恶", "粗枝大叶",
    "粗毛布", "粗管面", "粗纤维", "粗衣恶食", "粗面", "粗面岩",
];

fn small_keys() -> Vec<String> {
    let mut keys: Vec<String> = PHRASES.iter().map(|s| s.to_string()).collect();
    keys.sort();
    keys
}

fn large_keys(count: usize) -> Vec<String> {
    let mut keys: Vec<String> = (0..count)
        .map(|i| format!("{}/{i:x}", PHRASES[i % PHRASES.len()]))
        .collect();
    keys.sort();
    keys
}

fn bench_exact_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_match");

    for (name, keys) in [("small", small_keys()), ("large", large_keys(50_000))] {
        group.throughput(Throughput::Elements(keys.len() as u64));

        let da = build_double_array(&keys).unwrap();
        group.bench_with_input(BenchmarkId::new("double_array", name), &keys, |b, keys| {
            b.iter(|| {
                for (rank, key) in keys.iter().enumerate() {
                    assert_eq!(da.exact_match_search(black_box(key)), Some(rank));
                }
            });
        });

        let bytes = da.to_bytes();
        let view = AutomatonView::new(&bytes).unwrap();
        group.bench_with_input(BenchmarkId::new("view", name), &keys, |b, keys| {
            b.iter(|| {
                for (rank, key) in keys.iter().enumerate() {
                    assert_eq!(view.exact_match_search(black_box(key)), Some(rank));
                }
            });
        });

        let map: HashMap<&str, usize> = keys
            .iter()
            .enumerate()
            .map(|(rank, key)| (key.as_str(), rank))
            .collect();
        group.bench_with_input(BenchmarkId::new("hash_map", name), &keys, |b, keys| {
            b.iter(|| {
                for (rank, key) in keys.iter().enumerate() {
                    assert_eq!(map.get(black_box(key.as_str())), Some(&rank));
                }
            });
        });
    }

    group.finish();
}

fn bench_common_prefix(c: &mut Criterion) {
    let keys = small_keys();
    let da = build_double_array(&keys).unwrap();
    let texts: Vec<String> = keys.iter().map(|k| format!("{k}的团体")).collect();

    c.bench_function("common_prefix_search", |b| {
        b.iter(|| {
            for text in &texts {
                black_box(da.common_prefix_search(black_box(text)));
            }
        });
    });
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(20);

    for count in [1_000, 20_000] {
        let keys = large_keys(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &keys, |b, keys| {
            let mut builder = Builder::new();
            b.iter(|| {
                builder.build(black_box(keys)).unwrap();
                black_box(builder.stats())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_exact_match, bench_common_prefix, bench_build);
criterion_main!(benches);
