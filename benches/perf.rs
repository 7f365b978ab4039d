//! Derivation, filtering and navigation on a large sidebar.
//!
//! Run with: cargo bench --bench perf

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tui_sidebar_tree::{
    Dataset, DeriveCache, ExpandedMap, SidebarNode, derive_state, filter_dataset, nav,
};

/// `sections` roots, each holding `groups` branches of `leaves` stories.
fn generate(sections: usize, groups: usize, leaves: usize) -> Dataset {
    let mut nodes = Vec::with_capacity(sections * groups * (leaves + 1) + sections);
    for s in 0..sections {
        let group_ids: Vec<String> = (0..groups).map(|g| format!("s{s}-g{g}")).collect();
        nodes.push(SidebarNode::branch(format!("s{s}"), format!("Section {s}"), group_ids.clone()).as_root());
        for (g, group_id) in group_ids.into_iter().enumerate() {
            let leaf_ids: Vec<String> = (0..leaves).map(|l| format!("{group_id}-l{l}")).collect();
            nodes.push(SidebarNode::branch(group_id, format!("Component {g}"), leaf_ids.clone()));
            nodes.extend(
                leaf_ids
                    .into_iter()
                    .enumerate()
                    .map(|(l, id)| SidebarNode::leaf(id, format!("Story {l}"))),
            );
        }
    }
    Dataset::from_nodes(nodes)
}

fn all_open(dataset: &Dataset) -> ExpandedMap {
    dataset.ids().map(|id| (id.to_string(), true)).collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    for size in [10, 40] {
        let dataset = Arc::new(generate(size, size, 10));
        group.bench_with_input(BenchmarkId::new("match_some", size), &dataset, |b, dataset| {
            b.iter(|| filter_dataset(black_box(dataset), black_box("story 7")));
        });
        group.bench_with_input(BenchmarkId::new("match_none", size), &dataset, |b, dataset| {
            b.iter(|| filter_dataset(black_box(dataset), black_box("zzz")));
        });
    }
    group.finish();
}

fn bench_derive(c: &mut Criterion) {
    let dataset = Arc::new(generate(20, 20, 10));
    let expanded = all_open(&dataset);
    let mut group = c.benchmark_group("derive_state");

    group.bench_function("uncached", |b| {
        b.iter(|| derive_state(&expanded, &dataset, black_box("story"), Some("s3-g4-l5"), None));
    });

    let cache = DeriveCache::new(8);
    group.bench_function("cached", |b| {
        b.iter(|| {
            derive_state(
                &expanded,
                &dataset,
                black_box("story"),
                Some("s3-g4-l5"),
                Some(&cache),
            )
        });
    });
    group.finish();
}

fn bench_navigation(c: &mut Criterion) {
    let dataset = generate(20, 20, 10);
    let expanded = all_open(&dataset);

    c.bench_function("visible_order", |b| {
        b.iter(|| nav::visible_order(black_box(&dataset), &expanded));
    });
    c.bench_function("walk_next", |b| {
        b.iter(|| {
            let mut current = nav::top_level_order(&dataset).first().copied().map(|node| node.id.as_str());
            let mut steps = 0_usize;
            while let Some(id) = current {
                current = nav::next(id, &dataset, &expanded).map(|node| node.id.as_str());
                steps += 1;
            }
            black_box(steps)
        });
    });
}

criterion_group!(benches, bench_filter, bench_derive, bench_navigation);
criterion_main!(benches);
