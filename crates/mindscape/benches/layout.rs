use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mindscape::{LayoutType, MindmapData, Node, apply_layout};
use std::hint::black_box;
use std::time::Duration;

/// A mindmap with `count` nodes where every node has up to `fanout` children.
fn build_mindmap(count: usize, fanout: usize) -> MindmapData {
    let mut nodes = vec![Node::root("n0")];
    for i in 1..count {
        let parent = (i - 1) / fanout;
        let depth = nodes[parent].depth.map_or(1, |d| d + 1);
        nodes.push(Node::child(format!("n{i}"), format!("n{parent}"), depth));
    }
    MindmapData::new(nodes)
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_layout");
    group.measurement_time(Duration::from_secs(5));

    let cases = [("wide_10k", 10_000usize, 12usize), ("narrow_10k", 10_000, 2)];
    for (name, count, fanout) in cases {
        let data = build_mindmap(count, fanout);
        for layout in [LayoutType::Radial, LayoutType::Tree, LayoutType::Balanced] {
            group.bench_with_input(
                BenchmarkId::new(layout.as_str(), name),
                &data,
                |b, data| {
                    b.iter(|| {
                        let out = apply_layout(black_box(data), layout, 1920.0, 1080.0)
                            .expect("default options are valid");
                        black_box(out.bounds);
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
