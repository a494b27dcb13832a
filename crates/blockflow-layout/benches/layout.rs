use blockflow_core::{BlockGraph, BlockId, NewBlock};
use blockflow_layout::LayoutEngine;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const STACK_LENGTHS: &[usize] = &[64, 512];
const NESTING_DEPTHS: &[usize] = &[8, 32];
const BLOCKS_PER_ARM: usize = 4;

fn long_stack(length: usize) -> BlockGraph {
    let mut graph = BlockGraph::default();
    let mut tail = graph.add_block(NewBlock::new("start"));
    for index in 0..length {
        let next = graph.add_block(NewBlock::new(format!("step_{index}")));
        graph.snap_below(tail, next).expect("stack link");
        tail = next;
    }
    graph
}

/// `depth` loops nested inside each other, each arm holding a few plain blocks.
fn nested_loops(depth: usize) -> BlockGraph {
    let mut graph = BlockGraph::default();
    let mut host: Option<BlockId> = None;
    for level in 0..depth {
        let lp = graph.add_block(NewBlock::new("loop"));
        if let Some(parent) = host {
            graph.snap_into_arm(parent, 0, lp).expect("arm link");
        }
        let mut tail = lp;
        for row in 0..BLOCKS_PER_ARM {
            let step = graph.add_block(NewBlock::new(format!("work_{level}_{row}")));
            graph.snap_below(tail, step).expect("stack link");
            tail = step;
        }
        host = Some(lp);
    }
    graph
}

fn bench_long_stack(c: &mut Criterion) {
    let engine = LayoutEngine::default();
    let mut group = c.benchmark_group("layout_long_stack");
    for &length in STACK_LENGTHS {
        group.bench_with_input(BenchmarkId::new("blocks", length), &length, |b, &length| {
            let mut graph = long_stack(length);
            b.iter(|| black_box(engine.layout(&mut graph)));
        });
    }
    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let engine = LayoutEngine::default();
    let mut group = c.benchmark_group("layout_nested_loops");
    for &depth in NESTING_DEPTHS {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            let mut graph = nested_loops(depth);
            b.iter(|| black_box(engine.layout(&mut graph)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_long_stack, bench_nested);
criterion_main!(benches);
