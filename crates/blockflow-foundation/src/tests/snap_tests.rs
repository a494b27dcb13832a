use super::*;
use blockflow_core::NewBlock;

fn laid_out(graph: &mut BlockGraph) {
    LayoutEngine::default().layout(graph);
}

fn move_to(graph: &mut BlockGraph, id: BlockId, x: f32, y: f32) {
    graph.set_position(id, Point::new(x, y)).unwrap();
}

#[test]
fn nearest_open_tail_wins() {
    let mut graph = BlockGraph::default();
    let a = graph.add_block(NewBlock::new("a").at(0.0, 0.0));
    let b = graph.add_block(NewBlock::new("b").at(300.0, 0.0));
    let moving = graph.add_block(NewBlock::new("m").at(0.0, 400.0));
    laid_out(&mut graph);

    move_to(&mut graph, moving, 10.0, 60.0);
    let engine = SnapEngine::default();
    let found = engine.find(&graph, moving).unwrap();
    assert_eq!(found.target, SnapTarget::Below(a));
    assert_eq!(found.point, Point::new(0.0, 52.0));

    move_to(&mut graph, moving, 290.0, 40.0);
    assert_eq!(engine.find(&graph, moving).unwrap().target, SnapTarget::Below(b));
}

#[test]
fn nothing_outside_radius() {
    let mut graph = BlockGraph::default();
    graph.add_block(NewBlock::new("a"));
    let moving = graph.add_block(NewBlock::new("m").at(0.0, 52.0 + 41.0));
    laid_out(&mut graph);
    assert_eq!(SnapEngine::default().find(&graph, moving), None);
}

#[test]
fn caps_and_filled_tails_offer_nothing_below() {
    let mut graph = BlockGraph::default();
    let cap = graph.add_block(NewBlock::new("end"));
    let a = graph.add_block(NewBlock::new("a").at(300.0, 0.0));
    let b = graph.add_block(NewBlock::new("b"));
    graph.snap_below(a, b).unwrap();
    let moving = graph.add_block(NewBlock::new("m").at(0.0, 900.0));
    laid_out(&mut graph);

    let targets: Vec<_> = SnapEngine::default()
        .candidates(&graph, moving)
        .into_iter()
        .map(|candidate| candidate.target)
        .collect();
    assert!(!targets.contains(&SnapTarget::Below(cap)));
    assert!(!targets.contains(&SnapTarget::Below(a)));
    assert!(targets.contains(&SnapTarget::Below(b)));
}

#[test]
fn empty_arms_are_candidates() {
    let mut graph = BlockGraph::default();
    let cond = graph.add_block(NewBlock::new("if_else"));
    let filler = graph.add_block(NewBlock::new("filler"));
    graph.snap_into_arm(cond, 0, filler).unwrap();
    let moving = graph.add_block(NewBlock::new("m").at(500.0, 500.0));
    laid_out(&mut graph);

    let entry = LayoutEngine::default()
        .arm_entry(graph.get(cond).unwrap(), 1)
        .unwrap();
    move_to(&mut graph, moving, entry.x + 3.0, entry.y + 4.0);
    let found = SnapEngine::default().find(&graph, moving).unwrap();
    assert_eq!(found.target, SnapTarget::Arm { c_block: cond, arm: 1 });
    assert_eq!(found.distance, 5.0);

    let targets: Vec<_> = SnapEngine::default()
        .candidates(&graph, moving)
        .into_iter()
        .map(|candidate| candidate.target)
        .collect();
    assert!(!targets.contains(&SnapTarget::Arm { c_block: cond, arm: 0 }));
}

#[test]
fn own_subtree_is_never_a_candidate() {
    let mut graph = BlockGraph::default();
    let x = graph.add_block(NewBlock::new("loop"));
    let child = graph.add_block(NewBlock::new("child"));
    let tail = graph.add_block(NewBlock::new("tail"));
    graph.snap_into_arm(x, 0, child).unwrap();
    graph.snap_below(x, tail).unwrap();
    laid_out(&mut graph);

    let below_tail = LayoutEngine::default().below_point(graph.get(tail).unwrap());
    move_to(&mut graph, x, below_tail.x, below_tail.y);
    let engine = SnapEngine::default();
    assert!(engine.candidates(&graph, x).is_empty());
    assert_eq!(engine.find(&graph, x), None);
}

#[test]
fn hats_never_snap() {
    let mut graph = BlockGraph::default();
    graph.add_block(NewBlock::new("a"));
    let hat = graph.add_block(NewBlock::new("start").at(0.0, 52.0));
    laid_out(&mut graph);
    assert!(SnapEngine::default().candidates(&graph, hat).is_empty());
}

#[test]
fn equal_distances_keep_first_found() {
    let mut graph = BlockGraph::default();
    let left = graph.add_block(NewBlock::new("left").at(0.0, 0.0));
    graph.add_block(NewBlock::new("right").at(20.0, 0.0));
    let moving = graph.add_block(NewBlock::new("m").at(0.0, 900.0));
    laid_out(&mut graph);

    move_to(&mut graph, moving, 10.0, 52.0);
    let found = SnapEngine::default().find(&graph, moving).unwrap();
    assert_eq!(found.target, SnapTarget::Below(left));
}

#[test]
fn apply_performs_the_attach() {
    let mut graph = BlockGraph::default();
    let cond = graph.add_block(NewBlock::new("if"));
    let moving = graph.add_block(NewBlock::new("m"));
    let engine = SnapEngine::default();
    engine
        .apply(&mut graph, SnapTarget::Arm { c_block: cond, arm: 0 }, moving)
        .unwrap();
    assert_eq!(graph.get(cond).unwrap().branches(), &[Some(moving)]);
    assert_eq!(SnapTarget::Arm { c_block: cond, arm: 0 }.host(), cond);
}
