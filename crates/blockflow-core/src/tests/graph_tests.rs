use super::*;
use crate::Connection;
use serde_json::json;

fn payload(value: serde_json::Value) -> crate::Payload {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("payload fixture must be an object"),
    }
}

#[test]
fn ids_are_monotonic_and_never_reused() {
    let mut graph = BlockGraph::default();
    let a = graph.add_block(NewBlock::new("llm_call"));
    let b = graph.add_block(NewBlock::new("llm_call"));
    assert_eq!((a, b), (1, 2));

    graph.remove_block(b).unwrap();
    let c = graph.add_block(NewBlock::new("llm_call"));
    assert_eq!(c, 3);
}

#[test]
fn insert_with_id_advances_allocator() {
    let mut graph = BlockGraph::default();
    graph.insert_with_id(41, NewBlock::new("tool")).unwrap();
    assert_eq!(graph.peek_next_id(), 42);
    assert_eq!(
        graph.insert_with_id(41, NewBlock::new("tool")),
        Err(GraphError::DuplicateId(41))
    );
    assert_eq!(graph.add_block(NewBlock::new("tool")), 42);
}

#[test]
fn c_blocks_get_fixed_arm_slots() {
    let mut graph = BlockGraph::default();
    let cases = [("if", 1), ("switch_case", 3), ("try_catch", 2), ("loop", 1)];
    for (name, arms) in cases {
        let id = graph.add_block(NewBlock::new(name));
        assert_eq!(graph.get(id).unwrap().branches().len(), arms, "{name}");
    }
    let plain = graph.add_block(NewBlock::new("llm_call"));
    assert!(graph.get(plain).unwrap().branches().is_empty());
}

#[test]
fn new_blocks_carry_payload_and_are_roots() {
    let mut graph = BlockGraph::default();
    let id = graph.add_block(
        NewBlock::new("http_request")
            .at(10.0, 20.0)
            .with_class("net")
            .with_data(payload(json!({ "url": "https://example.com", "retries": 3 })))
            .with_html("<p>GET</p>"),
    );
    let block = graph.get(id).unwrap();
    assert_eq!(block.name(), "http_request");
    assert_eq!(block.class(), "net");
    assert_eq!(block.position(), Point::new(10.0, 20.0));
    assert_eq!(block.data()["retries"], json!(3));
    assert_eq!(block.html(), "<p>GET</p>");
    assert!(block.is_root());
    assert_eq!(graph.roots(), vec![id]);
}

#[test]
fn connections_are_deduplicated_and_validated() {
    let mut graph = BlockGraph::default();
    let a = graph.add_block(NewBlock::new("a"));
    let b = graph.add_block(NewBlock::new("b"));

    let edge = Connection::new(a, 1, b, 1);
    assert_eq!(graph.add_connection(edge), Ok(true));
    assert_eq!(graph.add_connection(edge), Ok(false));
    assert_eq!(graph.connections().len(), 1);
    assert_eq!(
        graph.add_connection(Connection::new(a, 1, 99, 1)),
        Err(GraphError::UnknownBlock(99))
    );
    assert_eq!(
        graph.add_connection(Connection::new(a, 1, a, 1)),
        Err(GraphError::SelfConnection(a))
    );

    assert!(!graph.is_snapped(&edge));
    assert!(graph.remove_connection(&edge));
    assert!(!graph.remove_connection(&edge));
}

#[test]
fn changes_drain_in_order() {
    let mut graph = BlockGraph::default();
    let a = graph.add_block(NewBlock::new("a"));
    let b = graph.add_block(NewBlock::new("b"));
    graph.add_connection(Connection::stack(a, b)).unwrap();

    let mut seen = Vec::new();
    graph.drain_changes(|change| seen.push(change));
    assert_eq!(
        seen,
        vec![
            GraphChange::BlockAdded(a),
            GraphChange::BlockAdded(b),
            GraphChange::ConnectionCreated(Connection::stack(a, b)),
        ]
    );
    assert!(!graph.has_pending_changes());
}

#[test]
fn clear_empties_graph_but_keeps_counting() {
    let mut graph = BlockGraph::default();
    let a = graph.add_block(NewBlock::new("a"));
    let b = graph.add_block(NewBlock::new("b"));
    graph.snap_below(a, b).unwrap();
    graph.drain_changes(|_| {});

    graph.clear();
    assert!(graph.is_empty());
    assert!(graph.connections().is_empty());
    let mut removed = 0;
    graph.drain_changes(|change| {
        if matches!(change, GraphChange::BlockRemoved(_)) {
            removed += 1;
        }
    });
    assert_eq!(removed, 2);
    assert_eq!(graph.add_block(NewBlock::new("c")), 3);
}

#[test]
fn invariant_checker_flags_one_sided_links() {
    let mut graph = BlockGraph::default();
    let a = graph.add_block(NewBlock::new("a"));
    let b = graph.add_block(NewBlock::new("b"));
    graph.check_invariants().unwrap();

    graph.get_mut(a).unwrap().next = Some(b);
    assert!(matches!(
        graph.check_invariants(),
        Err(GraphError::Invariant(_))
    ));
}

#[test]
fn walks_survive_corrupted_cycles() {
    let mut graph = BlockGraph::default();
    let a = graph.add_block(NewBlock::new("a"));
    let b = graph.add_block(NewBlock::new("b"));
    graph.get_mut(a).unwrap().next = Some(b);
    graph.get_mut(b).unwrap().next = Some(a);
    graph.get_mut(a).unwrap().prev = Some(b);
    graph.get_mut(b).unwrap().prev = Some(a);

    assert_eq!(graph.chain(a), vec![a, b]);
    assert_eq!(graph.subtree(a).len(), 2);
    let root = graph.stack_root(a);
    assert!(root == a || root == b);
    assert!(graph.check_invariants().is_err());
}
