use blockflow_core::{BlockGraph, Connection, NewBlock, Payload};
use blockflow_drawflow::{decode_str, decode_value, export_value, import_records, DEFAULT_GRAPH_ID};
use blockflow_graphics::BlockMetrics;
use blockflow_layout::LayoutEngine;
use serde_json::json;

/// Exports carry laid-out positions, as they do from a live canvas.
fn lay_out(graph: &mut BlockGraph) {
    LayoutEngine::new(BlockMetrics::default()).layout(graph);
}

fn reimport(graph: &BlockGraph) -> (BlockGraph, blockflow_drawflow::ImportReport) {
    let mut restored = BlockGraph::default();
    let records = decode_value(&export_value(graph, DEFAULT_GRAPH_ID)).unwrap();
    let report = import_records(&mut restored, &records);
    restored.check_invariants().unwrap();
    (restored, report)
}

fn payload(value: serde_json::Value) -> Payload {
    value.as_object().cloned().unwrap_or_default()
}

fn sample_graph() -> BlockGraph {
    let mut graph = BlockGraph::default();
    let start = graph.add_block(NewBlock::new("start").at(40.0, 40.0));
    let fetch = graph.add_block(
        NewBlock::new("http_request")
            .with_class("net")
            .with_data(payload(json!({ "url": "https://api.example.com", "timeout": 30 })))
            .with_html("<label>URL <input data-field=\"url\"></label>"),
    );
    let guard = graph.add_block(NewBlock::new("try_catch"));
    let call = graph.add_block(NewBlock::new("llm_call"));
    let retry = graph.add_block(NewBlock::new("loop"));
    let log_err = graph.add_block(NewBlock::new("log"));
    let done = graph.add_block(NewBlock::new("end"));
    graph.add_block(NewBlock::new("notify").at(600.0, 40.0));

    graph.snap_below(start, fetch).unwrap();
    graph.snap_below(fetch, guard).unwrap();
    graph.snap_into_arm(guard, 0, call).unwrap();
    graph.snap_below(call, retry).unwrap();
    graph.snap_into_arm(guard, 1, log_err).unwrap();
    graph.snap_below(guard, done).unwrap();
    // Second claim on the start block's output stays a drawn connection.
    graph.add_connection(Connection::stack(start, call)).unwrap();
    assert!(!graph.is_snapped(&Connection::stack(start, call)));
    lay_out(&mut graph);
    graph
}

#[test]
fn export_import_export_is_stable() {
    let original = sample_graph();
    let first = export_value(&original, DEFAULT_GRAPH_ID);

    let (restored, report) = reimport(&original);
    assert_eq!(report.blocks, original.len());
    assert_eq!(report.snapped, 6);

    let second = export_value(&restored, DEFAULT_GRAPH_ID);
    assert_eq!(first, second);

    for block in original.blocks() {
        let copy = restored.get(block.id()).unwrap();
        assert_eq!(copy.next(), block.next());
        assert_eq!(copy.prev(), block.prev());
        assert_eq!(copy.branches(), block.branches());
        assert_eq!(copy.enclosing(), block.enclosing());
        assert_eq!(copy.data(), block.data());
    }
}

#[test]
fn serialized_text_round_trips() {
    let text = export_value(&sample_graph(), "Flow").to_string();
    let mut graph = BlockGraph::default();
    import_records(&mut graph, &decode_str(&text).unwrap());
    let again = export_value(&graph, "Flow").to_string();
    assert_eq!(text, again);
}

#[test]
fn drawflow_native_documents_import() {
    let native = json!({
        "drawflow": { "Home": { "data": {
            "1": { "id": 1, "name": "start", "data": {}, "class": "start", "html": "",
                   "typenode": false, "inputs": {},
                   "outputs": { "output_1": { "connections": [{ "node": "2", "output": "input_1" }] } },
                   "pos_x": 100, "pos_y": 50 },
            "2": { "id": 2, "name": "llm_call", "data": { "model": "m" }, "class": "", "html": "",
                   "typenode": false,
                   "inputs": { "input_1": { "connections": [{ "node": "1", "input": "output_1" }] } },
                   "outputs": { "output_1": { "connections": [] } },
                   "pos_x": 100, "pos_y": 160 }
        } } }
    });
    let mut graph = BlockGraph::default();
    import_records(&mut graph, &decode_value(&native).unwrap());
    assert_eq!(graph.chain(1), vec![1, 2]);
    assert_eq!(graph.get(2).unwrap().data()["model"], json!("m"));
}

#[test]
fn connections_between_separate_stacks_stay_drawn() {
    let mut graph = BlockGraph::default();
    let a = graph.add_block(NewBlock::new("llm_call"));
    let b = graph.add_block(NewBlock::new("log").at(900.0, 700.0));
    let guard = graph.add_block(NewBlock::new("if").at(0.0, 300.0));
    let loose = graph.add_block(NewBlock::new("notify").at(-500.0, 900.0));
    graph.add_connection(Connection::stack(a, b)).unwrap();
    graph.add_connection(Connection::arm(guard, 0, loose)).unwrap();
    lay_out(&mut graph);

    let (restored, report) = reimport(&graph);
    assert_eq!(report.connections, 2);
    assert_eq!(report.snapped, 0);
    assert_eq!(restored.get(a).unwrap().next(), None);
    assert_eq!(restored.get(b).unwrap().prev(), None);
    assert_eq!(restored.get(guard).unwrap().branches(), &[None]);
    assert!(restored.get(loose).unwrap().is_root());
    assert!(restored.has_connection(&Connection::stack(a, b)));
    assert!(restored.has_connection(&Connection::arm(guard, 0, loose)));
    assert_eq!(
        export_value(&restored, DEFAULT_GRAPH_ID),
        export_value(&graph, DEFAULT_GRAPH_ID)
    );
}
