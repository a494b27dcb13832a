use super::*;
use blockflow_core::{Connection, NewBlock};
use serde_json::json;

#[test]
fn hat_stack_cap_chain_exports_connections() {
    let mut graph = BlockGraph::default();
    let h = graph.add_block(NewBlock::new("start").at(10.0, 20.0));
    let a = graph.add_block(NewBlock::new("llm_call"));
    let c = graph.add_block(NewBlock::new("end"));
    graph.snap_below(h, a).unwrap();
    graph.snap_below(a, c).unwrap();

    let value = export_value(&graph, DEFAULT_GRAPH_ID);
    let nodes = &value["Home"]["nodes"];
    assert_eq!(nodes["1"]["name"], "start");
    assert_eq!(nodes["1"]["pos_x"], json!(10.0));
    assert_eq!(nodes["1"]["inputs"], json!({}));
    assert_eq!(
        nodes["1"]["outputs"]["output_1"]["connections"],
        json!([{ "node": "2", "output": "input_1" }])
    );
    assert_eq!(
        nodes["2"]["inputs"]["input_1"]["connections"],
        json!([{ "node": "1", "input": "output_1" }])
    );
    assert_eq!(
        nodes["2"]["outputs"]["output_1"]["connections"],
        json!([{ "node": "3", "output": "input_1" }])
    );
    assert_eq!(nodes["3"]["outputs"], json!({}));
    assert_eq!(value["Home"]["nodes"].as_object().unwrap().len(), 3);
}

#[test]
fn c_blocks_declare_one_output_per_arm() {
    let mut graph = BlockGraph::default();
    let sw = graph.add_block(NewBlock::new("switch_case"));
    let child = graph.add_block(NewBlock::new("child"));
    graph.snap_into_arm(sw, 1, child).unwrap();

    let document = export_document(&graph, "Main");
    let record = &document.graphs["Main"].nodes["1"];
    let ports: Vec<&str> = record.outputs.keys().map(String::as_str).collect();
    assert_eq!(ports, ["output_1", "output_2", "output_3", "output_4"]);
    assert_eq!(record.outputs["output_3"].connections[0].node, "2");
    assert!(record.outputs["output_2"].connections.is_empty());
}

#[test]
fn unsnapped_connections_and_payload_survive() {
    let mut graph = BlockGraph::default();
    let mut data = blockflow_core::Payload::new();
    data.insert("prompt".into(), json!("hello"));
    let a = graph.add_block(
        NewBlock::new("llm_call")
            .with_class("ai")
            .with_html("<p>x</p>")
            .with_data(data),
    );
    let b = graph.add_block(NewBlock::new("tool").at(400.0, 0.0));
    graph.add_connection(Connection::new(a, 1, b, 1)).unwrap();

    let value = export_value(&graph, DEFAULT_GRAPH_ID);
    let record = &value["Home"]["nodes"]["1"];
    assert_eq!(record["data"], json!({ "prompt": "hello" }));
    assert_eq!(record["class"], "ai");
    assert_eq!(record["html"], "<p>x</p>");
    assert_eq!(
        record["outputs"]["output_1"]["connections"],
        json!([{ "node": "2", "output": "input_1" }])
    );
    assert!(!graph.is_snapped(&Connection::new(a, 1, b, 1)));
}
