use crate::wire::{
    Document, GraphModule, InputLink, InputPort, NodeRecord, OutputLink, OutputPort,
};
use blockflow_core::{input_port_name, output_port_name, Block, BlockGraph, PRIMARY_PORT};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Graph id used when the host does not name one.
pub const DEFAULT_GRAPH_ID: &str = "Home";

/// Builds the wire document for `graph` under `graph_id`.
pub fn export_document(graph: &BlockGraph, graph_id: &str) -> Document {
    let nodes = graph
        .blocks()
        .map(|block| (block.id().to_string(), node_record(graph, block)))
        .collect();
    let mut graphs = IndexMap::new();
    graphs.insert(graph_id.to_owned(), GraphModule { nodes });
    Document { graphs }
}

pub fn export_value(graph: &BlockGraph, graph_id: &str) -> serde_json::Value {
    let document = export_document(graph, graph_id);
    // Every field is a string, number or JSON object already.
    serde_json::to_value(document).unwrap_or_default()
}

fn node_record(graph: &BlockGraph, block: &Block) -> NodeRecord {
    let id = block.id();
    let shape = block.shape();

    let mut input_ports = BTreeSet::new();
    if shape.has_notch() {
        input_ports.insert(PRIMARY_PORT);
    }
    let mut output_ports = BTreeSet::new();
    if shape.has_tab() {
        output_ports.insert(PRIMARY_PORT);
    }
    output_ports.extend((0..shape.arm_count()).map(blockflow_core::arm_port));
    for connection in graph.connections_of(id) {
        if connection.target == id {
            input_ports.insert(connection.target_port);
        }
        if connection.source == id {
            output_ports.insert(connection.source_port);
        }
    }

    let inputs = input_ports
        .into_iter()
        .map(|port| {
            let mut sources: Vec<_> = graph
                .connections()
                .iter()
                .filter(|c| c.target == id && c.target_port == port)
                .collect();
            // Inputs are derived data; a fixed order keeps exports comparable.
            sources.sort_by_key(|c| (c.source, c.source_port));
            let connections = sources
                .into_iter()
                .map(|c| InputLink {
                    node: c.source.to_string(),
                    input: c.output_name(),
                })
                .collect();
            (input_port_name(port), InputPort { connections })
        })
        .collect();
    let outputs = output_ports
        .into_iter()
        .map(|port| {
            let connections = graph
                .connections()
                .iter()
                .filter(|c| c.source == id && c.source_port == port)
                .map(|c| OutputLink {
                    node: c.target.to_string(),
                    output: c.input_name(),
                })
                .collect();
            (output_port_name(port), OutputPort { connections })
        })
        .collect();

    let position = block.position();
    NodeRecord {
        id,
        name: block.name().to_owned(),
        data: block.data().clone(),
        class: block.class().to_owned(),
        html: block.html().to_owned(),
        inputs,
        outputs,
        pos_x: position.x,
        pos_y: position.y,
    }
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
