//! Rebuilding a graph from decoded records.

use crate::wire::NodeRecord;
use blockflow_core::{parse_port, BlockGraph, Connection, NewBlock, PRIMARY_PORT};
use blockflow_graphics::{BlockMetrics, Point};

/// What an import produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub blocks: usize,
    pub connections: usize,
    /// Connections turned into stack or arm links.
    pub snapped: usize,
    /// Connection entries dropped for naming a missing node or port.
    pub skipped_links: usize,
}

/// Geometry used to tell physical links from drawn connections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImportOptions {
    pub metrics: BlockMetrics,
    /// Horizontal slack, and upward slack, around an attach point.
    pub snap_radius: f32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            metrics: BlockMetrics::default(),
            snap_radius: 40.0,
        }
    }
}

/// [`import_records_with`] using default metrics.
pub fn import_records(graph: &mut BlockGraph, records: &[NodeRecord]) -> ImportReport {
    import_records_with(graph, records, &ImportOptions::default())
}

/// Replaces the contents of `graph` with `records`.
///
/// After the blocks and connections are rebuilt, connections are replayed
/// in ascending source id and port order: `output_1` stacks the target
/// below its source and `output_{k}` on a C-block places it at the head of
/// arm `k - 2`. A connection becomes a link only when the target's recorded
/// origin sits where that link would have laid it out (see
/// [`at_attach_point`]); anything else is a connection drawn between
/// separate stacks. A claim also needs both the slot and the target to be
/// free, so the first writer wins and later claims stay as plain
/// connections.
pub fn import_records_with(
    graph: &mut BlockGraph,
    records: &[NodeRecord],
    options: &ImportOptions,
) -> ImportReport {
    graph.clear();
    let mut report = ImportReport::default();

    for record in records {
        let spec = NewBlock {
            name: record.name.clone(),
            class: record.class.clone(),
            position: Point::new(record.pos_x, record.pos_y),
            data: record.data.clone(),
            html: record.html.clone(),
        };
        match graph.insert_with_id(record.id, spec) {
            Ok(()) => report.blocks += 1,
            Err(err) => log::warn!("skipping node {}: {err}", record.id),
        }
    }

    let mut replay = Vec::new();
    for record in records {
        if !graph.contains(record.id) {
            continue;
        }
        for (port_name, port) in &record.outputs {
            let Some(source_port) = parse_port(port_name) else {
                log::warn!("node {}: ignoring unknown output {port_name:?}", record.id);
                report.skipped_links += port.connections.len();
                continue;
            };
            for link in &port.connections {
                let target = link.target().filter(|target| graph.contains(*target));
                let (Some(target), Some(target_port)) = (target, parse_port(&link.output)) else {
                    log::warn!(
                        "node {}: dropping connection to {:?} {:?}",
                        record.id,
                        link.node,
                        link.output
                    );
                    report.skipped_links += 1;
                    continue;
                };
                let connection = Connection::new(record.id, source_port, target, target_port);
                match graph.add_connection(connection) {
                    Ok(true) => {
                        report.connections += 1;
                        replay.push(connection);
                    }
                    Ok(false) => {}
                    Err(err) => {
                        log::warn!("node {}: {err}", record.id);
                        report.skipped_links += 1;
                    }
                }
            }
        }
    }

    replay.sort_by_key(|c| (c.source, c.source_port));
    for connection in replay {
        if connection.target_port != PRIMARY_PORT {
            continue;
        }
        if !at_attach_point(graph, &connection, options) {
            log::debug!("connection {connection:?} stays drawn: target is off its attach point");
            continue;
        }
        let claimed = match connection.arm_index() {
            None => graph.claim_below(connection.source, connection.target),
            Some(arm) => graph.claim_arm(connection.source, arm, connection.target),
        };
        match claimed {
            Ok(()) => report.snapped += 1,
            Err(err) => log::debug!("connection {connection:?} stays unsnapped: {err}"),
        }
    }
    report
}

/// Whether the target of `connection` lies where the link would place it.
///
/// Body heights are measured by the host and are not on the wire, so the
/// attach point is taken at its highest possible position (unmeasured
/// bodies, empty arms). The target must be in that column, within
/// `snap_radius` horizontally, and no more than `snap_radius` above it.
pub fn at_attach_point(
    graph: &BlockGraph,
    connection: &Connection,
    options: &ImportOptions,
) -> bool {
    let (Some(source), Some(target)) =
        (graph.get(connection.source), graph.get(connection.target))
    else {
        return false;
    };
    let metrics = &options.metrics;
    let head = metrics.header_height + metrics.min_body_height;
    let arm_slot = metrics.min_arm_height + metrics.bar_height;
    let attach = match connection.arm_index() {
        None => source
            .position()
            .offset(0.0, head + arm_slot * source.shape().arm_count() as f32),
        Some(arm) => source
            .position()
            .offset(metrics.arm_indent, head + arm_slot * arm as f32),
    };
    let at = target.position();
    (at.x - attach.x).abs() <= options.snap_radius && at.y >= attach.y - options.snap_radius
}

#[cfg(test)]
#[path = "tests/import_tests.rs"]
mod tests;
