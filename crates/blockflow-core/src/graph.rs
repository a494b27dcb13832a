//! The block arena and its non-topological operations.

use crate::block::{Block, BlockId, NewBlock};
use crate::catalog::BlockCatalog;
use crate::connection::Connection;
use crate::error::GraphError;
use blockflow_graphics::{Point, ShapeClass};
use indexmap::IndexMap;

/// Structural change recorded by a graph mutation, drained by the owner.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphChange {
    BlockAdded(BlockId),
    BlockRemoved(BlockId),
    ConnectionCreated(Connection),
    ConnectionRemoved(Connection),
}

/// Arena of blocks keyed by id, plus the connection list.
///
/// Iteration follows insertion order, which is the stable order used to
/// break ties between equally distant snap candidates and between
/// conflicting import claims.
#[derive(Clone, Debug)]
pub struct BlockGraph {
    pub(crate) blocks: IndexMap<BlockId, Block>,
    pub(crate) connections: Vec<Connection>,
    next_id: BlockId,
    catalog: BlockCatalog,
    changes: Vec<GraphChange>,
}

impl Default for BlockGraph {
    fn default() -> Self {
        Self::new(BlockCatalog::default())
    }
}

impl BlockGraph {
    pub fn new(catalog: BlockCatalog) -> Self {
        Self {
            blocks: IndexMap::new(),
            connections: Vec::new(),
            next_id: 1,
            catalog,
            changes: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    pub fn shape_of(&self, name: &str) -> ShapeClass {
        self.catalog.shape_of(name)
    }

    /// Id the next [`add_block`](Self::add_block) call will hand out.
    pub fn peek_next_id(&self) -> BlockId {
        self.next_id
    }

    pub fn add_block(&mut self, spec: NewBlock) -> BlockId {
        let id = self.next_id;
        self.next_id += 1;
        self.insert(id, spec);
        id
    }

    /// Inserts a block under a caller-chosen id, as import does.
    ///
    /// The allocator is advanced past `id` so later additions never reuse it.
    pub fn insert_with_id(&mut self, id: BlockId, spec: NewBlock) -> Result<(), GraphError> {
        if self.blocks.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }
        self.next_id = self.next_id.max(id.saturating_add(1));
        self.insert(id, spec);
        Ok(())
    }

    fn insert(&mut self, id: BlockId, spec: NewBlock) {
        let shape = self.catalog.shape_of(&spec.name);
        self.blocks.insert(id, Block::new(id, shape, spec));
        self.changes.push(GraphChange::BlockAdded(id));
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(&id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in stable insertion order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn ids(&self) -> Vec<BlockId> {
        self.blocks.keys().copied().collect()
    }

    /// Stack roots in insertion order.
    pub fn roots(&self) -> Vec<BlockId> {
        self.blocks
            .values()
            .filter(|block| block.is_root())
            .map(Block::id)
            .collect()
    }

    pub(crate) fn block(&self, id: BlockId) -> Result<&Block, GraphError> {
        self.blocks.get(&id).ok_or(GraphError::UnknownBlock(id))
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> Result<&mut Block, GraphError> {
        self.blocks.get_mut(&id).ok_or(GraphError::UnknownBlock(id))
    }

    pub fn set_position(&mut self, id: BlockId, position: Point) -> Result<(), GraphError> {
        self.block_mut(id)?.set_position(position);
        Ok(())
    }

    /// Removes every block and connection. The id allocator keeps counting.
    pub fn clear(&mut self) {
        let connections = std::mem::take(&mut self.connections);
        self.changes
            .extend(connections.into_iter().map(GraphChange::ConnectionRemoved));
        let ids: Vec<BlockId> = self.blocks.keys().copied().collect();
        self.blocks.clear();
        self.changes
            .extend(ids.into_iter().map(GraphChange::BlockRemoved));
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connections_of(&self, id: BlockId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.touches(id))
    }

    pub fn has_connection(&self, connection: &Connection) -> bool {
        self.connections.contains(connection)
    }

    /// Records a connection. Returns `Ok(false)` when it already exists.
    pub fn add_connection(&mut self, connection: Connection) -> Result<bool, GraphError> {
        self.block(connection.source)?;
        self.block(connection.target)?;
        if connection.source == connection.target {
            return Err(GraphError::SelfConnection(connection.source));
        }
        Ok(self.ensure_connection(connection))
    }

    /// Drops a connection. Returns false when it was not present.
    ///
    /// Removing the connection behind a physical snap leaves the snap in
    /// place; detach the block to break the link itself.
    pub fn remove_connection(&mut self, connection: &Connection) -> bool {
        self.drop_connection(connection)
    }

    /// True when `connection` is backed by a stack or arm link.
    pub fn is_snapped(&self, connection: &Connection) -> bool {
        let Some(source) = self.get(connection.source) else {
            return false;
        };
        if connection.target_port != crate::PRIMARY_PORT {
            return false;
        }
        match connection.arm_index() {
            None => source.next == Some(connection.target),
            Some(arm) => source.branches.get(arm).copied().flatten() == Some(connection.target),
        }
    }

    pub(crate) fn ensure_connection(&mut self, connection: Connection) -> bool {
        if self.connections.contains(&connection) {
            return false;
        }
        self.connections.push(connection);
        self.changes.push(GraphChange::ConnectionCreated(connection));
        true
    }

    pub(crate) fn drop_connection(&mut self, connection: &Connection) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c != connection);
        let removed = self.connections.len() != before;
        if removed {
            self.changes.push(GraphChange::ConnectionRemoved(*connection));
        }
        removed
    }

    pub(crate) fn drop_connections_of(&mut self, id: BlockId) {
        let (dropped, kept): (Vec<Connection>, Vec<Connection>) = self
            .connections
            .drain(..)
            .partition(|connection| connection.touches(id));
        self.connections = kept;
        self.changes
            .extend(dropped.into_iter().map(GraphChange::ConnectionRemoved));
    }

    pub(crate) fn record(&mut self, change: GraphChange) {
        self.changes.push(change);
    }

    /// Hands every pending change to `handler`, oldest first.
    pub fn drain_changes<F>(&mut self, mut handler: F)
    where
        F: FnMut(GraphChange),
    {
        for change in self.changes.drain(..) {
            handler(change);
        }
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Verifies the stack/arm cross references. Used by tests and debug builds.
    pub fn check_invariants(&self) -> Result<(), GraphError> {
        let fail = |message: String| Err(GraphError::Invariant(message));
        for block in self.blocks.values() {
            let id = block.id();
            if block.parent_c_block.is_some() != block.branch_index.is_some() {
                return fail(format!("block {id} has a half-set parent link"));
            }
            if block.shape().is_hat() && (block.prev.is_some() || block.parent_c_block.is_some()) {
                return fail(format!("hat block {id} is attached"));
            }
            if block.shape().is_cap() && block.next.is_some() {
                return fail(format!("cap block {id} has a successor"));
            }
            if let Some(prev) = block.prev {
                let Some(prev_block) = self.get(prev) else {
                    return fail(format!("block {id} points at missing predecessor {prev}"));
                };
                if prev_block.next != Some(id) {
                    return fail(format!("block {prev} does not point back at {id}"));
                }
                if prev_block.enclosing() != block.enclosing() {
                    return fail(format!("block {id} does not inherit nesting from {prev}"));
                }
            }
            if let Some(next) = block.next {
                match self.get(next) {
                    Some(next_block) if next_block.prev == Some(id) => {}
                    _ => return fail(format!("successor {next} of {id} does not point back")),
                }
            }
            if let (None, Some((c_block, arm))) = (block.prev, block.enclosing()) {
                let head = self
                    .get(c_block)
                    .and_then(|parent| parent.branches.get(arm).copied().flatten());
                if head != Some(id) {
                    return fail(format!("arm {arm} of {c_block} does not list head {id}"));
                }
            }
            if block.branches.len() != block.shape().arm_count() {
                return fail(format!("block {id} has the wrong number of arms"));
            }
            for (arm, head) in block.branches.iter().enumerate() {
                let Some(head) = *head else { continue };
                match self.get(head) {
                    Some(child) if child.prev.is_none() && child.enclosing() == Some((id, arm)) => {}
                    _ => return fail(format!("arm {arm} head {head} of {id} does not point back")),
                }
            }
            if self.chain_is_cyclic(id) {
                return fail(format!("stack starting at {id} is cyclic"));
            }
        }
        for connection in &self.connections {
            if !self.contains(connection.source) || !self.contains(connection.target) {
                return fail(format!("connection {connection:?} has a missing endpoint"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/graph_tests.rs"]
mod tests;
