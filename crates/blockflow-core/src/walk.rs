//! Bounded traversals over stack and arm links.
//!
//! Every walk carries a visited set and stops after [`MAX_WALK_STEPS`]
//! blocks. A cycle ends the walk with whatever was collected so far.

use crate::block::BlockId;
use crate::collections::BlockSet;
use crate::graph::BlockGraph;

/// Hard ceiling on the number of blocks visited by a single walk.
pub const MAX_WALK_STEPS: usize = 10_000;

/// What positions a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Free stack root, positioned by its own coordinates.
    Root,
    /// Stacked directly below another block.
    Below(BlockId),
    /// Head of one arm's child stack.
    Arm { c_block: BlockId, arm: usize },
}

impl BlockGraph {
    /// `start` followed by every block reachable over `next`.
    pub fn chain(&self, start: BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut seen = BlockSet::default();
        let mut cursor = self.get(start).map(|_| start);
        while let Some(id) = cursor {
            if out.len() >= MAX_WALK_STEPS || !seen.insert(id) {
                log::warn!("stack walk from {start} stopped at {id}: cycle or runaway chain");
                break;
            }
            out.push(id);
            cursor = self.get(id).and_then(|block| block.next);
        }
        out
    }

    /// Last block of the chain starting at `start`.
    pub fn chain_tail(&self, start: BlockId) -> BlockId {
        self.chain(start).last().copied().unwrap_or(start)
    }

    /// `start` plus everything stacked below or nested within it, depth first.
    pub fn subtree(&self, start: BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut seen = BlockSet::default();
        let mut pending = vec![start];
        while let Some(id) = pending.pop() {
            if out.len() >= MAX_WALK_STEPS {
                log::warn!("subtree walk from {start} hit the step ceiling");
                break;
            }
            let Some(block) = self.get(id) else { continue };
            if !seen.insert(id) {
                continue;
            }
            out.push(id);
            if let Some(next) = block.next {
                pending.push(next);
            }
            pending.extend(block.branches.iter().rev().flatten().copied());
        }
        out
    }

    pub fn subtree_set(&self, start: BlockId) -> BlockSet {
        self.subtree(start).into_iter().collect()
    }

    /// Outermost stack root above `id`, climbing through predecessors and
    /// enclosing C-blocks.
    pub fn stack_root(&self, id: BlockId) -> BlockId {
        let mut seen = BlockSet::default();
        let mut current = id;
        while seen.len() < MAX_WALK_STEPS && seen.insert(current) {
            let Some(block) = self.get(current) else { break };
            match (block.prev, block.parent_c_block) {
                (Some(prev), _) => current = prev,
                (None, Some(c_block)) => current = c_block,
                (None, None) => return current,
            }
        }
        current
    }

    /// Anchor currently holding `id`, or `None` for an unknown id.
    pub fn anchor_of(&self, id: BlockId) -> Option<Anchor> {
        let block = self.get(id)?;
        Some(match (block.prev, block.enclosing()) {
            (Some(prev), _) => Anchor::Below(prev),
            (None, Some((c_block, arm))) => Anchor::Arm { c_block, arm },
            (None, None) => Anchor::Root,
        })
    }

    /// Number of C-blocks enclosing `id`.
    pub fn nesting_depth(&self, id: BlockId) -> usize {
        let mut depth = 0;
        let mut seen = BlockSet::default();
        let mut current = self.get(id).and_then(|block| block.parent_c_block);
        while let Some(c_block) = current {
            if depth >= MAX_WALK_STEPS || !seen.insert(c_block) {
                break;
            }
            depth += 1;
            current = self.get(c_block).and_then(|block| block.parent_c_block);
        }
        depth
    }

    pub(crate) fn chain_is_cyclic(&self, start: BlockId) -> bool {
        let mut seen = BlockSet::default();
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            if !seen.insert(id) {
                return true;
            }
            if seen.len() > MAX_WALK_STEPS {
                return true;
            }
            cursor = self.get(id).and_then(|block| block.next);
        }
        false
    }
}
