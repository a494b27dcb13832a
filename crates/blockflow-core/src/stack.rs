//! Stack and arm surgery: remove, detach, snap below, snap into arm.
//!
//! Each operation validates first and only then mutates, so a rejected call
//! leaves the graph exactly as it was. Connections mirror physical links:
//! linking records the stack or arm edge, unlinking drops it.

use crate::block::{Block, BlockId};
use crate::connection::Connection;
use crate::error::GraphError;
use crate::graph::{BlockGraph, GraphChange};
use crate::walk::Anchor;

impl BlockGraph {
    /// Removes `id`, joining its neighbours around the gap.
    ///
    /// The successor takes the removed block's exact slot: below the
    /// predecessor, at the head of the same arm, or as a free root at the
    /// removed block's position. Arms owned by the removed block become free
    /// stacks.
    pub fn remove_block(&mut self, id: BlockId) -> Result<Block, GraphError> {
        let block = self.block(id)?;
        let anchor = self.anchor_of(id).unwrap_or(Anchor::Root);
        let next = block.next;
        let position = block.position();
        let orphans: Vec<BlockId> = block.branches.iter().flatten().copied().collect();

        for head in orphans {
            self.set_enclosing_chain(head, None);
        }
        self.drop_connections_of(id);
        if let Some(next) = next {
            self.block_mut(next)?.prev = None;
        }
        match anchor {
            Anchor::Below(prev) => self.block_mut(prev)?.next = None,
            Anchor::Arm { c_block, arm } => {
                if let Some(slot) = self.block_mut(c_block)?.branches.get_mut(arm) {
                    *slot = None;
                }
            }
            Anchor::Root => {}
        }

        if let Some(next) = next {
            match anchor {
                Anchor::Below(prev) => self.link_below_unchecked(prev, next)?,
                Anchor::Arm { c_block, arm } => self.link_arm_unchecked(c_block, arm, next)?,
                Anchor::Root => self.block_mut(next)?.set_position(position),
            }
        }

        let removed = self
            .blocks
            .shift_remove(&id)
            .ok_or(GraphError::UnknownBlock(id))?;
        self.record(GraphChange::BlockRemoved(id));
        Ok(removed)
    }

    /// Splices `id` and everything below or inside it out of its current
    /// position, leaving it a free root. Returns the anchor it had.
    pub fn detach(&mut self, id: BlockId) -> Result<Anchor, GraphError> {
        let anchor = self.anchor_of(id).ok_or(GraphError::UnknownBlock(id))?;
        match anchor {
            Anchor::Root => return Ok(anchor),
            Anchor::Below(prev) => {
                self.block_mut(prev)?.next = None;
                self.drop_connection(&Connection::stack(prev, id));
            }
            Anchor::Arm { c_block, arm } => {
                if let Some(slot) = self.block_mut(c_block)?.branches.get_mut(arm) {
                    *slot = None;
                }
                self.drop_connection(&Connection::arm(c_block, arm, id));
            }
        }
        self.block_mut(id)?.prev = None;
        self.set_enclosing_chain(id, None);
        Ok(anchor)
    }

    /// Attaches the chain headed by `moving` directly under `anchor`.
    ///
    /// The anchor's previous successor is appended to the moved chain's tail,
    /// or released as a free root when that tail is a cap.
    pub fn snap_below(&mut self, anchor: BlockId, moving: BlockId) -> Result<(), GraphError> {
        self.check_below(anchor, moving)?;
        if self.block(anchor)?.next == Some(moving) {
            return Ok(());
        }
        self.detach(moving)?;
        self.link_below_unchecked(anchor, moving)
    }

    /// Installs `moving` as the head of arm `arm` of `c_block`.
    ///
    /// The arm's previous occupant is appended to the moved chain's tail.
    pub fn snap_into_arm(
        &mut self,
        c_block: BlockId,
        arm: usize,
        moving: BlockId,
    ) -> Result<(), GraphError> {
        self.check_arm(c_block, arm, moving)?;
        if self.block(c_block)?.branches[arm] == Some(moving) {
            return Ok(());
        }
        self.detach(moving)?;
        self.link_arm_unchecked(c_block, arm, moving)
    }

    /// Snaps a free `target` below `anchor` only when both ends are vacant.
    ///
    /// Used when rebuilding topology from connections, where the first claim
    /// on a slot wins and later claims are refused.
    pub fn claim_below(&mut self, anchor: BlockId, target: BlockId) -> Result<(), GraphError> {
        self.check_below(anchor, target)?;
        if self.block(anchor)?.next.is_some() {
            return Err(GraphError::SlotOccupied(anchor));
        }
        if !self.block(target)?.is_root() {
            return Err(GraphError::AlreadyAttached(target));
        }
        self.link_below_unchecked(anchor, target)
    }

    /// Arm counterpart of [`claim_below`](Self::claim_below).
    pub fn claim_arm(
        &mut self,
        c_block: BlockId,
        arm: usize,
        target: BlockId,
    ) -> Result<(), GraphError> {
        self.check_arm(c_block, arm, target)?;
        if self.block(c_block)?.branches[arm].is_some() {
            return Err(GraphError::SlotOccupied(c_block));
        }
        if !self.block(target)?.is_root() {
            return Err(GraphError::AlreadyAttached(target));
        }
        self.link_arm_unchecked(c_block, arm, target)
    }

    fn check_below(&self, anchor: BlockId, moving: BlockId) -> Result<(), GraphError> {
        let anchor_block = self.block(anchor)?;
        let moving_block = self.block(moving)?;
        if moving_block.shape().is_hat() {
            return Err(GraphError::HatCannotAttach(moving));
        }
        if anchor_block.shape().is_cap() {
            return Err(GraphError::CapHasNoSuccessor(anchor));
        }
        if self.subtree(moving).contains(&anchor) {
            return Err(GraphError::WouldCycle { anchor, moving });
        }
        Ok(())
    }

    fn check_arm(&self, c_block: BlockId, arm: usize, moving: BlockId) -> Result<(), GraphError> {
        let host = self.block(c_block)?;
        let moving_block = self.block(moving)?;
        if !host.shape().is_c_block() {
            return Err(GraphError::NotACBlock(c_block));
        }
        if arm >= host.branches.len() {
            return Err(GraphError::ArmOutOfRange { c_block, arm });
        }
        if moving_block.shape().is_hat() {
            return Err(GraphError::HatCannotAttach(moving));
        }
        if self.subtree(moving).contains(&c_block) {
            return Err(GraphError::WouldCycle {
                anchor: c_block,
                moving,
            });
        }
        Ok(())
    }

    /// Links a free `moving` chain under `anchor`. Callers have validated.
    fn link_below_unchecked(&mut self, anchor: BlockId, moving: BlockId) -> Result<(), GraphError> {
        let displaced = self.block_mut(anchor)?.next.take();
        if let Some(old) = displaced {
            self.block_mut(old)?.prev = None;
            self.drop_connection(&Connection::stack(anchor, old));
        }
        self.block_mut(anchor)?.next = Some(moving);
        self.block_mut(moving)?.prev = Some(anchor);
        self.ensure_connection(Connection::stack(anchor, moving));

        let enclosing = self.block(anchor)?.enclosing();
        self.set_enclosing_chain(moving, enclosing);
        if let Some(old) = displaced {
            self.append_to_tail(moving, old, enclosing)?;
        }
        Ok(())
    }

    /// Installs a free `moving` chain at the head of an arm. Callers have validated.
    fn link_arm_unchecked(
        &mut self,
        c_block: BlockId,
        arm: usize,
        moving: BlockId,
    ) -> Result<(), GraphError> {
        let host = self.block_mut(c_block)?;
        let slot = host
            .branches
            .get_mut(arm)
            .ok_or(GraphError::ArmOutOfRange { c_block, arm })?;
        let displaced = slot.replace(moving);
        if let Some(old) = displaced {
            self.drop_connection(&Connection::arm(c_block, arm, old));
        }
        self.block_mut(moving)?.prev = None;
        self.ensure_connection(Connection::arm(c_block, arm, moving));

        let enclosing = Some((c_block, arm));
        self.set_enclosing_chain(moving, enclosing);
        if let Some(old) = displaced {
            self.append_to_tail(moving, old, enclosing)?;
        }
        Ok(())
    }

    /// Hangs the chain headed by `displaced` below the tail of `head`'s chain.
    fn append_to_tail(
        &mut self,
        head: BlockId,
        displaced: BlockId,
        enclosing: Option<(BlockId, usize)>,
    ) -> Result<(), GraphError> {
        let tail = self.chain_tail(head);
        if self.block(tail)?.shape().is_cap() {
            log::debug!("cap {tail} ends the moved chain, releasing {displaced} as a free stack");
            self.set_enclosing_chain(displaced, None);
            return Ok(());
        }
        self.block_mut(tail)?.next = Some(displaced);
        self.block_mut(displaced)?.prev = Some(tail);
        self.ensure_connection(Connection::stack(tail, displaced));
        self.set_enclosing_chain(displaced, enclosing);
        Ok(())
    }

    fn set_enclosing_chain(&mut self, head: BlockId, enclosing: Option<(BlockId, usize)>) {
        for id in self.chain(head) {
            if let Some(block) = self.get_mut(id) {
                block.set_enclosing(enclosing);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/stack_tests.rs"]
mod tests;
