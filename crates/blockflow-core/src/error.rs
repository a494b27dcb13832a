use crate::BlockId;

/// Reasons a graph mutation was refused. The graph is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("block {0} does not exist")]
    UnknownBlock(BlockId),
    #[error("block id {0} is already in use")]
    DuplicateId(BlockId),
    #[error("block {0} is a flow entry and cannot be nested or stacked")]
    HatCannotAttach(BlockId),
    #[error("block {0} is terminal and cannot have a successor")]
    CapHasNoSuccessor(BlockId),
    #[error("block {0} has no arms")]
    NotACBlock(BlockId),
    #[error("block {c_block} has no arm {arm}")]
    ArmOutOfRange { c_block: BlockId, arm: usize },
    #[error("attaching {moving} to {anchor} would place a block inside its own subtree")]
    WouldCycle { anchor: BlockId, moving: BlockId },
    #[error("attachment slot on block {0} is already occupied")]
    SlotOccupied(BlockId),
    #[error("block {0} is already attached")]
    AlreadyAttached(BlockId),
    #[error("a connection cannot join block {0} to itself")]
    SelfConnection(BlockId),
    #[error("invariant violated: {0}")]
    Invariant(String),
}
