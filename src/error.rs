use thiserror::Error;

use crate::node::{Dir, NodeId};

/// Convenience alias for `Result<T, avl_engine::Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Contract failures detected while restructuring or auditing a tree.
///
/// Apart from [`Error::ArenaFull`], none of these are caused by user input. Duplicate values on
/// insert and missing values on search or removal are ordinary return values, never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A rotation was invoked on a node lacking the child it needs to lift.
    #[error("rotation at {pivot} requires a {side} child")]
    MissingChild { pivot: NodeId, side: Dir },

    /// Post-rotation validation found inconsistent links or broken local order.
    #[error("invalid rotation at {pivot}: {reason}")]
    InvalidRotation {
        pivot: NodeId,
        reason: &'static str,
    },

    /// A cached height diverges from the height recomputed from its children.
    #[error("height mismatch at {node}: cached {cached}, computed {computed}")]
    HeightMismatch {
        node: NodeId,
        cached: i32,
        computed: i32,
    },

    /// A balance factor outside the range the engine can correct or accept.
    #[error("invalid balance factor {balance_factor} at {node}")]
    InvalidBalanceFactor { node: NodeId, balance_factor: i32 },

    /// A parent and child disagree about their link.
    #[error("broken parent link at {node}")]
    BrokenLink { node: NodeId },

    /// A value is out of order relative to one of its ancestors.
    #[error("order violation at {node}")]
    OrderViolation { node: NodeId },

    /// The element counter disagrees with the number of reachable nodes.
    #[error("size mismatch: len is {len}, counted {counted} nodes")]
    SizeMismatch { len: usize, counted: usize },

    /// Every addressable slot of the node arena is in use.
    #[error("node arena is full: {len} slots in use")]
    ArenaFull { len: usize },

    /// The handle does not refer to a live node of this tree.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}
