use crate::{define_index_newtype, routing::index_manager::NodeIdx};

define_index_newtype!(CallbackIdx);
define_index_newtype!(UnaryCallbackIdx);

/// Cost or resource consumed when travelling from one node to another.
///
/// Callbacks are registered once and evaluated by the search much later, so
/// implementations own every value they read.
pub trait TransitCallback: Send + Sync {
    fn transit(&self, from: NodeIdx, to: NodeIdx) -> i64;
}

/// Resource consumed when leaving a node, whatever the destination.
pub trait UnaryTransitCallback: Send + Sync {
    fn transit(&self, node: NodeIdx) -> i64;
}
