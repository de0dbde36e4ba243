use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("{starts} start nodes but {ends} end nodes")]
    VehicleCountMismatch { starts: usize, ends: usize },

    #[error("node {node} is out of range, the model has {num_nodes} nodes")]
    NodeOutOfRange { node: usize, num_nodes: usize },

    #[error("routing index {0} is not a visitable index")]
    IndexNotVisitable(usize),

    #[error("routing index {0} does not exist")]
    IndexOutOfRange(usize),

    #[error("unknown transit callback {0}")]
    UnknownCallback(usize),

    #[error("unknown dimension {0}")]
    UnknownDimension(usize),

    #[error("expected one transit callback per vehicle ({expected}), got {actual}")]
    TransitCountMismatch { expected: usize, actual: usize },

    #[error("unknown vehicle {0}")]
    UnknownVehicle(usize),

    #[error("routing index {0} already belongs to a disjunction")]
    DuplicateDisjunction(usize),

    #[error("vehicle precedences contain a cycle")]
    CyclicPrecedence,
}
