use thiserror::Error;

/// Disagreement between the assignment and the formulation it was solved from.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("engine vehicle {0} has no fleet vehicle")]
    UnknownVirtualVehicle(usize),

    #[error("no {dimension} cumul for routing index {index}")]
    DimensionMissing {
        dimension: &'static str,
        index: usize,
    },

    #[error("route of engine vehicle {0} does not reach its end")]
    RouteDoesNotReachEnd(usize),

    #[error("routing index {0} maps to no formulated node")]
    UnknownNode(usize),
}
