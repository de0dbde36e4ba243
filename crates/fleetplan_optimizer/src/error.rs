use thiserror::Error;

use crate::{
    decode::error::DecodeError, problem::error::FormulationError, routing::error::RoutingError,
};

/// A fault inside a solve. Infeasible requests are not errors.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("formulation failed: {0}")]
    Formulation(#[from] FormulationError),

    #[error("routing failed: {0}")]
    Routing(#[from] RoutingError),

    #[error("decoding failed: {0}")]
    Decode(#[from] DecodeError),
}
