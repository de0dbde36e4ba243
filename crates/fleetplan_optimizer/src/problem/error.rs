use fleetplan_matrix::error::MatrixError;
use thiserror::Error;

use crate::routing::error::RoutingError;

#[derive(Debug, Error)]
pub enum FormulationError {
    #[error("request has no depot")]
    NoDepot,

    #[error("stop {stop_id} has an inverted time window [{start}, {end}]")]
    InvalidTimeWindow {
        stop_id: String,
        start: i64,
        end: i64,
    },

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error("routing model rejected the formulation: {0}")]
    Routing(#[from] RoutingError),
}
