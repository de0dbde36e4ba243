//! Reads a solved assignment back into routes, steps and fleet totals.

pub mod error;
pub mod inventory;
pub mod route_decoder;
pub mod summary;

use tracing::instrument;

use crate::{
    decode::{error::DecodeError, route_decoder::RouteDecoder, summary::summarize},
    json::response::OptimizeResponse,
    problem::{formulation::Formulation, routing_setup::FormulatedModel, solver_node::StopIdx},
    routing::{assignment::Assignment, index_manager::RoutingIndexManager},
    utils::enumerate_idx::EnumerateIdx,
};

/// Builds the response of a solve. Without an assignment the solve failed.
#[instrument(skip_all, level = "debug")]
pub fn decode(
    formulation: &Formulation,
    formulated: &FormulatedModel,
    assignment: Option<&Assignment>,
) -> Result<OptimizeResponse, DecodeError> {
    let Some(assignment) = assignment else {
        return Ok(OptimizeResponse::failed());
    };

    let manager = formulated.model.manager();
    let decoder = RouteDecoder::new(formulation, formulated, assignment);
    let mut routes = Vec::new();
    for vehicle in manager.vehicles() {
        if let Some(route) = decoder.decode(vehicle)? {
            routes.push(route);
        }
    }

    let unserved = unserved_stop_ids(formulation, manager, assignment);
    let summary = summarize(&routes, unserved);

    Ok(OptimizeResponse { routes, summary })
}

/// Parent ids of the stops with at least one unperformed chunk, in node order.
pub fn unserved_stop_ids(
    formulation: &Formulation,
    manager: &RoutingIndexManager,
    assignment: &Assignment,
) -> Vec<String> {
    let mut unserved: Vec<StopIdx> = formulation
        .nodes()
        .iter()
        .enumerate_idx()
        .filter_map(|(node_idx, node)| {
            let stop = node.stop()?;
            let index = manager.node_to_index(node_idx)?;
            (!assignment.is_active(index)).then_some(stop)
        })
        .collect();
    unserved.dedup();

    unserved
        .into_iter()
        .filter_map(|stop| formulation.stop(stop))
        .map(|stop| stop.id.clone())
        .collect()
}
