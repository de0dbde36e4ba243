use jiff::SignedDuration;
use tracing::{info, instrument, warn};

use crate::{
    decode::decode,
    diagnostics::persist_solver_error,
    error::SolveError,
    json::{
        request::{JsonSolverParams, OptimizeRequest},
        response::OptimizeResponse,
    },
    problem::{formulation::Formulation, routing_setup::build_routing_model},
    routing::search_parameters::SearchParameters,
};

/// Solves one request.
///
/// An infeasible request yields a `failed` response. Errors are faults of the
/// formulation, the engine or the decoding; they are written to the
/// diagnostics directory before being returned.
#[instrument(
    skip_all,
    level = "debug",
    fields(stops = request.stops.len(), vehicles = request.vehicles.len())
)]
pub fn solve(request: &OptimizeRequest) -> Result<OptimizeResponse, SolveError> {
    solve_request(request).inspect_err(|error| persist_solver_error(request, error))
}

fn solve_request(request: &OptimizeRequest) -> Result<OptimizeResponse, SolveError> {
    let formulation = Formulation::from_request(request)?;
    let formulated = build_routing_model(&formulation)?;
    let parameters = search_parameters(&request.params);

    let assignment = formulated.model.solve_with_parameters(&parameters)?;
    let objective = assignment.as_ref().map(|assignment| assignment.objective());
    let response = decode(&formulation, &formulated, assignment.as_ref())?;

    info!(
        status = ?response.summary.status,
        routes = response.routes.len(),
        unserved = response.summary.unserved_stop_ids.len(),
        objective,
        total_dist_km = response.summary.total_dist_km,
        "Solved"
    );

    Ok(response)
}

pub fn search_parameters(params: &JsonSolverParams) -> SearchParameters {
    let defaults = SearchParameters::default();

    let time_limit = SignedDuration::try_from_secs_f64(params.time_limit_seconds)
        .ok()
        .filter(|limit| limit.is_positive())
        .unwrap_or_else(|| {
            warn!(
                time_limit_seconds = params.time_limit_seconds,
                "Invalid time limit, using the default"
            );
            defaults.time_limit
        });

    let local_search_metaheuristic = match params.local_search_metaheuristic.as_deref() {
        Some(value) => value.parse().unwrap_or_else(|error| {
            warn!(%error, "Unknown local search metaheuristic, using greedy descent");
            defaults.local_search_metaheuristic
        }),
        None => defaults.local_search_metaheuristic,
    };

    let first_solution_strategy = match params.first_solution_strategy.as_deref() {
        Some(value) => value.parse().unwrap_or_else(|error| {
            warn!(%error, "Unknown first solution strategy, using path cheapest arc");
            defaults.first_solution_strategy
        }),
        None => defaults.first_solution_strategy,
    };

    SearchParameters {
        first_solution_strategy,
        local_search_metaheuristic,
        time_limit,
        random_seed: params.random_seed,
    }
}
