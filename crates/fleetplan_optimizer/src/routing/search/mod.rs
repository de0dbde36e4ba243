mod construction;
mod context;
mod deadline;
mod guided_local_search;
mod ls;
mod working_solution;

use rand::{SeedableRng, rngs::SmallRng};
use tracing::{debug, info, instrument};

use crate::routing::{
    assignment::Assignment,
    error::RoutingError,
    model::RoutingModel,
    search_parameters::{LocalSearchMetaheuristic, SearchParameters},
};

use self::{context::SearchContext, deadline::Deadline};

#[instrument(skip_all, level = "debug")]
pub(crate) fn solve(
    model: &RoutingModel,
    parameters: &SearchParameters,
) -> Result<Option<Assignment>, RoutingError> {
    let deadline = Deadline::after(parameters.time_limit);
    let context = SearchContext::new(model)?;

    let mut solution =
        construction::build_first_solution(&context, parameters.first_solution_strategy);
    debug!(score = %solution.score(), "First solution");

    let moves = ls::local_search::descend(&mut solution, None, &deadline);
    debug!(
        moves,
        score = %solution.score(),
        elapsed = ?deadline.elapsed(),
        "Local optimum"
    );

    if parameters.local_search_metaheuristic == LocalSearchMetaheuristic::GuidedLocalSearch {
        let mut rng = SmallRng::seed_from_u64(parameters.random_seed);
        solution = guided_local_search::run(solution, &deadline, &mut rng);
    }

    if solution.score().is_failure() {
        info!(
            unperformed = solution.score().hard_score,
            "Mandatory visits could not be served"
        );
        return Ok(None);
    }

    Ok(solution.to_assignment())
}
