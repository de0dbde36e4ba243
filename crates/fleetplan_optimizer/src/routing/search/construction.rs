use tracing::{debug, instrument};

use crate::routing::{
    index_manager::VehicleIdx,
    search::{
        context::SearchContext,
        working_solution::{MoveEvaluation, RouteChanges, WorkingSolution},
    },
    search_parameters::FirstSolutionStrategy,
};

#[instrument(skip_all, level = "debug")]
pub(crate) fn build_first_solution<'a>(
    context: &'a SearchContext<'a>,
    strategy: FirstSolutionStrategy,
) -> WorkingSolution<'a> {
    let mut solution = WorkingSolution::new(context);

    match strategy {
        FirstSolutionStrategy::PathCheapestArc => extend_paths(&mut solution),
        FirstSolutionStrategy::GlobalCheapestInsertion => insert_globally(&mut solution),
    }

    insert_remaining(&mut solution);
    solution
}

/// Grows each route from its start, always appending the cheapest feasible arc.
fn extend_paths(solution: &mut WorkingSolution) {
    let model = solution.model();
    let manager = model.manager();
    let vehicles = solution.usable_vehicles().collect::<Vec<_>>();

    for vehicle in vehicles {
        loop {
            let last = solution
                .route(vehicle)
                .last()
                .copied()
                .unwrap_or(manager.start(vehicle));

            // Zero-penalty visits are never worth serving.
            let mut candidates = solution
                .inactive_indices()
                .filter(|&index| model.disjunction_penalty(index) != Some(0))
                .map(|index| (model.arc_cost(vehicle, last, index), index))
                .collect::<Vec<_>>();
            candidates.sort_unstable();

            let appended = candidates.into_iter().find_map(|(_, index)| {
                let mut visits = solution.route(vehicle).to_vec();
                visits.push(index);
                let changes = RouteChanges::route(vehicle, visits).activating(index);
                solution
                    .evaluate(&changes, None)
                    .map(|evaluation| (changes, evaluation))
            });

            match appended {
                Some((changes, evaluation)) => solution.apply(changes, evaluation),
                None => break,
            }
        }
    }

    debug!(score = %solution.score(), "Path cheapest arc done");
}

/// Inserts, one at a time, the visit whose best insertion improves the objective most.
fn insert_globally(solution: &mut WorkingSolution) {
    loop {
        let best = solution
            .inactive_indices()
            .filter_map(|index| best_insertion(solution, index))
            .min_by_key(|(_, evaluation)| evaluation.delta);

        match best {
            Some((changes, evaluation)) if evaluation.delta.is_improvement() => {
                solution.apply(changes, evaluation)
            }
            _ => break,
        }
    }

    debug!(score = %solution.score(), "Global cheapest insertion done");
}

/// Inserts the remaining inactive visits at their cheapest position, mandatory
/// visits first. Optional visits stay out when inserting costs more than their penalty.
fn insert_remaining(solution: &mut WorkingSolution) {
    let model = solution.model();
    let mut pending = solution.inactive_indices().collect::<Vec<_>>();
    pending.sort_by_key(|&index| (model.disjunction_penalty(index).is_some(), index));

    for index in pending {
        if let Some((changes, evaluation)) = best_insertion(solution, index)
            && evaluation.delta.is_improvement()
        {
            solution.apply(changes, evaluation);
        }
    }
}

/// Cheapest feasible position of an inactive visit over every usable vehicle.
pub(crate) fn best_insertion(
    solution: &WorkingSolution,
    index: usize,
) -> Option<(RouteChanges, MoveEvaluation)> {
    let mut best: Option<(RouteChanges, MoveEvaluation)> = None;

    for vehicle in solution.usable_vehicles() {
        for position in 0..=solution.route(vehicle).len() {
            let changes = insertion(solution, vehicle, position, index);
            let Some(evaluation) = solution.evaluate(&changes, None) else {
                continue;
            };

            if best
                .as_ref()
                .is_none_or(|(_, current)| evaluation.delta < current.delta)
            {
                best = Some((changes, evaluation));
            }
        }
    }

    best
}

pub(crate) fn insertion(
    solution: &WorkingSolution,
    vehicle: VehicleIdx,
    position: usize,
    index: usize,
) -> RouteChanges {
    let mut visits = solution.route(vehicle).to_vec();
    visits.insert(position, index);
    RouteChanges::route(vehicle, visits).activating(index)
}
