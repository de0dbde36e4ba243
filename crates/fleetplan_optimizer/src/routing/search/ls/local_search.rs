use tracing::{instrument, trace};

use crate::routing::search::{
    deadline::Deadline,
    guided_local_search::ArcPenalties,
    ls::{
        exchange::ExchangeOperator,
        make_active::MakeActiveOperator,
        make_inactive::MakeInactiveOperator,
        operator::LocalSearchOperator,
        or_opt::OrOptOperator,
        relocate::RelocateOperator,
        two_opt::TwoOptOperator,
    },
    working_solution::{MoveEvaluation, RouteChanges, WorkingSolution},
};

const DEADLINE_CHECK_INTERVAL: usize = 64;

/// Applies the best improving move of each neighbourhood in turn until none
/// improves or the deadline passes. Returns the number of applied moves.
///
/// With `guide`, moves are ranked on the penalised objective.
#[instrument(skip_all, level = "debug")]
pub(crate) fn descend(
    solution: &mut WorkingSolution,
    guide: Option<&ArcPenalties>,
    deadline: &Deadline,
) -> usize {
    let mut applied = 0;

    while !deadline.is_reached() {
        let improved = improve_with::<MakeActiveOperator>(solution, guide, deadline)
            || improve_with::<MakeInactiveOperator>(solution, guide, deadline)
            || improve_with::<RelocateOperator>(solution, guide, deadline)
            || improve_with::<ExchangeOperator>(solution, guide, deadline)
            || improve_with::<TwoOptOperator>(solution, guide, deadline)
            || improve_with::<OrOptOperator>(solution, guide, deadline);

        if !improved {
            break;
        }
        applied += 1;
    }

    applied
}

fn improve_with<O: LocalSearchOperator>(
    solution: &mut WorkingSolution,
    guide: Option<&ArcPenalties>,
    deadline: &Deadline,
) -> bool {
    let current: &WorkingSolution = solution;
    let mut best: Option<(RouteChanges, MoveEvaluation)> = None;
    let mut evaluations = 0usize;
    let mut expired = false;

    O::generate_moves(current, |operator| {
        if expired {
            return;
        }

        evaluations += 1;
        if evaluations % DEADLINE_CHECK_INTERVAL == 0 && deadline.is_reached() {
            expired = true;
            return;
        }

        let changes = operator.changes(current);
        let Some(evaluation) = current.evaluate(&changes, guide) else {
            return;
        };

        let objective = evaluation.objective();
        if objective.is_improvement()
            && best
                .as_ref()
                .is_none_or(|(_, best)| objective < best.objective())
        {
            best = Some((changes, evaluation));
        }
    });

    match best {
        Some((changes, evaluation)) => {
            trace!(
                operator = O::NAME,
                delta = %evaluation.delta,
                "Applying move"
            );
            solution.apply(changes, evaluation);
            true
        }
        None => false,
    }
}
