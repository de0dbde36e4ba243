use fxhash::FxHashMap;
use rand::{rngs::SmallRng, seq::IndexedRandom};
use tracing::{debug, instrument};

use crate::routing::{
    index_manager::{NodeIdx, VehicleIdx},
    model::RoutingModel,
    search::{deadline::Deadline, ls::local_search, working_solution::WorkingSolution},
};

const PENALTY_FACTOR: f64 = 0.1;

/// Guided local search penalties on node-to-node arcs.
#[derive(Debug, Clone)]
pub(crate) struct ArcPenalties {
    penalties: FxHashMap<(NodeIdx, NodeIdx), i64>,
    lambda: i64,
}

impl ArcPenalties {
    pub fn new(lambda: i64) -> Self {
        ArcPenalties {
            penalties: FxHashMap::default(),
            lambda: lambda.max(1),
        }
    }

    fn penalty(&self, arc: (NodeIdx, NodeIdx)) -> i64 {
        self.penalties.get(&arc).copied().unwrap_or(0)
    }

    /// Penalised cost of a route, zero for empty routes.
    pub fn route_penalty(&self, model: &RoutingModel, vehicle: VehicleIdx, visits: &[usize]) -> i64 {
        if visits.is_empty() || self.penalties.is_empty() {
            return 0;
        }

        let manager = model.manager();
        let count: i64 = model
            .route_path(vehicle, visits)
            .windows(2)
            .map(|arc| {
                self.penalty((
                    manager.index_to_node(arc[0]),
                    manager.index_to_node(arc[1]),
                ))
            })
            .sum();

        self.lambda.saturating_mul(count)
    }

    /// Penalises the arc of highest utility `cost / (1 + penalty)` in the
    /// current solution. Returns false when the solution has no arc.
    fn penalize(&mut self, solution: &WorkingSolution, rng: &mut SmallRng) -> bool {
        let model = solution.model();
        let manager = model.manager();

        let mut best_utility = f64::MIN;
        let mut candidates: Vec<(NodeIdx, NodeIdx)> = Vec::new();

        for vehicle in manager.vehicles() {
            let visits = solution.route(vehicle);
            if visits.is_empty() {
                continue;
            }

            for arc in model.route_path(vehicle, visits).windows(2) {
                let key = (manager.index_to_node(arc[0]), manager.index_to_node(arc[1]));
                let utility =
                    model.arc_cost(vehicle, arc[0], arc[1]) as f64 / (1 + self.penalty(key)) as f64;

                if utility > best_utility {
                    best_utility = utility;
                    candidates.clear();
                    candidates.push(key);
                } else if utility == best_utility {
                    candidates.push(key);
                }
            }
        }

        match candidates.choose(rng) {
            Some(&arc) => {
                *self.penalties.entry(arc).or_insert(0) += 1;
                true
            }
            None => false,
        }
    }
}

/// Alternates penalisation and descent on the augmented objective until the
/// deadline, returning the best solution on the real objective.
#[instrument(skip_all, level = "debug")]
pub(crate) fn run<'a>(
    mut solution: WorkingSolution<'a>,
    deadline: &Deadline,
    rng: &mut SmallRng,
) -> WorkingSolution<'a> {
    let model = solution.model();
    let mut penalties = ArcPenalties::new(initial_lambda(&solution));
    let mut best = solution.clone();
    let mut rounds = 0usize;

    while !deadline.is_reached() {
        if !penalties.penalize(&solution, rng) {
            break;
        }
        rounds += 1;

        local_search::descend(&mut solution, Some(&penalties), deadline);

        if solution.score() < best.score() {
            debug!(round = rounds, score = %solution.score(), "Guided local search improved");
            best = solution.clone();
        }
    }

    debug!(
        rounds,
        vehicles = model.manager().num_vehicles(),
        score = %best.score(),
        "Guided local search done"
    );
    best
}

/// Weight of one arc penalty: a fraction of the mean cost of a performed arc.
/// Drop penalties are left out, they would dwarf the arc costs.
fn initial_lambda(solution: &WorkingSolution) -> i64 {
    let num_arcs: usize = solution
        .routes()
        .iter()
        .filter(|visits| !visits.is_empty())
        .map(|visits| visits.len() + 1)
        .sum();

    if num_arcs == 0 {
        return 1;
    }
    (PENALTY_FACTOR * solution.route_costs() as f64 / num_arcs as f64) as i64
}
