use crate::routing::{
    index_manager::VehicleIdx,
    search::{
        ls::operator::LocalSearchOperator,
        working_solution::{RouteChanges, WorkingSolution},
    },
};

/// **Intra-Route 2-Opt**
///
/// Reverses the visits between `from` and `to` (inclusive).
///
/// ```text
/// BEFORE:
///    ... (prev) --x--> [from] -> ... -> [to] --x--> (next) ...
///
/// AFTER (Sequence Reversed):
///    ... (prev) -----> [to] -> ... -> [from] -----> (next) ...
/// ```
#[derive(Debug)]
pub(crate) struct TwoOptOperator {
    pub vehicle: VehicleIdx,
    pub from: usize,
    pub to: usize,
}

impl LocalSearchOperator for TwoOptOperator {
    const NAME: &'static str = "Two-Opt";

    fn generate_moves<C>(solution: &WorkingSolution, mut consumer: C)
    where
        C: FnMut(Self),
    {
        for vehicle in solution.usable_vehicles() {
            let len = solution.route(vehicle).len();

            // Reversing two adjacent visits is an exchange.
            for from in 0..len.saturating_sub(2) {
                for to in (from + 2)..len {
                    consumer(TwoOptOperator { vehicle, from, to });
                }
            }
        }
    }

    fn changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let mut visits = solution.route(self.vehicle).to_vec();
        visits[self.from..=self.to].reverse();
        RouteChanges::route(self.vehicle, visits)
    }
}
