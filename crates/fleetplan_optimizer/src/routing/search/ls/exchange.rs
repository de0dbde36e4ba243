use crate::routing::{
    index_manager::VehicleIdx,
    search::{
        ls::operator::LocalSearchOperator,
        working_solution::{RouteChanges, WorkingSolution},
    },
};

/// **Exchange**
///
/// Swaps two visits, within one route or across two routes.
///
/// ```text
/// BEFORE:
///    Route 1: ... (A) -> [X] -> (B) ...
///    Route 2: ... (C) -> [Y] -> (D) ...
///
/// AFTER:
///    Route 1: ... (A) -> [Y] -> (B) ...
///    Route 2: ... (C) -> [X] -> (D) ...
/// ```
#[derive(Debug)]
pub(crate) struct ExchangeOperator {
    pub first: (VehicleIdx, usize),
    pub second: (VehicleIdx, usize),
}

impl LocalSearchOperator for ExchangeOperator {
    const NAME: &'static str = "Exchange";

    fn generate_moves<C>(solution: &WorkingSolution, mut consumer: C)
    where
        C: FnMut(Self),
    {
        let slots = solution
            .usable_vehicles()
            .flat_map(|vehicle| {
                (0..solution.route(vehicle).len()).map(move |position| (vehicle, position))
            })
            .collect::<Vec<_>>();

        for (i, &first) in slots.iter().enumerate() {
            for &second in &slots[i + 1..] {
                consumer(ExchangeOperator { first, second });
            }
        }
    }

    fn changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let (first_vehicle, first_position) = self.first;
        let (second_vehicle, second_position) = self.second;

        if first_vehicle == second_vehicle {
            let mut visits = solution.route(first_vehicle).to_vec();
            visits.swap(first_position, second_position);
            return RouteChanges::route(first_vehicle, visits);
        }

        let mut first = solution.route(first_vehicle).to_vec();
        let mut second = solution.route(second_vehicle).to_vec();
        std::mem::swap(&mut first[first_position], &mut second[second_position]);

        RouteChanges::routes(vec![(first_vehicle, first), (second_vehicle, second)])
    }
}
