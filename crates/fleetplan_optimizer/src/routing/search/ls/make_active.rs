use crate::routing::{
    index_manager::VehicleIdx,
    search::{
        construction::insertion,
        ls::operator::LocalSearchOperator,
        working_solution::{RouteChanges, WorkingSolution},
    },
};

/// Starts performing an inactive visit at a given position.
#[derive(Debug)]
pub(crate) struct MakeActiveOperator {
    pub index: usize,
    pub vehicle: VehicleIdx,
    pub position: usize,
}

impl LocalSearchOperator for MakeActiveOperator {
    const NAME: &'static str = "Make-Active";

    fn generate_moves<C>(solution: &WorkingSolution, mut consumer: C)
    where
        C: FnMut(Self),
    {
        let vehicles = solution.usable_vehicles().collect::<Vec<_>>();

        for index in solution.inactive_indices() {
            if solution.model().disjunction_penalty(index) == Some(0) {
                continue;
            }

            for &vehicle in &vehicles {
                for position in 0..=solution.route(vehicle).len() {
                    consumer(MakeActiveOperator {
                        index,
                        vehicle,
                        position,
                    });
                }
            }
        }
    }

    fn changes(&self, solution: &WorkingSolution) -> RouteChanges {
        insertion(solution, self.vehicle, self.position, self.index)
    }
}
