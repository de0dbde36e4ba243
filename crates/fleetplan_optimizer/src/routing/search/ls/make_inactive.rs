use crate::routing::{
    index_manager::VehicleIdx,
    search::{
        ls::operator::LocalSearchOperator,
        working_solution::{RouteChanges, WorkingSolution},
    },
};

/// Stops performing an optional visit and pays its penalty instead.
#[derive(Debug)]
pub(crate) struct MakeInactiveOperator {
    pub vehicle: VehicleIdx,
    pub position: usize,
}

impl LocalSearchOperator for MakeInactiveOperator {
    const NAME: &'static str = "Make-Inactive";

    fn generate_moves<C>(solution: &WorkingSolution, mut consumer: C)
    where
        C: FnMut(Self),
    {
        let model = solution.model();

        for vehicle in solution.usable_vehicles() {
            for (position, &index) in solution.route(vehicle).iter().enumerate() {
                if model.disjunction_penalty(index).is_some() {
                    consumer(MakeInactiveOperator { vehicle, position });
                }
            }
        }
    }

    fn changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let mut visits = solution.route(self.vehicle).to_vec();
        let index = visits.remove(self.position);
        RouteChanges::route(self.vehicle, visits).deactivating(index)
    }
}
