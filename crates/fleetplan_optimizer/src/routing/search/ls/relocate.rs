use crate::routing::{
    index_manager::VehicleIdx,
    search::{
        ls::operator::LocalSearchOperator,
        working_solution::{RouteChanges, WorkingSolution},
    },
};

/// **Relocate**
///
/// Moves one visit to another position, in the same route or in another one.
///
/// ```text
/// BEFORE:
///    Route 1: ... (A) -> [X] -> (B) ...
///    Route 2: ... (C) -> (D) ...
///
/// AFTER:
///    Route 1: ... (A) -> (B) ...
///    Route 2: ... (C) -> [X] -> (D) ...
/// ```
#[derive(Debug)]
pub(crate) struct RelocateOperator {
    pub from_vehicle: VehicleIdx,
    pub from_position: usize,
    pub to_vehicle: VehicleIdx,
    /// Position in the target route once the visit has been removed.
    pub to_position: usize,
}

impl LocalSearchOperator for RelocateOperator {
    const NAME: &'static str = "Relocate";

    fn generate_moves<C>(solution: &WorkingSolution, mut consumer: C)
    where
        C: FnMut(Self),
    {
        let vehicles = solution.usable_vehicles().collect::<Vec<_>>();

        for &from_vehicle in &vehicles {
            let from_len = solution.route(from_vehicle).len();

            for from_position in 0..from_len {
                for &to_vehicle in &vehicles {
                    let positions = if to_vehicle == from_vehicle {
                        from_len
                    } else {
                        solution.route(to_vehicle).len() + 1
                    };

                    for to_position in 0..positions {
                        if to_vehicle == from_vehicle && to_position == from_position {
                            continue;
                        }

                        consumer(RelocateOperator {
                            from_vehicle,
                            from_position,
                            to_vehicle,
                            to_position,
                        });
                    }
                }
            }
        }
    }

    fn changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let mut source = solution.route(self.from_vehicle).to_vec();
        let index = source.remove(self.from_position);

        if self.from_vehicle == self.to_vehicle {
            source.insert(self.to_position, index);
            return RouteChanges::route(self.from_vehicle, source);
        }

        let mut target = solution.route(self.to_vehicle).to_vec();
        target.insert(self.to_position, index);

        RouteChanges::routes(vec![
            (self.from_vehicle, source),
            (self.to_vehicle, target),
        ])
    }
}
