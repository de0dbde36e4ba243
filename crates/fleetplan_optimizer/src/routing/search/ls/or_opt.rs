use crate::routing::{
    index_manager::VehicleIdx,
    search::{
        ls::operator::LocalSearchOperator,
        working_solution::{RouteChanges, WorkingSolution},
    },
};

const MIN_SEGMENT_LENGTH: usize = 2;
const MAX_SEGMENT_LENGTH: usize = 3;

/// **Or-Opt**
///
/// Moves a segment of consecutive visits, keeping its orientation.
///
/// ```text
/// BEFORE:
///    Route 1: ... (A) -> [X -> Y] -> (B) ...
///    Route 2: ... (C) -> (D) ...
///
/// AFTER:
///    Route 1: ... (A) -> (B) ...
///    Route 2: ... (C) -> [X -> Y] -> (D) ...
/// ```
#[derive(Debug)]
pub(crate) struct OrOptOperator {
    pub from_vehicle: VehicleIdx,
    pub start: usize,
    pub length: usize,
    pub to_vehicle: VehicleIdx,
    /// Position in the target route once the segment has been removed.
    pub to_position: usize,
}

impl LocalSearchOperator for OrOptOperator {
    const NAME: &'static str = "Or-Opt";

    fn generate_moves<C>(solution: &WorkingSolution, mut consumer: C)
    where
        C: FnMut(Self),
    {
        let vehicles = solution.usable_vehicles().collect::<Vec<_>>();

        for &from_vehicle in &vehicles {
            let from_len = solution.route(from_vehicle).len();

            for length in MIN_SEGMENT_LENGTH..=MAX_SEGMENT_LENGTH {
                if length > from_len {
                    break;
                }

                for start in 0..=(from_len - length) {
                    for &to_vehicle in &vehicles {
                        let positions = if to_vehicle == from_vehicle {
                            from_len - length + 1
                        } else {
                            solution.route(to_vehicle).len() + 1
                        };

                        for to_position in 0..positions {
                            if to_vehicle == from_vehicle && to_position == start {
                                continue;
                            }

                            consumer(OrOptOperator {
                                from_vehicle,
                                start,
                                length,
                                to_vehicle,
                                to_position,
                            });
                        }
                    }
                }
            }
        }
    }

    fn changes(&self, solution: &WorkingSolution) -> RouteChanges {
        let mut source = solution.route(self.from_vehicle).to_vec();
        let segment = source
            .drain(self.start..self.start + self.length)
            .collect::<Vec<_>>();

        if self.from_vehicle == self.to_vehicle {
            source.splice(self.to_position..self.to_position, segment);
            return RouteChanges::route(self.from_vehicle, source);
        }

        let mut target = solution.route(self.to_vehicle).to_vec();
        target.splice(self.to_position..self.to_position, segment);

        RouteChanges::routes(vec![
            (self.from_vehicle, source),
            (self.to_vehicle, target),
        ])
    }
}
