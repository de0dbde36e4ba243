use tracing::{debug, instrument};

use crate::routing::{
    assignment::Assignment,
    callbacks::{CallbackIdx, TransitCallback, UnaryCallbackIdx, UnaryTransitCallback},
    dimension::{CumulSchedule, Dimension, DimensionIdx, DimensionTransits},
    error::RoutingError,
    index_manager::{RoutingIndexManager, VehicleIdx},
    search,
    search_parameters::SearchParameters,
};

/// An optional visit: leaving `index` unperformed costs `penalty`.
#[derive(Debug, Clone, Copy)]
pub struct Disjunction {
    pub index: usize,
    pub penalty: i64,
}

/// `cumul(start(after)) >= cumul(end(before)) + offset` on `dimension`.
#[derive(Debug, Clone, Copy)]
pub struct EndToStartPrecedence {
    pub dimension: DimensionIdx,
    pub before: VehicleIdx,
    pub after: VehicleIdx,
    pub offset: i64,
}

pub struct RoutingModel {
    manager: RoutingIndexManager,
    transit_callbacks: Vec<Box<dyn TransitCallback>>,
    unary_callbacks: Vec<Box<dyn UnaryTransitCallback>>,
    dimensions: Vec<Dimension>,
    arc_cost_evaluators: Vec<Option<CallbackIdx>>,
    fixed_costs: Vec<i64>,
    disjunctions: Vec<Option<Disjunction>>,
    precedences: Vec<EndToStartPrecedence>,
}

/// Cost and cumul schedules of one vehicle route.
#[derive(Debug, Clone)]
pub(crate) struct RouteEvaluation {
    pub cost: i64,
    pub schedules: Vec<CumulSchedule>,
}

impl RoutingModel {
    pub fn new(manager: RoutingIndexManager) -> Self {
        let num_vehicles = manager.num_vehicles();
        let num_visitable = manager.num_visitable();

        RoutingModel {
            manager,
            transit_callbacks: Vec::new(),
            unary_callbacks: Vec::new(),
            dimensions: Vec::new(),
            arc_cost_evaluators: vec![None; num_vehicles],
            fixed_costs: vec![0; num_vehicles],
            disjunctions: vec![None; num_visitable],
            precedences: Vec::new(),
        }
    }

    pub fn manager(&self) -> &RoutingIndexManager {
        &self.manager
    }

    pub fn register_transit_callback(
        &mut self,
        callback: impl TransitCallback + 'static,
    ) -> CallbackIdx {
        self.transit_callbacks.push(Box::new(callback));
        CallbackIdx::new(self.transit_callbacks.len() - 1)
    }

    pub fn register_unary_transit_callback(
        &mut self,
        callback: impl UnaryTransitCallback + 'static,
    ) -> UnaryCallbackIdx {
        self.unary_callbacks.push(Box::new(callback));
        UnaryCallbackIdx::new(self.unary_callbacks.len() - 1)
    }

    /// Adds a dimension whose transit depends on the serving vehicle.
    pub fn add_dimension_with_vehicle_transits(
        &mut self,
        callbacks: &[CallbackIdx],
        slack_max: i64,
        capacity: i64,
        fix_start_cumul_to_zero: bool,
        name: &str,
    ) -> Result<DimensionIdx, RoutingError> {
        let num_vehicles = self.manager.num_vehicles();
        if callbacks.len() != num_vehicles {
            return Err(RoutingError::TransitCountMismatch {
                expected: num_vehicles,
                actual: callbacks.len(),
            });
        }
        if let Some(callback) = callbacks
            .iter()
            .find(|callback| callback.get() >= self.transit_callbacks.len())
        {
            return Err(RoutingError::UnknownCallback(callback.get()));
        }

        Ok(self.push_dimension(Dimension::new(
            name,
            DimensionTransits::PerVehicle(callbacks.to_vec()),
            slack_max,
            vec![capacity; num_vehicles],
            fix_start_cumul_to_zero,
            self.manager.num_indices(),
        )))
    }

    /// Adds a dimension driven by a unary transit and a capacity per vehicle.
    pub fn add_dimension_with_vehicle_capacity(
        &mut self,
        callback: UnaryCallbackIdx,
        slack_max: i64,
        capacities: &[i64],
        fix_start_cumul_to_zero: bool,
        name: &str,
    ) -> Result<DimensionIdx, RoutingError> {
        if callback.get() >= self.unary_callbacks.len() {
            return Err(RoutingError::UnknownCallback(callback.get()));
        }
        if capacities.len() != self.manager.num_vehicles() {
            return Err(RoutingError::TransitCountMismatch {
                expected: self.manager.num_vehicles(),
                actual: capacities.len(),
            });
        }

        Ok(self.push_dimension(Dimension::new(
            name,
            DimensionTransits::Unary(callback),
            slack_max,
            capacities.to_vec(),
            fix_start_cumul_to_zero,
            self.manager.num_indices(),
        )))
    }

    fn push_dimension(&mut self, dimension: Dimension) -> DimensionIdx {
        debug!(name = dimension.name(), "Registered dimension");
        self.dimensions.push(dimension);
        DimensionIdx::new(self.dimensions.len() - 1)
    }

    pub fn dimension(&self, dimension: DimensionIdx) -> Result<&Dimension, RoutingError> {
        self.dimensions
            .get(dimension.get())
            .ok_or(RoutingError::UnknownDimension(dimension.get()))
    }

    fn dimension_mut(&mut self, dimension: DimensionIdx) -> Result<&mut Dimension, RoutingError> {
        self.dimensions
            .get_mut(dimension.get())
            .ok_or(RoutingError::UnknownDimension(dimension.get()))
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn set_cumul_range(
        &mut self,
        dimension: DimensionIdx,
        index: usize,
        min: i64,
        max: i64,
    ) -> Result<(), RoutingError> {
        if index >= self.manager.num_indices() {
            return Err(RoutingError::IndexOutOfRange(index));
        }
        self.dimension_mut(dimension)?
            .set_cumul_range(index, min, max);
        Ok(())
    }

    pub fn set_span_cost_coefficient_for_all_vehicles(
        &mut self,
        dimension: DimensionIdx,
        coefficient: i64,
    ) -> Result<(), RoutingError> {
        let vehicles = self.manager.vehicles();
        let dimension = self.dimension_mut(dimension)?;
        for vehicle in vehicles {
            dimension.set_span_cost_coefficient(vehicle, coefficient);
        }
        Ok(())
    }

    pub fn add_end_to_start_precedence(
        &mut self,
        dimension: DimensionIdx,
        before: VehicleIdx,
        after: VehicleIdx,
        offset: i64,
    ) -> Result<(), RoutingError> {
        self.dimension(dimension)?;
        self.check_vehicle(before)?;
        self.check_vehicle(after)?;
        if before == after {
            return Err(RoutingError::CyclicPrecedence);
        }

        self.precedences.push(EndToStartPrecedence {
            dimension,
            before,
            after,
            offset,
        });
        Ok(())
    }

    pub fn precedences(&self) -> &[EndToStartPrecedence] {
        &self.precedences
    }

    pub fn set_arc_cost_evaluator_of_vehicle(
        &mut self,
        callback: CallbackIdx,
        vehicle: VehicleIdx,
    ) -> Result<(), RoutingError> {
        self.check_vehicle(vehicle)?;
        if callback.get() >= self.transit_callbacks.len() {
            return Err(RoutingError::UnknownCallback(callback.get()));
        }
        self.arc_cost_evaluators[vehicle.get()] = Some(callback);
        Ok(())
    }

    /// Charged once when the vehicle serves at least one visit.
    pub fn set_fixed_cost_of_vehicle(
        &mut self,
        cost: i64,
        vehicle: VehicleIdx,
    ) -> Result<(), RoutingError> {
        self.check_vehicle(vehicle)?;
        self.fixed_costs[vehicle.get()] = cost;
        Ok(())
    }

    pub(crate) fn fixed_cost(&self, vehicle: VehicleIdx) -> i64 {
        self.fixed_costs[vehicle.get()]
    }

    pub fn add_disjunction(&mut self, index: usize, penalty: i64) -> Result<(), RoutingError> {
        if !self.manager.is_visitable(index) {
            return Err(RoutingError::IndexNotVisitable(index));
        }
        if self.disjunctions[index].is_some() {
            return Err(RoutingError::DuplicateDisjunction(index));
        }
        self.disjunctions[index] = Some(Disjunction { index, penalty });
        Ok(())
    }

    /// Penalty of leaving `index` unperformed, `None` when the visit is mandatory.
    pub fn disjunction_penalty(&self, index: usize) -> Option<i64> {
        self.disjunctions
            .get(index)
            .copied()
            .flatten()
            .map(|disjunction| disjunction.penalty)
    }

    fn check_vehicle(&self, vehicle: VehicleIdx) -> Result<(), RoutingError> {
        if vehicle.get() < self.manager.num_vehicles() {
            Ok(())
        } else {
            Err(RoutingError::UnknownVehicle(vehicle.get()))
        }
    }

    #[instrument(skip_all, level = "debug")]
    pub fn solve_with_parameters(
        &self,
        parameters: &SearchParameters,
    ) -> Result<Option<Assignment>, RoutingError> {
        search::solve(self, parameters)
    }

    pub(crate) fn arc_cost(&self, vehicle: VehicleIdx, from: usize, to: usize) -> i64 {
        match self.arc_cost_evaluators[vehicle.get()] {
            Some(callback) => self.transit_callbacks[callback.get()].transit(
                self.manager.index_to_node(from),
                self.manager.index_to_node(to),
            ),
            None => 0,
        }
    }

    pub(crate) fn dimension_transit(
        &self,
        dimension: &Dimension,
        vehicle: VehicleIdx,
        from: usize,
        to: usize,
    ) -> i64 {
        let from = self.manager.index_to_node(from);
        match &dimension.transits {
            DimensionTransits::PerVehicle(callbacks) => {
                self.transit_callbacks[callbacks[vehicle.get()].get()]
                    .transit(from, self.manager.index_to_node(to))
            }
            DimensionTransits::Unary(callback) => self.unary_callbacks[callback.get()].transit(from),
        }
    }

    /// Start index, visits, end index.
    pub(crate) fn route_path(&self, vehicle: VehicleIdx, visits: &[usize]) -> Vec<usize> {
        let mut path = Vec::with_capacity(visits.len() + 2);
        path.push(self.manager.start(vehicle));
        path.extend_from_slice(visits);
        path.push(self.manager.end(vehicle));
        path
    }

    /// Evaluates a single route, `None` when a dimension cannot be scheduled.
    ///
    /// `start_lower_bounds` holds one bound per dimension on the start cumul.
    pub(crate) fn evaluate_route(
        &self,
        vehicle: VehicleIdx,
        visits: &[usize],
        start_lower_bounds: &[i64],
    ) -> Option<RouteEvaluation> {
        let path = self.route_path(vehicle, visits);
        let mut schedules = Vec::with_capacity(self.dimensions.len());
        let mut transits = Vec::with_capacity(path.len() - 1);
        let mut span_cost = 0;

        for (dimension, &lower_bound) in self.dimensions.iter().zip(start_lower_bounds) {
            transits.clear();
            transits.extend(
                path.windows(2)
                    .map(|arc| self.dimension_transit(dimension, vehicle, arc[0], arc[1])),
            );

            let schedule = dimension.schedule(vehicle, &path, &transits, lower_bound)?;
            span_cost += dimension.span_cost_coefficient(vehicle) * schedule.span();
            schedules.push(schedule);
        }

        let cost = if visits.is_empty() {
            0
        } else {
            let arcs: i64 = path
                .windows(2)
                .map(|arc| self.arc_cost(vehicle, arc[0], arc[1]))
                .sum();
            self.fixed_costs[vehicle.get()] + arcs + span_cost
        };

        Some(RouteEvaluation { cost, schedules })
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;
    use crate::routing::{
        index_manager::NodeIdx,
        search_parameters::{FirstSolutionStrategy, LocalSearchMetaheuristic},
    };

    /// Nodes on a line, travel is the absolute difference of positions.
    struct LineTransit {
        positions: Vec<i64>,
        service: i64,
    }

    impl TransitCallback for LineTransit {
        fn transit(&self, from: NodeIdx, to: NodeIdx) -> i64 {
            let service = if from.get() == 0 { 0 } else { self.service };
            (self.positions[from.get()] - self.positions[to.get()]).abs() + service
        }
    }

    struct UnitDemand;

    impl UnaryTransitCallback for UnitDemand {
        fn transit(&self, node: NodeIdx) -> i64 {
            if node.get() == 0 { 0 } else { 1 }
        }
    }

    fn model(positions: Vec<i64>, vehicles: usize) -> RoutingModel {
        let depots = vec![NodeIdx::new(0); vehicles];
        let manager = RoutingIndexManager::new(positions.len(), &depots, &depots).unwrap();
        let mut model = RoutingModel::new(manager);

        let callback = model.register_transit_callback(LineTransit {
            positions,
            service: 0,
        });
        for vehicle in 0..vehicles {
            model
                .set_arc_cost_evaluator_of_vehicle(callback, VehicleIdx::new(vehicle))
                .unwrap();
        }
        model
    }

    fn parameters() -> SearchParameters {
        SearchParameters {
            time_limit: SignedDuration::from_secs(5),
            ..SearchParameters::default()
        }
    }

    fn route(model: &RoutingModel, assignment: &Assignment, vehicle: usize) -> Vec<usize> {
        let manager = model.manager();
        let mut nodes = Vec::new();
        let mut index = assignment.next(manager.start(VehicleIdx::new(vehicle)));
        while !manager.is_end(index) {
            nodes.push(manager.index_to_node(index).get());
            index = assignment.next(index);
        }
        nodes
    }

    #[test]
    fn test_visits_everything_in_order() {
        let model = model(vec![0, 3, 1, 2], 1);
        let assignment = model.solve_with_parameters(&parameters()).unwrap().unwrap();

        let nodes = route(&model, &assignment, 0);
        assert!(nodes == vec![2, 3, 1] || nodes == vec![1, 3, 2]);
        assert_eq!(assignment.objective(), 6);
    }

    #[test]
    fn test_global_cheapest_insertion() {
        let model = model(vec![0, 3, 1, 2], 1);
        let parameters = SearchParameters {
            first_solution_strategy: FirstSolutionStrategy::GlobalCheapestInsertion,
            ..parameters()
        };
        let assignment = model.solve_with_parameters(&parameters).unwrap().unwrap();
        assert_eq!(assignment.objective(), 6);
    }

    #[test]
    fn test_drops_visit_with_low_penalty() {
        let mut model = model(vec![0, 1, 100], 1);
        let manager = model.manager().clone();
        let far = manager.node_to_index(NodeIdx::new(2)).unwrap();
        let near = manager.node_to_index(NodeIdx::new(1)).unwrap();
        model.add_disjunction(far, 50).unwrap();
        model.add_disjunction(near, 50).unwrap();

        let assignment = model.solve_with_parameters(&parameters()).unwrap().unwrap();

        assert!(!assignment.is_active(far));
        assert_eq!(assignment.next(far), far);
        assert!(assignment.is_active(near));
        assert_eq!(assignment.objective(), 2 + 50);
    }

    #[test]
    fn test_capacity_splits_routes() {
        let mut model = model(vec![0, 5, 6], 2);
        let demand = model.register_unary_transit_callback(UnitDemand);
        model
            .add_dimension_with_vehicle_capacity(demand, 0, &[1, 1], true, "Capacity")
            .unwrap();

        let assignment = model.solve_with_parameters(&parameters()).unwrap().unwrap();

        assert_eq!(route(&model, &assignment, 0).len(), 1);
        assert_eq!(route(&model, &assignment, 1).len(), 1);
        assert_eq!(assignment.objective(), 22);
    }

    #[test]
    fn test_time_windows_and_precedence() {
        let mut model = model(vec![0, 5, 6], 2);
        let manager = model.manager().clone();
        let callbacks = (0..2)
            .map(|_| {
                model.register_transit_callback(LineTransit {
                    positions: vec![0, 5, 6],
                    service: 10,
                })
            })
            .collect::<Vec<_>>();
        let time = model
            .add_dimension_with_vehicle_transits(&callbacks, 1_000, 1_000, false, "Time")
            .unwrap();
        let demand = model.register_unary_transit_callback(UnitDemand);
        model
            .add_dimension_with_vehicle_capacity(demand, 0, &[1, 1], true, "Capacity")
            .unwrap();
        model
            .add_end_to_start_precedence(time, VehicleIdx::new(0), VehicleIdx::new(1), 30)
            .unwrap();

        let assignment = model.solve_with_parameters(&parameters()).unwrap().unwrap();

        let first_end = assignment.cumul(time, manager.end(VehicleIdx::new(0))).unwrap();
        let second_start = assignment
            .cumul(time, manager.start(VehicleIdx::new(1)))
            .unwrap();
        assert!(second_start >= first_end + 30);

        for vehicle in 0..2 {
            let nodes = route(&model, &assignment, vehicle);
            assert_eq!(nodes.len(), 1);
        }
    }

    #[test]
    fn test_unservable_mandatory_visit_has_no_solution() {
        let mut model = model(vec![0, 5], 1);
        let manager = model.manager().clone();
        let callbacks = vec![model.register_transit_callback(LineTransit {
            positions: vec![0, 5],
            service: 0,
        })];
        let time = model
            .add_dimension_with_vehicle_transits(&callbacks, 100, 100, false, "Time")
            .unwrap();
        let index = manager.node_to_index(NodeIdx::new(1)).unwrap();
        model.set_cumul_range(time, index, 0, 2).unwrap();

        assert!(model.solve_with_parameters(&parameters()).unwrap().is_none());
    }

    #[test]
    fn test_cyclic_precedence_is_rejected() {
        let mut model = model(vec![0, 5], 2);
        let callbacks = (0..2)
            .map(|_| {
                model.register_transit_callback(LineTransit {
                    positions: vec![0, 5],
                    service: 0,
                })
            })
            .collect::<Vec<_>>();
        let time = model
            .add_dimension_with_vehicle_transits(&callbacks, 100, 100, false, "Time")
            .unwrap();
        model
            .add_end_to_start_precedence(time, VehicleIdx::new(0), VehicleIdx::new(1), 0)
            .unwrap();
        model
            .add_end_to_start_precedence(time, VehicleIdx::new(1), VehicleIdx::new(0), 0)
            .unwrap();

        assert!(matches!(
            model.solve_with_parameters(&parameters()),
            Err(RoutingError::CyclicPrecedence)
        ));
    }

    #[test]
    fn test_fixed_cost_prefers_single_vehicle() {
        let mut model = model(vec![0, 5, 6], 2);
        model.set_fixed_cost_of_vehicle(100, VehicleIdx::new(0)).unwrap();
        model.set_fixed_cost_of_vehicle(100, VehicleIdx::new(1)).unwrap();

        let assignment = model.solve_with_parameters(&parameters()).unwrap().unwrap();

        let used = (0..2)
            .filter(|&vehicle| !route(&model, &assignment, vehicle).is_empty())
            .count();
        assert_eq!(used, 1);
        assert_eq!(assignment.objective(), 112);
    }

    #[test]
    fn test_guided_local_search_stops_at_time_limit() {
        let model = model(vec![0, 4, -3, 7, -8, 2], 2);
        let parameters = SearchParameters {
            local_search_metaheuristic: LocalSearchMetaheuristic::GuidedLocalSearch,
            time_limit: SignedDuration::from_millis(200),
            ..SearchParameters::default()
        };

        let assignment = model.solve_with_parameters(&parameters).unwrap().unwrap();
        assert_eq!(assignment.objective(), 30);
    }

    #[test]
    fn test_registration_errors() {
        let mut model = model(vec![0, 5], 1);
        assert!(matches!(
            model.add_disjunction(1, 10),
            Err(RoutingError::IndexNotVisitable(1))
        ));
        assert!(matches!(
            model.set_fixed_cost_of_vehicle(1, VehicleIdx::new(3)),
            Err(RoutingError::UnknownVehicle(3))
        ));
        assert!(matches!(
            model.add_dimension_with_vehicle_transits(&[], 0, 0, false, "Time"),
            Err(RoutingError::TransitCountMismatch { .. })
        ));
        model.add_disjunction(0, 10).unwrap();
        assert!(matches!(
            model.add_disjunction(0, 10),
            Err(RoutingError::DuplicateDisjunction(0))
        ));
    }
}
