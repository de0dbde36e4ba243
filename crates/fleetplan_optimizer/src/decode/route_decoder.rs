use tracing::{debug, warn};

use crate::{
    decode::{
        error::DecodeError,
        inventory::{InventorySnapshot, simulate, visit_movements},
    },
    json::response::{RouteStep, VehicleRoute},
    problem::{
        formulation::Formulation,
        routing_setup::{FormulatedModel, TIME_DIMENSION},
        solver_node::SolverNode,
        time_window::CENTIMINUTES_PER_MINUTE,
        virtual_fleet::FleetVehicle,
    },
    routing::{
        assignment::Assignment,
        dimension::DimensionIdx,
        index_manager::{NodeIdx, RoutingIndexManager, VehicleIdx},
    },
    utils::rounding::round_to,
};

/// Recomputed arrivals may trail the engine schedule by this many minutes.
const ARRIVAL_TOLERANCE_MIN: f64 = 1.0;

/// Turns the routes of an assignment into reported vehicle routes.
pub struct RouteDecoder<'a> {
    formulation: &'a Formulation,
    manager: &'a RoutingIndexManager,
    time: DimensionIdx,
    assignment: &'a Assignment,
}

struct Visit<'a> {
    index: usize,
    node_idx: NodeIdx,
    node: &'a SolverNode,
}

impl<'a> RouteDecoder<'a> {
    pub fn new(
        formulation: &'a Formulation,
        formulated: &'a FormulatedModel,
        assignment: &'a Assignment,
    ) -> Self {
        RouteDecoder {
            formulation,
            manager: formulated.model.manager(),
            time: formulated.time,
            assignment,
        }
    }

    /// `None` when the vehicle serves nothing.
    pub fn decode(&self, vehicle: VehicleIdx) -> Result<Option<VehicleRoute>, DecodeError> {
        let fleet = self.formulation.fleet();
        let (trip, fleet_vehicle) = fleet
            .resolve(vehicle)
            .ok_or(DecodeError::UnknownVirtualVehicle(vehicle.get()))?;
        let vehicle_id = fleet
            .route_id(vehicle)
            .ok_or(DecodeError::UnknownVirtualVehicle(vehicle.get()))?;

        let visits = self.visits(vehicle)?;
        if visits.is_empty() {
            return Ok(None);
        }

        let start_cumul = self.time_cumul(self.manager.start(vehicle))?;
        let end_cumul = self.time_cumul(self.manager.end(vehicle))?;

        let movements: Vec<_> = visits
            .iter()
            .map(|visit| {
                visit
                    .node
                    .stop()
                    .and_then(|stop| self.formulation.stop(stop))
                    .map(|stop| visit_movements(stop, visit.node))
                    .unwrap_or_default()
            })
            .collect();
        let snapshots = simulate(self.formulation.cylinders().len(), &movements);

        let mut legs = LegAccumulator::new(fleet_vehicle, self.formulation);
        let mut steps = Vec::with_capacity(visits.len());
        let mut previous = fleet_vehicle.depot_node;
        let mut previous_departure = start_cumul as f64 / CENTIMINUTES_PER_MINUTE as f64;

        for (visit, inventory) in visits.iter().zip(&snapshots) {
            let distance = self.formulation.distance_km(previous, visit.node_idx);
            let arrival_exact = previous_departure + fleet_vehicle.speed.travel_minutes(distance);
            let mass = legs.add_leg(distance, inventory);
            previous = visit.node_idx;

            let Some(stop) = visit
                .node
                .stop()
                .and_then(|stop| self.formulation.stop(stop))
            else {
                previous_departure = arrival_exact;
                continue;
            };

            let scheduled_exact =
                self.time_cumul(visit.index)? as f64 / CENTIMINUTES_PER_MINUTE as f64;
            if arrival_exact - scheduled_exact > ARRIVAL_TOLERANCE_MIN {
                warn!(
                    vehicle = %vehicle_id,
                    stop = %stop.id,
                    arrival = arrival_exact,
                    scheduled = scheduled_exact,
                    "Recomputed arrival is later than the engine schedule"
                );
            }

            let arrival = arrival_exact.round() as i64;
            let service_start = arrival.max(scheduled_exact.round() as i64);
            let node = visit.node;

            legs.record_step(mass, node.demand);
            steps.push(RouteStep {
                stop_id: stop.id.clone(),
                chunk_index: node.chunk(),
                arrival_time: arrival,
                departure_time: service_start + node.service_min,
                service_time: node.service_min,
                waiting_time: service_start - arrival,
                dist_from_prev_km: round_to(distance, 2),
                delivered_units: node.demand,
                late_minutes: (arrival - node.window.end).max(0),
                window_start: node.window.start,
                window_end: node.window.end,
                onboard_mass_kg: round_to(mass, 2),
                full_units_onboard: inventory.full_units(),
                empty_units_onboard: inventory.empty_units(),
            });

            previous_departure = arrival_exact.max(scheduled_exact) + node.service_min as f64;
        }

        if let Some(final_load) = snapshots.last() {
            let distance = self.formulation.distance_km(previous, fleet_vehicle.depot_node);
            legs.add_leg(distance, final_load);
        }

        let route = legs.finish(
            vehicle_id,
            trip.trip,
            steps,
            start_cumul,
            end_cumul,
            self.formulation.settings().co2_factor,
        );
        if route.overweight {
            warn!(
                vehicle = %route.vehicle_id,
                max_onboard_mass_kg = route.max_onboard_mass_kg,
                "Route exceeds the vehicle weight capacity"
            );
        }
        debug!(
            vehicle = %route.vehicle_id,
            steps = route.steps.len(),
            total_dist_km = route.total_dist_km,
            "Decoded route"
        );

        Ok(Some(route))
    }

    /// Visits between the start and the end of a route.
    fn visits(&self, vehicle: VehicleIdx) -> Result<Vec<Visit<'a>>, DecodeError> {
        let mut visits = Vec::new();
        let mut index = self.assignment.next(self.manager.start(vehicle));

        while !self.manager.is_end(index) {
            if !self.manager.is_visitable(index) || visits.len() > self.manager.num_visitable() {
                return Err(DecodeError::RouteDoesNotReachEnd(vehicle.get()));
            }

            let node_idx = self.manager.index_to_node(index);
            let node = self
                .formulation
                .node(node_idx)
                .ok_or(DecodeError::UnknownNode(index))?;
            visits.push(Visit {
                index,
                node_idx,
                node,
            });
            index = self.assignment.next(index);
        }

        if index != self.manager.end(vehicle) {
            return Err(DecodeError::RouteDoesNotReachEnd(vehicle.get()));
        }

        Ok(visits)
    }

    fn time_cumul(&self, index: usize) -> Result<i64, DecodeError> {
        self.assignment
            .cumul(self.time, index)
            .ok_or(DecodeError::DimensionMissing {
                dimension: TIME_DIMENSION,
                index,
            })
    }
}

/// Distance, load and mass totals of a route being decoded.
struct LegAccumulator<'a> {
    vehicle: &'a FleetVehicle,
    formulation: &'a Formulation,
    distance_km: f64,
    ton_km: f64,
    demand: i64,
    step_masses: Vec<f64>,
}

impl<'a> LegAccumulator<'a> {
    fn new(vehicle: &'a FleetVehicle, formulation: &'a Formulation) -> Self {
        LegAccumulator {
            vehicle,
            formulation,
            distance_km: 0.0,
            ton_km: 0.0,
            demand: 0,
            step_masses: Vec::new(),
        }
    }

    /// Adds a leg driven with `load`, returns the mass carried on it.
    fn add_leg(&mut self, distance_km: f64, load: &InventorySnapshot) -> f64 {
        let mass = load.mass_kg(self.vehicle.tare_weight_kg, self.formulation.cylinders());
        self.distance_km += distance_km;
        self.ton_km += distance_km * mass / 1000.0;
        mass
    }

    fn record_step(&mut self, mass: f64, demand: i64) {
        self.step_masses.push(mass);
        self.demand += demand;
    }

    fn finish(
        self,
        vehicle_id: String,
        trip_index: usize,
        steps: Vec<RouteStep>,
        start_cumul: i64,
        end_cumul: i64,
        co2_factor: f64,
    ) -> VehicleRoute {
        let to_minutes = |cumul: i64| (cumul as f64 / CENTIMINUTES_PER_MINUTE as f64).round() as i64;

        let max_mass = self.step_masses.iter().copied().fold(0.0, f64::max);
        let avg_mass = if self.step_masses.is_empty() {
            0.0
        } else {
            self.step_masses.iter().sum::<f64>() / self.step_masses.len() as f64
        };
        let total_ton_km = round_to(self.ton_km, 3);

        VehicleRoute {
            vehicle_id,
            trip_index,
            steps,
            total_dist_km: round_to(self.distance_km, 2),
            total_time_min: to_minutes(end_cumul - start_cumul),
            total_demand_units: self.demand,
            total_ton_km,
            max_onboard_mass_kg: round_to(max_mass, 2),
            avg_onboard_mass_kg: round_to(avg_mass, 2),
            co2_kg: total_ton_km * co2_factor,
            start_time_min: to_minutes(start_cumul),
            end_time_min: to_minutes(end_cumul),
            overweight: self
                .vehicle
                .max_weight_kg
                .is_some_and(|max_weight| max_mass > max_weight),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        json::request::OptimizeRequest, problem::routing_setup::build_routing_model,
        routing::score::Score,
    };

    /// Depot, S1 and S2 as in the forced wait scenario, with cylinders at S1.
    fn formulation() -> Formulation {
        let request: OptimizeRequest = serde_json::from_value(json!({
            "depot": { "id": "D", "lat": 0.0, "lng": 0.0, "shiftStart": 0, "shiftEnd": 1000 },
            "vehicles": [{ "id": "V1", "capacityUnits": 10, "speed": 60.0, "tareWeight": 1000.0,
                           "maxWeightCapacityKg": 1100.0 }],
            "stops": [
                { "id": "S1", "lat": 0.01, "lng": 0.0, "demandUnits": 4, "serviceTimeMin": 10.0,
                  "timeWindow": { "start": 0, "end": 10 },
                  "items": [{ "cylinderTypeId": "C", "deliverUnits": 4, "pickupUnits": 2 }] },
                { "id": "S2", "lat": 0.01, "lng": 0.01, "demandUnits": 1,
                  "timeWindow": { "start": 100, "end": 200 } }
            ],
            "cylinderTypes": [{ "id": "C", "fullWeightKg": 30.0, "emptyWeightKg": 10.0 }]
        }))
        .unwrap();
        Formulation::from_request(&request).unwrap()
    }

    /// Indices: S1 = 0, S2 = 1, start = 2, end = 3.
    fn assignment(next: Vec<usize>, time: Vec<i64>) -> Assignment {
        let vehicle = Some(VehicleIdx::new(0));
        Assignment::new(
            next,
            vec![vehicle; 4],
            vec![time, vec![0, 4, 0, 5]],
            Score::ZERO,
        )
    }

    #[test]
    fn test_forced_wait() {
        let formulation = formulation();
        let formulated = build_routing_model(&formulation).unwrap();
        let assignment = assignment(vec![1, 3, 0], vec![111, 10_000, 0, 10_111]);

        let route = RouteDecoder::new(&formulation, &formulated, &assignment)
            .decode(VehicleIdx::new(0))
            .unwrap()
            .unwrap();

        assert_eq!(route.vehicle_id, "V1");
        assert_eq!(route.steps.len(), 2);

        let first = &route.steps[0];
        assert_eq!(first.arrival_time, 1);
        assert_eq!(first.waiting_time, 0);
        assert_eq!(first.departure_time, 11);

        let second = &route.steps[1];
        assert_eq!(second.arrival_time, 12);
        assert_eq!(second.waiting_time, 88);
        assert_eq!(second.departure_time, 100);

        for step in &route.steps {
            assert_eq!(
                step.departure_time,
                step.arrival_time + step.waiting_time + step.service_time
            );
        }
        assert_eq!(route.total_time_min, 101);
        assert_eq!(route.start_time_min, 0);
        assert_eq!(route.end_time_min, 101);
    }

    #[test]
    fn test_mass_accounting() {
        let formulation = formulation();
        let formulated = build_routing_model(&formulation).unwrap();
        let assignment = assignment(vec![1, 3, 0], vec![111, 10_000, 0, 10_111]);

        let route = RouteDecoder::new(&formulation, &formulated, &assignment)
            .decode(VehicleIdx::new(0))
            .unwrap()
            .unwrap();

        assert_eq!(route.steps[0].onboard_mass_kg, 1120.0);
        assert_eq!(route.steps[0].full_units_onboard, 4);
        assert_eq!(route.steps[1].onboard_mass_kg, 1020.0);
        assert_eq!(route.steps[1].full_units_onboard, 0);
        assert_eq!(route.steps[1].empty_units_onboard, 2);
        assert_eq!(route.max_onboard_mass_kg, 1120.0);
        assert_eq!(route.avg_onboard_mass_kg, 1070.0);
        assert!(route.overweight);
        assert_eq!(route.total_demand_units, 5);
        assert_eq!(route.co2_kg, route.total_ton_km * 0.1);

        let legs: f64 = route.steps.iter().map(|step| step.dist_from_prev_km).sum();
        assert!(route.total_dist_km > legs);
    }

    #[test]
    fn test_empty_route() {
        let formulation = formulation();
        let formulated = build_routing_model(&formulation).unwrap();
        let assignment = assignment(vec![0, 1, 3], vec![0, 0, 0, 0]);

        let route = RouteDecoder::new(&formulation, &formulated, &assignment)
            .decode(VehicleIdx::new(0))
            .unwrap();
        assert!(route.is_none());
    }

    #[test]
    fn test_broken_route() {
        let formulation = formulation();
        let formulated = build_routing_model(&formulation).unwrap();
        let assignment = assignment(vec![0, 3, 0], vec![0, 0, 0, 0]);

        let error = RouteDecoder::new(&formulation, &formulated, &assignment)
            .decode(VehicleIdx::new(0))
            .unwrap_err();
        assert!(matches!(error, DecodeError::RouteDoesNotReachEnd(0)));
    }

    #[test]
    fn test_unknown_vehicle() {
        let formulation = formulation();
        let formulated = build_routing_model(&formulation).unwrap();
        let assignment = assignment(vec![1, 3, 0], vec![0, 0, 0, 0]);

        let error = RouteDecoder::new(&formulation, &formulated, &assignment)
            .decode(VehicleIdx::new(1))
            .unwrap_err();
        assert!(matches!(error, DecodeError::UnknownVirtualVehicle(1)));
    }
}
