use tracing::{debug, instrument};

use crate::{
    problem::{
        cost_model::CostModel,
        error::FormulationError,
        formulation::{Formulation, HORIZON_MINUTES},
        solver_node::NodeKind,
        time_window::CENTIMINUTES_PER_MINUTE,
        transit::{DemandTransit, DistanceCost, MoneyCost, TravelTimeTransit},
    },
    routing::{
        callbacks::CallbackIdx,
        dimension::DimensionIdx,
        index_manager::{NodeIdx, RoutingIndexManager},
        model::RoutingModel,
    },
    utils::enumerate_idx::EnumerateIdx,
};

pub const TIME_DIMENSION: &str = "Time";
pub const CAPACITY_DIMENSION: &str = "Capacity";

/// A routing model ready to solve, with the dimensions the decoder reads back.
pub struct FormulatedModel {
    pub model: RoutingModel,
    pub time: DimensionIdx,
    pub capacity: DimensionIdx,
}

/// Registers the nodes, vehicles, dimensions and costs of a formulation.
#[instrument(skip_all, level = "debug")]
pub fn build_routing_model(formulation: &Formulation) -> Result<FormulatedModel, FormulationError> {
    let fleet = formulation.fleet();
    let settings = formulation.settings();
    let nodes = formulation.node_table();

    let depots: Vec<NodeIdx> = fleet
        .iter()
        .map(|(_, _, vehicle)| vehicle.depot_node)
        .collect();
    let manager = RoutingIndexManager::new(formulation.nodes().len(), &depots, &depots)?;
    let mut model = RoutingModel::new(manager);

    // Trips of one vehicle share its callbacks.
    let vehicle_time_callbacks: Vec<CallbackIdx> = fleet
        .vehicles()
        .iter()
        .map(|vehicle| {
            model.register_transit_callback(TravelTimeTransit::new(nodes.clone(), vehicle.speed))
        })
        .collect();
    let time_callbacks: Vec<CallbackIdx> = fleet
        .iter()
        .map(|(_, trip, _)| vehicle_time_callbacks[trip.vehicle.get()])
        .collect();

    let horizon = HORIZON_MINUTES * CENTIMINUTES_PER_MINUTE;
    let time = model.add_dimension_with_vehicle_transits(
        &time_callbacks,
        horizon,
        horizon,
        false,
        TIME_DIMENSION,
    )?;

    for (node_idx, node) in formulation.nodes().iter().enumerate_idx() {
        if let Some(index) = model.manager().node_to_index(node_idx) {
            model.set_cumul_range(
                time,
                index,
                node.window.start_centiminutes(),
                node.window.end_centiminutes(),
            )?;
        }
    }

    for (vehicle_idx, _, vehicle) in fleet.iter() {
        let (start, end) = (
            model.manager().start(vehicle_idx),
            model.manager().end(vehicle_idx),
        );
        let (min, max) = (
            vehicle.shift.start_centiminutes(),
            vehicle.shift.end_centiminutes(),
        );
        model.set_cumul_range(time, start, min, max)?;
        model.set_cumul_range(time, end, min, max)?;
    }

    let demand = model.register_unary_transit_callback(DemandTransit::new(nodes.clone()));
    let capacities: Vec<i64> = fleet
        .iter()
        .map(|(_, _, vehicle)| vehicle.capacity)
        .collect();
    let capacity =
        model.add_dimension_with_vehicle_capacity(demand, 0, &capacities, true, CAPACITY_DIMENSION)?;

    match settings.cost_model {
        CostModel::Distance => {
            let cost = model.register_transit_callback(DistanceCost::new(nodes.clone()));
            for (vehicle_idx, _, _) in fleet.iter() {
                model.set_arc_cost_evaluator_of_vehicle(cost, vehicle_idx)?;
            }
        }
        CostModel::Time => {
            for (vehicle_idx, callback) in time_callbacks.iter().enumerate_idx() {
                model.set_arc_cost_evaluator_of_vehicle(*callback, vehicle_idx)?;
            }
            model.set_span_cost_coefficient_for_all_vehicles(time, 1)?;
        }
        CostModel::Money => {
            let vehicle_costs: Vec<CallbackIdx> = fleet
                .vehicles()
                .iter()
                .map(|vehicle| {
                    model.register_transit_callback(MoneyCost::new(
                        nodes.clone(),
                        vehicle.speed,
                        settings.fuel_cost_per_km,
                        settings.driver_cost_per_hour,
                    ))
                })
                .collect();

            for (vehicle_idx, trip, vehicle) in fleet.iter() {
                model.set_arc_cost_evaluator_of_vehicle(
                    vehicle_costs[trip.vehicle.get()],
                    vehicle_idx,
                )?;
                model.set_fixed_cost_of_vehicle(
                    (vehicle.fixed_cost * 100.0).round() as i64,
                    vehicle_idx,
                )?;
            }
        }
    }

    for (node_idx, node) in formulation.nodes().iter().enumerate_idx() {
        let Some(index) = model.manager().node_to_index(node_idx) else {
            continue;
        };

        match node.kind {
            NodeKind::Depot(_) => model.add_disjunction(index, 0)?,
            NodeKind::Stop { stop, .. } if settings.allow_unserved => {
                let priority = formulation
                    .stop(stop)
                    .map_or(1, |stop| stop.priority);
                let penalty = settings
                    .cost_model
                    .drop_penalty(settings.penalty_base, priority);
                model.add_disjunction(index, penalty)?;
            }
            NodeKind::Stop { .. } => {}
        }
    }

    let reload = settings.reload_time_min * CENTIMINUTES_PER_MINUTE;
    for (before, after) in fleet.consecutive_trips() {
        model.add_end_to_start_precedence(time, before, after, reload)?;
    }

    debug!(
        indices = model.manager().num_indices(),
        vehicles = model.manager().num_vehicles(),
        precedences = model.precedences().len(),
        "Built routing model"
    );

    Ok(FormulatedModel {
        model,
        time,
        capacity,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{json::request::OptimizeRequest, routing::index_manager::VehicleIdx};

    fn formulation(value: serde_json::Value) -> Formulation {
        let request: OptimizeRequest = serde_json::from_value(value).unwrap();
        Formulation::from_request(&request).unwrap()
    }

    fn request(params: serde_json::Value) -> serde_json::Value {
        json!({
            "depots": [
                { "id": "A", "lat": 0.0, "lng": 0.0, "shiftStart": 480, "shiftEnd": 1020 },
                { "id": "B", "lat": 0.2, "lng": 0.0, "shiftStart": 0, "shiftEnd": 1440 }
            ],
            "vehicles": [{ "id": "V1", "capacityUnits": 12, "fixedCost": 7.5, "shiftStart": 500 }],
            "stops": [
                { "id": "S1", "lat": 0.01, "lng": 0.0, "demandUnits": 4, "priority": 3,
                  "timeWindow": { "start": 600, "end": 700 } },
                { "id": "S2", "lat": 0.02, "lng": 0.0, "demandUnits": 1 }
            ],
            "params": params
        })
    }

    #[test]
    fn test_time_windows_are_scaled() {
        let formulation = formulation(request(json!({})));
        let built = build_routing_model(&formulation).unwrap();
        let manager = built.model.manager();
        let time = built.model.dimension(built.time).unwrap();

        let s1 = manager.node_to_index(NodeIdx::new(2)).unwrap();
        assert_eq!(time.cumul_range(s1), (60_000, 70_000));

        let start = manager.start(VehicleIdx::new(0));
        assert_eq!(time.cumul_range(start), (50_000, 102_000));
        assert_eq!(time.slack_max(), HORIZON_MINUTES * 100);
    }

    #[test]
    fn test_unused_depot_is_optional() {
        let formulation = formulation(request(json!({})));
        let built = build_routing_model(&formulation).unwrap();

        let unused = built
            .model
            .manager()
            .node_to_index(NodeIdx::new(1))
            .unwrap();
        assert_eq!(built.model.disjunction_penalty(unused), Some(0));
        assert!(built.model.manager().node_to_index(NodeIdx::new(0)).is_none());
    }

    #[test]
    fn test_penalties_follow_cost_model_and_priority() {
        let formulation = formulation(request(json!({ "penaltyBase": 10, "costModel": "TIME" })));
        let built = build_routing_model(&formulation).unwrap();
        let manager = built.model.manager();

        let s1 = manager.node_to_index(NodeIdx::new(2)).unwrap();
        let s2 = manager.node_to_index(NodeIdx::new(3)).unwrap();
        assert_eq!(built.model.disjunction_penalty(s1), Some(3_000));
        assert_eq!(built.model.disjunction_penalty(s2), Some(1_000));

        let time = built.model.dimension(built.time).unwrap();
        assert_eq!(time.span_cost_coefficient(VehicleIdx::new(0)), 1);
    }

    #[test]
    fn test_mandatory_stops_without_unserved() {
        let formulation = formulation(request(json!({ "allowUnserved": false })));
        let built = build_routing_model(&formulation).unwrap();

        let s1 = built
            .model
            .manager()
            .node_to_index(NodeIdx::new(2))
            .unwrap();
        assert_eq!(built.model.disjunction_penalty(s1), None);
    }

    #[test]
    fn test_capacity_dimension() {
        let formulation = formulation(request(json!({})));
        let built = build_routing_model(&formulation).unwrap();
        let capacity = built.model.dimension(built.capacity).unwrap();

        assert_eq!(capacity.capacity(VehicleIdx::new(0)), 12);
        assert_eq!(capacity.slack_max(), 0);
    }

    #[test]
    fn test_multi_trip_precedences() {
        let formulation = formulation(request(json!({
            "globalSettings": { "enableMultiTrip": true, "maxTripsPerVehicle": 3, "reloadTimeMin": 20 }
        })));
        let built = build_routing_model(&formulation).unwrap();

        let precedences: Vec<(usize, usize, i64)> = built
            .model
            .precedences()
            .iter()
            .map(|precedence| {
                (
                    precedence.before.get(),
                    precedence.after.get(),
                    precedence.offset,
                )
            })
            .collect();
        assert_eq!(precedences, vec![(0, 1, 2_000), (1, 2, 2_000)]);
    }
}
