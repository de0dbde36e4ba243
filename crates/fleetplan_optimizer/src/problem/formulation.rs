use std::sync::Arc;

use fleetplan_matrix::{kmh::Kmh, location::Location, travel_matrices::TravelMatrices};
use tracing::{debug, instrument, warn};

use crate::{
    json::request::{JsonSolverParams, JsonVehicle, OptimizeRequest},
    problem::{
        cost_model::CostModel,
        cylinders::CylinderCatalog,
        demand_split::{chunk_label, split_demand},
        depots::{Depot, DepotIdx, deduplicate_depots},
        error::FormulationError,
        solver_node::{NodeKind, SolverNode, Stop, StopIdx},
        time_window::TimeWindow,
        transit::NodeTable,
        virtual_fleet::{FleetVehicle, VirtualFleet},
    },
    routing::index_manager::NodeIdx,
    utils::enumerate_idx::EnumerateIdx,
};

/// Upper bound of every time cumul, 30 days.
pub const HORIZON_MINUTES: i64 = 30 * 24 * 60;

/// Used when `avgSpeedKmph` itself is not a usable speed.
pub const DEFAULT_AVG_SPEED_KMH: f64 = 30.0;

/// Request parameters the model and the decoder read after formulation.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulationSettings {
    pub cost_model: CostModel,
    pub allow_unserved: bool,
    pub penalty_base: i64,
    pub fuel_cost_per_km: f64,
    pub driver_cost_per_hour: f64,
    pub reload_time_min: i64,
    pub co2_factor: f64,
}

impl From<&JsonSolverParams> for FormulationSettings {
    fn from(params: &JsonSolverParams) -> Self {
        FormulationSettings {
            cost_model: CostModel::from_param(&params.cost_model),
            allow_unserved: params.allow_unserved,
            penalty_base: params.penalty_base,
            fuel_cost_per_km: params.fuel_cost_per_km,
            driver_cost_per_hour: params.driver_cost_per_hour,
            reload_time_min: params.global_settings.reload_time_min.max(0),
            co2_factor: params.global_settings.co2_factor,
        }
    }
}

/// Everything the engine and the decoder need to know about one request.
///
/// Nodes are the unique depots first, then the stops in request order, each
/// stop expanded into its demand chunks.
#[derive(Debug)]
pub struct Formulation {
    depots: Vec<Depot>,
    fallback_depot: DepotIdx,
    stops: Vec<Stop>,
    nodes: Vec<SolverNode>,
    node_table: Arc<NodeTable>,
    fleet: VirtualFleet,
    cylinders: CylinderCatalog,
    settings: FormulationSettings,
}

impl Formulation {
    #[instrument(
        skip_all,
        level = "debug",
        fields(stops = request.stops.len(), vehicles = request.vehicles.len())
    )]
    pub fn from_request(request: &OptimizeRequest) -> Result<Self, FormulationError> {
        let params = &request.params;
        let settings = FormulationSettings::from(params);

        let depots = deduplicate_depots(request.depot.as_ref(), &request.depots);
        let fallback_id = request
            .depot
            .as_ref()
            .or(request.depots.first())
            .map(|depot| depot.id.as_str())
            .ok_or(FormulationError::NoDepot)?;
        let fallback_depot = find_depot(&depots, fallback_id).ok_or(FormulationError::NoDepot)?;
        let fallback_shift = depots[fallback_depot].shift;

        let cylinders = CylinderCatalog::from_json(&request.cylinder_types);

        let mut nodes: Vec<SolverNode> = depots
            .iter()
            .enumerate_idx()
            .map(|(depot_idx, depot)| SolverNode {
                kind: NodeKind::Depot(depot_idx),
                location: depot.location,
                demand: 0,
                service_min: 0,
                window: depot.shift,
            })
            .collect();

        let mut stops = Vec::with_capacity(request.stops.len());
        for (stop_idx, json_stop) in request.stops.iter().enumerate_idx() {
            let window = TimeWindow::with_fallback(json_stop.time_window, fallback_shift);
            if !window.is_valid() {
                return Err(FormulationError::InvalidTimeWindow {
                    stop_id: json_stop.id.clone(),
                    start: window.start,
                    end: window.end,
                });
            }

            let stop = Stop::from_json(json_stop, &cylinders);
            if let Some(depot_id) = &json_stop.depot_id {
                debug!(
                    stop = %json_stop.id,
                    depot = %depot_id,
                    "Stop depot preference is not enforced"
                );
            }
            for item in json_stop
                .items
                .iter()
                .filter(|item| cylinders.find(&item.cylinder_type_id).is_none())
            {
                debug!(
                    stop = %json_stop.id,
                    cylinder_type = %item.cylinder_type_id,
                    "Unknown cylinder type, item ignored for mass accounting"
                );
            }

            let location = Location::from_lat_lng(json_stop.lat, json_stop.lng);
            for chunk in split_demand(stop.demand, json_stop.service_time_min) {
                if let Some(index) = chunk.chunk {
                    debug!(
                        node = %chunk_label(&json_stop.id, index),
                        demand = chunk.demand,
                        service_min = chunk.service_min,
                        "Split stop chunk"
                    );
                }

                nodes.push(SolverNode {
                    kind: NodeKind::Stop {
                        stop: stop_idx,
                        chunk: chunk.chunk,
                    },
                    location,
                    demand: chunk.demand,
                    service_min: chunk.service_min,
                    window,
                });
            }
            stops.push(stop);
        }

        let locations: Vec<_> = nodes.iter().map(|node| node.location).collect();
        let distances = TravelMatrices::from_haversine(&locations);

        let fallback_speed = Kmh::try_new(params.avg_speed_kmph).unwrap_or_else(|_| {
            warn!(
                avg_speed_kmph = params.avg_speed_kmph,
                fallback_kmph = DEFAULT_AVG_SPEED_KMH,
                "Invalid average speed"
            );
            Kmh::new(DEFAULT_AVG_SPEED_KMH)
        });

        warn_unreachable_stops(
            &nodes,
            &stops,
            &distances,
            fallback_speed,
            depot_node(fallback_depot),
            fallback_shift,
        )?;

        let vehicles = request
            .vehicles
            .iter()
            .map(|vehicle| {
                resolve_vehicle(vehicle, &depots, fallback_depot, fallback_speed, params)
            })
            .collect();

        let global = &params.global_settings;
        let trips_per_vehicle = if global.enable_multi_trip {
            global.max_trips_per_vehicle.max(1)
        } else {
            1
        };
        let fleet = VirtualFleet::expand(vehicles, trips_per_vehicle);

        let node_table = Arc::new(NodeTable {
            distances,
            service_centiminutes: nodes
                .iter()
                .map(SolverNode::service_centiminutes)
                .collect(),
            demands: nodes.iter().map(|node| node.demand).collect(),
        });

        debug!(
            nodes = nodes.len(),
            depots = depots.len(),
            engine_vehicles = fleet.len(),
            cost_model = ?settings.cost_model,
            "Formulated request"
        );

        Ok(Formulation {
            depots,
            fallback_depot,
            stops,
            nodes,
            node_table,
            fleet,
            cylinders,
            settings,
        })
    }

    pub fn depots(&self) -> &[Depot] {
        &self.depots
    }

    pub fn fallback_depot(&self) -> &Depot {
        &self.depots[self.fallback_depot]
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop(&self, stop: StopIdx) -> Option<&Stop> {
        self.stops.get(stop.get())
    }

    pub fn nodes(&self) -> &[SolverNode] {
        &self.nodes
    }

    pub fn node(&self, node: NodeIdx) -> Option<&SolverNode> {
        self.nodes.get(node.get())
    }

    pub fn node_table(&self) -> &Arc<NodeTable> {
        &self.node_table
    }

    pub fn distance_km(&self, from: NodeIdx, to: NodeIdx) -> f64 {
        self.node_table.distances.distance_km(from.get(), to.get())
    }

    pub fn fleet(&self) -> &VirtualFleet {
        &self.fleet
    }

    pub fn cylinders(&self) -> &CylinderCatalog {
        &self.cylinders
    }

    pub fn settings(&self) -> &FormulationSettings {
        &self.settings
    }
}

/// Depots are the first nodes, in depot order.
fn depot_node(depot: DepotIdx) -> NodeIdx {
    NodeIdx::new(depot.get())
}

fn find_depot(depots: &[Depot], id: &str) -> Option<DepotIdx> {
    depots
        .iter()
        .position(|depot| depot.id == id)
        .map(DepotIdx::new)
}

fn resolve_vehicle(
    vehicle: &JsonVehicle,
    depots: &[Depot],
    fallback_depot: DepotIdx,
    fallback_speed: Kmh,
    params: &JsonSolverParams,
) -> FleetVehicle {
    let depot = match vehicle.depot_id.as_deref() {
        Some(depot_id) => find_depot(depots, depot_id).unwrap_or_else(|| {
            warn!(
                vehicle = %vehicle.id,
                depot = depot_id,
                "Unknown depot, using the fallback depot"
            );
            fallback_depot
        }),
        None => fallback_depot,
    };

    let depot_shift = depots[depot].shift;
    let requested = TimeWindow::new(
        vehicle.shift_start.unwrap_or(depot_shift.start),
        vehicle.shift_end.unwrap_or(depot_shift.end),
    );
    let shift = depot_shift.intersection(&requested).unwrap_or_else(|| {
        warn!(
            vehicle = %vehicle.id,
            shift_start = requested.start,
            shift_end = requested.end,
            "Vehicle shift does not overlap its depot shift, using the depot shift"
        );
        depot_shift
    });

    let speed = vehicle
        .speed
        .and_then(|speed| Kmh::try_new(speed).ok())
        .unwrap_or(fallback_speed);

    if !vehicle.breaks.is_empty() {
        warn!(
            vehicle = %vehicle.id,
            breaks = vehicle.breaks.len(),
            "Vehicle breaks are not scheduled"
        );
    }

    FleetVehicle {
        id: vehicle.id.clone(),
        capacity: vehicle.capacity_units.max(0),
        shift,
        speed,
        depot,
        depot_node: depot_node(depot),
        tare_weight_kg: vehicle.tare_weight,
        max_weight_kg: vehicle.max_weight_capacity_kg.filter(|weight| *weight > 0.0),
        fixed_cost: vehicle.fixed_cost.unwrap_or(params.vehicle_fixed_cost),
    }
}

fn warn_unreachable_stops(
    nodes: &[SolverNode],
    stops: &[Stop],
    distances: &TravelMatrices,
    speed: Kmh,
    fallback_node: NodeIdx,
    fallback_shift: TimeWindow,
) -> Result<(), FormulationError> {
    let minutes = distances.travel_minutes(speed)?;

    for (node_idx, node) in nodes.iter().enumerate() {
        let NodeKind::Stop { stop, chunk } = node.kind else {
            continue;
        };
        if chunk.is_some_and(|chunk| chunk > 0) {
            continue;
        }

        let earliest_arrival =
            fallback_shift.start + minutes.minutes(fallback_node.get(), node_idx);
        if earliest_arrival > node.window.end {
            warn!(
                stop = %stops[stop].id,
                earliest_arrival,
                window_end = node.window.end,
                "Stop cannot be reached within its time window from the fallback depot"
            );
        }
    }

    Ok(())
}
