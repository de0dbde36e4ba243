use std::sync::Arc;

use fleetplan_matrix::{kmh::Kmh, travel_matrices::TravelMatrices};

use crate::routing::{
    callbacks::{TransitCallback, UnaryTransitCallback},
    index_manager::NodeIdx,
};

const CENTIMINUTES_PER_HOUR: f64 = 6_000.0;
const METERS_PER_KM: f64 = 1_000.0;
const CENTS: f64 = 100.0;

/// Per-node values every callback of one formulation shares.
#[derive(Debug)]
pub struct NodeTable {
    pub distances: TravelMatrices,
    pub service_centiminutes: Vec<i64>,
    pub demands: Vec<i64>,
}

impl NodeTable {
    fn distance_km(&self, from: NodeIdx, to: NodeIdx) -> f64 {
        self.distances.distance_km(from.get(), to.get())
    }

    fn drive_centiminutes(&self, speed: Kmh, from: NodeIdx, to: NodeIdx) -> i64 {
        (self.distance_km(from, to) / speed.value() * CENTIMINUTES_PER_HOUR).round() as i64
    }

    fn transit_centiminutes(&self, speed: Kmh, from: NodeIdx, to: NodeIdx) -> i64 {
        self.drive_centiminutes(speed, from, to) + self.service_centiminutes[from.get()]
    }
}

/// Driving time at the vehicle speed plus the service time of the origin.
#[derive(Debug, Clone)]
pub struct TravelTimeTransit {
    nodes: Arc<NodeTable>,
    speed: Kmh,
}

impl TravelTimeTransit {
    pub fn new(nodes: Arc<NodeTable>, speed: Kmh) -> Self {
        TravelTimeTransit { nodes, speed }
    }
}

impl TransitCallback for TravelTimeTransit {
    fn transit(&self, from: NodeIdx, to: NodeIdx) -> i64 {
        self.nodes.transit_centiminutes(self.speed, from, to)
    }
}

/// Distance in meters.
#[derive(Debug, Clone)]
pub struct DistanceCost {
    nodes: Arc<NodeTable>,
}

impl DistanceCost {
    pub fn new(nodes: Arc<NodeTable>) -> Self {
        DistanceCost { nodes }
    }
}

impl TransitCallback for DistanceCost {
    fn transit(&self, from: NodeIdx, to: NodeIdx) -> i64 {
        (self.nodes.distance_km(from, to) * METERS_PER_KM).round() as i64
    }
}

/// Fuel and driver cost of an arc in cents.
#[derive(Debug, Clone)]
pub struct MoneyCost {
    nodes: Arc<NodeTable>,
    speed: Kmh,
    fuel_cost_per_km: f64,
    driver_cost_per_hour: f64,
}

impl MoneyCost {
    pub fn new(
        nodes: Arc<NodeTable>,
        speed: Kmh,
        fuel_cost_per_km: f64,
        driver_cost_per_hour: f64,
    ) -> Self {
        MoneyCost {
            nodes,
            speed,
            fuel_cost_per_km,
            driver_cost_per_hour,
        }
    }
}

impl TransitCallback for MoneyCost {
    fn transit(&self, from: NodeIdx, to: NodeIdx) -> i64 {
        let fuel = self.nodes.distance_km(from, to) * self.fuel_cost_per_km;
        let hours =
            self.nodes.transit_centiminutes(self.speed, from, to) as f64 / CENTIMINUTES_PER_HOUR;

        ((fuel + hours * self.driver_cost_per_hour) * CENTS).round() as i64
    }
}

/// Demand slice of the node being left.
#[derive(Debug, Clone)]
pub struct DemandTransit {
    nodes: Arc<NodeTable>,
}

impl DemandTransit {
    pub fn new(nodes: Arc<NodeTable>) -> Self {
        DemandTransit { nodes }
    }
}

impl UnaryTransitCallback for DemandTransit {
    fn transit(&self, node: NodeIdx) -> i64 {
        self.nodes.demands[node.get()]
    }
}
