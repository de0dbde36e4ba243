use fleetplan_matrix::location::Location;

use crate::{
    define_index_newtype,
    json::request::JsonStop,
    problem::{
        cylinders::{CylinderCatalog, CylinderIdx},
        depots::DepotIdx,
        time_window::{CENTIMINUTES_PER_MINUTE, TimeWindow},
    },
};

define_index_newtype!(StopIdx, Stop);

/// Delivery and pickup of one cylinder type at a stop.
#[derive(Debug, Clone, PartialEq)]
pub struct StopItem {
    /// `None` when the request references an unknown cylinder type.
    pub cylinder: Option<CylinderIdx>,
    pub deliver_units: i64,
    pub pickup_units: i64,
}

/// A stop as requested, before any split.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: String,
    pub demand: i64,
    /// At least 1, multiplies the drop penalty.
    pub priority: i64,
    pub items: Vec<StopItem>,
}

impl Stop {
    pub fn from_json(stop: &JsonStop, catalog: &CylinderCatalog) -> Self {
        Stop {
            id: stop.id.clone(),
            demand: stop.demand_units.max(0),
            priority: stop.priority.unwrap_or(1).max(1),
            items: stop
                .items
                .iter()
                .map(|item| StopItem {
                    cylinder: catalog.find(&item.cylinder_type_id),
                    deliver_units: item.deliver_units,
                    pickup_units: item.pickup_units,
                })
                .collect(),
        }
    }

    /// Share of a stop quantity carried by a chunk of `chunk_demand` units.
    pub fn proportional(&self, quantity: i64, chunk_demand: i64) -> i64 {
        if self.demand <= 0 || chunk_demand >= self.demand {
            return quantity;
        }
        (quantity as f64 * chunk_demand as f64 / self.demand as f64).round() as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Depot(DepotIdx),
    Stop {
        stop: StopIdx,
        chunk: Option<usize>,
    },
}

/// One routable point handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverNode {
    pub kind: NodeKind,
    pub location: Location,
    pub demand: i64,
    pub service_min: i64,
    pub window: TimeWindow,
}

impl SolverNode {
    pub fn is_depot(&self) -> bool {
        matches!(self.kind, NodeKind::Depot(_))
    }

    pub fn stop(&self) -> Option<StopIdx> {
        match self.kind {
            NodeKind::Stop { stop, .. } => Some(stop),
            NodeKind::Depot(_) => None,
        }
    }

    pub fn chunk(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Stop { chunk, .. } => chunk,
            NodeKind::Depot(_) => None,
        }
    }

    pub fn service_centiminutes(&self) -> i64 {
        self.service_min.saturating_mul(CENTIMINUTES_PER_MINUTE)
    }
}
