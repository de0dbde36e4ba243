use crate::problem::{
    cylinders::{CylinderCatalog, CylinderIdx},
    solver_node::{SolverNode, Stop},
};

/// Cylinders moved at one visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMovement {
    pub cylinder: CylinderIdx,
    pub deliver: i64,
    pub pickup: i64,
}

/// Movements of a chunk visit, its share of every known item of the stop.
pub fn visit_movements(stop: &Stop, node: &SolverNode) -> Vec<ItemMovement> {
    stop.items
        .iter()
        .filter_map(|item| {
            Some(ItemMovement {
                cylinder: item.cylinder?,
                deliver: stop.proportional(item.deliver_units, node.demand),
                pickup: stop.proportional(item.pickup_units, node.demand),
            })
        })
        .collect()
}

/// Full and empty units onboard, per cylinder type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySnapshot {
    full: Vec<i64>,
    empty: Vec<i64>,
}

impl InventorySnapshot {
    pub fn full_units(&self) -> i64 {
        self.full.iter().sum()
    }

    pub fn empty_units(&self) -> i64 {
        self.empty.iter().sum()
    }

    pub fn mass_kg(&self, tare_weight_kg: f64, catalog: &CylinderCatalog) -> f64 {
        catalog
            .iter()
            .zip(self.full.iter().zip(&self.empty))
            .fold(tare_weight_kg, |mass, (cylinder, (&full, &empty))| {
                mass + full as f64 * cylinder.full_weight_kg + empty as f64 * cylinder.empty_weight_kg
            })
    }

    fn apply(&self, movements: &[ItemMovement]) -> Self {
        let mut next = self.clone();
        for movement in movements {
            let c = movement.cylinder.get();
            next.full[c] = (next.full[c] - movement.deliver).max(0);
            next.empty[c] += movement.pickup;
        }
        next
    }
}

/// Forward simulation of the cylinders onboard along a route.
///
/// The vehicle leaves loaded with every full cylinder it delivers on the route.
/// Snapshot `i` is the load on the leg into visit `i`, the last snapshot the
/// load on the leg back to the depot.
pub fn simulate(num_cylinder_types: usize, visits: &[Vec<ItemMovement>]) -> Vec<InventorySnapshot> {
    let mut initial = InventorySnapshot {
        full: vec![0; num_cylinder_types],
        empty: vec![0; num_cylinder_types],
    };
    for movement in visits.iter().flatten() {
        initial.full[movement.cylinder.get()] += movement.deliver;
    }

    let mut snapshots = Vec::with_capacity(visits.len() + 1);
    snapshots.push(initial);
    for movements in visits {
        let next = snapshots[snapshots.len() - 1].apply(movements);
        snapshots.push(next);
    }

    snapshots
}
