use fleetplan_matrix::kmh::Kmh;

use crate::{
    define_index_newtype,
    problem::{depots::DepotIdx, time_window::TimeWindow},
    routing::index_manager::{NodeIdx, VehicleIdx},
    utils::enumerate_idx::EnumerateIdx,
};

define_index_newtype!(FleetVehicleIdx, FleetVehicle);

/// A physical vehicle of the request with every default resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetVehicle {
    pub id: String,
    pub capacity: i64,
    /// Depot shift intersected with the vehicle shift.
    pub shift: TimeWindow,
    pub speed: Kmh,
    pub depot: DepotIdx,
    pub depot_node: NodeIdx,
    pub tare_weight_kg: f64,
    pub max_weight_kg: Option<f64>,
    pub fixed_cost: f64,
}

/// One trip of a fleet vehicle, as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualVehicle {
    pub vehicle: FleetVehicleIdx,
    pub trip: usize,
}

/// Mapping between engine vehicles and fleet vehicles.
///
/// Engine vehicle `v * trips_per_vehicle + t` is trip `t` of fleet vehicle `v`.
/// Every lookup goes through this table, never through index arithmetic at the
/// call site.
#[derive(Debug, Clone)]
pub struct VirtualFleet {
    vehicles: Vec<FleetVehicle>,
    virtual_vehicles: Vec<VirtualVehicle>,
    trips_per_vehicle: usize,
}

impl VirtualFleet {
    pub fn expand(vehicles: Vec<FleetVehicle>, trips_per_vehicle: usize) -> Self {
        let trips_per_vehicle = trips_per_vehicle.max(1);
        let virtual_vehicles = vehicles
            .iter()
            .enumerate_idx()
            .flat_map(|(vehicle, _)| {
                (0..trips_per_vehicle).map(move |trip| VirtualVehicle { vehicle, trip })
            })
            .collect();

        VirtualFleet {
            vehicles,
            virtual_vehicles,
            trips_per_vehicle,
        }
    }

    pub fn trips_per_vehicle(&self) -> usize {
        self.trips_per_vehicle
    }

    /// Number of engine vehicles.
    pub fn len(&self) -> usize {
        self.virtual_vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.virtual_vehicles.is_empty()
    }

    pub fn vehicles(&self) -> &[FleetVehicle] {
        &self.vehicles
    }

    pub fn virtual_vehicle(&self, vehicle: VehicleIdx) -> Option<VirtualVehicle> {
        self.virtual_vehicles.get(vehicle.get()).copied()
    }

    pub fn resolve(&self, vehicle: VehicleIdx) -> Option<(VirtualVehicle, &FleetVehicle)> {
        let virtual_vehicle = self.virtual_vehicle(vehicle)?;
        let fleet_vehicle = self.vehicles.get(virtual_vehicle.vehicle.get())?;
        Some((virtual_vehicle, fleet_vehicle))
    }

    /// Every engine vehicle with its fleet vehicle, in engine order.
    pub fn iter(&self) -> impl Iterator<Item = (VehicleIdx, VirtualVehicle, &FleetVehicle)> {
        self.virtual_vehicles
            .iter()
            .enumerate_idx::<VehicleIdx>()
            .map(|(idx, virtual_vehicle)| {
                (
                    idx,
                    *virtual_vehicle,
                    &self.vehicles[virtual_vehicle.vehicle],
                )
            })
    }

    /// Id reported for a route: the vehicle id for the first trip, `{id}#trip{n}` after.
    pub fn route_id(&self, vehicle: VehicleIdx) -> Option<String> {
        let (virtual_vehicle, fleet_vehicle) = self.resolve(vehicle)?;
        Some(match virtual_vehicle.trip {
            0 => fleet_vehicle.id.clone(),
            trip => format!("{}#trip{}", fleet_vehicle.id, trip + 1),
        })
    }

    /// Pairs of engine vehicles that are consecutive trips of one fleet vehicle.
    pub fn consecutive_trips(&self) -> impl Iterator<Item = (VehicleIdx, VehicleIdx)> + '_ {
        self.virtual_vehicles
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| {
                pair[0].vehicle == pair[1].vehicle && pair[0].trip + 1 == pair[1].trip
            })
            .map(|(position, _)| (VehicleIdx::new(position), VehicleIdx::new(position + 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(id: &str) -> FleetVehicle {
        FleetVehicle {
            id: id.to_owned(),
            capacity: 10,
            shift: TimeWindow::new(0, 600),
            speed: Kmh::new(30.0),
            depot: DepotIdx::new(0),
            depot_node: NodeIdx::new(0),
            tare_weight_kg: 0.0,
            max_weight_kg: None,
            fixed_cost: 0.0,
        }
    }

    #[test]
    fn test_expand_trips() {
        let fleet = VirtualFleet::expand(vec![vehicle("A"), vehicle("B")], 3);

        assert_eq!(fleet.len(), 6);
        let (virtual_vehicle, fleet_vehicle) = fleet.resolve(VehicleIdx::new(4)).unwrap();
        assert_eq!(fleet_vehicle.id, "B");
        assert_eq!(virtual_vehicle.trip, 1);
        assert!(fleet.resolve(VehicleIdx::new(6)).is_none());
    }

    #[test]
    fn test_route_ids() {
        let fleet = VirtualFleet::expand(vec![vehicle("A"), vehicle("B")], 2);

        let ids: Vec<String> = fleet
            .iter()
            .filter_map(|(idx, _, _)| fleet.route_id(idx))
            .collect();
        assert_eq!(ids, vec!["A", "A#trip2", "B", "B#trip2"]);
    }

    #[test]
    fn test_consecutive_trips() {
        let fleet = VirtualFleet::expand(vec![vehicle("A"), vehicle("B")], 2);

        let pairs: Vec<(usize, usize)> = fleet
            .consecutive_trips()
            .map(|(before, after)| (before.get(), after.get()))
            .collect();
        assert_eq!(pairs, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_single_trip_has_no_precedence() {
        let fleet = VirtualFleet::expand(vec![vehicle("A"), vehicle("B")], 0);

        assert_eq!(fleet.trips_per_vehicle(), 1);
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet.consecutive_trips().count(), 0);
        assert_eq!(fleet.route_id(VehicleIdx::new(1)).as_deref(), Some("B"));
    }
}
