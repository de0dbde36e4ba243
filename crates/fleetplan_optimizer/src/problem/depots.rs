use fleetplan_matrix::location::Location;
use fxhash::FxHashMap;

use crate::{define_index_newtype, json::request::JsonDepot, problem::time_window::TimeWindow};

define_index_newtype!(DepotIdx, Depot);

#[derive(Debug, Clone, PartialEq)]
pub struct Depot {
    pub id: String,
    pub location: Location,
    pub shift: TimeWindow,
}

impl From<&JsonDepot> for Depot {
    fn from(depot: &JsonDepot) -> Self {
        Depot {
            id: depot.id.clone(),
            location: Location::from_lat_lng(depot.lat, depot.lng),
            shift: TimeWindow::new(depot.shift_start, depot.shift_end),
        }
    }
}

/// Merges the legacy depot with the depot list, one entry per id.
///
/// The legacy depot comes first. A repeated id keeps the position of its first
/// occurrence and the values of its last one.
pub fn deduplicate_depots(legacy: Option<&JsonDepot>, depots: &[JsonDepot]) -> Vec<Depot> {
    let mut unique: Vec<Depot> = Vec::with_capacity(depots.len() + 1);
    let mut positions: FxHashMap<String, DepotIdx> = FxHashMap::default();

    for depot in legacy.into_iter().chain(depots) {
        match positions.get(&depot.id) {
            Some(&position) => unique[position] = Depot::from(depot),
            None => {
                positions.insert(depot.id.clone(), DepotIdx::new(unique.len()));
                unique.push(Depot::from(depot));
            }
        }
    }

    unique
}
