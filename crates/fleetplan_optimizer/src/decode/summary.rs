use crate::{
    json::response::{SolutionSummary, SolveStatus, VehicleRoute},
    utils::rounding::round_to,
};

/// Fleet totals of the decoded routes.
pub fn summarize(routes: &[VehicleRoute], unserved_stop_ids: Vec<String>) -> SolutionSummary {
    SolutionSummary {
        total_dist_km: round_to(routes.iter().map(|route| route.total_dist_km).sum(), 2),
        total_time_min: routes.iter().map(|route| route.total_time_min).sum(),
        unserved_stop_ids,
        status: SolveStatus::Optimized,
        total_ton_km: round_to(routes.iter().map(|route| route.total_ton_km).sum(), 3),
        total_co2_kg: round_to(routes.iter().map(|route| route.co2_kg).sum(), 3),
    }
}
