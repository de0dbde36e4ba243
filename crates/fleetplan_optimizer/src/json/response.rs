use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "OptimizeResponse", rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub routes: Vec<VehicleRoute>,
    pub summary: SolutionSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    Optimized,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRoute {
    /// The vehicle id for a first trip, `{vehicleId}#trip{n}` for later ones.
    pub vehicle_id: String,
    pub trip_index: usize,
    pub steps: Vec<RouteStep>,
    pub total_dist_km: f64,
    pub total_time_min: i64,
    pub total_demand_units: i64,
    pub total_ton_km: f64,
    pub max_onboard_mass_kg: f64,
    pub avg_onboard_mass_kg: f64,
    pub co2_kg: f64,
    pub start_time_min: i64,
    pub end_time_min: i64,
    pub overweight: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    pub stop_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
    pub arrival_time: i64,
    pub departure_time: i64,
    pub service_time: i64,
    pub waiting_time: i64,
    pub dist_from_prev_km: f64,
    pub delivered_units: i64,
    pub late_minutes: i64,
    pub window_start: i64,
    pub window_end: i64,
    pub onboard_mass_kg: f64,
    pub full_units_onboard: i64,
    pub empty_units_onboard: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolutionSummary {
    pub total_dist_km: f64,
    pub total_time_min: i64,
    pub unserved_stop_ids: Vec<String>,
    pub status: SolveStatus,
    pub total_ton_km: f64,
    pub total_co2_kg: f64,
}

impl OptimizeResponse {
    /// Response for a request without any feasible assignment.
    pub fn failed() -> Self {
        OptimizeResponse {
            routes: Vec::new(),
            summary: SolutionSummary {
                total_dist_km: 0.0,
                total_time_min: 0,
                unserved_stop_ids: Vec::new(),
                status: SolveStatus::Failed,
                total_ton_km: 0.0,
                total_co2_kg: 0.0,
            },
        }
    }
}
