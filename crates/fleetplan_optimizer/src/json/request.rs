use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "OptimizeRequest", rename_all = "camelCase")]
pub struct OptimizeRequest {
    /// Legacy single depot, also the fallback for stop windows and unknown depot ids.
    #[serde(default)]
    pub depot: Option<JsonDepot>,
    #[serde(default)]
    pub depots: Vec<JsonDepot>,
    pub vehicles: Vec<JsonVehicle>,
    pub stops: Vec<JsonStop>,
    #[serde(default)]
    pub cylinder_types: Vec<JsonCylinderType>,
    #[serde(default)]
    pub params: JsonSolverParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "Depot", rename_all = "camelCase")]
pub struct JsonDepot {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    /// Minutes from midnight.
    pub shift_start: i64,
    pub shift_end: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "Vehicle", rename_all = "camelCase")]
pub struct JsonVehicle {
    pub id: String,
    pub capacity_units: i64,
    #[serde(default)]
    pub shift_start: Option<i64>,
    #[serde(default)]
    pub shift_end: Option<i64>,
    /// km/h, falls back to `params.avgSpeedKmph` when missing or not positive.
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub depot_id: Option<String>,
    #[serde(default)]
    pub tare_weight: f64,
    #[serde(default)]
    pub fixed_cost: Option<f64>,
    #[serde(default)]
    pub max_weight_capacity_kg: Option<f64>,
    #[serde(default)]
    pub breaks: Vec<JsonBreak>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "Break", rename_all = "camelCase")]
pub struct JsonBreak {
    pub start_min: i64,
    pub end_min: i64,
    pub duration_min: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "Stop", rename_all = "camelCase")]
pub struct JsonStop {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub demand_units: i64,
    #[serde(default)]
    pub service_time_min: f64,
    #[serde(default)]
    pub time_window: Option<JsonTimeWindow>,
    #[serde(default)]
    pub items: Vec<JsonStopItem>,
    /// Multiplies the drop penalty of the stop.
    #[serde(default)]
    pub priority: Option<i64>,
    /// Preferred depot. Accepted for compatibility, stops are not tied to a depot.
    #[serde(default)]
    pub depot_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "TimeWindow")]
pub struct JsonTimeWindow {
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "StopItem", rename_all = "camelCase")]
pub struct JsonStopItem {
    pub cylinder_type_id: String,
    #[serde(default)]
    pub deliver_units: i64,
    #[serde(default)]
    pub pickup_units: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "CylinderType", rename_all = "camelCase")]
pub struct JsonCylinderType {
    pub id: String,
    pub full_weight_kg: f64,
    pub empty_weight_kg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "SolverParams", rename_all = "camelCase", default)]
pub struct JsonSolverParams {
    pub time_limit_seconds: f64,
    pub allow_unserved: bool,
    /// Scaled to the unit of the cost model. Zero or less means 1,000,000.
    pub penalty_base: i64,
    /// `DISTANCE`, `TIME` or `MONEY`. Unknown values fall back to `DISTANCE`.
    pub cost_model: String,
    pub fuel_cost_per_km: f64,
    pub driver_cost_per_hour: f64,
    pub vehicle_fixed_cost: f64,
    pub avg_speed_kmph: f64,
    /// `GREEDY_DESCENT` or `GUIDED_LOCAL_SEARCH`.
    pub local_search_metaheuristic: Option<String>,
    /// `PATH_CHEAPEST_ARC` or `GLOBAL_CHEAPEST_INSERTION`.
    pub first_solution_strategy: Option<String>,
    pub random_seed: u64,
    pub global_settings: JsonGlobalSettings,
}

impl Default for JsonSolverParams {
    fn default() -> Self {
        Self {
            time_limit_seconds: 30.0,
            allow_unserved: true,
            penalty_base: 100_000,
            cost_model: "DISTANCE".to_owned(),
            fuel_cost_per_km: 0.0,
            driver_cost_per_hour: 0.0,
            vehicle_fixed_cost: 0.0,
            avg_speed_kmph: 30.0,
            local_search_metaheuristic: None,
            first_solution_strategy: None,
            random_seed: 0,
            global_settings: JsonGlobalSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "GlobalSettings", rename_all = "camelCase", default)]
pub struct JsonGlobalSettings {
    /// kg of CO2 per ton-km.
    pub co2_factor: f64,
    pub reload_time_min: i64,
    pub enable_multi_trip: bool,
    pub max_trips_per_vehicle: usize,
}

impl Default for JsonGlobalSettings {
    fn default() -> Self {
        Self {
            co2_factor: 0.1,
            reload_time_min: 30,
            enable_multi_trip: false,
            max_trips_per_vehicle: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let request: OptimizeRequest = serde_json::from_value(serde_json::json!({
            "depot": { "id": "D", "lat": 0.0, "lng": 0.0, "shiftStart": 0, "shiftEnd": 600 },
            "vehicles": [{ "id": "V1", "capacityUnits": 10 }],
            "stops": [{ "id": "S1", "lat": 0.01, "lng": 0.0, "demandUnits": 2 }]
        }))
        .unwrap();

        let params = &request.params;
        assert_eq!(params.time_limit_seconds, 30.0);
        assert!(params.allow_unserved);
        assert_eq!(params.penalty_base, 100_000);
        assert_eq!(params.cost_model, "DISTANCE");
        assert_eq!(params.avg_speed_kmph, 30.0);
        assert_eq!(params.global_settings.co2_factor, 0.1);
        assert_eq!(params.global_settings.reload_time_min, 30);
        assert!(!params.global_settings.enable_multi_trip);
        assert_eq!(params.global_settings.max_trips_per_vehicle, 2);
        assert!(request.depots.is_empty());
        assert_eq!(request.stops[0].service_time_min, 0.0);
    }

    #[test]
    fn test_partial_global_settings() {
        let params: JsonSolverParams = serde_json::from_value(serde_json::json!({
            "costModel": "money",
            "globalSettings": { "enableMultiTrip": true }
        }))
        .unwrap();

        assert_eq!(params.cost_model, "money");
        assert!(params.global_settings.enable_multi_trip);
        assert_eq!(params.global_settings.max_trips_per_vehicle, 2);
        assert_eq!(params.time_limit_seconds, 30.0);
    }
}
