#![allow(dead_code)]

use fleetplan_optimizer::json::{
    request::OptimizeRequest,
    response::{OptimizeResponse, VehicleRoute},
};
use serde_json::{Value, json};

pub fn depot(id: &str, lat: f64, lng: f64) -> Value {
    json!({ "id": id, "lat": lat, "lng": lng, "shiftStart": 0, "shiftEnd": 1440 })
}

pub fn vehicle(id: &str, capacity: i64) -> Value {
    json!({ "id": id, "capacityUnits": capacity })
}

pub fn stop(id: &str, lat: f64, lng: f64, demand: i64) -> Value {
    json!({ "id": id, "lat": lat, "lng": lng, "demandUnits": demand })
}

/// A request with a single depot at the origin.
pub fn request(vehicles: Vec<Value>, stops: Vec<Value>, params: Value) -> Value {
    json!({
        "depot": depot("D", 0.0, 0.0),
        "vehicles": vehicles,
        "stops": stops,
        "params": params
    })
}

pub fn parse(value: Value) -> OptimizeRequest {
    serde_json::from_value(value).expect("valid request")
}

pub fn solve(value: Value) -> OptimizeResponse {
    fleetplan_optimizer::solve(&parse(value)).expect("solve succeeds")
}

pub fn route<'a>(response: &'a OptimizeResponse, vehicle_id: &str) -> Option<&'a VehicleRoute> {
    response
        .routes
        .iter()
        .find(|route| route.vehicle_id == vehicle_id)
}

/// Vehicle ids of the routes serving `stop_id`.
pub fn serving_vehicles(response: &OptimizeResponse, stop_id: &str) -> Vec<String> {
    response
        .routes
        .iter()
        .filter(|route| route.steps.iter().any(|step| step.stop_id == stop_id))
        .map(|route| route.vehicle_id.clone())
        .collect()
}

/// Stops spread around the origin, deterministic.
pub fn grid_stops(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let lat = ((i % 5) as f64 - 2.0) * 0.02;
            let lng = ((i / 5) as f64 - 1.0) * 0.03;
            json!({
                "id": format!("S{i}"),
                "lat": lat,
                "lng": lng + 0.001 * i as f64,
                "demandUnits": 1 + (i as i64 * 7) % 24,
                "serviceTimeMin": 5.0,
                "items": [{ "cylinderTypeId": "C12", "deliverUnits": 1 + (i as i64 * 7) % 24,
                            "pickupUnits": (i as i64) % 3 }]
            })
        })
        .collect()
}

pub fn cylinder_types() -> Value {
    json!([
        { "id": "C12", "fullWeightKg": 27.0, "emptyWeightKg": 14.0 },
        { "id": "C45", "fullWeightKg": 80.0, "emptyWeightKg": 35.0 }
    ])
}
