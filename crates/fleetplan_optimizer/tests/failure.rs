mod setup;

use fleetplan_optimizer::{
    SolveError,
    json::response::SolveStatus,
    problem::error::FormulationError,
};
use serde_json::json;

use setup::{parse, request, solve, stop, vehicle};

#[test]
fn test_unreachable_mandatory_stop_fails() {
    let mut value = request(
        vec![vehicle("V1", 10)],
        vec![stop("S1", 0.01, 0.0, 1), stop("FAR", 1.0, 0.0, 1)],
        json!({ "allowUnserved": false }),
    );
    value["stops"][1]["timeWindow"] = json!({ "start": 0, "end": 5 });

    let response = solve(value);

    assert_eq!(response.summary.status, SolveStatus::Failed);
    assert!(response.routes.is_empty());
    assert!(response.summary.unserved_stop_ids.is_empty());
}

#[test]
fn test_over_capacity_mandatory_stop_fails() {
    let response = solve(request(
        vec![vehicle("V1", 5)],
        vec![stop("S1", 0.01, 0.0, 8)],
        json!({ "allowUnserved": false }),
    ));

    assert_eq!(response.summary.status, SolveStatus::Failed);
}

#[test]
fn test_request_without_depot_is_an_error() {
    let mut value = request(vec![vehicle("V1", 5)], vec![stop("S1", 0.01, 0.0, 1)], json!({}));
    value.as_object_mut().unwrap().remove("depot");

    let error = fleetplan_optimizer::solve(&parse(value)).unwrap_err();
    assert!(matches!(
        error,
        SolveError::Formulation(FormulationError::NoDepot)
    ));
}

#[test]
fn test_response_serializes_camel_case() {
    let response = solve(request(
        vec![vehicle("V1", 10)],
        vec![stop("S1", 0.01, 0.0, 1)],
        json!({}),
    ));

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["summary"]["status"], "optimized");
    assert!(value["summary"]["unservedStopIds"].is_array());
    assert!(value["summary"]["totalCo2Kg"].is_number());

    let route = &value["routes"][0];
    assert_eq!(route["vehicleId"], "V1");
    assert!(route["co2Kg"].is_number());
    assert!(route["steps"][0]["distFromPrevKm"].is_number());
    assert!(route["steps"][0].get("chunkIndex").is_none());
}
