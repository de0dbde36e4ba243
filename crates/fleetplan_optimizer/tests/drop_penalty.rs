mod setup;

use fleetplan_optimizer::json::response::SolveStatus;
use serde_json::json;

use setup::{request, solve, stop, vehicle};

fn far_stop_request(penalty_base: i64) -> serde_json::Value {
    request(
        vec![vehicle("V1", 10)],
        vec![stop("NEAR", 0.01, 0.0, 1), stop("FAR", 1.0, 0.0, 1)],
        json!({ "penaltyBase": penalty_base }),
    )
}

#[test]
fn test_low_penalty_leaves_far_stop_unserved() {
    let response = solve(far_stop_request(100));

    assert_eq!(response.summary.status, SolveStatus::Optimized);
    assert_eq!(response.summary.unserved_stop_ids, vec!["FAR"]);
}

#[test]
fn test_high_penalty_serves_far_stop() {
    let response = solve(far_stop_request(10_000_000));

    assert!(response.summary.unserved_stop_ids.is_empty());
    let steps: Vec<&str> = response.routes[0]
        .steps
        .iter()
        .map(|step| step.stop_id.as_str())
        .collect();
    assert!(steps.contains(&"FAR"));
}

#[test]
fn test_priority_raises_penalty() {
    let mut value = far_stop_request(100);
    value["stops"][1]["priority"] = json!(10);

    let response = solve(value);
    assert!(response.summary.unserved_stop_ids.is_empty());
}

#[test]
fn test_mandatory_stops_without_unserved() {
    let mut value = far_stop_request(100);
    value["params"]["allowUnserved"] = json!(false);

    let response = solve(value);
    assert!(response.summary.unserved_stop_ids.is_empty());
    assert_eq!(response.summary.status, SolveStatus::Optimized);
}
