use schemars::schema_for;

use crate::json::{request::OptimizeRequest, response::OptimizeResponse};

pub fn generate_request_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(OptimizeRequest))
}

pub fn generate_response_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(OptimizeResponse))
}
