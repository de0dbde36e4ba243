use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MatrixError;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize, JsonSchema)]
pub struct Kmh(f64);

impl Kmh {
    pub fn new(value: f64) -> Self {
        Kmh(value)
    }

    /// Rejects speeds the travel time formulas cannot divide by.
    pub fn try_new(value: f64) -> Result<Self, MatrixError> {
        if value.is_finite() && value > 0.0 {
            Ok(Kmh(value))
        } else {
            Err(MatrixError::InvalidSpeed(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Minutes needed to drive `distance_km` at this speed.
    pub fn travel_minutes(&self, distance_km: f64) -> f64 {
        distance_km / self.0 * 60.0
    }
}
