use tracing::warn;

/// Used when the configured penalty base is zero or negative.
pub const DEFAULT_PENALTY_BASE: i64 = 1_000_000;

/// Objective the engine minimises. Exactly one is active per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CostModel {
    /// Arc cost in meters, no fixed vehicle cost.
    #[default]
    Distance,
    /// Arc cost in centiminutes including service, plus the route span.
    Time,
    /// Fuel and driver cost in cents, plus the fixed vehicle cost.
    Money,
}

impl CostModel {
    /// Case-insensitive, unknown values fall back to [`CostModel::Distance`].
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "DISTANCE" => CostModel::Distance,
            "TIME" => CostModel::Time,
            "MONEY" => CostModel::Money,
            _ => {
                warn!(cost_model = value, "Unknown cost model, using DISTANCE");
                CostModel::Distance
            }
        }
    }

    /// Brings a penalty expressed in base units to the arc cost unit.
    pub fn penalty_scale(&self) -> i64 {
        match self {
            CostModel::Distance => 1_000,
            CostModel::Time | CostModel::Money => 100,
        }
    }

    pub fn drop_penalty(&self, penalty_base: i64, priority: i64) -> i64 {
        let base = if penalty_base <= 0 {
            DEFAULT_PENALTY_BASE
        } else {
            penalty_base
        };

        base.saturating_mul(self.penalty_scale())
            .saturating_mul(priority.max(1))
    }
}
