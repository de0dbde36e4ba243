use crate::routing::{dimension::DimensionIdx, index_manager::VehicleIdx, score::Score};

/// Final values of a solved model.
///
/// Inactive visitable indices point to themselves.
#[derive(Debug, Clone)]
pub struct Assignment {
    next: Vec<usize>,
    vehicle_of: Vec<Option<VehicleIdx>>,
    cumuls: Vec<Vec<i64>>,
    score: Score,
}

impl Assignment {
    pub(crate) fn new(
        next: Vec<usize>,
        vehicle_of: Vec<Option<VehicleIdx>>,
        cumuls: Vec<Vec<i64>>,
        score: Score,
    ) -> Self {
        Assignment {
            next,
            vehicle_of,
            cumuls,
            score,
        }
    }

    /// Successor of `index`. Only defined for visitable and start indices.
    pub fn next(&self, index: usize) -> usize {
        self.next[index]
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.next.get(index).is_some_and(|&next| next != index)
    }

    /// Vehicle serving `index`, `None` for inactive visits.
    pub fn vehicle(&self, index: usize) -> Option<VehicleIdx> {
        self.vehicle_of.get(index).copied().flatten()
    }

    /// Scheduled cumul value, `None` for unknown dimensions or inactive visits.
    pub fn cumul(&self, dimension: DimensionIdx, index: usize) -> Option<i64> {
        self.vehicle(index)?;
        self.cumuls.get(dimension.get())?.get(index).copied()
    }

    pub fn objective(&self) -> i64 {
        self.score.soft_score
    }

    pub fn score(&self) -> Score {
        self.score
    }
}
