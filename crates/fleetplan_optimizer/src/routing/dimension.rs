use crate::{
    define_index_newtype,
    routing::{
        callbacks::{CallbackIdx, UnaryCallbackIdx},
        index_manager::VehicleIdx,
    },
};

define_index_newtype!(DimensionIdx);

#[derive(Debug, Clone)]
pub(crate) enum DimensionTransits {
    PerVehicle(Vec<CallbackIdx>),
    Unary(UnaryCallbackIdx),
}

/// A quantity accumulated along each route, such as time or load.
///
/// At every routing index the cumul variable must lie within the index range
/// and within `[0, capacity]` of the serving vehicle. Between consecutive
/// indices the cumul grows by the transit plus a slack in `[0, slack_max]`.
#[derive(Debug, Clone)]
pub struct Dimension {
    name: String,
    pub(crate) transits: DimensionTransits,
    slack_max: i64,
    capacities: Vec<i64>,
    fix_start_cumul_to_zero: bool,
    cumul_ranges: Vec<(i64, i64)>,
    span_cost_coefficients: Vec<i64>,
}

/// Concrete cumul values along one route, from its start index to its end index.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulSchedule {
    cumuls: Vec<i64>,
}

impl CumulSchedule {
    pub fn cumuls(&self) -> &[i64] {
        &self.cumuls
    }

    pub fn start(&self) -> i64 {
        self.cumuls.first().copied().unwrap_or_default()
    }

    pub fn end(&self) -> i64 {
        self.cumuls.last().copied().unwrap_or_default()
    }

    pub fn span(&self) -> i64 {
        self.end() - self.start()
    }
}

impl Dimension {
    pub(crate) fn new(
        name: impl Into<String>,
        transits: DimensionTransits,
        slack_max: i64,
        capacities: Vec<i64>,
        fix_start_cumul_to_zero: bool,
        num_indices: usize,
    ) -> Self {
        let num_vehicles = capacities.len();
        Dimension {
            name: name.into(),
            transits,
            slack_max,
            capacities,
            fix_start_cumul_to_zero,
            cumul_ranges: vec![(0, i64::MAX); num_indices],
            span_cost_coefficients: vec![0; num_vehicles],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slack_max(&self) -> i64 {
        self.slack_max
    }

    pub fn capacity(&self, vehicle: VehicleIdx) -> i64 {
        self.capacities[vehicle.get()]
    }

    pub fn span_cost_coefficient(&self, vehicle: VehicleIdx) -> i64 {
        self.span_cost_coefficients[vehicle.get()]
    }

    pub(crate) fn set_cumul_range(&mut self, index: usize, min: i64, max: i64) {
        self.cumul_ranges[index] = (min, max);
    }

    pub(crate) fn set_span_cost_coefficient(&mut self, vehicle: VehicleIdx, coefficient: i64) {
        self.span_cost_coefficients[vehicle.get()] = coefficient;
    }

    pub fn cumul_range(&self, index: usize) -> (i64, i64) {
        self.cumul_ranges[index]
    }

    fn effective_range(&self, index: usize, vehicle: VehicleIdx, is_start: bool) -> (i64, i64) {
        let (min, max) = self.cumul_ranges[index];
        let min = min.max(0);
        let max = max.min(self.capacity(vehicle));

        if is_start && self.fix_start_cumul_to_zero {
            (min, max.min(0))
        } else {
            (min, max)
        }
    }

    /// Schedules the cumuls of one route.
    ///
    /// `path` holds the routing indices from start to end and `transits[i]` the
    /// transit from `path[i]` to `path[i + 1]`. The start cumul is additionally
    /// bounded below by `start_lower_bound`.
    ///
    /// Feasible windows are propagated forward, then concrete values are picked
    /// backward from the earliest possible end. When the vehicle pays a span
    /// cost the route starts as late as possible, otherwise every cumul takes
    /// its earliest value compatible with the slack bound.
    pub(crate) fn schedule(
        &self,
        vehicle: VehicleIdx,
        path: &[usize],
        transits: &[i64],
        start_lower_bound: i64,
    ) -> Option<CumulSchedule> {
        debug_assert_eq!(path.len(), transits.len() + 1);

        let mut windows = Vec::with_capacity(path.len());

        let (min, max) = self.effective_range(path[0], vehicle, true);
        let min = min.max(start_lower_bound);
        if min > max {
            return None;
        }
        windows.push((min, max));

        for (position, &index) in path.iter().enumerate().skip(1) {
            let (previous_min, previous_max) = windows[position - 1];
            let transit = transits[position - 1];
            let (range_min, range_max) = self.effective_range(index, vehicle, false);

            let min = previous_min.saturating_add(transit).max(range_min);
            let max = previous_max
                .saturating_add(transit)
                .saturating_add(self.slack_max)
                .min(range_max);

            if min > max {
                return None;
            }
            windows.push((min, max));
        }

        let compact = self.span_cost_coefficient(vehicle) > 0;
        let last = path.len() - 1;
        let mut cumuls = vec![0; path.len()];
        cumuls[last] = windows[last].0;

        for position in (0..last).rev() {
            let latest = cumuls[position + 1] - transits[position];
            let (min, max) = windows[position];

            cumuls[position] = if compact {
                latest.min(max)
            } else {
                latest.saturating_sub(self.slack_max).max(min)
            };
        }

        Some(CumulSchedule { cumuls })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time_dimension(slack_max: i64) -> Dimension {
        Dimension::new(
            "Time",
            DimensionTransits::PerVehicle(vec![CallbackIdx::new(0)]),
            slack_max,
            vec![10_000],
            false,
            4,
        )
    }

    #[test]
    fn test_schedule_waits_for_window() {
        let mut dimension = time_dimension(10_000);
        dimension.set_cumul_range(0, 100, 200);

        // start(2) -> 0 -> 1 -> end(3)
        let schedule = dimension
            .schedule(VehicleIdx::new(0), &[2, 0, 1, 3], &[10, 5, 7], 0)
            .unwrap();

        assert_eq!(schedule.cumuls(), &[0, 100, 105, 112]);
        assert_eq!(schedule.span(), 112);
    }

    #[test]
    fn test_schedule_compact_with_span_cost() {
        let mut dimension = time_dimension(10_000);
        dimension.set_cumul_range(0, 100, 200);
        dimension.set_span_cost_coefficient(VehicleIdx::new(0), 1);

        let schedule = dimension
            .schedule(VehicleIdx::new(0), &[2, 0, 1, 3], &[10, 5, 7], 0)
            .unwrap();

        assert_eq!(schedule.cumuls(), &[90, 100, 105, 112]);
        assert_eq!(schedule.span(), 22);
    }

    #[test]
    fn test_schedule_limited_slack_delays_start() {
        let mut dimension = time_dimension(20);
        dimension.set_cumul_range(0, 100, 200);

        let schedule = dimension
            .schedule(VehicleIdx::new(0), &[2, 0, 1, 3], &[10, 5, 7], 0)
            .unwrap();

        // The vehicle cannot wait 90 at the first visit, so it leaves later.
        assert_eq!(schedule.cumuls(), &[70, 100, 105, 112]);
    }

    #[test]
    fn test_schedule_infeasible_window() {
        let mut dimension = time_dimension(10_000);
        dimension.set_cumul_range(0, 0, 5);

        assert!(
            dimension
                .schedule(VehicleIdx::new(0), &[2, 0, 3], &[10, 10], 0)
                .is_none()
        );
    }

    #[test]
    fn test_schedule_start_lower_bound() {
        let dimension = time_dimension(10_000);

        let schedule = dimension
            .schedule(VehicleIdx::new(0), &[2, 0, 3], &[10, 10], 50)
            .unwrap();
        assert_eq!(schedule.cumuls(), &[50, 60, 70]);
    }

    #[test]
    fn test_capacity_dimension_overflow() {
        let dimension = Dimension::new(
            "Capacity",
            DimensionTransits::Unary(UnaryCallbackIdx::new(0)),
            0,
            vec![10],
            true,
            4,
        );

        assert!(
            dimension
                .schedule(VehicleIdx::new(0), &[2, 0, 1, 3], &[0, 6, 6], 0)
                .is_none()
        );
        let schedule = dimension
            .schedule(VehicleIdx::new(0), &[2, 0, 1, 3], &[0, 6, 4], 0)
            .unwrap();
        assert_eq!(schedule.end(), 10);
    }
}
