use crate::routing::{
    assignment::Assignment,
    index_manager::VehicleIdx,
    model::RoutingModel,
    score::Score,
    search::{context::SearchContext, guided_local_search::ArcPenalties},
};

/// New visit sequences for some vehicles, plus the visits a move starts or
/// stops performing.
#[derive(Debug, Clone, Default)]
pub(crate) struct RouteChanges {
    pub routes: Vec<(VehicleIdx, Vec<usize>)>,
    pub activated: Vec<usize>,
    pub deactivated: Vec<usize>,
}

impl RouteChanges {
    pub fn route(vehicle: VehicleIdx, visits: Vec<usize>) -> Self {
        RouteChanges {
            routes: vec![(vehicle, visits)],
            ..RouteChanges::default()
        }
    }

    pub fn routes(changes: Vec<(VehicleIdx, Vec<usize>)>) -> Self {
        RouteChanges {
            routes: changes,
            ..RouteChanges::default()
        }
    }

    pub fn activating(mut self, index: usize) -> Self {
        self.activated.push(index);
        self
    }

    pub fn deactivating(mut self, index: usize) -> Self {
        self.deactivated.push(index);
        self
    }

    fn visits(&self, vehicle: VehicleIdx) -> Option<&[usize]> {
        self.routes
            .iter()
            .find(|(candidate, _)| *candidate == vehicle)
            .map(|(_, visits)| visits.as_slice())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MoveEvaluation {
    pub delta: Score,
    pub guided_delta: i64,
    group_costs: Vec<(usize, i64)>,
}

impl MoveEvaluation {
    /// The delta the search minimises, including guided penalties when active.
    pub fn objective(&self) -> Score {
        self.delta + Score::soft(self.guided_delta)
    }
}

#[derive(Clone)]
pub(crate) struct WorkingSolution<'a> {
    context: &'a SearchContext<'a>,
    routes: Vec<Vec<usize>>,
    vehicle_of: Vec<Option<VehicleIdx>>,
    /// `None` for groups that cannot be scheduled even when empty.
    group_costs: Vec<Option<i64>>,
    score: Score,
}

impl<'a> WorkingSolution<'a> {
    pub fn new(context: &'a SearchContext<'a>) -> Self {
        let model = context.model();
        let manager = model.manager();
        let routes = vec![Vec::new(); manager.num_vehicles()];

        let group_costs = (0..context.num_groups())
            .map(|group| {
                context
                    .evaluate_group(group, |_| &[])
                    .map(|evaluation| evaluation.cost)
            })
            .collect::<Vec<_>>();

        let score = (0..manager.num_visitable())
            .map(|index| inactive_score(model, index))
            .sum::<Score>()
            + Score::soft(group_costs.iter().flatten().sum());

        WorkingSolution {
            context,
            routes,
            vehicle_of: vec![None; manager.num_visitable()],
            group_costs,
            score,
        }
    }

    pub fn model(&self) -> &'a RoutingModel {
        self.context.model()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Arc and span costs of the performed routes, without fixed costs or
    /// the penalties of inactive visits.
    pub fn route_costs(&self) -> i64 {
        let model = self.model();
        let fixed: i64 = model
            .manager()
            .vehicles()
            .filter(|&vehicle| !self.route(vehicle).is_empty())
            .map(|vehicle| model.fixed_cost(vehicle))
            .sum();

        self.group_costs.iter().flatten().sum::<i64>() - fixed
    }

    pub fn routes(&self) -> &[Vec<usize>] {
        &self.routes
    }

    pub fn route(&self, vehicle: VehicleIdx) -> &[usize] {
        &self.routes[vehicle.get()]
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.vehicle_of[index].is_some()
    }

    pub fn inactive_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.vehicle_of.len()).filter(|&index| !self.is_active(index))
    }

    /// Vehicles whose precedence group can be scheduled at all.
    pub fn usable_vehicles(&self) -> impl Iterator<Item = VehicleIdx> + '_ {
        self.model()
            .manager()
            .vehicles()
            .filter(|&vehicle| self.group_costs[self.context.group_of(vehicle)].is_some())
    }

    pub fn evaluate(
        &self,
        changes: &RouteChanges,
        guide: Option<&ArcPenalties>,
    ) -> Option<MoveEvaluation> {
        let mut groups = changes
            .routes
            .iter()
            .map(|(vehicle, _)| self.context.group_of(*vehicle))
            .collect::<Vec<_>>();
        groups.sort_unstable();
        groups.dedup();

        let mut delta = Score::ZERO;
        let mut group_costs = Vec::with_capacity(groups.len());

        for group in groups {
            let current = self.group_costs[group]?;
            let evaluation = self.context.evaluate_group(group, |vehicle| {
                changes
                    .visits(vehicle)
                    .unwrap_or(self.routes[vehicle.get()].as_slice())
            })?;

            delta += Score::soft(evaluation.cost - current);
            group_costs.push((group, evaluation.cost));
        }

        for &index in &changes.activated {
            delta = delta - inactive_score(self.model(), index);
        }
        for &index in &changes.deactivated {
            delta += inactive_score(self.model(), index);
        }

        let guided_delta = guide.map_or(0, |penalties| {
            changes
                .routes
                .iter()
                .map(|(vehicle, visits)| {
                    penalties.route_penalty(self.model(), *vehicle, visits)
                        - penalties.route_penalty(self.model(), *vehicle, self.route(*vehicle))
                })
                .sum()
        });

        Some(MoveEvaluation {
            delta,
            guided_delta,
            group_costs,
        })
    }

    pub fn apply(&mut self, changes: RouteChanges, evaluation: MoveEvaluation) {
        for (vehicle, _) in &changes.routes {
            for &index in &self.routes[vehicle.get()] {
                self.vehicle_of[index] = None;
            }
        }

        for (vehicle, visits) in changes.routes {
            for &index in &visits {
                self.vehicle_of[index] = Some(vehicle);
            }
            self.routes[vehicle.get()] = visits;
        }

        for (group, cost) in evaluation.group_costs {
            self.group_costs[group] = Some(cost);
        }

        self.score += evaluation.delta;
    }

    /// Materialises next pointers and cumul values.
    pub fn to_assignment(&self) -> Option<Assignment> {
        let model = self.model();
        let manager = model.manager();
        let num_indices = manager.num_indices();

        let mut next: Vec<usize> = (0..manager.size()).collect();
        let mut vehicle_of = vec![None; num_indices];
        let mut cumuls = vec![vec![0; num_indices]; model.dimensions().len()];

        for group in 0..self.context.num_groups() {
            let evaluation = self
                .context
                .evaluate_group(group, |vehicle| self.routes[vehicle.get()].as_slice())?;

            for (vehicle, route) in evaluation.routes {
                let path = model.route_path(vehicle, self.route(vehicle));

                for arc in path.windows(2) {
                    next[arc[0]] = arc[1];
                }
                for &index in &path {
                    vehicle_of[index] = Some(vehicle);
                }
                for (dimension, schedule) in route.schedules.iter().enumerate() {
                    for (&index, &cumul) in path.iter().zip(schedule.cumuls()) {
                        cumuls[dimension][index] = cumul;
                    }
                }
            }
        }

        Some(Assignment::new(next, vehicle_of, cumuls, self.score))
    }
}

fn inactive_score(model: &RoutingModel, index: usize) -> Score {
    match model.disjunction_penalty(index) {
        Some(penalty) => Score::soft(penalty),
        None => Score::hard(1),
    }
}
