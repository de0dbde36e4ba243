use std::{cmp::Reverse, collections::BinaryHeap};

use fxhash::FxHashMap;

use crate::routing::{
    error::RoutingError,
    index_manager::VehicleIdx,
    model::{EndToStartPrecedence, RouteEvaluation, RoutingModel},
};

/// Vehicles linked by precedences must be scheduled together, in topological
/// order, since the end of one route bounds the start of the next.
pub(crate) struct SearchContext<'a> {
    model: &'a RoutingModel,
    groups: Vec<Vec<VehicleIdx>>,
    group_of: Vec<usize>,
    incoming: Vec<Vec<EndToStartPrecedence>>,
}

pub(crate) struct GroupEvaluation {
    pub cost: i64,
    pub routes: Vec<(VehicleIdx, RouteEvaluation)>,
}

impl<'a> SearchContext<'a> {
    pub fn new(model: &'a RoutingModel) -> Result<Self, RoutingError> {
        let num_vehicles = model.manager().num_vehicles();
        let mut incoming = vec![Vec::new(); num_vehicles];
        let mut outgoing = vec![Vec::new(); num_vehicles];
        let mut in_degree = vec![0usize; num_vehicles];
        let mut parent: Vec<usize> = (0..num_vehicles).collect();

        for precedence in model.precedences() {
            incoming[precedence.after.get()].push(*precedence);
            outgoing[precedence.before.get()].push(precedence.after.get());
            in_degree[precedence.after.get()] += 1;
            union(&mut parent, precedence.before.get(), precedence.after.get());
        }

        let mut ready: BinaryHeap<Reverse<usize>> = (0..num_vehicles)
            .filter(|&vehicle| in_degree[vehicle] == 0)
            .map(Reverse)
            .collect();
        let mut order = Vec::with_capacity(num_vehicles);

        while let Some(Reverse(vehicle)) = ready.pop() {
            order.push(vehicle);
            for &after in &outgoing[vehicle] {
                in_degree[after] -= 1;
                if in_degree[after] == 0 {
                    ready.push(Reverse(after));
                }
            }
        }

        if order.len() != num_vehicles {
            return Err(RoutingError::CyclicPrecedence);
        }

        let mut groups: Vec<Vec<VehicleIdx>> = Vec::new();
        let mut group_of = vec![0; num_vehicles];
        let mut group_of_root = FxHashMap::default();

        for vehicle in order {
            let root = find(&mut parent, vehicle);
            let group = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[group].push(VehicleIdx::new(vehicle));
            group_of[vehicle] = group;
        }

        Ok(SearchContext {
            model,
            groups,
            group_of,
            incoming,
        })
    }

    pub fn model(&self) -> &'a RoutingModel {
        self.model
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn group_of(&self, vehicle: VehicleIdx) -> usize {
        self.group_of[vehicle.get()]
    }

    /// Evaluates every route of a group, chaining precedence bounds from one
    /// vehicle's end to the next vehicle's start.
    pub fn evaluate_group<'r>(
        &self,
        group: usize,
        route_of: impl Fn(VehicleIdx) -> &'r [usize],
    ) -> Option<GroupEvaluation> {
        let num_dimensions = self.model.dimensions().len();
        let mut routes: Vec<(VehicleIdx, RouteEvaluation)> =
            Vec::with_capacity(self.groups[group].len());
        let mut cost = 0i64;

        for &vehicle in &self.groups[group] {
            let mut lower_bounds = vec![i64::MIN; num_dimensions];

            for precedence in &self.incoming[vehicle.get()] {
                let (_, before) = routes
                    .iter()
                    .find(|(candidate, _)| *candidate == precedence.before)?;
                let bound = before.schedules[precedence.dimension.get()]
                    .end()
                    .saturating_add(precedence.offset);
                let lower_bound = &mut lower_bounds[precedence.dimension.get()];
                *lower_bound = (*lower_bound).max(bound);
            }

            let evaluation = self
                .model
                .evaluate_route(vehicle, route_of(vehicle), &lower_bounds)?;
            cost = cost.saturating_add(evaluation.cost);
            routes.push((vehicle, evaluation));
        }

        Some(GroupEvaluation { cost, routes })
    }
}

fn find(parent: &mut [usize], vehicle: usize) -> usize {
    let mut root = vehicle;
    while parent[root] != root {
        root = parent[root];
    }

    let mut current = vehicle;
    while parent[current] != root {
        let next = parent[current];
        parent[current] = root;
        current = next;
    }

    root
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let root_a = find(parent, a);
    let root_b = find(parent, b);
    if root_a != root_b {
        parent[root_b.max(root_a)] = root_a.min(root_b);
    }
}
