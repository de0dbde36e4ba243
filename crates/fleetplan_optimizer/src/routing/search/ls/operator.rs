use crate::routing::search::working_solution::{RouteChanges, WorkingSolution};

pub(crate) trait LocalSearchOperator: Sized {
    const NAME: &'static str;

    fn generate_moves<C>(solution: &WorkingSolution, consumer: C)
    where
        C: FnMut(Self);

    /// The routes and activity changes this move produces when applied to `solution`.
    fn changes(&self, solution: &WorkingSolution) -> RouteChanges;
}
