use std::str::FromStr;

use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FirstSolutionStrategy {
    /// Extend each route from its start with the cheapest feasible arc.
    #[default]
    PathCheapestArc,
    /// Repeatedly insert the visit whose best insertion is cheapest overall.
    GlobalCheapestInsertion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocalSearchMetaheuristic {
    /// Stop at the first local optimum.
    #[default]
    GreedyDescent,
    /// Penalise frequently used expensive arcs to escape local optima until the time limit.
    GuidedLocalSearch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown variant `{0}`")]
pub struct UnknownVariant(pub String);

impl FromStr for FirstSolutionStrategy {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PATH_CHEAPEST_ARC" => Ok(FirstSolutionStrategy::PathCheapestArc),
            "GLOBAL_CHEAPEST_INSERTION" => Ok(FirstSolutionStrategy::GlobalCheapestInsertion),
            _ => Err(UnknownVariant(value.to_owned())),
        }
    }
}

impl FromStr for LocalSearchMetaheuristic {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GREEDY_DESCENT" => Ok(LocalSearchMetaheuristic::GreedyDescent),
            "GUIDED_LOCAL_SEARCH" => Ok(LocalSearchMetaheuristic::GuidedLocalSearch),
            _ => Err(UnknownVariant(value.to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchParameters {
    pub first_solution_strategy: FirstSolutionStrategy,
    pub local_search_metaheuristic: LocalSearchMetaheuristic,
    pub time_limit: SignedDuration,
    pub random_seed: u64,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            first_solution_strategy: FirstSolutionStrategy::default(),
            local_search_metaheuristic: LocalSearchMetaheuristic::default(),
            time_limit: SignedDuration::from_secs(30),
            random_seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metaheuristic() {
        assert_eq!(
            "guided_local_search".parse::<LocalSearchMetaheuristic>(),
            Ok(LocalSearchMetaheuristic::GuidedLocalSearch)
        );
        assert_eq!(
            " GREEDY_DESCENT ".parse::<LocalSearchMetaheuristic>(),
            Ok(LocalSearchMetaheuristic::GreedyDescent)
        );
        assert!("TABU_SEARCH".parse::<LocalSearchMetaheuristic>().is_err());
    }

    #[test]
    fn test_parse_first_solution_strategy() {
        assert_eq!(
            "Global_Cheapest_Insertion".parse::<FirstSolutionStrategy>(),
            Ok(FirstSolutionStrategy::GlobalCheapestInsertion)
        );
        assert!("SAVINGS".parse::<FirstSolutionStrategy>().is_err());
    }
}
