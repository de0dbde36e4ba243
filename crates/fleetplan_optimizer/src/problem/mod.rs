pub mod cost_model;
pub mod cylinders;
pub mod demand_split;
pub mod depots;
pub mod error;
pub mod formulation;
pub mod routing_setup;
pub mod solver_node;
pub mod time_window;
pub mod transit;
pub mod virtual_fleet;
