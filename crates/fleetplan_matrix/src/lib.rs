pub mod error;
pub mod kmh;
pub mod location;
pub mod travel_matrices;
