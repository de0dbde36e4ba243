pub mod decode;
mod define_index_newtype;
pub mod diagnostics;
pub mod error;
pub mod json;
pub mod problem;
pub mod routing;
pub mod solve;
mod utils;

pub use error::SolveError;
pub use solve::solve;
