pub mod enumerate_idx;
pub mod rounding;
