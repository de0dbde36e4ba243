//! A small constraint-based vehicle routing engine.
//!
//! The model is registered the same way the formulation layer thinks about the
//! problem: an index space over nodes, per-vehicle transit callbacks, cumulative
//! dimensions with ranges and precedences, optional visits with penalties, and
//! per-vehicle arc costs. Solving returns an [`assignment::Assignment`] or `None`
//! when a mandatory visit cannot be served.

pub mod assignment;
pub mod callbacks;
pub mod dimension;
pub mod error;
pub mod index_manager;
pub mod model;
pub mod score;
mod search;
pub mod search_parameters;
