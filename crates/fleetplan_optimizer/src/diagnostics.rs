use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use jiff::Timestamp;
use serde::Serialize;
use tracing::{error, info};

use crate::{error::SolveError, json::request::OptimizeRequest};

/// Directory receiving diagnostic artifacts, the system temp directory by default.
pub const DIAGNOSTICS_DIR_ENV: &str = "FLEETPLAN_DIAGNOSTICS_DIR";

pub const SOLVER_ERROR_FILE: &str = "solver_error.json";

#[derive(Serialize)]
struct SolverErrorArtifact<'a> {
    timestamp: Timestamp,
    error: String,
    request: &'a OptimizeRequest,
}

pub fn diagnostics_dir() -> PathBuf {
    std::env::var_os(DIAGNOSTICS_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

/// Writes the failing request and its error to `dir`, returns the artifact path.
pub fn write_solver_error(
    dir: &Path,
    request: &OptimizeRequest,
    solve_error: &SolveError,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating diagnostics directory {}", dir.display()))?;

    let artifact = SolverErrorArtifact {
        timestamp: Timestamp::now(),
        error: solve_error.to_string(),
        request,
    };
    let path = dir.join(SOLVER_ERROR_FILE);
    let json = serde_json::to_string_pretty(&artifact).context("serializing solver error")?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;

    Ok(path)
}

/// Persists a solve error without ever failing the caller.
pub fn persist_solver_error(request: &OptimizeRequest, solve_error: &SolveError) {
    match write_solver_error(&diagnostics_dir(), request, solve_error) {
        Ok(path) => info!(path = %path.display(), "Wrote solver error artifact"),
        Err(write_error) => error!(error = ?write_error, "Failed to write solver error artifact"),
    }
}
