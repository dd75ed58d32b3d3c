use std::fmt::Display;

use crate::{Resource, Runner, RunnerResult};

/// Runs the given closure under a [Runner] named `name`, reporting any error as UNKNOWN.
pub fn safe_run<E, F>(name: &str, f: F) -> RunnerResult<E>
where
    E: Display,
    F: FnOnce() -> Result<Resource, E>,
{
    Runner::new(name).safe_run(f)
}
