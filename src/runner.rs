use std::fmt::Display;

use tracing::debug;

use crate::{Resource, ServiceState};

/// Runs a fallible check and turns its outcome into a [Resource].
///
/// An error means the condition could not be measured, so it is reported as
/// [ServiceState::Unknown] unless a different state is chosen with [Runner::on_error].
pub struct Runner<E> {
    name: String,
    on_error: Option<Box<dyn FnOnce(&E) -> ServiceState>>,
}

impl<E: Display> Runner<E> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            on_error: None,
        }
    }

    pub fn on_error(mut self, f: impl FnOnce(&E) -> ServiceState + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// This will run either the default `on_error` handler or the one specified by calling
    /// [Runner::on_error] when `f` fails.
    pub fn safe_run(self, f: impl FnOnce() -> Result<Resource, E>) -> RunnerResult<E> {
        match f() {
            Ok(resource) => RunnerResult::Ok(resource),
            Err(error) => {
                let state = self
                    .on_error
                    .map(|f| f(&error))
                    .unwrap_or(ServiceState::Unknown);
                debug!(%error, %state, "check failed");

                RunnerResult::Err {
                    name: self.name,
                    state,
                    error,
                }
            }
        }
    }
}

#[derive(Debug)]
pub enum RunnerResult<E> {
    Ok(Resource),
    Err {
        name: String,
        state: ServiceState,
        error: E,
    },
}

impl<E: Display> RunnerResult<E> {
    /// The resource to report. A failure keeps its state and uses the error text as message.
    pub fn into_resource(self) -> Resource {
        match self {
            RunnerResult::Ok(resource) => resource,
            RunnerResult::Err { name, state, error } => Resource::new(&name)
                .with_state(state)
                .with_description(error.to_string()),
        }
    }

    pub fn print_and_exit(self) -> ! {
        self.into_resource().print_and_exit()
    }
}
