//! The check_plugins crate holds the plugin contract shared by every check in this repository,
//! together with the checks themselves.
//!
//! A check is a short-lived process: it parses its flags, queries one external system, compares
//! the measurement against warning and critical thresholds and prints a single line before
//! exiting with the matching monitoring-plugin exit code.
//!
//! ```rust
//! use check_plugins::{Metric, Resource, TriggerIfValue};
//!
//! let resource = Resource::new("NTP")
//!     .with_description("offset is fine")
//!     .with_result(Metric::new("offset", 12.0).with_thresholds(50.0, 100.0, TriggerIfValue::Greater));
//!
//! assert_eq!(&resource.to_nagios_string(), "OK NTP: offset is fine");
//! ```

use std::fmt;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

pub mod cli;
pub mod cloudwatch_logs;
pub mod config_generator;
pub mod logging;
pub mod mysql;
pub mod ntp;

mod helper;
mod runner;

pub use crate::helper::safe_run;
pub use crate::runner::{Runner, RunnerResult};

/// A Resource represents the single service a check reports on.
///
/// If no state is set explicitly, the state is determined from the pushed check results: the
/// most severe one wins, and a resource without results is OK.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    name: String,
    state: Option<ServiceState>,
    description: Option<String>,
    results: Vec<CheckResult>,
}

impl Resource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            state: None,
            description: None,
            results: Vec::new(),
        }
    }

    /// Set the message printed after the plugin name.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Manually set the state for this resource. This disables the automatic state
    /// determination based on the included results.
    pub fn with_state(mut self, state: ServiceState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_result(mut self, result: impl Into<CheckResult>) -> Self {
        self.results.push(result.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// The manually set state if any, else the most severe state of the results.
    pub fn state(&self) -> ServiceState {
        if let Some(state) = self.state {
            return state;
        }

        self.results
            .iter()
            .map(CheckResult::state)
            .max()
            .unwrap_or(ServiceState::Ok)
    }

    /// Returns the single line a monitoring agent expects: `<STATE> <name>: <description>`.
    pub fn to_nagios_string(&self) -> String {
        let mut s = format!("{} {}", self.state(), self.name);

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            s.push_str(&format!(": {}", description));
        }

        s
    }

    pub fn exit_code(&self) -> i32 {
        self.state().exit_code()
    }

    /// Will print Self::to_nagios_string and exit with the exit code from Self::exit_code.
    ///
    /// Only the first caller in the process prints. A later caller, such as a termination
    /// handler racing the main thread, blocks until the first one has exited.
    pub fn print_and_exit(&self) -> ! {
        if !STATUS_LINE.claim() {
            loop {
                thread::park();
            }
        }

        println!("{}", self.to_nagios_string());
        process::exit(self.exit_code());
    }
}

static STATUS_LINE: StatusLine = StatusLine::new();

/// Guards the single status line a process may print.
struct StatusLine(AtomicBool);

impl StatusLine {
    const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// True for the first caller only.
    fn claim(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }
}

/// Represents a service state from the monitoring agent's point of view.
///
/// States are ordered by severity: `Ok < Warning < Critical < Unknown`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceState {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl ServiceState {
    /// Returns the corresponding plugin exit code to signal the service state of self.
    pub fn exit_code(&self) -> i32 {
        match self {
            ServiceState::Ok => 0,
            ServiceState::Warning => 1,
            ServiceState::Critical => 2,
            ServiceState::Unknown => 3,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceState::Ok => "OK",
            ServiceState::Warning => "WARNING",
            ServiceState::Critical => "CRITICAL",
            ServiceState::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Which direction a value has to move to breach a threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerIfValue {
    /// Breached when the value is strictly greater than the threshold.
    Greater,
    /// Breached when the value is strictly less than the threshold.
    Less,
}

impl TriggerIfValue {
    fn breached<T: PartialOrd>(&self, value: &T, threshold: &T) -> bool {
        match self {
            TriggerIfValue::Greater => value > threshold,
            TriggerIfValue::Less => value < threshold,
        }
    }
}

/// Warning and critical thresholds with the uniform three-tier rule: critical is checked first,
/// then warning, and anything else is OK. A value equal to a threshold has not breached it.
#[derive(Clone, Debug, PartialEq)]
pub struct Thresholds<T> {
    warning: Option<T>,
    critical: Option<T>,
    trigger: TriggerIfValue,
}

impl<T: PartialOrd> Thresholds<T> {
    pub fn new(
        warning: impl Into<Option<T>>,
        critical: impl Into<Option<T>>,
        trigger: TriggerIfValue,
    ) -> Self {
        Self {
            warning: warning.into(),
            critical: critical.into(),
            trigger,
        }
    }

    pub fn warning(&self) -> Option<&T> {
        self.warning.as_ref()
    }

    pub fn critical(&self) -> Option<&T> {
        self.critical.as_ref()
    }

    pub fn evaluate(&self, value: &T) -> ServiceState {
        let breached = |threshold: &Option<T>| {
            threshold
                .as_ref()
                .map_or(false, |t| self.trigger.breached(value, t))
        };

        if breached(&self.critical) {
            ServiceState::Critical
        } else if breached(&self.warning) {
            ServiceState::Warning
        } else {
            ServiceState::Ok
        }
    }
}

/// A named measurement which calculates its state from optional thresholds.
///
/// ```rust
/// use check_plugins::{Metric, ServiceState, TriggerIfValue};
///
/// let metric = Metric::new("connections", 15).with_thresholds(15, 30, TriggerIfValue::Greater);
/// assert_eq!(metric.state(), ServiceState::Ok);
///
/// let metric = Metric::new("connections", 16).with_thresholds(15, 30, TriggerIfValue::Greater);
/// assert_eq!(metric.state(), ServiceState::Warning);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Metric<T> {
    name: String,
    value: T,
    thresholds: Option<Thresholds<T>>,
}

impl<T: PartialOrd> Metric<T> {
    pub fn new(name: &str, value: T) -> Self {
        Self {
            name: name.to_owned(),
            value,
            thresholds: None,
        }
    }

    pub fn with_thresholds(
        mut self,
        warning: impl Into<Option<T>>,
        critical: impl Into<Option<T>>,
        trigger: TriggerIfValue,
    ) -> Self {
        self.thresholds = Some(Thresholds::new(warning, critical, trigger));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn thresholds(&self) -> Option<&Thresholds<T>> {
        self.thresholds.as_ref()
    }

    /// Without thresholds a metric is always OK.
    pub fn state(&self) -> ServiceState {
        self.thresholds
            .as_ref()
            .map_or(ServiceState::Ok, |t| t.evaluate(&self.value))
    }
}

/// The evaluated outcome of one measurement, as kept by a [Resource].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckResult {
    name: String,
    state: ServiceState,
}

impl CheckResult {
    pub fn new(name: &str, state: ServiceState) -> Self {
        Self {
            name: name.to_owned(),
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }
}

impl<T: PartialOrd> From<Metric<T>> for CheckResult {
    fn from(metric: Metric<T>) -> Self {
        CheckResult::new(metric.name(), metric.state())
    }
}
