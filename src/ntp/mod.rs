//! Check the clock offset reported by the local NTP daemon, ntpd or chronyd.

use std::num::ParseFloatError;
use std::path::Path;

use clap::Parser;
use tracing::debug;

use crate::{Metric, Resource, ServiceState, TriggerIfValue};

mod host;
pub mod parse;

pub use host::{CommandOutput, Host, SystemHost};

#[cfg(test)]
pub use host::MockHost;

pub const PLUGIN_NAME: &str = "NTP";

/// Check the offset of the local clock reported by ntpd or chronyd
#[derive(Parser, Debug, Clone)]
#[command(name = "check-ntpoffset", version)]
pub struct Args {
    /// Critical threshold of ntp offset(ms)
    #[arg(short = 'c', long, default_value_t = 100.0)]
    pub critical: f64,
    /// Warning threshold of ntp offset(ms)
    #[arg(short = 'w', long, default_value_t = 50.0)]
    pub warning: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum NtpError {
    #[error("it seems no ntp daemon is running")]
    NoDaemon,
    #[error("unsupported ntp daemon {0:?}")]
    Unsupported(String),
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited unsuccessfully ({status})")]
    CommandFailed { program: String, status: String },
    #[error("couldn't get ntp offset. ntpd process may be down")]
    NtpdOutput,
    #[error("failed to get ntp offset")]
    ChronyOutput,
    #[error("invalid ntp offset {value:?}: {source}")]
    InvalidOffset {
        value: String,
        #[source]
        source: ParseFloatError,
    },
}

/// The daemons the check knows how to query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NtpDaemon {
    Ntpd,
    Chronyd,
}

impl NtpDaemon {
    pub fn from_name(name: &str) -> Result<Self, NtpError> {
        match name {
            "ntpd" => Ok(NtpDaemon::Ntpd),
            "chronyd" => Ok(NtpDaemon::Chronyd),
            other => Err(NtpError::Unsupported(other.to_owned())),
        }
    }

    /// Query the daemon and return its offset in milliseconds.
    pub fn offset<H: Host + ?Sized>(&self, host: &H) -> Result<f64, NtpError> {
        match self {
            NtpDaemon::Ntpd => with_command(host, "ntpq", &["-c", "rv 0 offset"], parse::ntpq_offset),
            NtpDaemon::Chronyd => with_command(host, "chronyc", &["tracking"], parse::chrony_offset),
        }
    }
}

/// Runs `program` and feeds its stdout to `parse`. A parse failure takes precedence over the
/// exit status, which only matters once the output made sense.
fn with_command<H, T, F>(
    host: &H,
    program: &str,
    args: &[&'static str],
    parse: F,
) -> Result<T, NtpError>
where
    H: Host + ?Sized,
    F: FnOnce(&str) -> Result<T, NtpError>,
{
    let output = host.run(program, args)?;
    let parsed = parse(&output.stdout)?;

    if !output.success() {
        return Err(NtpError::CommandFailed {
            program: program.to_owned(),
            status: output
                .exit_code
                .map_or_else(|| "killed by signal".to_owned(), |c| format!("exit code {c}")),
        });
    }

    Ok(parsed)
}

/// Name of the running NTP daemon.
///
/// As root, the owner of the NTP port is taken from `lsof`. Without privileges that is not
/// visible, so the process list is scanned instead: chronyd is reported only when `chronyc` is
/// available to query it, and ntpd is assumed otherwise.
pub fn detect_daemon_name<H: Host + ?Sized>(host: &H) -> Result<String, NtpError> {
    if host.is_root() {
        return with_command(host, "lsof", &["-i:123"], |stdout| {
            let line = stdout.lines().nth(1).unwrap_or_default();
            let command = line.split_whitespace().next().ok_or(NtpError::NoDaemon)?;

            Ok(Path::new(command)
                .file_name()
                .map_or_else(|| command.to_owned(), |name| name.to_string_lossy().into_owned()))
        });
    }

    with_command(host, "ps", &["-eo", "comm"], |stdout| {
        let chronyd_running = stdout.lines().any(|line| line.ends_with("chronyd"));

        if chronyd_running && host.has_executable("chronyc") {
            Ok("chronyd".to_owned())
        } else {
            Ok("ntpd".to_owned())
        }
    })
}

/// Detects the daemon and returns its offset in milliseconds.
pub fn ntp_offset<H: Host + ?Sized>(host: &H) -> Result<f64, NtpError> {
    let name = detect_daemon_name(host)?;
    debug!(daemon = %name, "detected ntp daemon");

    NtpDaemon::from_name(&name)?.offset(host)
}

/// Classifies the absolute offset against the thresholds.
pub fn evaluate(offset: f64, args: &Args) -> Resource {
    let actual = offset.abs();
    let metric = Metric::new("offset", actual).with_thresholds(
        args.warning,
        args.critical,
        TriggerIfValue::Greater,
    );

    let message = match metric.state() {
        ServiceState::Critical => {
            format!("ntp offset is over {:.6}(actual) > {:.6}(threshold)", actual, args.critical)
        }
        ServiceState::Warning => {
            format!("ntp offset is over {:.6}(actual) > {:.6}(threshold)", actual, args.warning)
        }
        _ => format!(
            "ntp offset is {:.6}(actual) < {:.6}(warning threshold), {:.6}(critial threshold)",
            actual, args.warning, args.critical
        ),
    };

    Resource::new(PLUGIN_NAME)
        .with_result(metric)
        .with_description(message)
}

pub fn run<H: Host + ?Sized>(args: &Args, host: &H) -> Result<Resource, NtpError> {
    let offset = ntp_offset(host)?;
    Ok(evaluate(offset, args))
}
