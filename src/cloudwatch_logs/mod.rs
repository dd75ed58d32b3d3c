//! Count CloudWatch Logs events matching a filter pattern over the last five minutes.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Parser;
use tracing::debug;

use crate::{Metric, Resource, TriggerIfValue};

mod client;

pub use client::CloudWatchLogsClient;

pub const PLUGIN_NAME: &str = "CloudWatch Logs";

/// Pause between paginated requests, keeping clear of the service's rate limit.
pub const PAGE_DELAY: Duration = Duration::from_millis(250);

/// How far back from now the search starts.
pub const SEARCH_WINDOW: Duration = Duration::from_secs(5 * 60);

const EMPTY_RESULT_MESSAGE: &str = "ok";

/// Check the number of CloudWatch Logs events matching a pattern in the last five minutes
#[derive(Parser, Debug, Clone)]
#[command(name = "check-cloudwatch-logs", version)]
pub struct Args {
    /// AWS Region
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,
    /// AWS Access Key ID
    #[arg(long, value_name = "ACCESS-KEY-ID")]
    pub access_key_id: Option<String>,
    /// AWS Secret Access Key
    #[arg(long, value_name = "SECRET-ACCESS-KEY")]
    pub secret_access_key: Option<String>,
    /// Log group name
    #[arg(long, value_name = "LOG-GROUP-NAME")]
    pub log_group_name: String,
    /// Pattern to search for. The value is recognized as the pattern syntax of CloudWatch Logs.
    #[arg(long, value_name = "PATTERN")]
    pub pattern: String,
    /// Trigger a warning if matched lines is over a number
    #[arg(short = 'w', long, default_value_t = 0)]
    pub warning_over: i64,
    /// Trigger a critical if matched lines is over a number
    #[arg(short = 'c', long, default_value_t = 0)]
    pub critical_over: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to start the AWS client runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("system clock is before the unix epoch")]
    Clock,
    #[error("{0}")]
    Service(String),
}

/// One `FilterLogEvents` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterRequest {
    pub log_group_name: String,
    pub filter_pattern: String,
    /// Milliseconds since the epoch.
    pub start_time: i64,
    /// Milliseconds since the epoch.
    pub end_time: i64,
    pub next_token: Option<String>,
}

/// The messages of one page and the continuation token, if more pages remain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogEventsPage {
    pub messages: Vec<String>,
    pub next_token: Option<String>,
}

/// Anything able to answer a filtered log search one page at a time.
pub trait LogEventsSource {
    fn filter_log_events(&self, request: &FilterRequest) -> Result<LogEventsPage, Error>;
}

/// A search window in epoch milliseconds, fixed for the whole pagination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    /// The [SEARCH_WINDOW] ending at `now`.
    pub fn ending_at(now: SystemTime) -> Result<Self, Error> {
        let end = now.duration_since(UNIX_EPOCH).map_err(|_| Error::Clock)?;
        let start = end.saturating_sub(SEARCH_WINDOW);

        Ok(Self {
            start: start.as_millis() as i64,
            end: end.as_millis() as i64,
        })
    }
}

/// Follows continuation tokens until the source reports none, sleeping `delay` between requests.
/// The first error aborts the search.
pub fn collect_messages<S>(
    source: &S,
    log_group_name: &str,
    pattern: &str,
    window: TimeWindow,
    delay: Duration,
) -> Result<Vec<String>, Error>
where
    S: LogEventsSource + ?Sized,
{
    let mut request = FilterRequest {
        log_group_name: log_group_name.to_owned(),
        filter_pattern: pattern.to_owned(),
        start_time: window.start,
        end_time: window.end,
        next_token: None,
    };
    let mut messages = Vec::new();

    loop {
        let page = source.filter_log_events(&request)?;
        debug!(
            matched = page.messages.len(),
            more = page.next_token.is_some(),
            "fetched log events page"
        );
        messages.extend(page.messages);

        match page.next_token {
            Some(token) => {
                request.next_token = Some(token);
                thread::sleep(delay);
            }
            None => break,
        }
    }

    Ok(messages)
}

/// Classifies the matched messages. The message text is the concatenation of every match, or
/// `ok` when nothing matched.
pub fn evaluate(messages: &[String], warning_over: i64, critical_over: i64) -> Resource {
    let count = messages.len() as i64;
    let resource = Resource::new(PLUGIN_NAME);

    if messages.is_empty() {
        return resource.with_description(EMPTY_RESULT_MESSAGE);
    }

    resource
        .with_result(Metric::new("matched", count).with_thresholds(
            warning_over,
            critical_over,
            TriggerIfValue::Greater,
        ))
        .with_description(messages.concat())
}

/// Runs the whole check against `source`.
pub fn run<S>(args: &Args, source: &S, delay: Duration) -> Result<Resource, Error>
where
    S: LogEventsSource + ?Sized,
{
    let window = TimeWindow::ending_at(SystemTime::now())?;
    let messages = collect_messages(
        source,
        &args.log_group_name,
        &args.pattern,
        window,
        delay,
    )?;

    Ok(evaluate(&messages, args.warning_over, args.critical_over))
}
