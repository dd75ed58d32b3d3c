//! Parsers for the offset reports of `ntpq` and `chronyc`. Both return milliseconds.

use super::NtpError;

const NTPQ_ASSOCIATION_PREFIX: &str = "assID=0";
const CHRONY_OFFSET_LABEL: &str = "Last offset";
const CHRONY_OFFSET_FIELDS: usize = 5;

/// Parses `ntpq -c "rv 0 offset"`.
///
/// Modern ntpq prints a single `offset=<ms>` line. Old releases (ntp 4.2.2) prefix it with an
/// association status line:
///
/// ```text
/// assID=0 status=06f4 leap_none, sync_ntp, 15 events, event_peer/strat_chg,
/// offset=0.180
/// ```
pub fn ntpq_offset(output: &str) -> Result<f64, NtpError> {
    let lines: Vec<&str> = output.split('\n').collect();

    let line = match lines.as_slice() {
        [line, _] => line,
        [status, line, _] if status.starts_with(NTPQ_ASSOCIATION_PREFIX) => line,
        _ => return Err(NtpError::NtpdOutput),
    };

    match line.split('=').collect::<Vec<_>>().as_slice() {
        [_, value] => parse_offset(value.trim_matches('\n')),
        _ => Err(NtpError::NtpdOutput),
    }
}

/// Parses `chronyc tracking`, whose offset line reads `Last offset     : -0.000123456 seconds`.
pub fn chrony_offset(output: &str) -> Result<f64, NtpError> {
    let line = output
        .lines()
        .find(|line| line.starts_with(CHRONY_OFFSET_LABEL))
        .ok_or(NtpError::ChronyOutput)?;

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != CHRONY_OFFSET_FIELDS {
        return Err(NtpError::ChronyOutput);
    }

    Ok(parse_offset(fields[3])? * 1000.0)
}

fn parse_offset(value: &str) -> Result<f64, NtpError> {
    value.parse().map_err(|source| NtpError::InvalidOffset {
        value: value.to_owned(),
        source,
    })
}
