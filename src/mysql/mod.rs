//! MySQL checks, one per subcommand: `connection`, `readonly`, `replication` and `uptime`.

use std::fmt;
use std::str::FromStr;

use clap::{Args, Parser, ValueEnum};

use crate::{Metric, Resource, ServiceState, TriggerIfValue};

mod database;

pub use database::{Database, MysqlConnection, ReplicaStatus};

#[derive(Debug, thiserror::Error)]
pub enum MysqlError {
    #[error("Failed to connect to MySQL: {0}")]
    Connect(String),
    #[error("Failed to query {query}: {message}")]
    Query { query: String, message: String },
    #[error("{0} returned no rows")]
    NoRows(String),
    #[error("{0} is not reported by the server")]
    MissingValue(String),
    #[error("unexpected value {value:?} for {name}")]
    InvalidValue { name: String, value: String },
    #[error("Failed to parse version {raw:?}: {reason}")]
    Version { raw: String, reason: String },
}

/// The first command-line argument, when it is not a flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Subcommand {
    Connection,
    Readonly,
    Replication,
    Uptime,
    /// Missing, or not one of the names above.
    Unknown(Option<String>),
}

impl Subcommand {
    /// Every valid subcommand, in the order the usage text lists them.
    pub const ALL: [Subcommand; 4] = [
        Subcommand::Connection,
        Subcommand::Readonly,
        Subcommand::Replication,
        Subcommand::Uptime,
    ];

    pub fn from_name(name: &str) -> Self {
        match name {
            "connection" => Subcommand::Connection,
            "readonly" => Subcommand::Readonly,
            "replication" => Subcommand::Replication,
            "uptime" => Subcommand::Uptime,
            other => Subcommand::Unknown(Some(other.to_owned())),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Subcommand::Connection => "connection",
            Subcommand::Readonly => "readonly",
            Subcommand::Replication => "replication",
            Subcommand::Uptime => "uptime",
            Subcommand::Unknown(name) => name.as_deref().unwrap_or_default(),
        }
    }

    /// `MySQL` followed by the capitalized subcommand, e.g. `MySQL Replication`.
    pub fn plugin_name(&self) -> String {
        let mut chars = self.name().chars();
        match chars.next() {
            Some(first) => format!("MySQL {}{}", first.to_uppercase(), chars.as_str()),
            None => "MySQL".to_owned(),
        }
    }
}

/// Splits the subcommand off the arguments following the program name.
pub fn separate_sub(args: &[String]) -> (Subcommand, &[String]) {
    match args.split_first() {
        Some((first, rest)) if !first.starts_with('-') => (Subcommand::from_name(first), rest),
        _ => (Subcommand::Unknown(None), args),
    }
}

/// Printed when the subcommand is missing or unknown.
pub fn usage() -> String {
    let mut out = String::from("Usage:\n  check-mysql [subcommand] [OPTIONS]\n\nSubCommands:\n");
    for subcommand in Subcommand::ALL.iter() {
        out.push_str(&format!("  {}\n", subcommand.name()));
    }
    out
}

/// Connection flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct MysqlSetting {
    /// Hostname
    #[arg(short = 'H', long, default_value = "localhost")]
    pub host: String,
    /// Port
    #[arg(short = 'p', long, default_value_t = 3306)]
    pub port: u16,
    /// Path to unix socket
    #[arg(short = 'S', long)]
    pub socket: Option<String>,
    /// Username
    #[arg(short = 'u', long, default_value = "root")]
    pub user: String,
    /// Password
    #[arg(
        short = 'P',
        long,
        env = "MYSQL_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,
}

/// A subcommand's parsed arguments together with the check they drive.
pub trait MysqlCheck: Parser {
    fn setting(&self) -> &MysqlSetting;

    fn check<D: Database + ?Sized>(&self, db: &mut D) -> Result<Resource, MysqlError>;
}

/// Connects with the subcommand's settings and runs its check.
pub fn run<A: MysqlCheck>(args: &A) -> Result<Resource, MysqlError> {
    let mut db = MysqlConnection::connect(args.setting())?;
    args.check(&mut db)
}

/// `major.minor.patch[-stability]` as reported by `SELECT VERSION()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MysqlVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub stability: String,
}

impl MysqlVersion {
    pub fn is_mariadb(&self) -> bool {
        self.stability.to_lowercase().contains("mariadb")
    }

    /// `SHOW REPLICA STATUS` and its `Replica_*`/`*_Source` columns exist from MySQL 8.0.22.
    pub fn has_replica_status(&self) -> bool {
        !self.is_mariadb() && (self.major, self.minor, self.patch) >= (8, 0, 22)
    }
}

impl FromStr for MysqlVersion {
    type Err = MysqlError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let error = |reason: String| MysqlError::Version {
            raw: raw.to_owned(),
            reason,
        };

        let mut segments = raw.split('-');
        let numbers = segments.next().unwrap_or_default();
        let stability = segments.next().unwrap_or_default().to_owned();

        let mut components = numbers.split('.');
        let mut component = |label: &str| -> Result<u32, MysqlError> {
            let value = components
                .next()
                .ok_or_else(|| error(format!("missing {label} version")))?;
            value
                .parse()
                .map_err(|err| error(format!("invalid {label} version {value:?}: {err}")))
        };

        Ok(MysqlVersion {
            major: component("major")?,
            minor: component("minor")?,
            patch: component("patch")?,
            stability,
        })
    }
}

impl fmt::Display for MysqlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.stability.is_empty() {
            write!(f, "-{}", self.stability)?;
        }
        Ok(())
    }
}

fn number(value: Option<String>, name: &str) -> Result<i64, MysqlError> {
    let value = value.ok_or_else(|| MysqlError::MissingValue(name.to_owned()))?;
    value.trim().parse().map_err(|_| MysqlError::InvalidValue {
        name: name.to_owned(),
        value,
    })
}

/// Checks the number of open connections
#[derive(Parser, Debug, Clone)]
#[command(name = "check-mysql connection")]
pub struct ConnectionArgs {
    #[command(flatten)]
    pub setting: MysqlSetting,
    /// critical if the number of connection is over
    #[arg(short = 'c', long, default_value_t = 250)]
    pub critical: i64,
    /// warning if the number of connection is over
    #[arg(short = 'w', long, default_value_t = 200)]
    pub warning: i64,
}

impl MysqlCheck for ConnectionArgs {
    fn setting(&self) -> &MysqlSetting {
        &self.setting
    }

    fn check<D: Database + ?Sized>(&self, db: &mut D) -> Result<Resource, MysqlError> {
        let name = "Threads_connected";
        let connections = number(db.global_status(name)?, name)?;

        Ok(Resource::new(&Subcommand::Connection.plugin_name())
            .with_result(Metric::new("connections", connections).with_thresholds(
                self.warning,
                self.critical,
                TriggerIfValue::Greater,
            ))
            .with_description(format!("connections:{connections}")))
    }
}

/// Checks that the server has been up for long enough
#[derive(Parser, Debug, Clone)]
#[command(name = "check-mysql uptime")]
pub struct UptimeArgs {
    #[command(flatten)]
    pub setting: MysqlSetting,
    /// critical if the uptime less than (sec)
    #[arg(short = 'c', long, default_value_t = 0)]
    pub critical: i64,
    /// warning if the uptime less than (sec)
    #[arg(short = 'w', long, default_value_t = 0)]
    pub warning: i64,
}

impl MysqlCheck for UptimeArgs {
    fn setting(&self) -> &MysqlSetting {
        &self.setting
    }

    fn check<D: Database + ?Sized>(&self, db: &mut D) -> Result<Resource, MysqlError> {
        let name = "Uptime";
        let uptime = number(db.global_status(name)?, name)?;

        Ok(Resource::new(&Subcommand::Uptime.plugin_name())
            .with_result(Metric::new("uptime", uptime).with_thresholds(
                self.warning,
                self.critical,
                TriggerIfValue::Less,
            ))
            .with_description(format!("up {}", format_uptime(uptime))))
    }
}

fn format_uptime(seconds: i64) -> String {
    let days = seconds / 86_400;
    let hours = seconds % 86_400 / 3_600;
    let minutes = seconds % 3_600 / 60;
    let seconds = seconds % 60;
    format!("{days} days, {hours:02}:{minutes:02}:{seconds:02}")
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadOnly {
    On,
    Off,
}

impl ReadOnly {
    fn matches(&self, value: &str) -> bool {
        let expected = match self {
            ReadOnly::On => "ON",
            ReadOnly::Off => "OFF",
        };
        value.eq_ignore_ascii_case(expected)
    }
}

/// Checks that the read_only variable has the expected value
#[derive(Parser, Debug, Clone)]
#[command(name = "check-mysql readonly")]
pub struct ReadonlyArgs {
    #[command(flatten)]
    pub setting: MysqlSetting,
    /// Expected value of read_only
    #[arg(value_enum, ignore_case = true)]
    pub expected: ReadOnly,
}

impl MysqlCheck for ReadonlyArgs {
    fn setting(&self) -> &MysqlSetting {
        &self.setting
    }

    fn check<D: Database + ?Sized>(&self, db: &mut D) -> Result<Resource, MysqlError> {
        let name = "read_only";
        let read_only = db
            .global_variable(name)?
            .ok_or_else(|| MysqlError::MissingValue(name.to_owned()))?;

        let resource = Resource::new(&Subcommand::Readonly.plugin_name());
        if self.expected.matches(&read_only) {
            Ok(resource.with_description(format!("readOnly:{read_only}")))
        } else {
            Ok(resource.with_state(ServiceState::Critical).with_description(format!(
                "the expected value of read_only is different. readOnly:{read_only}"
            )))
        }
    }
}

/// Checks that replication runs and how far the replica lags behind
#[derive(Parser, Debug, Clone)]
#[command(name = "check-mysql replication")]
pub struct ReplicationArgs {
    #[command(flatten)]
    pub setting: MysqlSetting,
    /// critical if the seconds behind master is over
    #[arg(short = 'c', long, default_value_t = 250)]
    pub critical: i64,
    /// warning if the seconds behind master is over
    #[arg(short = 'w', long, default_value_t = 200)]
    pub warning: i64,
}

struct ReplicaColumns {
    statement: &'static str,
    io_running: &'static str,
    sql_running: &'static str,
    seconds_behind: &'static str,
}

const REPLICA_COLUMNS: ReplicaColumns = ReplicaColumns {
    statement: "SHOW REPLICA STATUS",
    io_running: "Replica_IO_Running",
    sql_running: "Replica_SQL_Running",
    seconds_behind: "Seconds_Behind_Source",
};

const SLAVE_COLUMNS: ReplicaColumns = ReplicaColumns {
    statement: "SHOW SLAVE STATUS",
    io_running: "Slave_IO_Running",
    sql_running: "Slave_SQL_Running",
    seconds_behind: "Seconds_Behind_Master",
};

impl MysqlCheck for ReplicationArgs {
    fn setting(&self) -> &MysqlSetting {
        &self.setting
    }

    fn check<D: Database + ?Sized>(&self, db: &mut D) -> Result<Resource, MysqlError> {
        let version: MysqlVersion = db.version()?.parse()?;
        let columns = if version.has_replica_status() {
            &REPLICA_COLUMNS
        } else {
            &SLAVE_COLUMNS
        };

        let resource = Resource::new(&Subcommand::Replication.plugin_name());
        let Some(status) = db.replica_status(columns.statement)? else {
            return Ok(resource.with_description("MySQL is not slave"));
        };

        let column = |name: &str| status.get(name).cloned().flatten();
        let io_running = column(columns.io_running).unwrap_or_default();
        let sql_running = column(columns.sql_running).unwrap_or_default();

        if io_running != "Yes" || sql_running != "Yes" {
            return Ok(resource.with_state(ServiceState::Critical).with_description(format!(
                "MySQL replication stopped (IO thread: {io_running}, SQL thread: {sql_running})"
            )));
        }

        let behind = number(column(columns.seconds_behind), columns.seconds_behind)?;

        Ok(resource
            .with_result(Metric::new("seconds_behind", behind).with_thresholds(
                self.warning,
                self.critical,
                TriggerIfValue::Greater,
            ))
            .with_description(format!("MySQL replication behind master {behind} seconds")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;
    use crate::Runner;

    /// Answers from fixed tables, or fails every query when `unreachable` is set.
    #[derive(Default)]
    struct FixtureDatabase {
        version: String,
        status: HashMap<&'static str, &'static str>,
        variables: HashMap<&'static str, &'static str>,
        replica: Option<ReplicaStatus>,
        statements: Vec<String>,
        unreachable: bool,
    }

    impl FixtureDatabase {
        fn check_reachable(&self) -> Result<(), MysqlError> {
            if self.unreachable {
                return Err(MysqlError::Connect(
                    "Can't connect to MySQL server on '127.0.0.1' (111)".to_owned(),
                ));
            }
            Ok(())
        }
    }

    impl Database for FixtureDatabase {
        fn version(&mut self) -> Result<String, MysqlError> {
            self.check_reachable()?;
            Ok(self.version.clone())
        }

        fn global_status(&mut self, name: &str) -> Result<Option<String>, MysqlError> {
            self.check_reachable()?;
            Ok(self.status.get(name).map(|v| v.to_string()))
        }

        fn global_variable(&mut self, name: &str) -> Result<Option<String>, MysqlError> {
            self.check_reachable()?;
            Ok(self.variables.get(name).map(|v| v.to_string()))
        }

        fn replica_status(
            &mut self,
            statement: &str,
        ) -> Result<Option<ReplicaStatus>, MysqlError> {
            self.check_reachable()?;
            self.statements.push(statement.to_owned());
            Ok(self.replica.clone())
        }
    }

    fn replica(columns: &[(&str, Option<&str>)]) -> Option<ReplicaStatus> {
        Some(
            columns
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_owned)))
                .collect(),
        )
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_separate_sub() {
        let args = strings(&["replication", "-H", "db1"]);
        let (sub, rest) = separate_sub(&args);
        assert_eq!(sub, Subcommand::Replication);
        assert_eq!(rest, &args[1..]);

        let args = strings(&["-H", "db1", "replication"]);
        let (sub, rest) = separate_sub(&args);
        assert_eq!(sub, Subcommand::Unknown(None));
        assert_eq!(rest.len(), 3);

        let (sub, _) = separate_sub(&[]);
        assert_eq!(sub, Subcommand::Unknown(None));

        let args = strings(&["status"]);
        let (sub, _) = separate_sub(&args);
        assert_eq!(sub, Subcommand::Unknown(Some("status".to_owned())));
    }

    #[test]
    fn test_plugin_names() {
        assert_eq!(Subcommand::Connection.plugin_name(), "MySQL Connection");
        assert_eq!(Subcommand::Readonly.plugin_name(), "MySQL Readonly");
        assert_eq!(Subcommand::Replication.plugin_name(), "MySQL Replication");
        assert_eq!(Subcommand::Uptime.plugin_name(), "MySQL Uptime");
    }

    #[test]
    fn test_usage_lists_subcommands() {
        assert_eq!(
            usage(),
            "Usage:\n  check-mysql [subcommand] [OPTIONS]\n\nSubCommands:\n  connection\n  readonly\n  replication\n  uptime\n"
        );
    }

    #[test]
    fn test_parse_version() {
        let version: MysqlVersion = "8.0.1-dmr".parse().unwrap();
        assert_eq!(
            version,
            MysqlVersion {
                major: 8,
                minor: 0,
                patch: 1,
                stability: "dmr".to_owned(),
            }
        );

        let version: MysqlVersion = "5.7.2".parse().unwrap();
        assert_eq!((version.major, version.minor, version.patch), (5, 7, 2));
        assert_eq!(version.stability, "");
        assert_eq!(version.to_string(), "5.7.2");

        let version: MysqlVersion = "10.5.8-MariaDB-log".parse().unwrap();
        assert_eq!(version.stability, "MariaDB");
        assert!(version.is_mariadb());
    }

    #[test]
    fn test_parse_version_errors() {
        assert_matches!("abc.0.1".parse::<MysqlVersion>(), Err(MysqlError::Version { .. }));
        assert_matches!("8.x.1".parse::<MysqlVersion>(), Err(MysqlError::Version { .. }));
        assert_matches!("8.0".parse::<MysqlVersion>(), Err(MysqlError::Version { .. }));
        assert_matches!("".parse::<MysqlVersion>(), Err(MysqlError::Version { .. }));
    }

    #[test]
    fn test_replica_status_support() {
        let supports = |raw: &str| raw.parse::<MysqlVersion>().unwrap().has_replica_status();
        assert!(!supports("5.7.44-log"));
        assert!(!supports("8.0.21"));
        assert!(supports("8.0.22"));
        assert!(supports("8.4.0"));
        assert!(!supports("10.11.2-MariaDB"));
    }

    #[test]
    fn test_setting_defaults_and_env() {
        let args = ConnectionArgs::parse_from(["check-mysql connection"]);
        assert_eq!(args.setting.host, "localhost");
        assert_eq!(args.setting.port, 3306);
        assert_eq!(args.setting.user, "root");
        assert!(args.setting.socket.is_none());
        assert_eq!((args.warning, args.critical), (200, 250));

        let args = ConnectionArgs::parse_from([
            "check-mysql connection",
            "-H",
            "db1",
            "-p",
            "3307",
            "-S",
            "/var/run/mysqld.sock",
            "-u",
            "monitor",
            "-P",
            "secret",
        ]);
        assert_eq!(args.setting.host, "db1");
        assert_eq!(args.setting.port, 3307);
        assert_eq!(args.setting.socket.as_deref(), Some("/var/run/mysqld.sock"));
        assert_eq!(args.setting.user, "monitor");
        assert_eq!(args.setting.password, "secret");
    }

    #[test]
    fn test_connection() {
        let mut db = FixtureDatabase {
            status: HashMap::from([("Threads_connected", "12")]),
            ..Default::default()
        };
        let args = ConnectionArgs::parse_from(["check-mysql connection", "-w", "10", "-c", "20"]);

        let resource = args.check(&mut db).unwrap();
        assert_eq!(
            resource.to_nagios_string(),
            "WARNING MySQL Connection: connections:12"
        );

        let args = ConnectionArgs::parse_from(["check-mysql connection", "-w", "12", "-c", "20"]);
        assert_eq!(args.check(&mut db).unwrap().state(), ServiceState::Ok);

        let args = ConnectionArgs::parse_from(["check-mysql connection", "-w", "5", "-c", "11"]);
        assert_eq!(args.check(&mut db).unwrap().state(), ServiceState::Critical);
    }

    #[test]
    fn test_connection_missing_status() {
        let mut db = FixtureDatabase::default();
        let args = ConnectionArgs::parse_from(["check-mysql connection"]);
        assert_matches!(args.check(&mut db), Err(MysqlError::MissingValue(_)));

        let mut db = FixtureDatabase {
            status: HashMap::from([("Threads_connected", "many")]),
            ..Default::default()
        };
        assert_matches!(args.check(&mut db), Err(MysqlError::InvalidValue { .. }));
    }

    #[test]
    fn test_uptime() {
        let mut db = FixtureDatabase {
            status: HashMap::from([("Uptime", "93784")]),
            ..Default::default()
        };

        let args = UptimeArgs::parse_from(["check-mysql uptime"]);
        assert_eq!(
            args.check(&mut db).unwrap().to_nagios_string(),
            "OK MySQL Uptime: up 1 days, 02:03:04"
        );

        let args = UptimeArgs::parse_from(["check-mysql uptime", "-w", "100000", "-c", "3600"]);
        assert_eq!(args.check(&mut db).unwrap().state(), ServiceState::Warning);

        let args = UptimeArgs::parse_from(["check-mysql uptime", "-w", "200000", "-c", "100000"]);
        assert_eq!(args.check(&mut db).unwrap().state(), ServiceState::Critical);
    }

    #[test]
    fn test_readonly() {
        let mut db = FixtureDatabase {
            variables: HashMap::from([("read_only", "ON")]),
            ..Default::default()
        };

        let args = ReadonlyArgs::parse_from(["check-mysql readonly", "on"]);
        assert_eq!(
            args.check(&mut db).unwrap().to_nagios_string(),
            "OK MySQL Readonly: readOnly:ON"
        );

        let args = ReadonlyArgs::parse_from(["check-mysql readonly", "OFF"]);
        assert_eq!(
            args.check(&mut db).unwrap().to_nagios_string(),
            "CRITICAL MySQL Readonly: the expected value of read_only is different. readOnly:ON"
        );

        assert!(ReadonlyArgs::try_parse_from(["check-mysql readonly"]).is_err());
        assert!(ReadonlyArgs::try_parse_from(["check-mysql readonly", "maybe"]).is_err());
    }

    #[test]
    fn test_replication_not_a_replica() {
        let mut db = FixtureDatabase {
            version: "5.7.44-log".to_owned(),
            ..Default::default()
        };
        let args = ReplicationArgs::parse_from(["check-mysql replication"]);

        assert_eq!(
            args.check(&mut db).unwrap().to_nagios_string(),
            "OK MySQL Replication: MySQL is not slave"
        );
        assert_eq!(db.statements, vec!["SHOW SLAVE STATUS"]);
    }

    #[test]
    fn test_replication_lag() {
        let mut db = FixtureDatabase {
            version: "8.0.34".to_owned(),
            replica: replica(&[
                ("Replica_IO_Running", Some("Yes")),
                ("Replica_SQL_Running", Some("Yes")),
                ("Seconds_Behind_Source", Some("220")),
            ]),
            ..Default::default()
        };
        let args = ReplicationArgs::parse_from(["check-mysql replication"]);

        assert_eq!(
            args.check(&mut db).unwrap().to_nagios_string(),
            "WARNING MySQL Replication: MySQL replication behind master 220 seconds"
        );
        assert_eq!(db.statements, vec!["SHOW REPLICA STATUS"]);

        let args = ReplicationArgs::parse_from(["check-mysql replication", "-c", "219"]);
        assert_eq!(args.check(&mut db).unwrap().state(), ServiceState::Critical);

        let args = ReplicationArgs::parse_from(["check-mysql replication", "-w", "220"]);
        assert_eq!(args.check(&mut db).unwrap().state(), ServiceState::Ok);
    }

    #[test]
    fn test_replication_stopped() {
        let mut db = FixtureDatabase {
            version: "5.7.44-log".to_owned(),
            replica: replica(&[
                ("Slave_IO_Running", Some("Connecting")),
                ("Slave_SQL_Running", Some("Yes")),
                ("Seconds_Behind_Master", None),
            ]),
            ..Default::default()
        };
        let args = ReplicationArgs::parse_from(["check-mysql replication"]);

        assert_eq!(
            args.check(&mut db).unwrap().to_nagios_string(),
            "CRITICAL MySQL Replication: MySQL replication stopped (IO thread: Connecting, SQL thread: Yes)"
        );
    }

    #[test]
    fn test_replication_unknown_lag() {
        let mut db = FixtureDatabase {
            version: "5.7.44-log".to_owned(),
            replica: replica(&[
                ("Slave_IO_Running", Some("Yes")),
                ("Slave_SQL_Running", Some("Yes")),
                ("Seconds_Behind_Master", None),
            ]),
            ..Default::default()
        };
        let args = ReplicationArgs::parse_from(["check-mysql replication"]);

        assert_matches!(args.check(&mut db), Err(MysqlError::MissingValue(_)));
    }

    #[test]
    fn test_replication_bad_version() {
        let mut db = FixtureDatabase {
            version: "abc.0.1".to_owned(),
            ..Default::default()
        };
        let args = ReplicationArgs::parse_from(["check-mysql replication"]);

        let resource = Runner::new(&Subcommand::Replication.plugin_name())
            .safe_run(|| args.check(&mut db))
            .into_resource();
        assert_eq!(resource.state(), ServiceState::Unknown);
        assert!(db.statements.is_empty());
    }

    #[test]
    fn test_unreachable_server_is_unknown() {
        let args = ConnectionArgs::parse_from(["check-mysql connection", "-w", "0", "-c", "0"]);
        let mut db = FixtureDatabase {
            unreachable: true,
            ..Default::default()
        };

        let resource = Runner::new(&Subcommand::Connection.plugin_name())
            .safe_run(|| args.check(&mut db))
            .into_resource();

        assert_eq!(resource.state(), ServiceState::Unknown);
        assert_eq!(
            resource.to_nagios_string(),
            "UNKNOWN MySQL Connection: Failed to connect to MySQL: Can't connect to MySQL server on '127.0.0.1' (111)"
        );
    }
}
