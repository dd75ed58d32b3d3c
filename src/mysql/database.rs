use std::collections::HashMap;

use ::mysql::prelude::Queryable;
use ::mysql::{Conn, OptsBuilder, Row, Value};
use tracing::debug;

use super::{MysqlError, MysqlSetting};

/// One row of `SHOW REPLICA STATUS` / `SHOW SLAVE STATUS`, by column name. NULL is `None`.
pub type ReplicaStatus = HashMap<String, Option<String>>;

/// The queries the MySQL checks need.
pub trait Database {
    /// `SELECT VERSION()`
    fn version(&mut self) -> Result<String, MysqlError>;
    /// The value of a `SHOW GLOBAL STATUS` variable.
    fn global_status(&mut self, name: &str) -> Result<Option<String>, MysqlError>;
    /// The value of a `SHOW GLOBAL VARIABLES` variable.
    fn global_variable(&mut self, name: &str) -> Result<Option<String>, MysqlError>;
    /// The first row returned by `statement`, a replica status query.
    fn replica_status(&mut self, statement: &str) -> Result<Option<ReplicaStatus>, MysqlError>;
}

/// A live server connection.
pub struct MysqlConnection {
    conn: Conn,
}

impl MysqlConnection {
    pub fn connect(setting: &MysqlSetting) -> Result<Self, MysqlError> {
        let conn = Conn::new(opts(setting)).map_err(|err| MysqlError::Connect(err.to_string()))?;
        Ok(Self { conn })
    }

    fn show_value(&mut self, query: String) -> Result<Option<String>, MysqlError> {
        debug!(%query, "querying");
        let row: Option<(String, String)> = self
            .conn
            .query_first(&query)
            .map_err(|err| MysqlError::Query {
                query: query.clone(),
                message: err.to_string(),
            })?;

        Ok(row.map(|(_, value)| value))
    }
}

impl Database for MysqlConnection {
    fn version(&mut self) -> Result<String, MysqlError> {
        let query = "SELECT VERSION()";
        self.conn
            .query_first::<String, _>(query)
            .map_err(|err| MysqlError::Query {
                query: query.to_owned(),
                message: err.to_string(),
            })?
            .ok_or_else(|| MysqlError::NoRows(query.to_owned()))
    }

    fn global_status(&mut self, name: &str) -> Result<Option<String>, MysqlError> {
        self.show_value(format!("SHOW GLOBAL STATUS LIKE '{name}'"))
    }

    fn global_variable(&mut self, name: &str) -> Result<Option<String>, MysqlError> {
        self.show_value(format!("SHOW GLOBAL VARIABLES LIKE '{name}'"))
    }

    fn replica_status(&mut self, statement: &str) -> Result<Option<ReplicaStatus>, MysqlError> {
        debug!(%statement, "querying");
        let row: Option<Row> = self
            .conn
            .query_first(statement)
            .map_err(|err| MysqlError::Query {
                query: statement.to_owned(),
                message: err.to_string(),
            })?;

        Ok(row.map(|row| row_to_status(&row)))
    }
}

/// Connects over the unix socket when one is given, TCP otherwise. An empty socket path counts
/// as none.
fn opts(setting: &MysqlSetting) -> OptsBuilder {
    let builder = OptsBuilder::new()
        .user(Some(&setting.user))
        .pass(Some(&setting.password).filter(|p| !p.is_empty()));

    match setting.socket.as_deref().filter(|s| !s.is_empty()) {
        Some(socket) => {
            debug!(%socket, "connecting over unix socket");
            builder.socket(Some(socket))
        }
        None => {
            debug!(host = %setting.host, port = setting.port, "connecting over tcp");
            builder
                .ip_or_hostname(Some(&setting.host))
                .tcp_port(setting.port)
                .prefer_socket(false)
        }
    }
}

fn row_to_status(row: &Row) -> ReplicaStatus {
    row.columns_ref()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let value = match row.as_ref(i) {
                None | Some(Value::NULL) => None,
                Some(Value::Bytes(bytes)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                Some(other) => Some(other.as_sql(true)),
            };
            (column.name_str().into_owned(), value)
        })
        .collect()
}
