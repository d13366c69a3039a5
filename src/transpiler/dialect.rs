use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::PredicateError;
use crate::transpiler::compiler::WhereCompiler;
use crate::transpiler::operators::OperatorTable;
use crate::transpiler::resolver::EntityResolver;
use crate::transpiler::sql::mariadb::MariaDbGenerator;
use crate::transpiler::sql::mysql::MysqlGenerator;
use crate::transpiler::sql::postgres::PostgresGenerator;
use crate::transpiler::sql::snowflake::SnowflakeGenerator;
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::sql::sqlserver::SqlServerGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    MySQL,
    MariaDB,
    SQLite,
    SqlServer,
    Snowflake,
}

impl Dialect {
    pub const ALL: &'static [Dialect] = &[
        Dialect::Postgres,
        Dialect::MySQL,
        Dialect::MariaDB,
        Dialect::SQLite,
        Dialect::SqlServer,
        Dialect::Snowflake,
    ];

    pub fn generator(&self) -> Box<dyn SqlGenerator> {
        match self {
            Dialect::Postgres => Box::new(PostgresGenerator),
            Dialect::MySQL => Box::new(MysqlGenerator),
            Dialect::MariaDB => Box::new(MariaDbGenerator),
            Dialect::SQLite => Box::new(SqliteGenerator),
            Dialect::SqlServer => Box::new(SqlServerGenerator),
            Dialect::Snowflake => Box::new(SnowflakeGenerator),
        }
    }

    /// A compiler wired to this dialect's escaper, joiner and token table.
    pub fn compiler(&self) -> WhereCompiler {
        match self {
            Dialect::Postgres => assemble(PostgresGenerator),
            Dialect::MySQL => assemble(MysqlGenerator),
            Dialect::MariaDB => assemble(MariaDbGenerator),
            Dialect::SQLite => assemble(SqliteGenerator),
            Dialect::SqlServer => assemble(SqlServerGenerator),
            Dialect::Snowflake => assemble(SnowflakeGenerator),
        }
    }

    /// Default operator tokens for this dialect.
    pub fn operators(&self) -> OperatorTable {
        self.generator().operators()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySQL => "mysql",
            Dialect::MariaDB => "mariadb",
            Dialect::SQLite => "sqlite",
            Dialect::SqlServer => "sqlserver",
            Dialect::Snowflake => "snowflake",
        }
    }
}

fn assemble<G: SqlGenerator + 'static>(generator: G) -> WhereCompiler {
    let generator = Arc::new(generator);
    let tokens = Arc::new(generator.operators());
    WhereCompiler::new(generator.clone(), tokens, Arc::new(EntityResolver), generator)
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Dialect {
    type Err = PredicateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySQL),
            "mariadb" => Ok(Dialect::MariaDB),
            "sqlite" => Ok(Dialect::SQLite),
            "sqlserver" | "mssql" => Ok(Dialect::SqlServer),
            "snowflake" => Ok(Dialect::Snowflake),
            other => Err(PredicateError::Config(format!("unknown dialect '{}'", other))),
        }
    }
}
