use chrono::{DateTime, FixedOffset, Utc};

use crate::ast::Operator;
use crate::transpiler::operators::OperatorTable;
use crate::transpiler::sql::mysql::naive_date_literal;
use crate::transpiler::traits::SqlGenerator;

pub struct SnowflakeGenerator;

impl SqlGenerator for SnowflakeGenerator {
    fn name(&self) -> &'static str {
        "snowflake"
    }

    fn quote_identifier(&self, id: &str) -> String {
        format!("\"{}\"", id.replace('"', "\"\""))
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "true".to_string() } else { "false".to_string() }
    }

    fn operators(&self) -> OperatorTable {
        OperatorTable::standard(self.name())
            .with(Operator::ILike, "ILIKE")
            .with(Operator::NotILike, "NOT ILIKE")
            .with(Operator::Regexp, "REGEXP")
            .with(Operator::NotRegexp, "NOT REGEXP")
    }

    fn date_literal(&self, date: &DateTime<Utc>, timezone: FixedOffset) -> String {
        naive_date_literal(date, timezone)
    }
}
