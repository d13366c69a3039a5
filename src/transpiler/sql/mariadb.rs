use chrono::{DateTime, FixedOffset, Utc};

use crate::ast::Operator;
use crate::transpiler::operators::OperatorTable;
use crate::transpiler::sql::mysql::{backslash_quote, naive_date_literal};
use crate::transpiler::traits::SqlGenerator;

pub struct MariaDbGenerator;

impl SqlGenerator for MariaDbGenerator {
    fn name(&self) -> &'static str {
        "mariadb"
    }

    fn quote_identifier(&self, id: &str) -> String {
        format!("`{}`", id.replace('`', "``"))
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn operators(&self) -> OperatorTable {
        OperatorTable::standard(self.name())
            .with(Operator::Regexp, "REGEXP")
            .with(Operator::NotRegexp, "NOT REGEXP")
    }

    fn quote_string(&self, s: &str) -> String {
        backslash_quote(s)
    }

    fn date_literal(&self, date: &DateTime<Utc>, timezone: FixedOffset) -> String {
        naive_date_literal(date, timezone)
    }
}
