use chrono::{DateTime, FixedOffset, Utc};

use crate::ast::Operator;
use crate::transpiler::operators::OperatorTable;
use crate::transpiler::traits::SqlGenerator;

/// MySQL Generator.
pub struct MysqlGenerator;

impl Default for MysqlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MysqlGenerator {
    pub fn new() -> Self {
        Self
    }
}

/// Backslash-escape a string the way MySQL-family servers expect.
pub(crate) fn backslash_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// DATETIME literal; MySQL has no offset syntax in plain literals.
pub(crate) fn naive_date_literal(date: &DateTime<Utc>, timezone: FixedOffset) -> String {
    format!(
        "'{}'",
        date.with_timezone(&timezone).format("%Y-%m-%d %H:%M:%S%.3f")
    )
}

impl SqlGenerator for MysqlGenerator {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
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
