use crate::ast::Operator;
use crate::transpiler::escape_identifier;
use crate::transpiler::operators::OperatorTable;
use crate::transpiler::traits::SqlGenerator;

pub struct PostgresGenerator;

impl Default for PostgresGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PostgresGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SqlGenerator for PostgresGenerator {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, name: &str) -> String {
        escape_identifier(name)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val {
            "true".to_string()
        } else {
            "false".to_string()
        }
    }

    fn operators(&self) -> OperatorTable {
        OperatorTable::standard(self.name())
            .with(Operator::ILike, "ILIKE")
            .with(Operator::NotILike, "NOT ILIKE")
            .with(Operator::Regexp, "~")
            .with(Operator::NotRegexp, "!~")
            .with(Operator::IRegexp, "~*")
            .with(Operator::NotIRegexp, "!~*")
            .with(Operator::Overlap, "&&")
            .with(Operator::Contains, "@>")
            .with(Operator::Contained, "<@")
            .with(Operator::Adjacent, "-|-")
            .with(Operator::StrictLeft, "<<")
            .with(Operator::StrictRight, ">>")
            .with(Operator::NoExtendRight, "&<")
            .with(Operator::NoExtendLeft, "&>")
            .with(Operator::Match, "@@")
            .with(Operator::AnyKeyExists, "?|")
            .with(Operator::AllKeysExist, "?&")
    }

    fn array_literal(&self, items: &[String]) -> Option<String> {
        Some(format!("ARRAY[{}]", items.join(", ")))
    }
}
