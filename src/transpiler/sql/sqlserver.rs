use crate::ast::Operator;
use crate::transpiler::operators::OperatorTable;
use crate::transpiler::traits::SqlGenerator;

pub struct SqlServerGenerator;

impl SqlGenerator for SqlServerGenerator {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn quote_identifier(&self, id: &str) -> String {
        format!("[{}]", id.replace(']', "]]"))
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn operators(&self) -> OperatorTable {
        OperatorTable::standard(self.name()).with(Operator::Ne, "<>")
    }

    fn quote_string(&self, s: &str) -> String {
        // NVARCHAR literal
        format!("N'{}'", s.replace('\'', "''"))
    }
}
