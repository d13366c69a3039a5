//! Compiler configuration (`whereql.toml`).
//!
//! ```toml
//! dialect = "mysql"
//! prefix = "u"
//! max_depth = 32
//! timezone = "+02:00"
//!
//! [operators]
//! ne = "<>"
//! like = ""        # empty token removes the operator
//!
//! [entities.users.fields.firstName]
//! column = "first_name"
//! type = "string"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

use crate::ast::{Entity, FieldMeta, Operator, ValueType};
use crate::error::{PredicateError, PredicateResult};
use crate::transpiler::{Dialect, DialectContext, OperatorTable, WhereCompiler};

const LOCAL_CONFIG: &str = "whereql.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dialect: Dialect,
    /// Default prefix for key references.
    pub prefix: Option<String>,
    pub max_depth: Option<usize>,
    /// Session offset for date literals, `+HH:MM` / `-HH:MM` / `UTC`.
    pub timezone: Option<String>,
    /// Operator key -> token overrides on top of the dialect's table.
    pub operators: BTreeMap<String, String>,
    pub entities: BTreeMap<String, EntityConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    pub fields: BTreeMap<String, FieldConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub column: Option<String>,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

impl Config {
    pub fn from_toml(content: &str) -> PredicateResult<Self> {
        toml::from_str(content).map_err(|e| PredicateError::Config(e.to_string()))
    }

    /// Load from `path`, or from the first config file found in the search
    /// paths. No file at all means defaults.
    pub fn load(path: Option<&Path>) -> PredicateResult<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(found) => Self::read(&found),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `./whereql.toml`, then `<config dir>/whereql/config.toml`.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("whereql").join("config.toml"));
        }
        paths
    }

    fn read(path: &Path) -> PredicateResult<Self> {
        tracing::debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn context(&self) -> PredicateResult<DialectContext> {
        let timezone = match &self.timezone {
            Some(tz) => parse_offset(tz)?,
            None => Utc.fix(),
        };
        Ok(DialectContext { timezone })
    }

    /// Declared fields of an entity, if the config has one by that name.
    pub fn entity(&self, name: &str) -> Option<Entity> {
        let declared = self.entities.get(name)?;
        let mut entity = Entity::new(name);
        for (field, meta) in &declared.fields {
            let mut field_meta = FieldMeta::new(field.as_str(), meta.value_type);
            if let Some(column) = &meta.column {
                field_meta = field_meta.with_column(column.as_str());
            }
            entity.insert(field_meta);
        }
        Some(entity)
    }

    /// The dialect's operator table with the configured overrides applied.
    pub fn operator_table(&self) -> PredicateResult<OperatorTable> {
        let mut table = self.dialect.operators();
        for (key, token) in &self.operators {
            let op: Operator = key.parse()?;
            if token.trim().is_empty() {
                table.remove(op);
            } else {
                table.set(op, token.trim());
            }
        }
        Ok(table)
    }

    pub fn compiler(&self) -> PredicateResult<WhereCompiler> {
        let table = self.operator_table()?;
        Ok(self
            .dialect
            .compiler()
            .with_tokens(Arc::new(table))
            .with_max_depth(self.max_depth.unwrap_or(WhereCompiler::DEFAULT_MAX_DEPTH)))
    }
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `UTC` / `Z`.
fn parse_offset(raw: &str) -> PredicateResult<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("utc") || raw == "Z" {
        return Ok(Utc.fix());
    }

    let invalid = || PredicateError::Config(format!("invalid timezone offset '{}'", raw));
    let (sign, rest) = match raw.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::WhereMap;
    use crate::transpiler::{CompileOptions, TokenTable};

    const SAMPLE: &str = r#"
dialect = "mysql"
prefix = "u"
max_depth = 8
timezone = "+05:30"

[operators]
ne = "<>"
like = ""

[entities.users.fields.firstName]
column = "first_name"
type = "string"

[entities.users.fields.age]
type = "integer"
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_toml(SAMPLE).unwrap();
        assert_eq!(config.dialect, Dialect::MySQL);
        assert_eq!(config.prefix.as_deref(), Some("u"));
        assert_eq!(config.max_depth, Some(8));
        assert_eq!(config.entities["users"].fields.len(), 2);
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.dialect, Dialect::Postgres);
        assert_eq!(config.context().unwrap(), DialectContext::default());
    }

    #[test]
    fn test_operator_overrides() {
        let table = Config::from_toml(SAMPLE).unwrap().operator_table().unwrap();
        assert_eq!(table.token_for(Operator::Ne), Some("<>"));
        assert_eq!(table.token_for(Operator::Like), None);
        assert_eq!(table.token_for(Operator::Regexp), Some("REGEXP"));
    }

    #[test]
    fn test_unknown_operator_override() {
        let config = Config::from_toml("[operators]\nnear = \"<->\"").unwrap();
        assert!(matches!(
            config.operator_table().unwrap_err(),
            PredicateError::UnknownOperator(_)
        ));
    }

    #[test]
    fn test_timezone_offsets() {
        assert_eq!(parse_offset("+05:30").unwrap().local_minus_utc(), 19800);
        assert_eq!(parse_offset("-0800").unwrap().local_minus_utc(), -28800);
        assert_eq!(parse_offset("UTC").unwrap().local_minus_utc(), 0);
        assert!(parse_offset("05:30").is_err());
        assert!(parse_offset("+5:3").is_err());
        assert!(parse_offset("+01:75").is_err());
    }

    #[test]
    fn test_entity_from_config() {
        let config = Config::from_toml(SAMPLE).unwrap();
        let users = config.entity("users").unwrap();
        assert_eq!(users.get("firstName").unwrap().column, "first_name");
        assert_eq!(users.get("age").unwrap().value_type, ValueType::Integer);
        assert!(config.entity("orders").is_none());
    }

    #[test]
    fn test_compiler_honours_config() {
        let config = Config::from_toml(SAMPLE).unwrap();
        let compiler = config.compiler().unwrap();
        assert_eq!(compiler.max_depth(), 8);

        let users = config.entity("users").unwrap();
        let opts = CompileOptions::new()
            .with_entity(&users)
            .with_prefix(config.prefix.as_deref().unwrap_or_default());
        let map = WhereMap::new().field("firstName", WhereMap::new().op(Operator::Ne, "Ann"));
        assert_eq!(
            compiler.compile_attribute_map(&map, &opts).unwrap(),
            "`u`.`first_name` <> 'Ann'"
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let path = std::env::temp_dir().join(format!("whereql-{}.toml", std::process::id()));
        fs::write(&path, "dialect = \"sqlite\"").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.dialect, Dialect::SQLite);

        let missing = Config::load(Some(Path::new("/nonexistent/whereql.toml")));
        assert!(matches!(missing.unwrap_err(), PredicateError::Io(_)));
    }
}
