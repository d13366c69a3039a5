//! Field metadata: what the compiler knows about a logical attribute.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Declared type of a field, used for escaping decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Unknown,
    String,
    Integer,
    Float,
    Boolean,
    Date,
    Json,
    Array,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Unknown => write!(f, "unknown"),
            ValueType::String => write!(f, "string"),
            ValueType::Integer => write!(f, "integer"),
            ValueType::Float => write!(f, "float"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::Date => write!(f, "date"),
            ValueType::Json => write!(f, "json"),
            ValueType::Array => write!(f, "array"),
        }
    }
}

/// A resolved field: logical name, canonical column and value type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name: String,
    pub column: String,
    #[serde(default)]
    pub value_type: ValueType,
}

impl FieldMeta {
    /// A field whose column is its name.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        let name = name.into();
        Self {
            column: name.clone(),
            name,
            value_type,
        }
    }

    /// Metadata for a field nothing is known about.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Unknown)
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }
}

/// The owning entity of a predicate: a table and its declared fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    fields: HashMap<String, FieldMeta>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: HashMap::new(),
        }
    }

    /// Add a field (builder style).
    pub fn field(mut self, meta: FieldMeta) -> Self {
        self.fields.insert(meta.name.clone(), meta);
        self
    }

    pub fn insert(&mut self, meta: FieldMeta) {
        self.fields.insert(meta.name.clone(), meta);
    }

    pub fn get(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.get(name)
    }

    /// Look up by logical name first, then by column name.
    pub fn lookup(&self, name: &str) -> Option<&FieldMeta> {
        self.get(name)
            .or_else(|| self.fields.values().find(|f| f.column == name))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_lookup_by_name_or_column() {
        let users = Entity::new("users")
            .field(FieldMeta::new("createdAt", ValueType::Date).with_column("created_at"));

        assert_eq!(users.lookup("createdAt").map(|f| f.column.as_str()), Some("created_at"));
        assert_eq!(users.lookup("created_at").map(|f| f.name.as_str()), Some("createdAt"));
        assert!(users.lookup("missing").is_none());
    }

    #[test]
    fn test_value_type_names() {
        let t: ValueType = serde_json::from_str("\"integer\"").unwrap();
        assert_eq!(t, ValueType::Integer);
        assert_eq!(ValueType::Boolean.to_string(), "boolean");
    }
}
