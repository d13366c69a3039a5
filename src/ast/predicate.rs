use crate::ast::{FieldMeta, Operator, Value};

/// A pre-built SQL expression, passed through the escape service verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Function call, e.g. `lower(name)`
    Function { name: String, args: Vec<Condition> },
    /// Column reference, optionally `table.column`
    Column(String),
    /// Verbatim SQL
    Literal(String),
}

/// Left-hand side of an explicit instance triple.
#[derive(Debug, Clone, PartialEq)]
pub enum LeftOperand {
    /// Raw field name
    Field(String),
    /// Function call, column reference or literal
    Fragment(Fragment),
    /// Resolved field metadata
    Meta(FieldMeta),
}

impl From<&str> for LeftOperand {
    fn from(name: &str) -> Self {
        LeftOperand::Field(name.to_string())
    }
}

impl From<String> for LeftOperand {
    fn from(name: String) -> Self {
        LeftOperand::Field(name)
    }
}

impl From<Fragment> for LeftOperand {
    fn from(f: Fragment) -> Self {
        LeftOperand::Fragment(f)
    }
}

impl From<FieldMeta> for LeftOperand {
    fn from(meta: FieldMeta) -> Self {
        LeftOperand::Meta(meta)
    }
}

/// Key of a [`WhereMap`] entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// Operator-typed key: a nested condition against the current left operand
    Op(Operator),
    /// Plain field name
    Field(String),
}

/// Right-hand side of a map entry or instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Scalar literal, including NULL
    Value(Value),
    /// Ordered sequence, interpreted by the active operator
    List(Vec<Condition>),
    /// Nested map: operator form (`{gt: 5}`) or a nested predicate
    Map(WhereMap),
    /// Explicit triple
    Instance(Box<Instance>),
    /// Pre-built fragment
    Raw(Fragment),
}

impl Condition {
    pub fn is_null(&self) -> bool {
        matches!(self, Condition::Value(Value::Null))
    }

    /// Short shape name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Condition::Value(v) => v.kind(),
            Condition::List(_) => "list",
            Condition::Map(_) => "map",
            Condition::Instance(_) => "instance",
            Condition::Raw(_) => "fragment",
        }
    }
}

macro_rules! condition_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Condition {
                fn from(v: $ty) -> Self {
                    Condition::Value(v.into())
                }
            }
        )*
    };
}

condition_from_value!(Value, bool, i32, i64, f64, &str, String, chrono::DateTime<chrono::Utc>);

impl From<Fragment> for Condition {
    fn from(f: Fragment) -> Self {
        Condition::Raw(f)
    }
}

impl From<WhereMap> for Condition {
    fn from(m: WhereMap) -> Self {
        Condition::Map(m)
    }
}

impl From<Instance> for Condition {
    fn from(i: Instance) -> Self {
        Condition::Instance(Box::new(i))
    }
}

impl From<Vec<Condition>> for Condition {
    fn from(items: Vec<Condition>) -> Self {
        Condition::List(items)
    }
}

/// Ordered map of keys to conditions. Output follows insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereMap {
    entries: Vec<(Key, Condition)>,
}

impl WhereMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field entry (builder style).
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Condition>) -> Self {
        self.entries.push((Key::Field(name.into()), value.into()));
        self
    }

    /// Add an operator entry (builder style).
    pub fn op(mut self, op: Operator, value: impl Into<Condition>) -> Self {
        self.entries.push((Key::Op(op), value.into()));
        self
    }

    pub fn push(&mut self, key: Key, value: Condition) {
        self.entries.push((key, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Key, Condition)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Key, Condition)> for WhereMap {
    fn from_iter<I: IntoIterator<Item = (Key, Condition)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Explicit `(left, operator, right)` triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub left: LeftOperand,
    pub op: Operator,
    pub right: Condition,
}

impl Instance {
    pub fn new(left: LeftOperand, op: Operator, right: impl Into<Condition>) -> Self {
        Self {
            left,
            op,
            right: right.into(),
        }
    }
}

/// A predicate, as accepted by the compiler entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field name / operator map
    Attributes(WhereMap),
    /// Explicit triple
    Instance(Instance),
    /// Pre-built fragment
    Raw(Fragment),
}

impl From<WhereMap> for Predicate {
    fn from(m: WhereMap) -> Self {
        Predicate::Attributes(m)
    }
}

impl From<Instance> for Predicate {
    fn from(i: Instance) -> Self {
        Predicate::Instance(i)
    }
}

impl From<Fragment> for Predicate {
    fn from(f: Fragment) -> Self {
        Predicate::Raw(f)
    }
}
