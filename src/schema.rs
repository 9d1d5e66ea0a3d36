use crate::{ColseqError, Result, Value};
use indexmap::IndexMap;
use std::sync::Arc;

/// Declared column value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Binary,
}

impl ValueType {
    /// Get the logical type name for display
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueType::Boolean => "Boolean",
            ValueType::Int8 => "Int8",
            ValueType::Int16 => "Int16",
            ValueType::Int32 => "Int32",
            ValueType::Int64 => "Int64",
            ValueType::Float32 => "Float32",
            ValueType::Float64 => "Float64",
            ValueType::String => "String",
            ValueType::Binary => "Binary",
        }
    }
}

/// A single column declaration: value type plus nullability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDecl {
    pub value_type: ValueType,
    pub nullable: bool,
}

impl ColumnDecl {
    /// Whether `value` may be stored in a column of this declaration
    ///
    /// Null is accepted only by nullable columns; otherwise the runtime
    /// kind must match the declared type exactly (no implicit widening).
    pub fn accepts(&self, value: &Value) -> bool {
        match value.kind() {
            None => self.nullable,
            Some(kind) => kind == self.value_type,
        }
    }
}

/// Ordered mapping from column name to declaration
///
/// Immutable once built; writer sessions hold it for the life of the
/// session and validate every row against it.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: IndexMap<Arc<str>, ColumnDecl>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &Arc<str>> {
        self.columns.keys()
    }

    pub fn get(&self, name: &str) -> Option<&ColumnDecl> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Iterate declarations in order
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &ColumnDecl)> {
        self.columns.iter()
    }
}

/// Builder for creating schemas
///
/// Duplicate declarations are rejected at `build`.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    columns: Vec<(Arc<str>, ColumnDecl)>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a non-nullable column
    pub fn column<S: Into<Arc<str>>>(mut self, name: S, value_type: ValueType) -> Self {
        self.columns.push((
            name.into(),
            ColumnDecl {
                value_type,
                nullable: false,
            },
        ));
        self
    }

    /// Declare a nullable column
    pub fn nullable_column<S: Into<Arc<str>>>(mut self, name: S, value_type: ValueType) -> Self {
        self.columns.push((
            name.into(),
            ColumnDecl {
                value_type,
                nullable: true,
            },
        ));
        self
    }

    pub fn build(self) -> Result<Schema> {
        let mut columns = IndexMap::with_capacity(self.columns.len());
        for (name, decl) in self.columns {
            if columns.insert(name.clone(), decl).is_some() {
                return Err(ColseqError::schema(format!(
                    "duplicate column declaration `{}`",
                    name
                )));
            }
        }
        Ok(Schema { columns })
    }
}
