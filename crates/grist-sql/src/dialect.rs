mod mysql;
pub use mysql::Mysql;

mod postgresql;
pub use postgresql::Postgresql;

mod sqlite;
pub use sqlite::Sqlite;

use crate::Options;

use grist_core::{
    schema::{Field, Model, Type},
    stmt::Value,
};
use std::fmt::Debug;

/// The database-specific collaborator of the serializer.
///
/// The serializer decides the shape of every statement; the dialect only
/// escapes identifiers and values, spells column types, and answers
/// capability questions for the statement context described by [`Options`].
pub trait Dialect: Debug + Send + Sync {
    /// Name used in error messages, e.g. `PostgreSQL`.
    fn name(&self) -> &'static str;

    /// Describes what the database supports.
    fn capability(&self) -> &Capability;

    /// Quotes an identifier.
    fn escape_id(&self, id: &str) -> String;

    /// Renders a value as a SQL literal, coerced to the type of `field` when given.
    fn escape_value(&self, value: &Value, field: Option<&Field>) -> String;

    /// Spells the column type of `field`.
    fn column_type(&self, field: &Field) -> String;

    /// Is `ORDER BY` permitted in the statement context described by `opts`?
    fn order_support(&self, opts: &Options) -> OrderSupport;

    /// Is `LIMIT`/`OFFSET` permitted in the statement context described by `opts`?
    fn limit_support(&self, opts: &Options) -> bool;

    /// Text for a `LIMIT` that does not restrict the row count.
    fn unbounded_limit(&self) -> &'static str;

    /// Keyword following `PRIMARY KEY` for auto incrementing columns, if the
    /// type alone does not express it.
    fn auto_increment_clause(&self) -> Option<&'static str> {
        None
    }

    /// Normalizes a list compared with `IN`: coerces each entry to the type of
    /// `field`, drops entries that cannot be coerced, and removes duplicates.
    fn prepare_array_values(&self, values: &[Value], field: &Field) -> Vec<Value> {
        let mut ret: Vec<Value> = Vec::with_capacity(values.len());

        for value in values {
            let Some(value) = coerce(value, &field.ty) else {
                continue;
            };

            if !ret.contains(&value) {
                ret.push(value);
            }
        }

        ret
    }

    /// Formats the pattern of a `LIKE` comparison.
    fn like_value(&self, pattern: &str) -> String {
        pattern.to_string()
    }

    /// Appended to a rendered comparison, e.g. an `ESCAPE` or `COLLATE` clause.
    fn condition_postfix(&self, _field: &Field, _op: grist_core::stmt::Op) -> Option<String> {
        None
    }

    /// Allows ordering by `field` when the dialect otherwise requires ordered
    /// columns to be projected.
    fn allow_unprojected_order(&self, _field: &Field) -> bool {
        false
    }

    /// Appended to INSERT statements.
    fn insert_tail(&self, _model: &Model, _opts: &Options) -> Option<String> {
        None
    }

    /// Appended to UPDATE statements.
    fn update_tail(&self, _model: &Model, _opts: &Options) -> Option<String> {
        None
    }

    /// Stands in for a column an instance of a bulk insert did not set.
    fn missing_value_placeholder(&self) -> &'static str {
        "DEFAULT"
    }

    /// Name of the primary key constraint of `table`.
    fn primary_key_constraint(&self, table: &str) -> String {
        format!("{table}_pkey")
    }

    /// The `ALTER TABLE` action that removes the primary key of `table`.
    fn drop_primary_key(&self, table: &str) -> String {
        format!(
            "DROP CONSTRAINT {}",
            self.escape_id(&self.primary_key_constraint(table))
        )
    }
}

/// Answer of [`Dialect::order_support`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSupport {
    Yes,
    No,
    /// Only columns present in the projection may be ordered by.
    ProjectedOnly,
}

#[derive(Debug)]
pub struct Capability {
    /// Supports `RETURNING` on INSERT, UPDATE and DELETE.
    pub returning: bool,

    /// Supports altering a column's type, nullability, default and constraints.
    /// When false, only renames are supported.
    pub alter_column: bool,

    /// Nullability and type changes restate the column with
    /// `MODIFY COLUMN <definition>` instead of `ALTER COLUMN`.
    pub modify_column: bool,

    /// Supports `DISTINCT ON (...)`.
    pub distinct_on: bool,

    /// Supports `TRUNCATE TABLE`.
    pub truncate: bool,

    /// Supports `CREATE INDEX CONCURRENTLY`.
    pub concurrent_index: bool,

    /// `DROP INDEX` must name the table, e.g. `DROP INDEX idx ON tbl`.
    pub drop_index_on_table: bool,

    /// Supports `IF NOT EXISTS` on `CREATE INDEX`.
    pub create_index_if_not_exists: bool,

    /// Supports `FULL [OUTER] JOIN`.
    pub full_join: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Capability = Capability {
        returning: true,
        alter_column: false,
        modify_column: false,
        distinct_on: false,
        truncate: false,
        concurrent_index: false,
        drop_index_on_table: false,
        create_index_if_not_exists: true,
        full_join: true,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Capability = Capability {
        alter_column: true,
        distinct_on: true,
        truncate: true,
        concurrent_index: true,
        ..Capability::SQLITE
    };

    /// MySQL capabilities
    pub const MYSQL: Capability = Capability {
        returning: false,
        alter_column: true,
        modify_column: true,
        truncate: true,
        drop_index_on_table: true,
        create_index_if_not_exists: false,
        full_join: false,
        ..Capability::SQLITE
    };
}

impl OrderSupport {
    pub fn is_allowed(self) -> bool {
        !matches!(self, OrderSupport::No)
    }
}

/// Quotes `value` as a string literal, doubling embedded quotes.
pub(crate) fn quote_string(value: &str) -> String {
    let mut ret = String::with_capacity(value.len() + 2);
    ret.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            ret.push('\'');
        }
        ret.push(ch);
    }
    ret.push('\'');
    ret
}

/// Quotes an identifier with `quote`, doubling embedded quote characters.
pub(crate) fn quote_ident(id: &str, quote: char) -> String {
    let mut ret = String::with_capacity(id.len() + 2);
    ret.push(quote);
    for ch in id.chars() {
        if ch == quote {
            ret.push(quote);
        }
        ret.push(ch);
    }
    ret.push(quote);
    ret
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut ret = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing to a `String` cannot fail
        let _ = write!(ret, "{byte:02x}");
    }
    ret
}

/// Coerces `value` to a column of type `ty`. Returns `None` when the value
/// cannot represent a value of that type.
pub(crate) fn coerce(value: &Value, ty: &Type) -> Option<Value> {
    match (ty, value) {
        (_, Value::Null) => Some(Value::Null),
        (_, Value::List(_)) => None,
        (Type::Boolean, Value::Bool(_)) => Some(value.clone()),
        (Type::Boolean, Value::I64(0)) => Some(Value::Bool(false)),
        (Type::Boolean, Value::I64(1)) => Some(Value::Bool(true)),
        (Type::Boolean, Value::String(s)) => match s.as_str() {
            "true" | "TRUE" | "t" | "1" => Some(Value::Bool(true)),
            "false" | "FALSE" | "f" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        (Type::Boolean, _) => None,
        (Type::Integer(_), Value::I64(_)) => Some(value.clone()),
        (Type::Integer(_), Value::Bool(v)) => Some(Value::I64(i64::from(*v))),
        (Type::Integer(_), Value::F64(v)) if v.fract() == 0.0 => Some(Value::I64(*v as i64)),
        (Type::Integer(_), Value::String(s)) => s.trim().parse().ok().map(Value::I64),
        (Type::Integer(_), _) => None,
        (Type::Float(_) | Type::Numeric(..), Value::F64(_)) => Some(value.clone()),
        (Type::Float(_) | Type::Numeric(..), Value::I64(v)) => Some(Value::F64(*v as f64)),
        (Type::Float(_) | Type::Numeric(..), Value::String(s)) => {
            s.trim().parse().ok().map(Value::F64)
        }
        (Type::Float(_) | Type::Numeric(..), _) => None,
        (Type::Text | Type::VarChar(_), Value::String(_)) => Some(value.clone()),
        (Type::Text | Type::VarChar(_), Value::I64(v)) => Some(Value::String(v.to_string())),
        (Type::Text | Type::VarChar(_), Value::F64(v)) => Some(Value::String(v.to_string())),
        (Type::Text | Type::VarChar(_), Value::Bool(_) | Value::Bytes(_)) => None,
        (Type::Blob, Value::Bytes(_)) => Some(value.clone()),
        (Type::Blob, Value::String(s)) => Some(Value::Bytes(s.as_bytes().to_vec())),
        (Type::Blob, _) => None,
        _ => Some(value.clone()),
    }
}

/// Renders a scalar value shared by every dialect. Booleans, binary data and
/// lists are left to the caller.
pub(crate) fn escape_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("NULL".to_string()),
        Value::I64(v) => Some(v.to_string()),
        Value::F64(v) if v.is_finite() => Some(format!("{v:?}")),
        Value::F64(_) => Some("NULL".to_string()),
        Value::String(v) => Some(quote_string(v)),
        Value::Bool(_) | Value::Bytes(_) | Value::List(_) => None,
    }
}
