use super::{coerce, escape_scalar, hex, quote_ident, Capability, Dialect, OrderSupport};
use crate::{options::StatementKind, Options};

use grist_core::{
    schema::{Field, Type},
    stmt::Value,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn capability(&self) -> &Capability {
        &Capability::SQLITE
    }

    fn escape_id(&self, id: &str) -> String {
        quote_ident(id, '"')
    }

    fn escape_value(&self, value: &Value, field: Option<&Field>) -> String {
        let coerced = field.and_then(|field| coerce(value, &field.ty));
        let value = coerced.as_ref().unwrap_or(value);

        match value {
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => "0".to_string(),
            Value::Bytes(bytes) => format!("X'{}'", hex(bytes)),
            Value::List(values) => {
                let values: Vec<_> = values
                    .iter()
                    .map(|value| self.escape_value(value, field))
                    .collect();
                format!("({})", values.join(","))
            }
            _ => escape_scalar(value).unwrap_or_default(),
        }
    }

    fn column_type(&self, field: &Field) -> String {
        // Affinity is all SQLite uses from a declared type. `INTEGER` is also
        // required for `AUTOINCREMENT` columns.
        match &field.ty {
            Type::Boolean => "BOOLEAN".into(),
            Type::Integer(_) => "INTEGER".into(),
            Type::Float(_) => "REAL".into(),
            Type::Numeric(..) => "NUMERIC".into(),
            Type::Text | Type::Uuid | Type::Json => "TEXT".into(),
            Type::VarChar(size) => format!("VARCHAR({size})"),
            Type::Blob => "BLOB".into(),
            Type::Date => "DATE".into(),
            Type::Time => "TIME".into(),
            Type::DateTime => "DATETIME".into(),
            Type::Custom(ty) => ty.clone(),
        }
    }

    fn order_support(&self, opts: &Options) -> OrderSupport {
        match opts.statement() {
            StatementKind::Select => OrderSupport::Yes,
            _ => OrderSupport::No,
        }
    }

    fn limit_support(&self, opts: &Options) -> bool {
        opts.statement() == StatementKind::Select
    }

    fn unbounded_limit(&self) -> &'static str {
        "-1"
    }

    fn auto_increment_clause(&self) -> Option<&'static str> {
        Some("AUTOINCREMENT")
    }

    fn missing_value_placeholder(&self) -> &'static str {
        // SQLite has no `DEFAULT` keyword in a VALUES list
        "NULL"
    }
}
