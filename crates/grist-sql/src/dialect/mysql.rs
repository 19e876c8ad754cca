use super::{coerce, escape_scalar, hex, quote_ident, Capability, Dialect, OrderSupport};
use crate::{options::StatementKind, Options};

use grist_core::{
    schema::{Field, Type},
    stmt::Value,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Mysql;

impl Dialect for Mysql {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn capability(&self) -> &Capability {
        &Capability::MYSQL
    }

    fn escape_id(&self, id: &str) -> String {
        quote_ident(id, '`')
    }

    fn escape_value(&self, value: &Value, field: Option<&Field>) -> String {
        let coerced = field.and_then(|field| coerce(value, &field.ty));
        let value = coerced.as_ref().unwrap_or(value);

        match value {
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            // Backslash is an escape character in MySQL string literals
            Value::String(s) => super::quote_string(&s.replace('\\', "\\\\")),
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
        match &field.ty {
            Type::Boolean => "BOOLEAN".into(),
            Type::Integer(1) => "TINYINT".into(),
            Type::Integer(2) => "SMALLINT".into(),
            Type::Integer(3 | 4) => "INT".into(),
            Type::Integer(_) => "BIGINT".into(),
            Type::Float(size) if *size <= 4 => "FLOAT".into(),
            Type::Float(_) => "DOUBLE".into(),
            Type::Numeric(precision, scale) => format!("DECIMAL({precision}, {scale})"),
            Type::Text => "TEXT".into(),
            Type::VarChar(size) => format!("VARCHAR({size})"),
            Type::Blob => "BLOB".into(),
            Type::Uuid => "CHAR(36)".into(),
            Type::Date => "DATE".into(),
            Type::Time => "TIME".into(),
            Type::DateTime => "DATETIME".into(),
            Type::Json => "JSON".into(),
            Type::Custom(ty) => ty.clone(),
        }
    }

    fn order_support(&self, opts: &Options) -> OrderSupport {
        match opts.statement() {
            // Single-table UPDATE and DELETE accept ORDER BY and LIMIT
            StatementKind::Select | StatementKind::Update | StatementKind::Delete => {
                OrderSupport::Yes
            }
            _ => OrderSupport::No,
        }
    }

    fn limit_support(&self, opts: &Options) -> bool {
        matches!(
            opts.statement(),
            StatementKind::Select | StatementKind::Update | StatementKind::Delete
        )
    }

    fn unbounded_limit(&self) -> &'static str {
        "18446744073709551615"
    }

    fn auto_increment_clause(&self) -> Option<&'static str> {
        Some("AUTO_INCREMENT")
    }

    fn drop_primary_key(&self, _table: &str) -> String {
        "DROP PRIMARY KEY".to_string()
    }
}
