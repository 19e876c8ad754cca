use super::{coerce, escape_scalar, hex, quote_ident, Capability, Dialect, OrderSupport};
use crate::{options::StatementKind, Options};

use grist_core::{
    schema::{Field, Type},
    stmt::Value,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Postgresql;

impl Dialect for Postgresql {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn capability(&self) -> &Capability {
        &Capability::POSTGRESQL
    }

    fn escape_id(&self, id: &str) -> String {
        quote_ident(id, '"')
    }

    fn escape_value(&self, value: &Value, field: Option<&Field>) -> String {
        let coerced = field.and_then(|field| coerce(value, &field.ty));
        let value = coerced.as_ref().unwrap_or(value);

        match value {
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Bytes(bytes) => format!("'\\x{}'", hex(bytes)),
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
            Type::Integer(size) if field.auto_increment => match size {
                1 | 2 => "SMALLSERIAL".into(),
                3 | 4 => "SERIAL".into(),
                _ => "BIGSERIAL".into(),
            },
            Type::Integer(size) => match size {
                1 | 2 => "SMALLINT".into(),
                3 | 4 => "INTEGER".into(),
                _ => "BIGINT".into(),
            },
            Type::Float(size) if *size <= 4 => "REAL".into(),
            Type::Float(_) => "DOUBLE PRECISION".into(),
            Type::Numeric(precision, scale) => format!("NUMERIC({precision}, {scale})"),
            Type::Text => "TEXT".into(),
            Type::VarChar(size) => format!("VARCHAR({size})"),
            Type::Blob => "BYTEA".into(),
            Type::Uuid => "UUID".into(),
            Type::Date => "DATE".into(),
            Type::Time => "TIME".into(),
            Type::DateTime => "TIMESTAMP WITH TIME ZONE".into(),
            Type::Json => "JSONB".into(),
            Type::Custom(ty) => ty.clone(),
        }
    }

    fn order_support(&self, opts: &Options) -> OrderSupport {
        match opts.statement() {
            StatementKind::Select if opts.distinct() => OrderSupport::ProjectedOnly,
            StatementKind::Select => OrderSupport::Yes,
            _ => OrderSupport::No,
        }
    }

    fn limit_support(&self, opts: &Options) -> bool {
        opts.statement() == StatementKind::Select
    }

    fn unbounded_limit(&self) -> &'static str {
        "ALL"
    }
}
