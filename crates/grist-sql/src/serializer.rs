// Fragment serializers
mod condition;
mod join;
mod literal;
mod order;
mod projection;
pub use projection::ProjectionMap;

// Statement serializers
mod alter;
mod create_table;
mod delete;
mod index;
mod insert;
mod select;
pub use select::SelectQuery;
mod table;
mod update;

use crate::{dialect::Dialect, Config, Options};

use grist_core::{
    schema::{Field, FieldRef, Model, Schema},
    stmt::{Op, Value},
    Error, Result,
};

/// Generates SQL text from query representations and model metadata.
///
/// A serializer holds no state between calls. Every `generate_*` function is
/// a pure function of its arguments, the schema and the dialect.
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Models the statements are generated against
    schema: &'a Schema,

    /// Handles the differences between SQL dialects and supported features.
    dialect: &'a dyn Dialect,

    config: Config,
}

/// The models a SELECT can reference: the root model followed by the joined
/// models in join order.
#[derive(Debug)]
struct Scope<'a> {
    models: Vec<&'a Model>,
}

impl<'a> Serializer<'a> {
    pub fn new(schema: &'a Schema, dialect: &'a dyn Dialect) -> Serializer<'a> {
        Serializer {
            schema,
            dialect,
            config: Config::default(),
        }
    }

    pub fn postgresql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, &crate::dialect::Postgresql)
    }

    pub fn sqlite(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, &crate::dialect::Sqlite)
    }

    pub fn mysql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, &crate::dialect::Mysql)
    }

    pub fn with_config(mut self, config: Config) -> Serializer<'a> {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect
    }

    fn table(&self, model: &Model) -> String {
        self.dialect.escape_id(&model.table_name)
    }

    /// `"table"."column"`
    fn column(&self, model: &Model, field: &Field) -> String {
        format!(
            "{}.{}",
            self.table(model),
            self.dialect.escape_id(&field.column_name)
        )
    }

    /// `table.column`, without quoting either name.
    fn raw_column(&self, model: &Model, field: &Field) -> String {
        format!("{}.{}", model.table_name, field.column_name)
    }

    /// Resolves a field reference and renders its qualified column.
    fn column_ref(&self, field: &FieldRef, escape: bool) -> Result<String> {
        let model = self.schema.model(&field.model)?;
        let field = model.field_by_name(&field.field)?;

        Ok(if escape {
            self.column(model, field)
        } else {
            self.raw_column(model, field)
        })
    }

    fn escape_value(&self, value: &Value, field: Option<&Field>) -> String {
        self.dialect.escape_value(value, field)
    }

    /// ` RETURNING ...` for the fields named by `opts`, or an empty string.
    fn returning(&self, model: &Model, opts: &Options) -> Result<String> {
        let Some(fields) = opts.returning() else {
            return Ok(String::new());
        };

        if !self.dialect.capability().returning {
            return Err(Error::unsupported_feature(format!(
                "RETURNING is not supported by {}",
                self.dialect.name()
            )));
        }

        let columns = fields
            .iter()
            .map(|name| {
                let field = model.field_by_name(name)?;
                Ok(self.dialect.escape_id(&field.column_name))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(format!(" RETURNING {}", columns.join(", ")))
    }
}

impl<'a> Scope<'a> {
    fn contains(&self, model: &str) -> bool {
        self.models.iter().any(|m| m.name == model)
    }

    fn root(&self) -> &'a Model {
        self.models[0]
    }
}

/// The SQL spelling of a comparison operator against a single value.
fn op_sql(op: Op) -> &'static str {
    match op {
        Op::Eq => "=",
        Op::Neq => "!=",
        Op::Gt => ">",
        Op::Gte => ">=",
        Op::Lt => "<",
        Op::Lte => "<=",
        Op::Like => "LIKE",
        Op::NotLike => "NOT LIKE",
        Op::Exists => "EXISTS",
        Op::NotExists => "NOT EXISTS",
    }
}
