use super::Serializer;
use crate::{options::StatementKind, Options};

use grist_core::{
    schema::{DefaultEvent, DefaultValue, Field, FieldIndex},
    Result,
};

impl Serializer<'_> {
    /// Generates `CREATE TABLE` for `model`, foreign keys included.
    pub fn generate_create_table_statement(&self, model: &str, opts: &Options) -> Result<String> {
        let model = self.schema.model(model)?;
        let opts = opts.derive(|o| o.statement = Some(StatementKind::Ddl));

        // A composite primary key is declared once, after the columns
        let primary_keys: Vec<&Field> = model.primary_keys().filter(|f| !f.is_virtual).collect();
        let inline_pk = primary_keys.len() == 1;

        let mut definitions = vec![];

        for field in model.stored_fields() {
            definitions.push(self.column_definition(field, inline_pk, &opts)?);
        }

        if !inline_pk && !primary_keys.is_empty() {
            let columns: Vec<_> = primary_keys
                .iter()
                .map(|field| self.dialect.escape_id(&field.column_name))
                .collect();
            definitions.push(format!("PRIMARY KEY ({})", columns.join(", ")));
        }

        for field in model.stored_fields() {
            if let Some(constraint) = self.foreign_key_constraint(field)? {
                definitions.push(constraint);
            }
        }

        let body = if opts.newlines() {
            format!("(\n  {}\n)", definitions.join(",\n  "))
        } else {
            format!("( {} )", definitions.join(", "))
        };

        let sql = format!(
            "CREATE TABLE {}{} {body}",
            if opts.if_not_exists() {
                "IF NOT EXISTS "
            } else {
                ""
            },
            self.table(model),
        );

        tracing::debug!(
            target: "grist.sql",
            statement = "CREATE TABLE",
            model = %model.name,
            sql = %sql,
            "generated statement"
        );

        Ok(sql)
    }

    /// Generates `CREATE TABLE` for `model` followed by a `CREATE INDEX` for
    /// every index declared on a column that is not a foreign key.
    pub fn generate_create_table_statements(
        &self,
        model: &str,
        opts: &Options,
    ) -> Result<Vec<String>> {
        let mut statements = vec![self.generate_create_table_statement(model, opts)?];
        let model = self.schema.model(model)?;

        let mut seen = vec![];

        for field in model.stored_fields() {
            if field.is_foreign_key() {
                continue;
            }

            for index in &field.indices {
                let fields = index_fields(field, index);

                let name = self.index_name(model, &fields)?;
                if seen.contains(&name) {
                    continue;
                }
                seen.push(name);

                statements.push(self.generate_create_index_statement(&model.name, &fields, opts)?);
            }
        }

        Ok(statements)
    }

    /// `"name" TYPE [PRIMARY KEY] [UNIQUE] [NOT NULL] [DEFAULT ...]`
    pub(super) fn column_definition(
        &self,
        field: &Field,
        inline_pk: bool,
        opts: &Options,
    ) -> Result<String> {
        let mut sql = format!(
            "{} {}",
            self.dialect.escape_id(&field.column_name),
            self.dialect.column_type(field)
        );

        if field.primary_key && inline_pk {
            sql.push_str(" PRIMARY KEY");

            if field.auto_increment {
                if let Some(clause) = self.dialect.auto_increment_clause() {
                    sql.push(' ');
                    sql.push_str(clause);
                }
            } else {
                sql.push_str(" NOT NULL");
            }
        } else {
            if field.unique && !field.primary_key {
                sql.push_str(" UNIQUE");
            }

            if !field.nullable {
                sql.push_str(" NOT NULL");
            }
        }

        if let Some(default) = self.column_default(field, opts)? {
            sql.push_str(" DEFAULT ");
            sql.push_str(&default);
        }

        Ok(sql)
    }

    /// The `DEFAULT` expression of a column definition, if any.
    pub(super) fn column_default(&self, field: &Field, opts: &Options) -> Result<Option<String>> {
        Ok(match &field.default {
            Some(DefaultValue::Value(value)) => Some(self.escape_value(value, Some(field))),
            Some(DefaultValue::Literal(literal)) => {
                Some(self.literal(literal, &opts.without_projection_aliases())?)
            }
            Some(DefaultValue::Computed(_)) => self
                .computed_default(field, None, DefaultEvent::Define)
                .map(|cell| self.cell(&cell, field)),
            None => None,
        })
    }

    fn foreign_key_constraint(&self, field: &Field) -> Result<Option<String>> {
        let Some(fk) = &field.foreign_key else {
            return Ok(None);
        };

        let target_model = self.schema.model(&fk.model)?;
        let target = target_model.field_by_name(&fk.field)?;

        let mut sql = format!(
            "FOREIGN KEY({}) REFERENCES {}({})",
            self.dialect.escape_id(&field.column_name),
            self.table(target_model),
            self.dialect.escape_id(&target.column_name)
        );

        if let Some(action) = fk.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.as_sql());
        }

        if let Some(action) = fk.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.as_sql());
        }

        Ok(Some(sql))
    }
}

/// Names of the fields covered by one index declared on `field`.
pub(super) fn index_fields<'a>(field: &'a Field, index: &'a FieldIndex) -> Vec<&'a str> {
    let mut fields = vec![field.name.as_str()];

    if let FieldIndex::Composite(others) = index {
        fields.extend(others.iter().map(String::as_str));
    }

    fields
}
