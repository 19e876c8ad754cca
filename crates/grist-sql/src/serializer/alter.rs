use super::{create_table::index_fields, Serializer};
use crate::{options::StatementKind, Options};

use grist_core::{
    schema::{Field, Model},
    Error, Result,
};
use indexmap::IndexMap;

/// A column attribute compared by the ALTER diff.
#[derive(Debug, Clone, Copy)]
enum Axis {
    Nullability,
    Default,
    Type,
    PrimaryKey,
    Unique,
}

impl Axis {
    fn as_str(self) -> &'static str {
        match self {
            Axis::Nullability => "nullability",
            Axis::Default => "default",
            Axis::Type => "type",
            Axis::PrimaryKey => "primary key",
            Axis::Unique => "uniqueness",
        }
    }
}

impl Serializer<'_> {
    /// Generates the `ALTER TABLE` statements that turn column `current` of
    /// `model` into `proposed`.
    ///
    /// Attributes are compared one at a time in a fixed order: nullability,
    /// default, type, primary key, uniqueness, indexes, and finally the column
    /// name. Each attribute that differs yields its own statements, so a
    /// failure on one attribute does not affect the others. Every statement
    /// but the rename refers to the column by its current name.
    ///
    /// Dialects with `modify_column` restate the column in a single
    /// `MODIFY COLUMN` when its nullability or type changes. That statement
    /// carries the default as well.
    pub fn generate_alter_table_statements(
        &self,
        model: &str,
        current: &Field,
        proposed: &Field,
        opts: &Options,
    ) -> Result<Vec<String>> {
        let model = self.schema.model(model)?;
        let opts = opts.derive(|o| o.statement = Some(StatementKind::Ddl));

        let table = self.table(model);
        let column = self.dialect.escape_id(&current.column_name);
        let alter_column = format!("ALTER TABLE {table} ALTER COLUMN {column}");

        let mut statements = vec![];

        let current_default = self.column_default(current, &opts)?;
        let proposed_default = self.column_default(proposed, &opts)?;
        let proposed_type = self.dialect.column_type(proposed);
        let type_changed = self.dialect.column_type(current) != proposed_type;

        let modify = self.dialect.capability().modify_column
            && (current.nullable != proposed.nullable || type_changed);

        if modify {
            // The whole definition is restated, which also carries the default
            statements.push(format!(
                "ALTER TABLE {table} MODIFY COLUMN {column} {}",
                self.modified_column(proposed, &proposed_type, proposed_default.as_deref())
            ));
        }

        if current.nullable != proposed.nullable && !modify {
            self.check_alter_column(model, current, Axis::Nullability)?;

            statements.push(if proposed.nullable {
                format!("{alter_column} DROP NOT NULL")
            } else {
                format!("{alter_column} SET NOT NULL")
            });
        }

        if current_default != proposed_default && !modify {
            self.check_alter_column(model, current, Axis::Default)?;

            statements.push(match proposed_default {
                Some(default) => format!("{alter_column} SET DEFAULT {default}"),
                None => format!("{alter_column} DROP DEFAULT"),
            });
        }

        if type_changed && !modify {
            self.check_alter_column(model, current, Axis::Type)?;

            statements.push(format!("{alter_column} TYPE {proposed_type}"));
        }

        if current.primary_key != proposed.primary_key {
            self.check_alter_column(model, current, Axis::PrimaryKey)?;

            statements.push(if proposed.primary_key {
                format!("ALTER TABLE {table} ADD PRIMARY KEY ({column})")
            } else {
                format!(
                    "ALTER TABLE {table} {}",
                    self.dialect.drop_primary_key(&model.table_name)
                )
            });
        }

        if current.unique != proposed.unique {
            self.check_alter_column(model, current, Axis::Unique)?;

            let constraint = self
                .dialect
                .escape_id(&format!("uq_{}_{}", model.table_name, current.column_name));

            statements.push(if proposed.unique {
                format!("ALTER TABLE {table} ADD CONSTRAINT {constraint} UNIQUE ({column})")
            } else {
                format!("ALTER TABLE {table} DROP CONSTRAINT {constraint}")
            });
        }

        let current_indexes = self.column_indexes(model, current, &current.column_name)?;
        let proposed_indexes = self.column_indexes(model, proposed, &current.column_name)?;

        for name in current_indexes.keys() {
            if !proposed_indexes.contains_key(name) {
                statements.push(self.drop_index(model, name, &opts)?);
            }
        }

        for (name, columns) in &proposed_indexes {
            if !current_indexes.contains_key(name) {
                statements.push(self.create_index(model, name, columns, &opts)?);
            }
        }

        if current.column_name != proposed.column_name {
            statements.push(format!(
                "ALTER TABLE {table} RENAME COLUMN {column} TO {}",
                self.dialect.escape_id(&proposed.column_name)
            ));
        }

        tracing::debug!(
            target: "grist.sql",
            statement = "ALTER TABLE",
            model = %model.name,
            field = %current.name,
            count = statements.len(),
            "generated statements"
        );

        Ok(statements)
    }

    /// `TYPE [NOT NULL] [DEFAULT ...] [AUTO_INCREMENT]` for `MODIFY COLUMN`.
    /// Keys and unique constraints are left to their own axes.
    fn modified_column(&self, field: &Field, ty: &str, default: Option<&str>) -> String {
        let mut sql = ty.to_string();

        if !field.nullable {
            sql.push_str(" NOT NULL");
        }

        if let Some(default) = default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }

        if field.auto_increment {
            if let Some(clause) = self.dialect.auto_increment_clause() {
                sql.push(' ');
                sql.push_str(clause);
            }
        }

        sql
    }

    fn check_alter_column(&self, model: &Model, field: &Field, axis: Axis) -> Result<()> {
        if self.dialect.capability().alter_column {
            return Ok(());
        }

        Err(Error::unsupported_feature(format!(
            "{} cannot alter the {} of column `{}`.`{}`",
            self.dialect.name(),
            axis.as_str(),
            model.table_name,
            field.column_name
        )))
    }

    /// The indexes `field` takes part in, keyed by index name. The field is
    /// referred to by `column`, other fields of a composite index through the
    /// model.
    fn column_indexes(
        &self,
        model: &Model,
        field: &Field,
        column: &str,
    ) -> Result<IndexMap<String, Vec<String>>> {
        let mut indexes = IndexMap::new();

        // No indexes are generated for foreign key columns
        if field.is_foreign_key() {
            return Ok(indexes);
        }

        for index in &field.indices {
            let columns = index_fields(field, index)
                .into_iter()
                .map(|name| {
                    if name == field.name {
                        Ok(column.to_string())
                    } else {
                        Ok(model.field_by_name(name)?.column_name.clone())
                    }
                })
                .collect::<Result<Vec<_>>>()?;

            let name = self.index_name_for_columns(model, &columns);
            indexes.entry(name).or_insert(columns);
        }

        Ok(indexes)
    }
}
