use super::Serializer;
use crate::{options::StatementKind, Options};

use grist_core::{schema::Model, Error, Result};

impl Serializer<'_> {
    /// Generates `CREATE INDEX` over the named fields of `model`.
    pub fn generate_create_index_statement(
        &self,
        model: &str,
        fields: &[&str],
        opts: &Options,
    ) -> Result<String> {
        let model = self.schema.model(model)?;
        let columns = self.index_columns(model, fields)?;
        let name = self.index_name_for_columns(model, &columns);

        self.create_index(model, &name, &columns, opts)
    }

    /// Generates `DROP INDEX` for the index over the named fields of `model`.
    pub fn generate_drop_index_statement(
        &self,
        model: &str,
        fields: &[&str],
        opts: &Options,
    ) -> Result<String> {
        let model = self.schema.model(model)?;
        let columns = self.index_columns(model, fields)?;
        let name = self.index_name_for_columns(model, &columns);

        self.drop_index(model, &name, opts)
    }

    /// The name of the index over the named fields of `model`.
    pub fn index_name(&self, model: &Model, fields: &[&str]) -> Result<String> {
        let columns = self.index_columns(model, fields)?;
        Ok(self.index_name_for_columns(model, &columns))
    }

    /// `<prefix>_<table>_<columns>`, with the columns sorted so the name does
    /// not depend on declaration order.
    pub(super) fn index_name_for_columns(&self, model: &Model, columns: &[String]) -> String {
        let mut columns: Vec<&str> = columns.iter().map(String::as_str).collect();
        columns.sort_unstable();

        format!(
            "{}_{}_{}",
            self.config.index_prefix,
            model.table_name,
            columns.join("_")
        )
    }

    pub(super) fn create_index(
        &self,
        model: &Model,
        name: &str,
        columns: &[String],
        opts: &Options,
    ) -> Result<String> {
        let opts = opts.derive(|o| o.statement = Some(StatementKind::Ddl));
        let capability = self.dialect.capability();

        let mut sql = String::from("CREATE INDEX ");

        if opts.concurrently() {
            if !capability.concurrent_index {
                return Err(Error::unsupported_feature(format!(
                    "CREATE INDEX CONCURRENTLY is not supported by {}",
                    self.dialect.name()
                )));
            }
            sql.push_str("CONCURRENTLY ");
        }

        if opts.if_not_exists() {
            if !capability.create_index_if_not_exists {
                return Err(Error::unsupported_feature(format!(
                    "CREATE INDEX IF NOT EXISTS is not supported by {}",
                    self.dialect.name()
                )));
            }
            sql.push_str("IF NOT EXISTS ");
        }

        let columns: Vec<_> = columns
            .iter()
            .map(|column| self.dialect.escape_id(column))
            .collect();

        sql.push_str(&format!(
            "{} ON {} ({})",
            self.dialect.escape_id(name),
            self.table(model),
            columns.join(", ")
        ));

        tracing::debug!(
            target: "grist.sql",
            statement = "CREATE INDEX",
            model = %model.name,
            sql = %sql,
            "generated statement"
        );

        Ok(sql)
    }

    pub(super) fn drop_index(&self, model: &Model, name: &str, opts: &Options) -> Result<String> {
        let capability = self.dialect.capability();

        let mut sql = String::from("DROP INDEX ");

        if opts.concurrently() {
            if !capability.concurrent_index {
                return Err(Error::unsupported_feature(format!(
                    "DROP INDEX CONCURRENTLY is not supported by {}",
                    self.dialect.name()
                )));
            }
            sql.push_str("CONCURRENTLY ");
        }

        if opts.if_exists() {
            sql.push_str("IF EXISTS ");
        }

        sql.push_str(&self.dialect.escape_id(name));

        if capability.drop_index_on_table {
            sql.push_str(" ON ");
            sql.push_str(&self.table(model));
        }

        if opts.cascade() {
            sql.push_str(" CASCADE");
        }

        tracing::debug!(
            target: "grist.sql",
            statement = "DROP INDEX",
            model = %model.name,
            sql = %sql,
            "generated statement"
        );

        Ok(sql)
    }

    fn index_columns(&self, model: &Model, fields: &[&str]) -> Result<Vec<String>> {
        if fields.is_empty() {
            return Err(Error::invalid_statement(format!(
                "an index on model `{}` needs at least one field",
                model.name
            )));
        }

        fields
            .iter()
            .map(|name| Ok(model.field_by_name(name)?.column_name.clone()))
            .collect()
    }
}
