use super::Serializer;
use crate::{options::StatementKind, Options};

use grist_core::Result;

impl Serializer<'_> {
    /// `DROP TABLE [IF EXISTS] "table" [CASCADE]`
    pub fn generate_drop_table_statement(&self, model: &str, opts: &Options) -> Result<String> {
        let model = self.schema.model(model)?;

        let mut sql = String::from("DROP TABLE ");

        if opts.if_exists() {
            sql.push_str("IF EXISTS ");
        }

        sql.push_str(&self.table(model));

        if opts.cascade() {
            sql.push_str(" CASCADE");
        }

        self.log_ddl("DROP TABLE", &model.name, &sql);
        Ok(sql)
    }

    /// Removes every row of `model`. Databases without `TRUNCATE` get a
    /// `DELETE` without conditions.
    pub fn generate_truncate_table_statement(&self, model: &str, opts: &Options) -> Result<String> {
        let model = self.schema.model(model)?;

        if !self.dialect.capability().truncate {
            let sql = format!("DELETE FROM {}", self.table(model));
            self.log_ddl("TRUNCATE", &model.name, &sql);
            return Ok(sql);
        }

        let mut sql = format!("TRUNCATE TABLE {}", self.table(model));

        if opts.cascade() {
            sql.push_str(" CASCADE");
        }

        self.log_ddl("TRUNCATE", &model.name, &sql);
        Ok(sql)
    }

    /// `ALTER TABLE "table" ADD COLUMN <definition>`
    pub fn generate_add_column_statement(
        &self,
        model: &str,
        field: &str,
        opts: &Options,
    ) -> Result<String> {
        let model = self.schema.model(model)?;
        let field = model.field_by_name(field)?;
        let opts = opts.derive(|o| o.statement = Some(StatementKind::Ddl));

        let inline_pk = model.primary_keys().count() == 1;

        let sql = format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.table(model),
            self.column_definition(field, inline_pk, &opts)?
        );

        self.log_ddl("ADD COLUMN", &model.name, &sql);
        Ok(sql)
    }

    /// `ALTER TABLE "table" DROP COLUMN [IF EXISTS] "column" [CASCADE]`
    pub fn generate_drop_column_statement(
        &self,
        model: &str,
        field: &str,
        opts: &Options,
    ) -> Result<String> {
        let model = self.schema.model(model)?;
        let field = model.field_by_name(field)?;

        let mut sql = format!("ALTER TABLE {} DROP COLUMN ", self.table(model));

        if opts.if_exists() {
            sql.push_str("IF EXISTS ");
        }

        sql.push_str(&self.dialect.escape_id(&field.column_name));

        if opts.cascade() {
            sql.push_str(" CASCADE");
        }

        self.log_ddl("DROP COLUMN", &model.name, &sql);
        Ok(sql)
    }

    fn log_ddl(&self, statement: &str, model: &str, sql: &str) {
        tracing::debug!(
            target: "grist.sql",
            statement,
            model,
            sql,
            "generated statement"
        );
    }
}
