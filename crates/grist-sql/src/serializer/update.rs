use super::{insert::Cell, Serializer};
use crate::{options::StatementKind, Options};

use grist_core::{schema::DefaultEvent, stmt::Query, Error, Record, Result};

impl Serializer<'_> {
    /// Generates `UPDATE ... SET ...` from the dirty fields of `record`.
    ///
    /// Fields with an `on_update` computed default are set even when clean.
    /// When `query` is given its conditions, order and limit restrict the
    /// update, as far as the dialect supports them. Returns `None` when there
    /// is nothing to set.
    pub fn generate_update_statement(
        &self,
        model: &str,
        record: &Record,
        query: Option<&Query>,
        opts: &Options,
    ) -> Result<Option<String>> {
        let model = self.schema.model(model)?;
        self.check_record_model(model, record)?;

        let opts = opts.derive(|o| {
            o.statement = Some(StatementKind::Update);
            o.no_projection_aliases = Some(true);
        });

        let changes = record.changes();
        let mut assignments = vec![];

        for field in model.stored_fields() {
            let cell = match changes.get(&field.name) {
                Some(change) => Cell::Value(change.current.clone()),
                None => match self.computed_default(field, Some(record), DefaultEvent::Update) {
                    Some(cell) => cell,
                    None => continue,
                },
            };

            let value = self.cell(&cell, field);

            if value.is_empty() {
                continue;
            }

            assignments.push(format!(
                "{} = {value}",
                self.dialect.escape_id(&field.column_name)
            ));
        }

        if assignments.is_empty() {
            return Ok(None);
        }

        let mut sql = format!(
            "UPDATE {} SET {}",
            self.table(model),
            assignments.join(", ")
        );

        if let Some(query) = query {
            if query.has_joins() {
                return Err(Error::unsupported_feature(format!(
                    "UPDATE of model `{}` with joins",
                    model.name
                )));
            }

            let filter = self.where_clause(query, &opts)?;
            if !filter.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&filter);
            }

            let plan = self.plan_joins(query)?;
            let scope = self.scope(query, &plan)?;
            let support = self.dialect.order_support(&opts);

            if support.is_allowed() {
                let order = self.order_by(query, &scope, support, &opts)?;
                if !order.is_empty() {
                    sql.push_str(" ORDER BY ");
                    sql.push_str(&order);
                }
            }

            sql.push_str(&self.limit_offset(query, &opts)?);
        }

        if let Some(tail) = self.dialect.update_tail(model, &opts) {
            sql.push(' ');
            sql.push_str(&tail);
        }

        sql.push_str(&self.returning(model, &opts)?);

        tracing::debug!(
            target: "grist.sql",
            statement = "UPDATE",
            model = %model.name,
            sql = %sql,
            "generated statement"
        );

        Ok(Some(sql))
    }
}
