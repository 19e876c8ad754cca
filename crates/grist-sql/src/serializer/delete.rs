use super::Serializer;
use crate::{
    options::{Limit, StatementKind},
    Options,
};

use grist_core::{stmt::Query, Error, Result};

impl Serializer<'_> {
    /// Generates a `DELETE` for the rows of `model` matched by `query`.
    ///
    /// * Without conditions every row is deleted.
    /// * Conditions without joins become the WHERE clause.
    /// * Most databases cannot join inside a DELETE, so a query with joins is
    ///   rewritten into a correlated `EXISTS` against an aliased copy of the
    ///   table, matched on the primary key.
    pub fn generate_delete_statement(
        &self,
        model: &str,
        query: Option<&Query>,
        opts: &Options,
    ) -> Result<String> {
        let model = self.schema.model(model)?;
        let opts = opts.derive(|o| {
            o.statement = Some(StatementKind::Delete);
            o.no_projection_aliases = Some(true);
        });

        let table = self.table(model);

        let mut sql = match query {
            Some(query) if query.has_joins() => {
                let Some(pk) = model.primary_key() else {
                    return Err(Error::invalid_statement(format!(
                        "cannot delete from model `{}` through joins: it has no primary key",
                        model.name
                    )));
                };

                let alias = opts
                    .table_alias()
                    .unwrap_or_else(|| format!("_{}", model.table_name));
                let alias = self.dialect.escape_id(&alias);
                let pk_column = self.dialect.escape_id(&pk.column_name);

                let correlation = format!(
                    "{alias}.{pk_column} = {}",
                    self.column(model, pk)
                );

                let limit = query.get_limit().map_or(Limit::Unbounded, Limit::Rows);
                let sub_opts = opts.sub_query().derive(|o| {
                    o.select_list = Some(Some("1".to_string()));
                    o.force_limit = Some(Some(limit));
                });

                let sub = self.select_sql(query, &sub_opts, Some(correlation))?;
                format!("DELETE FROM {table} AS {alias} WHERE EXISTS ({sub})")
            }
            Some(query) if query.has_condition() => {
                let mut sql = format!("DELETE FROM {table}");

                let filter = self.where_clause(query, &opts)?;
                if !filter.is_empty() {
                    sql.push_str(" WHERE ");
                    sql.push_str(&filter);
                }

                if self.dialect.order_support(&opts).is_allowed() {
                    let plan = self.plan_joins(query)?;
                    let scope = self.scope(query, &plan)?;
                    let support = self.dialect.order_support(&opts);
                    let order = self.order_by(query, &scope, support, &opts)?;

                    if !order.is_empty() {
                        sql.push_str(" ORDER BY ");
                        sql.push_str(&order);
                    }
                }

                sql.push_str(&self.limit_offset(query, &opts)?);
                sql
            }
            _ => format!("DELETE FROM {table}"),
        };

        sql.push_str(&self.returning(model, &opts)?);

        tracing::debug!(
            target: "grist.sql",
            statement = "DELETE",
            model = %model.name,
            sql = %sql,
            "generated statement"
        );

        Ok(sql)
    }
}
