use super::{ProjectionMap, Serializer};
use crate::{
    options::{Limit, StatementKind},
    Options,
};

use grist_core::{
    stmt::{Literal, Query},
    Error, Result,
};
use std::sync::Arc;

/// A generated SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub sql: String,

    /// The resolved SELECT list, when requested with
    /// [`Options::with_field_projection`].
    pub projection: Option<ProjectionMap>,
}

impl Serializer<'_> {
    /// Generates `SELECT ... FROM ...` for `query`.
    pub fn generate_select_query(&self, query: &Query, opts: &Options) -> Result<SelectQuery> {
        let opts = opts.derive(|o| o.statement = Some(StatementKind::Select));
        let (sql, projection) = self.select(query, &opts, None)?;

        tracing::debug!(
            target: "grist.sql",
            statement = "SELECT",
            model = %query.model,
            sql = %sql,
            "generated statement"
        );

        Ok(SelectQuery {
            sql,
            projection: if opts.return_field_projection() {
                Some(projection)
            } else {
                None
            },
        })
    }

    /// Generates a SELECT nested in another statement. `correlation` is
    /// prepended to the WHERE clause.
    pub(super) fn select_sql(
        &self,
        query: &Query,
        opts: &Options,
        correlation: Option<String>,
    ) -> Result<String> {
        let (sql, _) = self.select(query, opts, correlation)?;
        Ok(sql)
    }

    fn select(
        &self,
        query: &Query,
        opts: &Options,
        correlation: Option<String>,
    ) -> Result<(String, ProjectionMap)> {
        let plan = self.plan_joins(query)?;
        let scope = self.scope(query, &plan)?;
        let distinct = query.get_distinct();

        let opts = opts.derive(|o| o.distinct = Some(distinct.is_some()));
        let sub_query = opts.is_sub_query();

        let support = self.dialect.order_support(&opts);

        // A sub-query only keeps ORDER BY when its caller forces a limit
        let render_order = support.is_allowed() && (!sub_query || opts.force_limit().is_some());

        let projection = if opts.select_list().is_some() {
            ProjectionMap::new()
        } else if sub_query {
            self.sub_query_projection(query, &opts)?
        } else {
            let absorb = support.is_allowed() && query.get_group_by().is_empty();
            self.projection(query, &scope, absorb, &opts)?
        };

        let opts = opts.derive(|o| {
            o.projection_fields = Some(Some(Arc::new(projection.clone())));
        });

        let mut sql = String::from("SELECT ");

        match distinct {
            Some(None) => sql.push_str("DISTINCT "),
            Some(Some(operand)) => {
                sql.push_str(&self.literal(&Literal::distinct(operand.clone()), &opts)?);
                sql.push(' ');
            }
            None => {}
        }

        match opts.select_list() {
            Some(list) => sql.push_str(&list),
            None => sql.push_str(&projection.to_sql()),
        }

        sql.push_str(" FROM ");
        sql.push_str(&self.table(scope.root()));

        if !plan.is_empty() {
            sql.push(' ');
            sql.push_str(&self.joins(&plan)?);
        }

        let filter = self.where_clause(query, &opts)?;
        let filter = match (correlation, filter.is_empty()) {
            (Some(correlation), true) => correlation,
            (Some(correlation), false) => format!("{correlation} AND ({filter})"),
            (None, _) => filter,
        };

        if !filter.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&filter);
        }

        let group_by = self.group_by(query, &opts)?;
        if !group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&group_by);

            let having = self.having(query, &opts)?;
            if !having.is_empty() {
                sql.push(' ');
                sql.push_str(&having);
            }
        }

        if render_order {
            let order = self.order_by(query, &scope, support, &opts)?;
            if !order.is_empty() {
                sql.push_str(" ORDER BY ");
                sql.push_str(&order);
            }
        }

        sql.push_str(&self.limit_offset(query, &opts)?);

        Ok((sql, projection))
    }

    /// ` LIMIT n OFFSET m` as permitted by the dialect for the current
    /// statement, or an empty string.
    ///
    /// A sub-query only renders the limit and offset forced by its caller.
    /// UPDATE and DELETE take a row count only, so an offset there is an
    /// error.
    pub(super) fn limit_offset(&self, query: &Query, opts: &Options) -> Result<String> {
        let (limit, offset) = if opts.is_sub_query() {
            (opts.force_limit(), opts.force_offset())
        } else if self.dialect.limit_support(opts) {
            (
                opts.force_limit()
                    .or_else(|| query.get_limit().map(Limit::Rows)),
                opts.force_offset().or_else(|| query.get_offset()),
            )
        } else {
            (opts.force_limit(), opts.force_offset())
        };

        let dml = match opts.statement() {
            _ if opts.is_sub_query() => None,
            StatementKind::Update => Some("UPDATE"),
            StatementKind::Delete => Some("DELETE"),
            _ => None,
        };

        if let (Some(statement), Some(_)) = (dml, offset) {
            return Err(Error::unsupported_feature(format!(
                "{} does not support OFFSET in {statement} statements",
                self.dialect.name()
            )));
        }

        // Most databases reject an OFFSET without a LIMIT
        let limit = match (limit, offset) {
            (None, Some(_)) => Some(Limit::Unbounded),
            (limit, _) => limit,
        };

        let mut sql = String::new();

        if let Some(limit) = limit {
            sql.push_str(" LIMIT ");
            match limit {
                Limit::Rows(rows) => sql.push_str(&rows.to_string()),
                Limit::Unbounded => sql.push_str(self.dialect.unbounded_limit()),
            }
        }

        if let Some(offset) = offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        Ok(sql)
    }
}
