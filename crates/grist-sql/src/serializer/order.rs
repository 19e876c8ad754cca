use super::{Scope, Serializer};
use crate::{dialect::OrderSupport, Options};

use grist_core::{
    stmt::{OrderExpr, Query},
    Result,
};

impl Serializer<'_> {
    /// Renders the ORDER BY entries of `query`, without the keyword.
    ///
    /// Fields of models outside `scope` are skipped. When the dialect only
    /// orders by projected columns, fields missing from the resolved
    /// projection are skipped too unless ordering by them is explicitly
    /// allowed.
    pub(super) fn order_by(
        &self,
        query: &Query,
        scope: &Scope<'_>,
        support: OrderSupport,
        opts: &Options,
    ) -> Result<String> {
        let projection = opts.projection_fields();
        let literal_opts = opts.without_projection_aliases();
        let mut entries = vec![];

        for entry in query.get_order() {
            let direction = if opts.reverse_order() {
                entry.direction.reverse()
            } else {
                entry.direction
            };

            let sql = match &entry.expr {
                OrderExpr::Field(field_ref) => {
                    if !scope.contains(&field_ref.model) {
                        continue;
                    }

                    let field = self.schema.field(field_ref)?;

                    if support == OrderSupport::ProjectedOnly
                        && !projection
                            .as_deref()
                            .is_some_and(|projection| projection.contains(&field_ref.to_string()))
                        && !opts.allow_unprojected_order()
                        && !self.dialect.allow_unprojected_order(field)
                    {
                        continue;
                    }

                    self.column_ref(field_ref, true)?
                }
                OrderExpr::Literal(literal) => self.literal(literal, &literal_opts)?,
            };

            entries.push(format!("{sql} {}", direction.as_sql()));
        }

        Ok(entries.join(", "))
    }

    /// Renders the GROUP BY entries of `query`, without the keyword.
    pub(super) fn group_by(&self, query: &Query, opts: &Options) -> Result<String> {
        let literal_opts = opts.without_projection_aliases();

        let entries = query
            .get_group_by()
            .into_iter()
            .map(|expr| match expr {
                OrderExpr::Field(field_ref) => self.column_ref(field_ref, true),
                OrderExpr::Literal(literal) => self.literal(literal, &literal_opts),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(entries.join(", "))
    }

    /// Renders `HAVING (...)` for the last having record of `query`, or an
    /// empty string.
    pub(super) fn having(&self, query: &Query, opts: &Options) -> Result<String> {
        let Some(having) = query.get_having() else {
            return Ok(String::new());
        };

        let sql = self.where_clause(having, opts)?;

        if sql.is_empty() {
            return Ok(String::new());
        }

        Ok(format!("HAVING ({sql})"))
    }
}
