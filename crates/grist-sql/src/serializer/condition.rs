use super::{op_sql, Serializer};
use crate::{
    options::Limit,
    EmptyInListPolicy, Options,
};

use grist_core::{
    schema::{Field, Model},
    stmt::{Condition, Connector, Group, LiteralKind, Op, Operand, Operation, Query, Value},
    Error, Result,
};

impl Serializer<'_> {
    /// Renders the conditions of `query` without the `WHERE` keyword.
    ///
    /// Each rendered fragment is joined to the previous one by its own
    /// connector. Elided conditions contribute nothing, so no connector is
    /// ever left dangling.
    pub(super) fn where_clause(&self, query: &Query, opts: &Options) -> Result<String> {
        let mut fragments: Vec<(Connector, String)> = vec![];

        for op in &query.ops {
            let (connector, sql) = match op {
                Operation::Condition(condition) => {
                    (condition.connector, self.condition(condition, opts)?)
                }
                Operation::Group(Group {
                    connector,
                    not,
                    query: Some(group),
                }) => {
                    let inner = self.where_clause(group, opts)?;

                    if inner.is_empty() {
                        continue;
                    }

                    let sql = if *not {
                        format!("NOT ({inner})")
                    } else {
                        format!("({inner})")
                    };

                    (*connector, sql)
                }
                _ => continue,
            };

            if sql.is_empty() {
                continue;
            }

            if self.config.dedupe_conditions
                && fragments.last().is_some_and(|(_, last)| *last == sql)
            {
                continue;
            }

            fragments.push((connector, sql));
        }

        let mut ret = String::new();

        for (i, (connector, sql)) in fragments.iter().enumerate() {
            if i > 0 {
                ret.push(' ');
                ret.push_str(connector.as_sql());
                ret.push(' ');
            }
            ret.push_str(sql);
        }

        Ok(ret)
    }

    /// Renders one condition as a boolean expression. An empty string means
    /// the condition is not part of the WHERE clause, e.g. a join edge.
    pub(super) fn condition(&self, condition: &Condition, opts: &Options) -> Result<String> {
        let model = self.schema.model(&condition.field.model)?;
        let field = model.field_by_name(&condition.field.field)?;
        let op = condition.effective_op();

        if op.is_exists() {
            return self.exists(condition, field, op, opts);
        }

        match &condition.value {
            Operand::Value(Value::List(values)) => {
                self.list_condition(model, field, op, values, opts)
            }
            Operand::Value(value) => self.value_condition(model, field, op, value),
            Operand::Field(other) => {
                if op.is_like() {
                    return Err(Error::invalid_operator(
                        op.name(),
                        field.full_name(),
                        format!("cannot compare two columns (`{other}`)"),
                    ));
                }

                let sql = format!(
                    "{} {} {}",
                    self.column(model, field),
                    op_sql(op),
                    self.column_ref(other, true)?
                );
                Ok(self.with_postfix(sql, field, op))
            }
            Operand::Literal(literal) => {
                if op.is_like() {
                    if let Some(other) = literal.field_ref() {
                        return Err(Error::invalid_operator(
                            op.name(),
                            field.full_name(),
                            format!("cannot compare two columns (`{other}`)"),
                        ));
                    }

                    if !matches!(literal.kind, LiteralKind::Raw(_)) {
                        return Err(Error::invalid_operator(
                            op.name(),
                            field.full_name(),
                            "the value is not a string",
                        ));
                    }
                }

                let opts = opts.derive(|o| o.sub_field = Some(true));
                Ok(format!(
                    "{} {} {}",
                    self.column(model, field),
                    op_sql(op),
                    self.literal(literal, &opts)?
                ))
            }
            Operand::Query(sub) => {
                // Without conditions of its own, the nested query is a join
                if !sub.has_condition() {
                    return Ok(String::new());
                }

                if op.is_like() {
                    return Err(Error::invalid_operator(
                        op.name(),
                        field.full_name(),
                        "cannot be applied to a sub-select",
                    ));
                }

                let sql = self.select_sql(sub, &opts.sub_query(), None)?;
                let column = self.column(model, field);

                Ok(match (condition.quantifier, op) {
                    (Some(quantifier), _) => {
                        format!("{column} {} {}({sql})", op_sql(op), quantifier.as_sql())
                    }
                    (None, Op::Eq) => format!("{column} IN ({sql})"),
                    (None, Op::Neq) => format!("{column} NOT IN ({sql})"),
                    (None, _) => format!("{column} {} ({sql})", op_sql(op)),
                })
            }
        }
    }

    /// `EXISTS(SELECT 1 FROM ... LIMIT 1 OFFSET 0)`
    fn exists(&self, condition: &Condition, field: &Field, op: Op, opts: &Options) -> Result<String> {
        let Some(sub) = condition.sub_query() else {
            return Err(Error::invalid_operator(
                op.name(),
                field.full_name(),
                "requires a nested query",
            ));
        };

        let opts = opts.sub_query().derive(|o| {
            o.select_list = Some(Some("1".to_string()));
            o.force_limit = Some(Some(Limit::Rows(1)));
            o.force_offset = Some(Some(0));
        });

        let sql = self.select_sql(sub, &opts, None)?;
        Ok(format!("{}({sql})", op_sql(op)))
    }

    /// Compares a column against a list.
    ///
    /// `NULL`, `true` and `false` can only be compared with `IS`, so they are
    /// split from the other entries. Each yields its own comparison, the other
    /// entries are compared with a single `IN`, and the parts are combined
    /// with `OR` (or `AND` for `NEQ`).
    fn list_condition(
        &self,
        model: &Model,
        field: &Field,
        op: Op,
        values: &[Value],
        opts: &Options,
    ) -> Result<String> {
        if !op.is_equality() {
            return Err(Error::invalid_operator(
                op.name(),
                field.full_name(),
                "cannot be applied to a list",
            ));
        }

        let values = self.dialect.prepare_array_values(values, field);
        let (special, ordinary): (Vec<_>, Vec<_>) =
            values.into_iter().partition(Value::is_special);

        if special.is_empty() && ordinary.is_empty() {
            return match self.config.empty_in_list {
                EmptyInListPolicy::Error => Err(Error::invalid_operator(
                    op.name(),
                    field.full_name(),
                    "the value list is empty",
                )),
                EmptyInListPolicy::Elide => {
                    tracing::warn!(
                        target: "grist.sql",
                        field = %field.full_name(),
                        op = %op,
                        statement = ?opts.statement(),
                        "eliding comparison against an empty list"
                    );
                    Ok(String::new())
                }
            };
        }

        let mut parts = vec![];

        for value in &special {
            parts.push(self.value_condition(model, field, op, value)?);
        }

        if !ordinary.is_empty() {
            let values: Vec<_> = ordinary
                .iter()
                .map(|value| self.escape_value(value, Some(field)))
                .collect();

            parts.push(format!(
                "{} {} ({})",
                self.column(model, field),
                if op == Op::Eq { "IN" } else { "NOT IN" },
                values.join(",")
            ));
        }

        if parts.len() == 1 {
            return Ok(parts.remove(0));
        }

        let connector = if op == Op::Eq { " OR " } else { " AND " };
        Ok(format!("({})", parts.join(connector)))
    }

    fn value_condition(&self, model: &Model, field: &Field, op: Op, value: &Value) -> Result<String> {
        let column = self.column(model, field);

        if op.is_like() {
            let Some(pattern) = value.as_str() else {
                return Err(Error::invalid_operator(
                    op.name(),
                    field.full_name(),
                    "requires a string value",
                ));
            };

            let pattern = Value::String(self.dialect.like_value(pattern));
            let sql = format!(
                "{column} {} {}",
                op_sql(op),
                self.escape_value(&pattern, None)
            );
            return Ok(self.with_postfix(sql, field, op));
        }

        let op_sql = match (op, value) {
            (Op::Eq, Value::Null | Value::Bool(_)) => "IS",
            (Op::Neq, Value::Null | Value::Bool(_)) => "IS NOT",
            (_, Value::Null) => {
                return Err(Error::invalid_operator(
                    op.name(),
                    field.full_name(),
                    "cannot be compared with NULL",
                ))
            }
            _ => op_sql(op),
        };

        let sql = format!(
            "{column} {op_sql} {}",
            self.escape_value(value, Some(field))
        );
        Ok(self.with_postfix(sql, field, op))
    }

    fn with_postfix(&self, mut sql: String, field: &Field, op: Op) -> String {
        if let Some(postfix) = self.dialect.condition_postfix(field, op) {
            sql.push(' ');
            sql.push_str(&postfix);
        }
        sql
    }
}
