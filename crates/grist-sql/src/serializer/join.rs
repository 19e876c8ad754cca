use super::{op_sql, Scope, Serializer};

use grist_core::{
    schema::FieldRef,
    stmt::{Connector, Group, JoinKind, JoinSpec, Op, Operation, Query},
    Error, Result,
};
use indexmap::{IndexMap, IndexSet};

/// A relationship between two models, induced by a condition whose value is
/// a nested query without conditions of its own.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct JoinEdge {
    pub(super) spec: JoinSpec,

    /// Side already in scope
    pub(super) left: FieldRef,

    /// Side of the model being joined
    pub(super) right: FieldRef,

    pub(super) op: Op,

    pub(super) connector: Connector,
}

/// Join edges grouped by joined model, in the order the models must be
/// introduced.
#[derive(Debug, Default)]
pub(super) struct JoinPlan {
    pub(super) groups: IndexMap<String, Vec<JoinEdge>>,
}

impl JoinPlan {
    pub(super) fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> Serializer<'a> {
    /// Collects the join edges of `query` and orders the joined models so
    /// that every model follows the models it joins against.
    pub(super) fn plan_joins(&self, query: &Query) -> Result<JoinPlan> {
        let mut edges = vec![];
        collect_edges(query, &query.model, &mut edges)?;

        let mut groups: IndexMap<String, Vec<JoinEdge>> = IndexMap::new();
        for edge in edges {
            groups
                .entry(edge.right.model.clone())
                .or_default()
                .push(edge);
        }

        let order = sort_joined_models(&query.model, &groups)?;

        tracing::trace!(
            target: "grist.sql",
            model = %query.model,
            order = ?order,
            "planned joins"
        );

        let mut plan = JoinPlan::default();
        for model in order {
            if let Some((model, edges)) = groups.swap_remove_entry(&model) {
                plan.groups.insert(model, edges);
            }
        }

        Ok(plan)
    }

    /// The root model followed by the joined models in join order.
    pub(super) fn scope(&self, query: &Query, plan: &JoinPlan) -> Result<Scope<'a>> {
        let mut models = vec![self.schema.model(&query.model)?];

        for name in plan.groups.keys() {
            models.push(self.schema.model(name)?);
        }

        Ok(Scope { models })
    }

    /// Renders the `JOIN ... ON ...` clauses of a plan.
    pub(super) fn joins(&self, plan: &JoinPlan) -> Result<String> {
        let mut clauses = vec![];

        for (name, edges) in &plan.groups {
            let model = self.schema.model(name)?;

            for (i, edge) in edges.iter().enumerate() {
                let comparison = format!(
                    "{} {} {}",
                    self.column_ref(&edge.left, true)?,
                    op_sql(edge.op),
                    self.column_ref(&edge.right, true)?
                );

                if i == 0 {
                    clauses.push(format!(
                        "{} {} ON {comparison}",
                        self.join_type(edge.spec)?,
                        self.table(model)
                    ));
                } else {
                    clauses.push(format!("{} {comparison}", edge.connector.as_sql()));
                }
            }
        }

        Ok(clauses.join(" "))
    }

    fn join_type(&self, spec: JoinSpec) -> Result<&'static str> {
        Ok(match (spec.kind, spec.outer) {
            (JoinKind::Inner, _) => "INNER JOIN",
            (JoinKind::Left, false) => "LEFT JOIN",
            (JoinKind::Left, true) => "LEFT OUTER JOIN",
            (JoinKind::Right, false) => "RIGHT JOIN",
            (JoinKind::Right, true) => "RIGHT OUTER JOIN",
            (JoinKind::Full, _) if !self.dialect.capability().full_join => {
                return Err(Error::unsupported_feature(format!(
                    "FULL JOIN is not supported by {}",
                    self.dialect.name()
                )))
            }
            (JoinKind::Full, false) => "FULL JOIN",
            (JoinKind::Full, true) => "FULL OUTER JOIN",
            (JoinKind::Cross, _) => "CROSS JOIN",
        })
    }
}

fn collect_edges(query: &Query, root: &str, edges: &mut Vec<JoinEdge>) -> Result<()> {
    for op in &query.ops {
        match op {
            Operation::Condition(condition) if condition.is_join_edge() => {
                let Some(sub) = condition.sub_query() else {
                    continue;
                };

                let Some(target) = &sub.target else {
                    return Err(Error::invalid_statement(format!(
                        "cannot join `{}` on `{}`: the nested query has no target field",
                        sub.model, condition.field
                    )));
                };

                let (left, right) = if target.model == root {
                    (target.clone(), condition.field.clone())
                } else {
                    (condition.field.clone(), target.clone())
                };

                let op = condition.effective_op();

                if op.is_like() {
                    return Err(Error::invalid_operator(
                        op.name(),
                        condition.field.to_string(),
                        format!("cannot compare two columns (`{target}`)"),
                    ));
                }

                if right.model == root {
                    return Err(Error::invalid_statement(format!(
                        "cannot join model `{root}` to itself"
                    )));
                }

                edges.push(JoinEdge {
                    spec: condition.join.unwrap_or_default(),
                    left,
                    right,
                    op,
                    connector: condition.connector,
                });
            }
            Operation::Group(Group {
                query: Some(group),
                ..
            }) => collect_edges(group, root, edges)?,
            _ => {}
        }
    }

    Ok(())
}

/// Orders joined models so that each one follows every joined model it
/// references. Ties keep first-appearance order.
fn sort_joined_models(
    root: &str,
    groups: &IndexMap<String, Vec<JoinEdge>>,
) -> Result<Vec<String>> {
    let mut dependencies: IndexMap<&str, IndexSet<&str>> = IndexMap::new();

    for (model, edges) in groups {
        let deps = dependencies.entry(model.as_str()).or_default();

        for edge in edges {
            let left = edge.left.model.as_str();

            if left == root || left == model.as_str() {
                continue;
            }

            if !groups.contains_key(left) {
                return Err(Error::invalid_statement(format!(
                    "model `{left}` is referenced by a join on `{model}` but is neither the root model nor joined"
                )));
            }

            deps.insert(left);
        }
    }

    let mut order: Vec<String> = Vec::with_capacity(dependencies.len());

    while !dependencies.is_empty() {
        let ready = dependencies.iter().position(|(_, deps)| {
            deps.iter()
                .all(|dep| order.iter().any(|done| done.as_str() == *dep))
        });

        let Some(index) = ready else {
            let models: Vec<_> = dependencies.keys().copied().collect();
            return Err(Error::invalid_schema(format!(
                "join dependency cycle between models {}",
                models.join(", ")
            )));
        };

        if let Some((model, _)) = dependencies.shift_remove_index(index) {
            order.push(model.to_string());
        }
    }

    Ok(order)
}
