use super::{
    Condition, Connector, Group, JoinSpec, LiteralOperand, Op, Operand, OrderClause, OrderEntry,
    OrderExpr, OrderMode, Projection, ProjectionItem, ProjectionMode,
};
use crate::schema::FieldRef;

/// An ordered sequence of operation records rooted at a model.
///
/// Record order is significant: it determines the left-to-right grouping of
/// the rendered WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Name of the root model
    pub model: String,

    /// The field a nested query points at. Used as the right-hand side of a
    /// join, or as the projection of a sub-select.
    pub target: Option<FieldRef>,

    pub ops: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Condition(Condition),
    Group(Group),
    Project(Projection),
    Order(OrderClause),
    GroupBy(Vec<OrderExpr>),
    Having(Query),
    Distinct(Option<LiteralOperand>),
    Limit(u64),
    Offset(u64),
}

/// Resolves a field name against the model of the query being built.
pub trait IntoFieldRef {
    fn into_field_ref(self, model: &str) -> FieldRef;
}

impl IntoFieldRef for &str {
    fn into_field_ref(self, model: &str) -> FieldRef {
        FieldRef::new(model, self)
    }
}

impl IntoFieldRef for String {
    fn into_field_ref(self, model: &str) -> FieldRef {
        FieldRef::new(model, self)
    }
}

impl IntoFieldRef for FieldRef {
    fn into_field_ref(self, _model: &str) -> FieldRef {
        self
    }
}

impl Query {
    pub fn new(model: impl Into<String>) -> Query {
        Query {
            model: model.into(),
            target: None,
            ops: vec![],
        }
    }

    /// Points the query at one of its fields.
    pub fn target(mut self, field: impl IntoFieldRef) -> Query {
        self.target = Some(field.into_field_ref(&self.model));
        self
    }

    pub fn field(&self, name: &str) -> FieldRef {
        FieldRef::new(&self.model, name)
    }

    pub fn push(mut self, op: Operation) -> Query {
        self.ops.push(op);
        self
    }

    pub fn condition(self, condition: Condition) -> Query {
        self.push(Operation::Condition(condition))
    }

    pub fn and(self, field: impl IntoFieldRef, op: Op, value: impl Into<Operand>) -> Query {
        let field = field.into_field_ref(&self.model);
        self.condition(Condition::new(field, op, value))
    }

    pub fn or(self, field: impl IntoFieldRef, op: Op, value: impl Into<Operand>) -> Query {
        let field = field.into_field_ref(&self.model);
        self.condition(Condition::new(field, op, value).connector(Connector::Or))
    }

    pub fn and_not(self, field: impl IntoFieldRef, op: Op, value: impl Into<Operand>) -> Query {
        let field = field.into_field_ref(&self.model);
        self.condition(Condition::new(field, op, value).negate())
    }

    pub fn or_not(self, field: impl IntoFieldRef, op: Op, value: impl Into<Operand>) -> Query {
        let field = field.into_field_ref(&self.model);
        self.condition(
            Condition::new(field, op, value)
                .negate()
                .connector(Connector::Or),
        )
    }

    /// Joins the model of `target` on `field = target.target`.
    ///
    /// `target` must point at a field and carry no conditions of its own,
    /// otherwise it is compiled as a sub-select.
    pub fn join(self, field: impl IntoFieldRef, spec: JoinSpec, target: Query) -> Query {
        let field = field.into_field_ref(&self.model);
        self.condition(Condition::new(field, Op::Eq, target).join(spec))
    }

    pub fn group(self, connector: Connector, query: Query) -> Query {
        self.push(Operation::Group(Group {
            connector,
            not: false,
            query: Some(Box::new(query)),
        }))
    }

    pub fn and_group(self, query: Query) -> Query {
        self.group(Connector::And, query)
    }

    pub fn or_group(self, query: Query) -> Query {
        self.group(Connector::Or, query)
    }

    pub fn not_group(self, connector: Connector, query: Query) -> Query {
        self.push(Operation::Group(Group {
            connector,
            not: true,
            query: Some(Box::new(query)),
        }))
    }

    pub fn project<I, T>(self, items: I) -> Query
    where
        I: IntoIterator<Item = T>,
        T: Into<ProjectionItem>,
    {
        self.projection(ProjectionMode::Replace, items)
    }

    pub fn projection<I, T>(self, mode: ProjectionMode, items: I) -> Query
    where
        I: IntoIterator<Item = T>,
        T: Into<ProjectionItem>,
    {
        self.push(Operation::Project(Projection {
            mode,
            items: items.into_iter().map(Into::into).collect(),
        }))
    }

    pub fn order_by(self, entries: impl IntoIterator<Item = OrderEntry>) -> Query {
        self.push(Operation::Order(OrderClause {
            mode: OrderMode::Replace,
            entries: entries.into_iter().collect(),
        }))
    }

    pub fn order_by_append(self, entries: impl IntoIterator<Item = OrderEntry>) -> Query {
        self.push(Operation::Order(OrderClause {
            mode: OrderMode::Append,
            entries: entries.into_iter().collect(),
        }))
    }

    pub fn group_by<I, T>(self, exprs: I) -> Query
    where
        I: IntoIterator<Item = T>,
        T: Into<OrderExpr>,
    {
        self.push(Operation::GroupBy(
            exprs.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn having(self, query: Query) -> Query {
        self.push(Operation::Having(query))
    }

    pub fn distinct(self) -> Query {
        self.push(Operation::Distinct(None))
    }

    pub fn distinct_on(self, operand: impl Into<LiteralOperand>) -> Query {
        self.push(Operation::Distinct(Some(operand.into())))
    }

    pub fn limit(self, limit: u64) -> Query {
        self.push(Operation::Limit(limit))
    }

    pub fn offset(self, offset: u64) -> Query {
        self.push(Operation::Offset(offset))
    }

    /// Returns `true` if any condition record exists, including inside groups.
    pub fn has_condition(&self) -> bool {
        self.ops.iter().any(|op| match op {
            Operation::Condition(_) => true,
            Operation::Group(Group {
                query: Some(query), ..
            }) => query.has_condition(),
            _ => false,
        })
    }

    /// Returns `true` if any condition, including inside groups, is a join edge.
    pub fn has_joins(&self) -> bool {
        self.ops.iter().any(|op| match op {
            Operation::Condition(condition) => condition.is_join_edge(),
            Operation::Group(Group {
                query: Some(query), ..
            }) => query.has_joins(),
            _ => false,
        })
    }

    /// Returns `true` if a condition that is not a join edge exists.
    pub fn has_filter(&self) -> bool {
        self.ops.iter().any(|op| match op {
            Operation::Condition(condition) => !condition.is_join_edge(),
            Operation::Group(Group {
                query: Some(query), ..
            }) => query.has_filter(),
            _ => false,
        })
    }

    /// The last `LIMIT` record.
    pub fn get_limit(&self) -> Option<u64> {
        self.ops.iter().rev().find_map(|op| match op {
            Operation::Limit(limit) => Some(*limit),
            _ => None,
        })
    }

    /// The last `OFFSET` record.
    pub fn get_offset(&self) -> Option<u64> {
        self.ops.iter().rev().find_map(|op| match op {
            Operation::Offset(offset) => Some(*offset),
            _ => None,
        })
    }

    /// Order entries after applying replace/append semantics of every `ORDER` record.
    pub fn get_order(&self) -> Vec<&OrderEntry> {
        let mut entries = vec![];

        for op in &self.ops {
            if let Operation::Order(clause) = op {
                if clause.mode == OrderMode::Replace {
                    entries.clear();
                }
                entries.extend(clause.entries.iter());
            }
        }

        entries
    }

    pub fn get_group_by(&self) -> Vec<&OrderExpr> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Operation::GroupBy(exprs) => Some(exprs.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// The last `HAVING` record.
    pub fn get_having(&self) -> Option<&Query> {
        self.ops.iter().rev().find_map(|op| match op {
            Operation::Having(query) => Some(query),
            _ => None,
        })
    }

    /// The last `DISTINCT` record. The outer option tells whether one exists.
    pub fn get_distinct(&self) -> Option<Option<&LiteralOperand>> {
        self.ops.iter().rev().find_map(|op| match op {
            Operation::Distinct(operand) => Some(operand.as_ref()),
            _ => None,
        })
    }

    pub fn projections(&self) -> impl Iterator<Item = &Projection> + '_ {
        self.ops.iter().filter_map(|op| match op {
            Operation::Project(projection) => Some(projection),
            _ => None,
        })
    }
}
