use crate::schema::FieldRef;

/// A SQL fragment that is not a plain value: a raw expression, a field
/// reference, or an aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,

    /// Rendered as ` AS <alias>` in projections
    pub alias: Option<String>,

    /// When `false`, identifiers are emitted without escaping
    pub escape: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    /// SQL text emitted verbatim
    Raw(String),

    Field(LiteralOperand),

    /// `COUNT(*)` when the operand is absent
    Count(Option<LiteralOperand>),

    Sum(LiteralOperand),

    Avg(LiteralOperand),

    Min(LiteralOperand),

    Max(LiteralOperand),

    /// The bare `DISTINCT` keyword when the operand is absent
    Distinct(Option<LiteralOperand>),
}

/// What a literal wraps. One level of nesting is expected, e.g. `COUNT(DISTINCT x)`.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralOperand {
    Field(FieldRef),
    Literal(Box<Literal>),
}

impl Literal {
    fn new(kind: LiteralKind) -> Literal {
        Literal {
            kind,
            alias: None,
            escape: true,
        }
    }

    pub fn raw(sql: impl Into<String>) -> Literal {
        Literal::new(LiteralKind::Raw(sql.into()))
    }

    pub fn field(operand: impl Into<LiteralOperand>) -> Literal {
        Literal::new(LiteralKind::Field(operand.into()))
    }

    /// `COUNT(*)`
    pub fn count_all() -> Literal {
        Literal::new(LiteralKind::Count(None))
    }

    pub fn count(operand: impl Into<LiteralOperand>) -> Literal {
        Literal::new(LiteralKind::Count(Some(operand.into())))
    }

    pub fn sum(operand: impl Into<LiteralOperand>) -> Literal {
        Literal::new(LiteralKind::Sum(operand.into()))
    }

    pub fn avg(operand: impl Into<LiteralOperand>) -> Literal {
        Literal::new(LiteralKind::Avg(operand.into()))
    }

    pub fn min(operand: impl Into<LiteralOperand>) -> Literal {
        Literal::new(LiteralKind::Min(operand.into()))
    }

    pub fn max(operand: impl Into<LiteralOperand>) -> Literal {
        Literal::new(LiteralKind::Max(operand.into()))
    }

    /// The bare `DISTINCT` keyword.
    pub fn distinct_all() -> Literal {
        Literal::new(LiteralKind::Distinct(None))
    }

    pub fn distinct(operand: impl Into<LiteralOperand>) -> Literal {
        Literal::new(LiteralKind::Distinct(Some(operand.into())))
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Literal {
        self.alias = Some(alias.into());
        self
    }

    pub fn no_escape(mut self) -> Literal {
        self.escape = false;
        self
    }

    /// Returns the field this literal ultimately refers to, looking through one
    /// level of nesting.
    pub fn field_ref(&self) -> Option<&FieldRef> {
        let operand = match &self.kind {
            LiteralKind::Raw(_) => return None,
            LiteralKind::Count(None) | LiteralKind::Distinct(None) => return None,
            LiteralKind::Field(operand)
            | LiteralKind::Sum(operand)
            | LiteralKind::Avg(operand)
            | LiteralKind::Min(operand)
            | LiteralKind::Max(operand)
            | LiteralKind::Count(Some(operand))
            | LiteralKind::Distinct(Some(operand)) => operand,
        };

        match operand {
            LiteralOperand::Field(field) => Some(field),
            LiteralOperand::Literal(literal) => literal.field_ref(),
        }
    }
}

impl From<FieldRef> for LiteralOperand {
    fn from(value: FieldRef) -> LiteralOperand {
        LiteralOperand::Field(value)
    }
}

impl From<Literal> for LiteralOperand {
    fn from(value: Literal) -> LiteralOperand {
        LiteralOperand::Literal(Box::new(value))
    }
}
