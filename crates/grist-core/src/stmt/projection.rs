use super::Literal;
use crate::schema::FieldRef;

/// A `PROJECT` record.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub mode: ProjectionMode,
    pub items: Vec<ProjectionItem>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Discards the current projection
    #[default]
    Replace,

    /// Adds to the current projection
    Add,

    /// Removes from the current projection
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionItem {
    Field(FieldRef),

    /// Every stored field of the named model
    Model(String),

    Literal(Literal),

    /// SQL text emitted verbatim
    Raw { sql: String, alias: Option<String> },
}

impl From<FieldRef> for ProjectionItem {
    fn from(value: FieldRef) -> ProjectionItem {
        ProjectionItem::Field(value)
    }
}

impl From<Literal> for ProjectionItem {
    fn from(value: Literal) -> ProjectionItem {
        ProjectionItem::Literal(value)
    }
}
