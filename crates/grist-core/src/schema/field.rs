use super::{ComputedDefault, DefaultFlags, DefaultValue, Type};
use crate::stmt::{Literal, Value};

use heck::ToSnakeCase;
use std::{fmt, sync::Arc};

#[derive(Debug, Clone)]
pub struct Field {
    /// The field name, as used by the application.
    pub name: String,

    /// The name of the column in the database.
    pub column_name: String,

    /// Name of the model owning the field. Set when the field is added to a model.
    pub model: String,

    /// The column storage type.
    pub ty: Type,

    /// True if the field is part of the model's primary key
    pub primary_key: bool,

    /// True if the database assigns the value on insert.
    pub auto_increment: bool,

    /// True if values are unique across rows
    pub unique: bool,

    /// Whether or not the column accepts NULL
    pub nullable: bool,

    /// Virtual fields have no backing column.
    pub is_virtual: bool,

    /// Indices the column participates in.
    pub indices: Vec<FieldIndex>,

    pub foreign_key: Option<ForeignKey>,

    pub default: Option<DefaultValue>,
}

/// Names a field through its model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub model: String,
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIndex {
    /// An index on this column alone
    Single,

    /// An index on this column combined with the named fields of the same model
    Composite(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Referenced model
    pub model: String,

    /// Referenced field
    pub field: String,

    pub on_delete: Option<ReferentialAction>,

    pub on_update: Option<ReferentialAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    Cascade,
    Restrict,
    SetNull,
    SetDefault,
    NoAction,
}

impl Field {
    /// Creates a nullable field whose column name is the snake-cased field name.
    pub fn new(name: impl Into<String>, ty: Type) -> Field {
        let name = name.into();

        Field {
            column_name: name.to_snake_case(),
            name,
            model: String::new(),
            ty,
            primary_key: false,
            auto_increment: false,
            unique: false,
            nullable: true,
            is_virtual: false,
            indices: vec![],
            foreign_key: None,
            default: None,
        }
    }

    pub fn column(mut self, column_name: impl Into<String>) -> Field {
        self.column_name = column_name.into();
        self
    }

    /// Marks the field as (part of) the primary key. Primary keys are never nullable.
    pub fn primary_key(mut self) -> Field {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Field {
        self.auto_increment = true;
        self
    }

    pub fn unique(mut self) -> Field {
        self.unique = true;
        self
    }

    pub fn not_null(mut self) -> Field {
        self.nullable = false;
        self
    }

    pub fn virtual_field(mut self) -> Field {
        self.is_virtual = true;
        self
    }

    pub fn index(mut self) -> Field {
        self.indices.push(FieldIndex::Single);
        self
    }

    /// Adds a composite index over this field and `others`.
    pub fn index_with<I, S>(mut self, others: I) -> Field
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.push(FieldIndex::Composite(
            others.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn references(mut self, model: impl Into<String>, field: impl Into<String>) -> Field {
        self.foreign_key = Some(ForeignKey {
            model: model.into(),
            field: field.into(),
            on_delete: None,
            on_update: None,
        });
        self
    }

    /// Sets the `ON DELETE` action of the foreign key. Has no effect without one.
    pub fn on_delete(mut self, action: ReferentialAction) -> Field {
        if let Some(fk) = &mut self.foreign_key {
            fk.on_delete = Some(action);
        }
        self
    }

    /// Sets the `ON UPDATE` action of the foreign key. Has no effect without one.
    pub fn on_update(mut self, action: ReferentialAction) -> Field {
        if let Some(fk) = &mut self.foreign_key {
            fk.on_update = Some(action);
        }
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Field {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    pub fn default_literal(mut self, literal: Literal) -> Field {
        self.default = Some(DefaultValue::Literal(literal));
        self
    }

    pub fn default_fn<F>(mut self, flags: DefaultFlags, func: F) -> Field
    where
        F: Fn(&super::DefaultContext<'_>) -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Computed(ComputedDefault::new(
            flags,
            Arc::new(func),
        )));
        self
    }

    pub fn field_ref(&self) -> FieldRef {
        FieldRef::new(&self.model, &self.name)
    }

    /// Returns the `Model:field` name used for projection aliases and errors.
    pub fn full_name(&self) -> String {
        format!("{}:{}", self.model, self.name)
    }

    pub fn is_foreign_key(&self) -> bool {
        self.foreign_key.is_some()
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }
}

impl FieldRef {
    pub fn new(model: impl Into<String>, field: impl Into<String>) -> FieldRef {
        FieldRef {
            model: model.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.model, self.field)
    }
}

impl ReferentialAction {
    pub fn as_sql(self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
            ReferentialAction::NoAction => "NO ACTION",
        }
    }
}
