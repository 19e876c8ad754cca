mod default;
pub use default::{ComputedDefault, DefaultContext, DefaultEvent, DefaultFlags, DefaultValue};

mod field;
pub use field::{Field, FieldIndex, FieldRef, ForeignKey, ReferentialAction};

mod model;
pub use model::Model;

mod ty;
pub use ty::Type;

use crate::{Error, Result};
use indexmap::IndexMap;

/// Registry of model metadata, keyed by model name.
///
/// The compiler only reads from the schema; models are registered up front by
/// the application.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    models: IndexMap<String, Model>,
}

impl Schema {
    pub fn new() -> Schema {
        Schema::default()
    }

    /// Registers a model. Model names must be unique.
    pub fn register(&mut self, model: Model) -> Result<()> {
        if self.models.contains_key(&model.name) {
            return Err(Error::invalid_schema(format!(
                "model `{}` is already registered",
                model.name
            )));
        }

        self.models.insert(model.name.clone(), model);
        Ok(())
    }

    /// Builder-style variant of [`Schema::register`].
    pub fn with(mut self, model: Model) -> Result<Schema> {
        self.register(model)?;
        Ok(self)
    }

    pub fn model(&self, name: &str) -> Result<&Model> {
        self.models.get(name).ok_or_else(|| {
            Error::invalid_statement(format!("model `{name}` is not registered"))
        })
    }

    pub fn get_model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Resolves a field reference, failing when either the model or the field is missing.
    pub fn field(&self, field: &FieldRef) -> Result<&Field> {
        self.model(&field.model)?.field_by_name(&field.field)
    }

    pub fn models(&self) -> impl ExactSizeIterator<Item = &Model> + '_ {
        self.models.values()
    }
}
