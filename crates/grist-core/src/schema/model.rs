use super::Field;
use crate::{Error, Result};

use heck::ToSnakeCase;

#[derive(Debug, Clone)]
pub struct Model {
    /// Name of the model, e.g. `User`
    pub name: String,

    /// Name of the backing table, e.g. `users`
    pub table_name: String,

    /// Fields in declaration order
    pub fields: Vec<Field>,
}

impl Model {
    /// Creates a model whose table name is the pluralized, snake-cased model name.
    pub fn new(name: impl Into<String>) -> Model {
        let name = name.into();
        let table_name = pluralizer::pluralize(&name.to_snake_case(), 2, false);

        Model {
            name,
            table_name,
            fields: vec![],
        }
    }

    pub fn table(mut self, table_name: impl Into<String>) -> Model {
        self.table_name = table_name.into();
        self
    }

    /// Adds a field, taking ownership of it on behalf of this model.
    pub fn field(mut self, mut field: Field) -> Model {
        field.model = self.name.clone();
        self.fields.push(field);
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Looks up a field by name, failing with a structural error when it is missing.
    pub fn field_by_name(&self, name: &str) -> Result<&Field> {
        self.get_field(name).ok_or_else(|| {
            Error::invalid_statement(format!(
                "model `{}` has no field `{name}`",
                self.name
            ))
        })
    }

    /// The first primary key field, if any.
    pub fn primary_key(&self) -> Option<&Field> {
        self.fields.iter().find(|field| field.primary_key)
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| field.primary_key)
    }

    /// Fields backed by a column, in declaration order.
    pub fn stored_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| !field.is_virtual)
    }
}
