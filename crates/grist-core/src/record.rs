use crate::stmt::Value;

use indexmap::IndexMap;

/// A model instance: the values assigned by the application plus the values
/// last read from, or written to, the database.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: String,
    values: IndexMap<String, Value>,
    persisted: IndexMap<String, Value>,
}

/// The previous and current value of a dirty field.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    /// `None` when the field was never persisted
    pub previous: Option<Value>,
    pub current: Value,
}

/// Dirty fields of one instance, keyed by field name, in assignment order.
pub type Changes = IndexMap<String, Change>;

impl Record {
    /// A new, never persisted instance.
    pub fn new(model: impl Into<String>) -> Record {
        Record {
            model: model.into(),
            values: IndexMap::new(),
            persisted: IndexMap::new(),
        }
    }

    /// An instance loaded from the database. It starts with no dirty fields.
    pub fn loaded<I, K, V>(model: impl Into<String>, values: I) -> Record
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let values: IndexMap<String, Value> = values
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        Record {
            model: model.into(),
            persisted: values.clone(),
            values,
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Record {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Fields whose current value differs from the persisted one.
    pub fn changes(&self) -> Changes {
        self.values
            .iter()
            .filter_map(|(name, current)| {
                let previous = self.persisted.get(name);

                if previous == Some(current) {
                    return None;
                }

                Some((
                    name.clone(),
                    Change {
                        previous: previous.cloned(),
                        current: current.clone(),
                    },
                ))
            })
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.values
            .iter()
            .any(|(name, value)| self.persisted.get(name) != Some(value))
    }

    /// Records the current values as persisted, clearing the delta.
    pub fn mark_persisted(&mut self) {
        self.persisted = self.values.clone();
    }
}
