use super::Serializer;
use crate::{options::StatementKind, Options};

use grist_core::{
    schema::{DefaultContext, DefaultEvent, DefaultValue, Field, Model},
    stmt::Value,
    Error, Record, Result,
};
use indexmap::IndexMap;

/// A value written into a column.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Cell {
    Value(Value),

    /// SQL text emitted without escaping
    Raw(String),
}

impl Serializer<'_> {
    /// Generates a bulk `INSERT INTO ... VALUES ...` for `records`.
    ///
    /// The column list is the union of the columns set by every record, in
    /// model field order. A record that does not set one of the columns gets
    /// the dialect's placeholder in its place. Returns `None` when there is
    /// nothing to insert.
    pub fn generate_insert_statement(
        &self,
        model: &str,
        records: &[Record],
        opts: &Options,
    ) -> Result<Option<String>> {
        let model = self.schema.model(model)?;
        let opts = opts.derive(|o| o.statement = Some(StatementKind::Insert));

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            rows.push(self.insert_row(model, record, &opts)?);
        }

        let columns: Vec<&Field> = model
            .stored_fields()
            .filter(|field| rows.iter().any(|row| row.contains_key(&field.name)))
            .collect();

        if columns.is_empty() {
            return Ok(None);
        }

        let tuples: Vec<String> = rows
            .iter()
            .map(|row| {
                let values: Vec<String> = columns
                    .iter()
                    .map(|field| match row.get(&field.name) {
                        Some(cell) => self.cell(cell, field),
                        None => self.dialect.missing_value_placeholder().to_string(),
                    })
                    .collect();
                format!("({})", values.join(", "))
            })
            .collect();

        let column_names: Vec<String> = columns
            .iter()
            .map(|field| self.dialect.escape_id(&field.column_name))
            .collect();

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table(model),
            column_names.join(", "),
            tuples.join(", ")
        );

        if let Some(tail) = self.dialect.insert_tail(model, &opts) {
            sql.push(' ');
            sql.push_str(&tail);
        }

        sql.push_str(&self.returning(model, &opts)?);

        tracing::debug!(
            target: "grist.sql",
            statement = "INSERT",
            model = %model.name,
            rows = records.len(),
            sql = %sql,
            "generated statement"
        );

        Ok(Some(sql))
    }

    /// The cells of one record: its dirty fields, plus the defaults of the
    /// fields it does not set.
    fn insert_row(
        &self,
        model: &Model,
        record: &Record,
        opts: &Options,
    ) -> Result<IndexMap<String, Cell>> {
        self.check_record_model(model, record)?;

        let changes = record.changes();
        let mut row = IndexMap::new();

        for field in model.stored_fields() {
            if let Some(change) = changes.get(&field.name) {
                row.insert(field.name.clone(), Cell::Value(change.current.clone()));
                continue;
            }

            let cell = match &field.default {
                Some(DefaultValue::Value(value)) => Some(Cell::Value(value.clone())),
                Some(DefaultValue::Literal(literal)) => Some(Cell::Raw(
                    self.literal(literal, &opts.without_projection_aliases())?,
                )),
                Some(DefaultValue::Computed(_)) => {
                    self.computed_default(field, Some(record), DefaultEvent::Insert)
                }
                None => None,
            };

            if let Some(cell) = cell {
                row.insert(field.name.clone(), cell);
            }
        }

        Ok(row)
    }

    /// Evaluates the computed default of `field` if it applies to `event`.
    pub(super) fn computed_default(
        &self,
        field: &Field,
        record: Option<&Record>,
        event: DefaultEvent,
    ) -> Option<Cell> {
        let Some(DefaultValue::Computed(computed)) = &field.default else {
            return None;
        };

        if !computed.applies_to(event) {
            return None;
        }

        let value = computed.eval(&DefaultContext {
            field,
            record,
            event,
        });

        if computed.flags.literal {
            let sql = match value {
                Value::String(sql) => sql,
                value => self.escape_value(&value, Some(field)),
            };
            Some(Cell::Raw(sql))
        } else {
            Some(Cell::Value(value))
        }
    }

    pub(super) fn cell(&self, cell: &Cell, field: &Field) -> String {
        match cell {
            Cell::Value(value) => self.escape_value(value, Some(field)),
            Cell::Raw(sql) => sql.clone(),
        }
    }

    /// Checks that `record` is an instance of `model` and only sets its fields.
    pub(super) fn check_record_model(&self, model: &Model, record: &Record) -> Result<()> {
        if record.model() != model.name {
            return Err(Error::invalid_statement(format!(
                "cannot write a `{}` instance to model `{}`",
                record.model(),
                model.name
            )));
        }

        if let Some(name) = record
            .changes()
            .keys()
            .find(|name| model.get_field(name).is_none())
        {
            return Err(Error::invalid_statement(format!(
                "model `{}` has no field `{name}`",
                model.name
            )));
        }

        Ok(())
    }
}
