use super::{Scope, Serializer};
use crate::Options;

use grist_core::{
    schema::{FieldRef, Model},
    stmt::{Literal, LiteralKind, OrderExpr, ProjectionItem, ProjectionMode, Query},
    Error, Result,
};
use indexmap::IndexMap;

/// A resolved SELECT list.
///
/// Maps the fully qualified name of each projected entry (`Model:field` for
/// fields, the alias or SQL text for literals) to its rendered expression.
/// Entries keep projection order, which is also the result column order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProjectionMap {
    entries: IndexMap<String, String>,
}

impl ProjectionMap {
    pub fn new() -> ProjectionMap {
        ProjectionMap::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(key, sql)| (key.as_str(), sql.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The rendered SELECT list.
    pub fn to_sql(&self) -> String {
        self.entries
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn insert(&mut self, key: String, sql: String) {
        self.entries.entry(key).or_insert(sql);
    }

    fn remove(&mut self, key: &str) {
        self.entries.shift_remove(key);
    }
}

impl Serializer<'_> {
    /// Resolves the SELECT list of `query`.
    ///
    /// Starts from every stored field of the models in scope, applies the
    /// query's projection records in order, then adds the fields the ORDER BY
    /// clause needs when `absorb_order` is set.
    pub(super) fn projection(
        &self,
        query: &Query,
        scope: &Scope<'_>,
        absorb_order: bool,
        opts: &Options,
    ) -> Result<ProjectionMap> {
        let mut projection = ProjectionMap::new();

        for model in &scope.models {
            self.project_model(&mut projection, model, opts);
        }

        for record in query.projections() {
            if record.mode == ProjectionMode::Replace {
                projection = ProjectionMap::new();
            }

            for item in &record.items {
                if record.mode == ProjectionMode::Remove {
                    self.unproject_item(&mut projection, item, opts)?;
                } else {
                    self.project_item(&mut projection, item, opts)?;
                }
            }
        }

        if absorb_order {
            for entry in query.get_order() {
                let OrderExpr::Field(field_ref) = &entry.expr else {
                    continue;
                };

                if !scope.contains(&field_ref.model) {
                    continue;
                }

                self.project_field(&mut projection, field_ref, opts)?;
            }
        }

        Ok(projection)
    }

    /// The SELECT list of a sub-select: its explicit projection when it has
    /// one, otherwise the field the nested query targets.
    pub(super) fn sub_query_projection(
        &self,
        query: &Query,
        opts: &Options,
    ) -> Result<ProjectionMap> {
        let opts = opts.without_projection_aliases();
        let mut projection = ProjectionMap::new();

        let mut explicit = false;
        for record in query.projections() {
            explicit = true;

            if record.mode == ProjectionMode::Replace {
                projection = ProjectionMap::new();
            }

            for item in &record.items {
                if record.mode == ProjectionMode::Remove {
                    self.unproject_item(&mut projection, item, &opts)?;
                } else {
                    self.project_item(&mut projection, item, &opts)?;
                }
            }
        }

        if !explicit {
            let Some(target) = &query.target else {
                return Err(Error::invalid_statement(format!(
                    "nested query on model `{}` has no target field to select",
                    query.model
                )));
            };

            self.project_field(&mut projection, target, &opts)?;
        }

        Ok(projection)
    }

    fn project_model(&self, projection: &mut ProjectionMap, model: &Model, opts: &Options) {
        for field in model.stored_fields() {
            let key = field.full_name();
            let sql = self.projected_column(&key, self.column(model, field), opts);
            projection.insert(key, sql);
        }
    }

    fn project_field(
        &self,
        projection: &mut ProjectionMap,
        field_ref: &FieldRef,
        opts: &Options,
    ) -> Result<()> {
        let key = field_ref.to_string();
        let column = self.column_ref(field_ref, true)?;
        projection.insert(key.clone(), self.projected_column(&key, column, opts));
        Ok(())
    }

    fn project_item(
        &self,
        projection: &mut ProjectionMap,
        item: &ProjectionItem,
        opts: &Options,
    ) -> Result<()> {
        match item {
            ProjectionItem::Field(field_ref) => self.project_field(projection, field_ref, opts)?,
            ProjectionItem::Model(name) => {
                let model = self.schema.model(name)?;
                self.project_model(projection, model, opts);
            }
            ProjectionItem::Literal(literal) => {
                let key = self.literal_key(literal, opts)?;
                projection.insert(key, self.literal(literal, opts)?);
            }
            ProjectionItem::Raw { sql, alias } => {
                let (key, sql) = match alias {
                    Some(alias) if !opts.no_projection_aliases() => (
                        alias.clone(),
                        format!("{sql} AS {}", self.dialect.escape_id(alias)),
                    ),
                    Some(alias) => (alias.clone(), sql.clone()),
                    None => (sql.clone(), sql.clone()),
                };
                projection.insert(key, sql);
            }
        }

        Ok(())
    }

    fn unproject_item(
        &self,
        projection: &mut ProjectionMap,
        item: &ProjectionItem,
        opts: &Options,
    ) -> Result<()> {
        match item {
            ProjectionItem::Field(field_ref) => projection.remove(&field_ref.to_string()),
            ProjectionItem::Model(name) => {
                let model = self.schema.model(name)?;
                for field in &model.fields {
                    projection.remove(&field.full_name());
                }
            }
            ProjectionItem::Literal(literal) => {
                projection.remove(&self.literal_key(literal, opts)?);
            }
            ProjectionItem::Raw { sql, alias } => {
                projection.remove(alias.as_deref().unwrap_or(sql.as_str()));
            }
        }

        Ok(())
    }

    /// Field literals are keyed by their field so that projecting a field
    /// twice, once plainly and once as a literal, yields a single column.
    fn literal_key(&self, literal: &Literal, opts: &Options) -> Result<String> {
        if let Some(alias) = &literal.alias {
            return Ok(alias.clone());
        }

        if let LiteralKind::Field(_) = &literal.kind {
            if let Some(field_ref) = literal.field_ref() {
                return Ok(field_ref.to_string());
            }
        }

        self.literal(literal, &opts.without_projection_aliases())
    }

    fn projected_column(&self, key: &str, column: String, opts: &Options) -> String {
        if opts.no_projection_aliases() {
            column
        } else {
            format!("{column} AS {}", self.dialect.escape_id(key))
        }
    }
}
