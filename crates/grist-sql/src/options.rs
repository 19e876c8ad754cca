use crate::serializer::ProjectionMap;

use std::sync::Arc;

/// Per-call settings threaded through every serializer function.
///
/// `Options` is an immutable chain of layers. [`Options::derive`] returns a
/// new handle whose top layer overrides some keys and defers everything else
/// to the parent. The parent is never modified, so two derivations of the same
/// options never observe each other's overrides.
#[derive(Debug, Clone, Default)]
pub struct Options {
    layer: Option<Arc<Layer>>,
}

#[derive(Debug)]
struct Layer {
    parent: Option<Arc<Layer>>,
    overrides: Overrides,
}

/// The kind of statement being generated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
    Ddl,
}

/// A `LIMIT` imposed on a sub-query by its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Rows(u64),

    /// The dialect's spelling of "no limit"
    Unbounded,
}

macro_rules! options {
    (
        $(
            $( #[$attr:meta] )*
            $name:ident: $ty:ty = $default:expr;
        )*
    ) => {
        /// Keys set by one layer. `None` defers to the parent layer.
        #[derive(Debug, Default, Clone)]
        pub struct Overrides {
            $(
                $( #[$attr] )*
                pub $name: Option<$ty>,
            )*
        }

        impl Options {
            $(
                $( #[$attr] )*
                pub fn $name(&self) -> $ty {
                    self.lookup(|overrides| overrides.$name.clone())
                        .unwrap_or_else(|| $default)
                }
            )*
        }
    };
}

options! {
    /// The statement being generated.
    statement: StatementKind = StatementKind::Select;

    /// Set while rendering a SELECT nested in another statement.
    is_sub_query: bool = false;

    /// Forces a `LIMIT` on a sub-query, which otherwise omits it.
    force_limit: Option<Limit> = None;

    /// Forces an `OFFSET` on a sub-query, which otherwise omits it.
    force_offset: Option<u64> = None;

    /// The projection resolved for the statement being rendered.
    projection_fields: Option<Arc<ProjectionMap>> = None;

    /// Raw SELECT list used instead of the resolved projection.
    select_list: Option<String> = None;

    /// Omits ` AS ...` from projected fields and literals.
    no_projection_aliases: bool = false;

    /// Set while rendering a literal nested in another literal.
    sub_field: bool = false;

    /// Flips the direction of every ORDER BY entry.
    reverse_order: bool = false;

    /// Places each column of a CREATE TABLE on its own line.
    newlines: bool = false;

    if_not_exists: bool = false;

    if_exists: bool = false;

    cascade: bool = false;

    concurrently: bool = false;

    /// Makes SELECT generation return the resolved projection.
    return_field_projection: bool = false;

    /// Field names to return from INSERT, UPDATE and DELETE.
    returning: Option<Vec<String>> = None;

    /// Alias of the target table of a DELETE.
    table_alias: Option<String> = None;

    /// Permits ordering by columns missing from the projection.
    allow_unprojected_order: bool = false;

    /// Set while rendering a `SELECT DISTINCT`.
    distinct: bool = false;
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    /// Returns a new layer on top of `self` with the keys set by `f`.
    pub fn derive(&self, f: impl FnOnce(&mut Overrides)) -> Options {
        let mut overrides = Overrides::default();
        f(&mut overrides);

        Options {
            layer: Some(Arc::new(Layer {
                parent: self.layer.clone(),
                overrides,
            })),
        }
    }

    /// Options for a SELECT nested in the statement described by `self`.
    ///
    /// Keys describing the enclosing statement's own SELECT list and limits
    /// are reset so they do not leak into the nested query.
    pub(crate) fn sub_query(&self) -> Options {
        self.derive(|o| {
            o.statement = Some(StatementKind::Select);
            o.is_sub_query = Some(true);
            o.force_limit = Some(None);
            o.force_offset = Some(None);
            o.projection_fields = Some(None);
            o.select_list = Some(None);
            o.return_field_projection = Some(false);
            o.reverse_order = Some(false);
            o.distinct = Some(false);
            o.sub_field = Some(false);
        })
    }

    pub fn with_if_not_exists(&self) -> Options {
        self.derive(|o| o.if_not_exists = Some(true))
    }

    pub fn with_if_exists(&self) -> Options {
        self.derive(|o| o.if_exists = Some(true))
    }

    pub fn with_cascade(&self) -> Options {
        self.derive(|o| o.cascade = Some(true))
    }

    pub fn with_concurrently(&self) -> Options {
        self.derive(|o| o.concurrently = Some(true))
    }

    pub fn with_newlines(&self) -> Options {
        self.derive(|o| o.newlines = Some(true))
    }

    pub fn without_projection_aliases(&self) -> Options {
        self.derive(|o| o.no_projection_aliases = Some(true))
    }

    pub fn with_field_projection(&self) -> Options {
        self.derive(|o| o.return_field_projection = Some(true))
    }

    pub fn with_reverse_order(&self) -> Options {
        self.derive(|o| o.reverse_order = Some(true))
    }

    pub fn with_force_limit(&self, limit: Limit) -> Options {
        self.derive(|o| o.force_limit = Some(Some(limit)))
    }

    pub fn with_returning<I, S>(&self, fields: I) -> Options
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        self.derive(|o| o.returning = Some(Some(fields)))
    }

    /// Walks the chain from the top layer down, returning the first value set.
    fn lookup<T>(&self, get: impl Fn(&Overrides) -> Option<T>) -> Option<T> {
        let mut layer = self.layer.as_deref();

        while let Some(current) = layer {
            if let Some(value) = get(&current.overrides) {
                return Some(value);
            }

            layer = current.parent.as_deref();
        }

        None
    }
}
