use super::Field;
use crate::{
    stmt::{Literal, Value},
    Record,
};

use std::{fmt, sync::Arc};

/// How a field obtains a value when none was assigned.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// A static value, written into INSERT statements and DDL.
    Value(Value),

    /// A SQL literal such as `CURRENT_TIMESTAMP`, rendered verbatim.
    Literal(Literal),

    /// A value computed at statement generation time.
    Computed(ComputedDefault),
}

/// A default computed by a closure, gated by [`DefaultFlags`].
#[derive(Clone)]
pub struct ComputedDefault {
    pub flags: DefaultFlags,
    func: Arc<dyn Fn(&DefaultContext<'_>) -> Value + Send + Sync>,
}

/// Controls when a computed default applies.
///
/// * `on_insert`: evaluated for INSERT when the field is not dirty.
/// * `on_update`: evaluated for UPDATE when the field is not dirty.
/// * `remote`: the database computes the value. The closure is only evaluated
///   to produce the `DEFAULT` clause of the column definition and the field is
///   left out of INSERT/UPDATE.
/// * `literal`: the closure returns SQL text (as a `Value::String`) that is
///   emitted without escaping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultFlags {
    pub on_insert: bool,
    pub on_update: bool,
    pub remote: bool,
    pub literal: bool,
}

/// Why a default is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultEvent {
    Insert,
    Update,
    /// Rendering the column definition.
    Define,
}

pub struct DefaultContext<'a> {
    pub field: &'a Field,

    /// The instance being written. `None` when rendering DDL.
    pub record: Option<&'a Record>,

    pub event: DefaultEvent,
}

impl ComputedDefault {
    pub fn new(
        flags: DefaultFlags,
        func: Arc<dyn Fn(&DefaultContext<'_>) -> Value + Send + Sync>,
    ) -> ComputedDefault {
        ComputedDefault { flags, func }
    }

    pub fn eval(&self, cx: &DefaultContext<'_>) -> Value {
        (self.func)(cx)
    }

    /// Returns `true` when the default should be evaluated for `event`.
    pub fn applies_to(&self, event: DefaultEvent) -> bool {
        match event {
            DefaultEvent::Insert => self.flags.on_insert && !self.flags.remote,
            DefaultEvent::Update => self.flags.on_update && !self.flags.remote,
            DefaultEvent::Define => self.flags.remote,
        }
    }
}

impl fmt::Debug for ComputedDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedDefault")
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl DefaultFlags {
    /// Evaluated for inserts.
    pub const ON_INSERT: DefaultFlags = DefaultFlags {
        on_insert: true,
        on_update: false,
        remote: false,
        literal: false,
    };

    /// Evaluated for inserts and updates, e.g. a modification timestamp.
    pub const ON_UPDATE: DefaultFlags = DefaultFlags {
        on_update: true,
        ..DefaultFlags::ON_INSERT
    };

    pub const REMOTE: DefaultFlags = DefaultFlags {
        on_insert: false,
        on_update: false,
        remote: true,
        literal: false,
    };

    pub fn literal(self) -> DefaultFlags {
        DefaultFlags {
            literal: true,
            ..self
        }
    }
}
