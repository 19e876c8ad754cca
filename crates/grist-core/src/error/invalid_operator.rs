use super::Error;

/// Error when a comparison operator is misused.
///
/// This occurs when:
/// - An operator name cannot be parsed
/// - `LIKE`/`NOT LIKE` compares two column references
/// - `LIKE`/`NOT LIKE` is given a value that is not a string
/// - A non-equality operator is applied to a list value
#[derive(Debug)]
pub(super) struct InvalidOperator {
    operator: Box<str>,
    field: Box<str>,
    reason: Box<str>,
}

impl std::error::Error for InvalidOperator {}

impl core::fmt::Display for InvalidOperator {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.field.is_empty() {
            write!(f, "invalid operator {}: {}", self.operator, self.reason)
        } else {
            write!(
                f,
                "invalid operator {} on {}: {}",
                self.operator, self.field, self.reason
            )
        }
    }
}

impl Error {
    /// Creates an invalid operator error naming the offending operator and field.
    ///
    /// `field` may be empty when the operator could not be associated with a field.
    pub fn invalid_operator(
        operator: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::InvalidOperator(InvalidOperator {
            operator: operator.into().into(),
            field: field.into().into(),
            reason: reason.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid operator error.
    pub fn is_invalid_operator(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidOperator(_))
    }
}
