use super::Error;

/// Error when a query representation is structurally invalid.
///
/// This occurs when:
/// - A query references a model that is not registered
/// - A query, index, join, or ordering references a missing field
/// - A statement shape cannot be compiled (joined DELETE without a primary key)
///
/// These errors are raised synchronously by the statement generators.
#[derive(Debug)]
pub(super) struct InvalidStatement {
    pub(super) message: Box<str>,
}

impl std::error::Error for InvalidStatement {}

impl core::fmt::Display for InvalidStatement {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid statement: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid statement error.
    ///
    /// This is used when a query is malformed or references invalid schema elements.
    pub fn invalid_statement(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidStatement(InvalidStatement {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid statement error.
    pub fn is_invalid_statement(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidStatement(_))
    }
}
