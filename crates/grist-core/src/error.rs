mod invalid_operator;
mod invalid_schema;
mod invalid_statement;
mod unsupported_feature;

use invalid_operator::InvalidOperator;
use invalid_schema::InvalidSchema;
use invalid_statement::InvalidStatement;
use std::sync::Arc;
use unsupported_feature::UnsupportedFeature;

/// An error raised while compiling a query representation into SQL.
///
/// Every statement generator fails with one of four kinds, each with its own
/// constructor and `is_*` predicate. The error is a single pointer wide so
/// that `Result<String>` stays small.
#[derive(Clone)]
pub struct Error {
    kind: Arc<ErrorKind>,
}

impl Error {
    fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self.kind(), f)
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if f.alternate() {
            f.debug_struct("Error").field("kind", self.kind()).finish()
        } else {
            core::fmt::Display::fmt(self, f)
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    InvalidOperator(InvalidOperator),
    InvalidSchema(InvalidSchema),
    InvalidStatement(InvalidStatement),
    UnsupportedFeature(UnsupportedFeature),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            InvalidOperator(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            InvalidStatement(err) => core::fmt::Display::fmt(err, f),
            UnsupportedFeature(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind: Arc::new(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_one_word() {
        assert_eq!(
            core::mem::size_of::<usize>(),
            core::mem::size_of::<Error>()
        );
    }

    #[test]
    fn clones_share_the_kind() {
        let err = Error::invalid_statement("model `Account` is not registered");
        let copy = err.clone();

        assert!(Arc::ptr_eq(&err.kind, &copy.kind));
        assert_eq!(
            copy.to_string(),
            "invalid statement: model `Account` is not registered"
        );
    }

    #[test]
    fn invalid_operator_names_operator_and_field() {
        let err = Error::invalid_operator("GT", "User:name", "cannot be applied to a list");
        assert_eq!(
            err.to_string(),
            "invalid operator GT on User:name: cannot be applied to a list"
        );
        assert!(err.is_invalid_operator());
        assert!(!err.is_invalid_statement());
    }

    #[test]
    fn invalid_operator_without_field() {
        let err = Error::invalid_operator("BETWEEN", "", "unknown comparison operator");
        assert_eq!(
            err.to_string(),
            "invalid operator BETWEEN: unknown comparison operator"
        );
    }

    #[test]
    fn unsupported_feature_display() {
        let err = Error::unsupported_feature("MySQL does not support RETURNING");
        assert_eq!(
            err.to_string(),
            "unsupported feature: MySQL does not support RETURNING"
        );
        assert!(err.is_unsupported_feature());
    }

    #[test]
    fn invalid_schema_display() {
        let err = Error::invalid_schema("join cycle between `A` and `B`");
        assert_eq!(err.to_string(), "invalid schema: join cycle between `A` and `B`");
        assert!(err.is_invalid_schema());
        assert_eq!(format!("{err:?}"), err.to_string());
    }
}
