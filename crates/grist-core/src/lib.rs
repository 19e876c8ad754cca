mod error;
pub use error::Error;

pub mod record;
pub use record::Record;

pub mod schema;
pub use schema::Schema;

pub mod stmt;

/// A Result type alias that uses Grist's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
