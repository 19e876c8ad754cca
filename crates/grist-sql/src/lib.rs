mod config;
pub use config::{Config, EmptyInListPolicy};

pub mod dialect;
pub use dialect::Dialect;

pub mod options;
pub use options::Options;

pub mod serializer;
pub use serializer::{ProjectionMap, SelectQuery, Serializer};

pub use grist_core::{Error, Result};
