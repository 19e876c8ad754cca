/// Database storage type of a column.
///
/// The dialect decides how each variant is spelled in DDL; two fields whose
/// types render to the same text are considered the same type when diffing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A boolean value
    Boolean,

    /// A signed integer of `n` bytes
    Integer(u8),

    /// A floating point number of `n` bytes
    Float(u8),

    /// Fixed point number with precision and scale
    Numeric(u8, u8),

    /// Unconstrained text type
    Text,

    /// Text type with an explicit maximum length
    VarChar(u64),

    /// Binary data
    Blob,

    /// 128-bit universally unique identifier (UUID)
    Uuid,

    Date,

    Time,

    /// Date and time without a time zone
    DateTime,

    Json,

    /// A type name passed through verbatim
    Custom(String),
}

impl Type {
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Integer(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Type::Text | Type::VarChar(_))
    }
}
