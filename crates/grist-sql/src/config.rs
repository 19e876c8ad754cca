use serde::Deserialize;

/// Serializer behavior that stays fixed for the lifetime of a [`Serializer`].
///
/// Per-statement behavior is controlled through [`Options`] instead.
///
/// [`Serializer`]: crate::Serializer
/// [`Options`]: crate::Options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What to do with an `IN` list that is empty after normalization.
    pub empty_in_list: EmptyInListPolicy,

    /// Drops a WHERE fragment identical to the one rendered just before it.
    pub dedupe_conditions: bool,

    /// Prefix of generated index names.
    pub index_prefix: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyInListPolicy {
    /// Fail with an operator-misuse error.
    #[default]
    Error,

    /// Leave the condition out of the WHERE clause.
    Elide,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            empty_in_list: EmptyInListPolicy::Error,
            dedupe_conditions: true,
            index_prefix: "idx".to_string(),
        }
    }
}
