use std::time::Duration;

use getset::{CopyGetters, Getters};
use typed_builder::TypedBuilder;

/// Parameters fixed for the lifetime of an index.
#[derive(Debug, Clone, TypedBuilder, CopyGetters)]
pub struct IndexConfig {
    #[getset(get_copy = "pub")]
    #[builder(default = 8)]
    ksize: usize,

    /// Smallest similarity a proposal needs to update a stored protein.
    #[getset(get_copy = "pub")]
    #[builder(default = 0.0)]
    min_similarity: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig::builder().build()
    }
}

/// A table column, by header name or 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Name(String),
    Position(usize),
}

impl From<&str> for Column {
    /// Digits select a position, anything else a header name.
    fn from(value: &str) -> Self {
        match value.parse::<usize>() {
            Ok(position) => Column::Position(position),
            Err(_) => Column::Name(value.into()),
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Column::Name(name) => write!(f, "{:?}", name),
            Column::Position(position) => write!(f, "#{}", position),
        }
    }
}

#[derive(Debug, Clone, TypedBuilder, Getters, CopyGetters)]
pub struct LoadConfig {
    #[getset(get = "pub")]
    #[builder(setter(into))]
    sequence_column: Column,

    #[getset(get = "pub")]
    #[builder(setter(into))]
    payload_column: Column,

    #[getset(get_copy = "pub")]
    #[builder(default = b'\t')]
    delimiter: u8,

    #[getset(get_copy = "pub")]
    #[builder(default = Duration::from_secs(10))]
    progress_interval: Duration,
}
