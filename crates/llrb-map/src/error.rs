use thiserror::Error;

/// Failures surfaced by [`LlrbMap`](crate::LlrbMap) operations.
///
/// Lookups that find nothing are not errors; they return `None`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// The key cannot be ordered, or a rank lies outside `[0, size)`.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The operation needs a non-empty tree.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}

pub type Result<T> = std::result::Result<T, MapError>;

pub(crate) const UNORDERED_KEY: &str = "key is not comparable with itself";
pub(crate) const EMPTY_TREE: &str = "tree is empty";
pub(crate) const RANK_OUT_OF_RANGE: &str = "rank out of range";
