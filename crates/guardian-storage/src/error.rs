/// Errors that can occur when applying an update to the store.
///
/// # Examples
///
/// ```rust
/// use guardian_storage::error::StorageError;
///
/// let err = StorageError::CounterOverflow {
///     name: "requests".to_string(),
/// };
/// assert!(err.to_string().contains("requests"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Metric names must be non-empty.
    #[error("Storage: metric name is empty")]
    EmptyName,

    /// Adding the delta would overflow the running `i64` sum.
    #[error("Storage: counter '{name}' would overflow")]
    CounterOverflow { name: String },
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
