//! Consumer-facing emission states
//!
//! The repository reports progress over an ordered channel using this closed
//! variant set. Consumers must process emissions in arrival order; a single
//! invocation never re-delivers a state.

/// Tagged state emitted by repository queries
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    /// Work started (`true`) or finished (`false`)
    Loading(bool),
    /// Data read back from the local store
    Success(Option<T>),
    /// Terminal failure for this invocation; any previously cached data may
    /// ride along for display
    Error { message: String, data: Option<T> },
}

impl<T> Resource<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Resource::Error {
            message: message.into(),
            data: None,
        }
    }
}
