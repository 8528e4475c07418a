use thiserror::Error;

/// Failure taxonomy shared by every data choice variant.
///
/// Not every variant produces every failure: direct and unbound choices never fail,
/// and resource choices downgrade remote failures to "no data". The full set still
/// belongs to the shared signature so generic callers can handle any choice.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The user aborted resolution while being prompted.
    #[error("data resolution was cancelled")]
    Cancelled,
    /// Network or remote-invocation failure.
    #[error("remote failure: {0}")]
    Remote(String),
    /// The value could not be constructed from the fetched content.
    #[error("processing failure: {0}")]
    Processing(String),
}

impl ResolveError {
    /// True for [`ResolveError::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
