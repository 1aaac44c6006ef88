use super::Quote;

/// Error raised by a quote store.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("quote store unavailable")]
    Unavailable,
}

/// Append-only store for generated quotes. Quotes are never updated or
/// deleted once written.
pub trait QuoteRepository: Send + Sync {
    fn append(&self, quote: Quote) -> Result<Quote, RepositoryError>;
    fn list(&self) -> Result<Vec<Quote>, RepositoryError>;
}
