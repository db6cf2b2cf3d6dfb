//! In-memory repository implementations for testing and development.

mod accounts;

pub use accounts::InMemoryAccountRepository;
