pub mod database;
pub mod memory;
pub mod metrics;
pub mod preparation;
pub mod signing_client;
pub mod store;

pub use database::Database;
pub use memory::InMemoryStore;
pub use signing_client::{ProviderError, SigningClient};
pub use store::DocumentStore;
