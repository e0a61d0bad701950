pub mod documents;
pub mod health;

pub use documents::{
    add_signer, create_document, delete_document, get_document, list_documents,
    update_document,
};
pub use health::{health_check, metrics_endpoint, readiness_check};
