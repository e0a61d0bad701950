pub mod documents;

pub use documents::{AddSignerPayload, CreateDocumentPayload, UpdateDocumentPayload};
