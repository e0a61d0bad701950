//! Persistence abstraction for companies, documents and signers.

use crate::models::{Company, Document, DocumentWithSigners, NewDocument, NewSigner, Signer};
use async_trait::async_trait;
use service_core::error::AppError;

/// Local mirror of provider state.
///
/// Deleting a document removes its signers. Reads always expand signers inline.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn health_check(&self) -> Result<(), AppError>;

    async fn get_company(&self, company_id: i64) -> Result<Option<Company>, AppError>;

    /// All documents ordered by id, each with its signers.
    async fn list_documents(&self) -> Result<Vec<DocumentWithSigners>, AppError>;

    async fn get_document(&self, document_id: i64) -> Result<Option<Document>, AppError>;

    /// Signers attached to a document, ordered by id. Empty once the document is deleted.
    async fn list_signers(&self, document_id: i64) -> Result<Vec<Signer>, AppError>;

    async fn get_document_with_signers(
        &self,
        document_id: i64,
    ) -> Result<Option<DocumentWithSigners>, AppError> {
        let Some(document) = self.get_document(document_id).await? else {
            return Ok(None);
        };
        let signers = self.list_signers(document.id).await?;
        Ok(Some(DocumentWithSigners { document, signers }))
    }

    async fn insert_document(&self, document: &NewDocument) -> Result<Document, AppError>;

    async fn insert_signer(&self, signer: &NewSigner) -> Result<Signer, AppError>;

    /// Sets the name and bumps `updated_at`. `None` when the document does not exist.
    async fn rename_document(
        &self,
        document_id: i64,
        name: &str,
    ) -> Result<Option<Document>, AppError>;

    /// Returns whether a document was removed.
    async fn delete_document(&self, document_id: i64) -> Result<bool, AppError>;
}
