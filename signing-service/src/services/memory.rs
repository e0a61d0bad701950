//! In-process document store, selected with `DATABASE_URL=memory://`.

use crate::models::company::DEFAULT_COMPANY_ID;
use crate::models::{Company, Document, DocumentWithSigners, NewDocument, NewSigner, Signer};
use crate::services::store::DocumentStore;
use async_trait::async_trait;
use chrono::Utc;
use service_core::error::AppError;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    companies: BTreeMap<i64, Company>,
    documents: BTreeMap<i64, Document>,
    signers: BTreeMap<i64, Signer>,
    next_document_id: i64,
    next_signer_id: i64,
}

impl Tables {
    fn signers_of(&self, document_id: i64) -> Vec<Signer> {
        self.signers
            .values()
            .filter(|signer| signer.document_id == document_id)
            .cloned()
            .collect()
    }
}

#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    reject_signers: Arc<AtomicBool>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Empty store holding only the default company.
    pub fn new() -> Self {
        let now = Utc::now();
        let mut tables = Tables::default();
        tables.companies.insert(
            DEFAULT_COMPANY_ID,
            Company {
                id: DEFAULT_COMPANY_ID,
                name: "Default Company".to_string(),
                created_at: now,
                updated_at: now,
                api_token: String::new(),
            },
        );

        Self {
            tables: Arc::new(RwLock::new(tables)),
            reject_signers: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every subsequent signer insert fail with a database error.
    pub fn reject_signer_writes(&self, reject: bool) {
        self.reject_signers.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn get_company(&self, company_id: i64) -> Result<Option<Company>, AppError> {
        Ok(self.tables.read().await.companies.get(&company_id).cloned())
    }

    async fn list_documents(&self) -> Result<Vec<DocumentWithSigners>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .values()
            .map(|document| DocumentWithSigners {
                signers: tables.signers_of(document.id),
                document: document.clone(),
            })
            .collect())
    }

    async fn get_document(&self, document_id: i64) -> Result<Option<Document>, AppError> {
        Ok(self.tables.read().await.documents.get(&document_id).cloned())
    }

    async fn list_signers(&self, document_id: i64) -> Result<Vec<Signer>, AppError> {
        Ok(self.tables.read().await.signers_of(document_id))
    }

    async fn insert_document(&self, document: &NewDocument) -> Result<Document, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.companies.contains_key(&document.company_id) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "company {} does not exist",
                document.company_id
            )));
        }

        tables.next_document_id += 1;
        let now = Utc::now();
        let stored = Document {
            id: tables.next_document_id,
            external_open_id: document.external_open_id,
            provider_token: document.provider_token.clone(),
            name: document.name.clone(),
            status: document.status,
            created_at: now,
            updated_at: now,
            created_by: document.created_by.clone(),
            company_id: document.company_id,
            external_id: document.external_id.clone(),
        };
        tables.documents.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn insert_signer(&self, signer: &NewSigner) -> Result<Signer, AppError> {
        if self.reject_signers.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "signer writes are disabled"
            )));
        }

        let mut tables = self.tables.write().await;
        if !tables.documents.contains_key(&signer.document_id) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "document {} does not exist",
                signer.document_id
            )));
        }

        tables.next_signer_id += 1;
        let stored = Signer {
            id: tables.next_signer_id,
            provider_token: signer.provider_token.clone(),
            status: signer.status,
            name: signer.name.clone(),
            email: signer.email.clone(),
            external_id: signer.external_id.clone(),
            document_id: signer.document_id,
        };
        tables.signers.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn rename_document(
        &self,
        document_id: i64,
        name: &str,
    ) -> Result<Option<Document>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.documents.get_mut(&document_id).map(|document| {
            document.name = name.to_string();
            document.updated_at = Utc::now();
            document.clone()
        }))
    }

    async fn delete_document(&self, document_id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let removed = tables.documents.remove(&document_id).is_some();
        if removed {
            tables
                .signers
                .retain(|_, signer| signer.document_id != document_id);
        }
        Ok(removed)
    }
}
