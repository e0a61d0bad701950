//! PostgreSQL-backed document store.

use crate::models::{Company, Document, DocumentWithSigners, NewDocument, NewSigner, Signer};
use crate::services::store::DocumentStore;
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, instrument};

const DOCUMENT_COLUMNS: &str = "id, external_open_id, provider_token, name, status, created_at, \
     updated_at, created_by, company_id, external_id";

const SIGNER_COLUMNS: &str = "id, provider_token, status, name, email, external_id, document_id";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "signing-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn signers_for(&self, document_ids: &[i64]) -> Result<Vec<Signer>, AppError> {
        sqlx::query_as::<_, Signer>(&format!(
            "SELECT {SIGNER_COLUMNS} FROM signer WHERE document_id = ANY($1) ORDER BY id"
        ))
        .bind(document_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to load signers: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for Database {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_company(&self, company_id: i64) -> Result<Option<Company>, AppError> {
        sqlx::query_as::<_, Company>(
            "SELECT id, name, created_at, updated_at, api_token FROM company WHERE id = $1",
        )
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get company: {}", e)))
    }

    #[instrument(skip(self))]
    async fn list_documents(&self) -> Result<Vec<DocumentWithSigners>, AppError> {
        let documents = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM document ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list documents: {}", e)))?;

        let ids: Vec<i64> = documents.iter().map(|d| d.id).collect();
        let mut by_document: HashMap<i64, Vec<Signer>> = HashMap::new();
        for signer in self.signers_for(&ids).await? {
            by_document.entry(signer.document_id).or_default().push(signer);
        }

        Ok(documents
            .into_iter()
            .map(|document| DocumentWithSigners {
                signers: by_document.remove(&document.id).unwrap_or_default(),
                document,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_document(&self, document_id: i64) -> Result<Option<Document>, AppError> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM document WHERE id = $1"
        ))
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get document: {}", e)))
    }

    #[instrument(skip(self))]
    async fn list_signers(&self, document_id: i64) -> Result<Vec<Signer>, AppError> {
        self.signers_for(&[document_id]).await
    }

    #[instrument(skip(self, document), fields(token = %document.provider_token))]
    async fn insert_document(&self, document: &NewDocument) -> Result<Document, AppError> {
        let created = sqlx::query_as::<_, Document>(&format!(
            r#"
            INSERT INTO document (external_open_id, provider_token, name, status, created_by, company_id, external_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(document.external_open_id)
        .bind(&document.provider_token)
        .bind(&document.name)
        .bind(document.status)
        .bind(&document.created_by)
        .bind(document.company_id)
        .bind(&document.external_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create document: {}", e)))?;

        info!(document_id = created.id, "Document stored");
        Ok(created)
    }

    #[instrument(skip(self, signer), fields(document_id = signer.document_id))]
    async fn insert_signer(&self, signer: &NewSigner) -> Result<Signer, AppError> {
        sqlx::query_as::<_, Signer>(&format!(
            r#"
            INSERT INTO signer (provider_token, status, name, email, external_id, document_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SIGNER_COLUMNS}
            "#
        ))
        .bind(&signer.provider_token)
        .bind(signer.status)
        .bind(&signer.name)
        .bind(&signer.email)
        .bind(&signer.external_id)
        .bind(signer.document_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create signer: {}", e)))
    }

    #[instrument(skip(self))]
    async fn rename_document(
        &self,
        document_id: i64,
        name: &str,
    ) -> Result<Option<Document>, AppError> {
        sqlx::query_as::<_, Document>(&format!(
            "UPDATE document SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(document_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update document: {}", e)))
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, document_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM document WHERE id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete document: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}
