//! Document model: the local mirror of a provider document.

use super::Signer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Document status as last reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Signed,
    Cancelled,
    Expired,
}

impl std::str::FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "signed" => Ok(Self::Signed),
            "cancelled" => Ok(Self::Cancelled),
            "expired" => Ok(Self::Expired),
            _ => Err(format!("Invalid document status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub external_open_id: i64,
    pub provider_token: String,
    pub name: String,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub company_id: i64,
    pub external_id: Option<String>,
}

/// A document with its signers expanded inline, as returned by every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentWithSigners {
    #[serde(flatten)]
    pub document: Document,
    pub signers: Vec<Signer>,
}

/// Persistence-ready document fields; ids and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub external_open_id: i64,
    pub provider_token: String,
    pub name: String,
    pub status: DocumentStatus,
    pub created_by: String,
    pub company_id: i64,
    pub external_id: Option<String>,
}
