use super::DocumentStatus;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "signer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SignerStatus {
    #[default]
    Pending,
    Signed,
    Declined,
}

/// Signer status implied by a document status when the provider reports no signers.
/// Only a signed document implies a signed signer.
impl From<DocumentStatus> for SignerStatus {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::Signed => Self::Signed,
            DocumentStatus::Pending | DocumentStatus::Cancelled | DocumentStatus::Expired => {
                Self::Pending
            }
        }
    }
}

impl std::str::FromStr for SignerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "signed" => Ok(Self::Signed),
            "declined" => Ok(Self::Declined),
            _ => Err(format!("Invalid signer status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Signer {
    pub id: i64,
    pub provider_token: String,
    pub status: SignerStatus,
    pub name: String,
    pub email: String,
    pub external_id: Option<String>,
    pub document_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSigner {
    pub provider_token: String,
    pub status: SignerStatus,
    pub name: String,
    pub email: String,
    pub external_id: Option<String>,
    pub document_id: i64,
}
