//! Company model. Companies own documents.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Company used when a create request carries no `company_id`.
pub const DEFAULT_COMPANY_ID: i64 = 1;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub api_token: String,
}
