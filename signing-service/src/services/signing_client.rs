//! Client for the external e-signature provider.
//!
//! Every call carries the bearer token and a JSON content type and is bounded by the
//! configured timeout. Non-2xx responses become [`ProviderError::Api`]; callers decide
//! how to present them.

use crate::config::ProviderConfig;
use crate::services::metrics::record_provider_call;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-2xx status.
    #[error("{message}")]
    Api {
        status: u16,
        body: String,
        message: String,
    },

    #[error("Failed to reach signing provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected signing provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid signing provider configuration: {0}")]
    Configuration(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Api { message, .. } => AppError::Upstream(message),
            other => AppError::InternalError(anyhow::Error::new(other)),
        }
    }
}

/// Request body for `POST /docs/`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDocumentRequest {
    pub name: String,
    pub url_pdf: String,
    pub signers: Vec<SignerRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignerRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
struct RenameDocumentRequest<'a> {
    name: &'a str,
}

/// Document as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderDocument {
    pub open_id: i64,
    pub token: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_by: Option<ProviderCreator>,
    /// Outer `None`: field absent. `Some(None)`: explicitly null.
    #[serde(default, deserialize_with = "present")]
    pub external_id: Option<Option<String>>,
    #[serde(default)]
    pub signers: Vec<ProviderSigner>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCreator {
    #[serde(default)]
    pub email: Option<String>,
}

/// Signer as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSigner {
    pub token: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub external_id: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Clone)]
pub struct SigningClient {
    client: Client,
    base_url: String,
}

impl SigningClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let mut auth = HeaderValue::from_str(&format!(
            "Bearer {}",
            config.api_token.expose_secret()
        ))
        .map_err(|_| {
            ProviderError::Configuration("API token is not a valid header value".to_string())
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[tracing::instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_document(
        &self,
        request: &CreateDocumentRequest,
    ) -> Result<ProviderDocument, ProviderError> {
        let url = format!("{}/docs/", self.base_url);
        let result: Result<ProviderDocument, ProviderError> = async {
            let response = self.client.post(&url).json(request).send().await?;
            parse_json(check(response, "Signing provider error").await?).await
        }
        .await;

        record_provider_call("create_document", &result);
        if let Ok(document) = &result {
            tracing::info!(
                open_id = document.open_id,
                token = %document.token,
                "Provider document created"
            );
        }
        result
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_document(&self, token: &str, name: &str) -> Result<(), ProviderError> {
        let url = format!("{}/docs/{}/", self.base_url, token);
        let result: Result<(), ProviderError> = async {
            let response = self
                .client
                .put(&url)
                .json(&RenameDocumentRequest { name })
                .send()
                .await?;
            check(response, "Signing provider error").await.map(|_| ())
        }
        .await;

        record_provider_call("update_document", &result);
        result
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_document(&self, token: &str) -> Result<(), ProviderError> {
        let url = format!("{}/docs/{}/", self.base_url, token);
        let result: Result<(), ProviderError> = async {
            let response = self.client.delete(&url).send().await?;
            check(response, "Failed to delete document").await.map(|_| ())
        }
        .await;

        record_provider_call("delete_document", &result);
        result
    }

    #[tracing::instrument(skip(self, email))]
    pub async fn add_signer(
        &self,
        document_token: &str,
        name: &str,
        email: &str,
    ) -> Result<ProviderSigner, ProviderError> {
        let url = format!("{}/docs/{}/add-signer/", self.base_url, document_token);
        let request = SignerRequest {
            name: name.to_string(),
            email: email.to_string(),
        };
        let result: Result<ProviderSigner, ProviderError> = async {
            let response = self.client.post(&url).json(&request).send().await?;
            parse_json(check(response, "Signing provider error").await?).await
        }
        .await;

        record_provider_call("add_signer", &result);
        result
    }
}

/// Turns a non-2xx response into [`ProviderError::Api`], keeping the raw body.
async fn check(response: Response, prefix: &str) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = %status, body = %body, "Signing provider rejected request");

    Err(ProviderError::Api {
        status: status.as_u16(),
        message: format!("{}: {}", prefix, body),
        body,
    })
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
