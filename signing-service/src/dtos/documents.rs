use crate::extract::RequiredFields;
use crate::services::signing_client::{CreateDocumentRequest, SignerRequest};
use serde::Deserialize;
use validator::Validate;

/// Body of `POST /documento/create`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDocumentPayload {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
    pub url_documento: String,
    #[validate(length(max = 255, message = "Signer name must be at most 255 characters"))]
    pub nome_signatario: String,
    #[validate(email(message = "Invalid signer email address"))]
    pub email_signatario: String,
    #[serde(default)]
    pub company_id: Option<i64>,
}

impl RequiredFields for CreateDocumentPayload {
    const REQUIRED: &'static [&'static str] =
        &["name", "url_documento", "nome_signatario", "email_signatario"];
}

impl CreateDocumentPayload {
    /// The provider's create-document body: one document with its first signer.
    pub fn to_provider_request(&self) -> CreateDocumentRequest {
        CreateDocumentRequest {
            name: self.name.clone(),
            url_pdf: self.url_documento.clone(),
            signers: vec![SignerRequest {
                name: self.nome_signatario.clone(),
                email: self.email_signatario.clone(),
            }],
        }
    }
}

/// Body of `PUT /documento/update/{id}`. Only the name can change.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDocumentPayload {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: String,
}

impl RequiredFields for UpdateDocumentPayload {
    const REQUIRED: &'static [&'static str] = &["name"];
}

/// Body of `POST /documento/{id}/signers`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddSignerPayload {
    #[validate(length(max = 255, message = "Signer name must be at most 255 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid signer email address"))]
    pub email: String,
}

impl RequiredFields for AddSignerPayload {
    const REQUIRED: &'static [&'static str] = &["name", "email"];
}
