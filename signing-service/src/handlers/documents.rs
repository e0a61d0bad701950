use crate::dtos::{AddSignerPayload, CreateDocumentPayload, UpdateDocumentPayload};
use crate::extract::{DocumentId, RequiredJson};
use crate::models::company::DEFAULT_COMPANY_ID;
use crate::models::{Document, DocumentWithSigners, Signer};
use crate::services::preparation::{prepare_added_signer, prepare_document, prepare_signer};
use crate::startup::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use service_core::error::AppError;
use service_core::response::Envelope;

const LISTED: &str = "Documents retrieved successfully";
const FETCHED: &str = "Document retrieved successfully";
const CREATED: &str = "Document created successfully";
const UPDATED: &str = "Document updated successfully";
const SIGNER_ADDED: &str = "Signer added successfully";

/// Maps a failure inside `operation` to what the client sees.
///
/// Client-facing errors pass through. Anything else is logged with the operation name and
/// replaced by a generic message.
fn during(operation: &'static str) -> impl Fn(AppError) -> AppError {
    move |err| match err {
        AppError::Upstream(ref message) => {
            tracing::error!(operation, error = %message, "Signing provider error during {}", operation);
            err
        }
        err if err.is_client_facing() => err,
        err => {
            tracing::error!(operation, error = ?err, "Unexpected error during {}", operation);
            AppError::OperationFailed(operation.to_string())
        }
    }
}

async fn find_document(state: &AppState, id: i64) -> Result<Document, AppError> {
    state
        .store
        .get_document(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document".to_string()))
}

#[tracing::instrument(skip(state))]
pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<DocumentWithSigners>>, AppError> {
    let documents = state
        .store
        .list_documents()
        .await
        .map_err(during("document listing"))?;

    Ok(Envelope::ok(LISTED, documents))
}

#[tracing::instrument(skip(state))]
pub async fn get_document(
    State(state): State<AppState>,
    DocumentId(id): DocumentId,
) -> Result<Envelope<DocumentWithSigners>, AppError> {
    let document = state
        .store
        .get_document_with_signers(id)
        .await
        .map_err(during("document lookup"))?
        .ok_or_else(|| AppError::NotFound("Document".to_string()))?;

    Ok(Envelope::ok(FETCHED, document))
}

#[tracing::instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_document(
    State(state): State<AppState>,
    RequiredJson(payload): RequiredJson<CreateDocumentPayload>,
) -> Result<Envelope<DocumentWithSigners>, AppError> {
    let operation = "document creation";

    let company_id = payload.company_id.unwrap_or(DEFAULT_COMPANY_ID);
    if state
        .store
        .get_company(company_id)
        .await
        .map_err(during(operation))?
        .is_none()
    {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Invalid data: company {} does not exist",
            company_id
        )));
    }

    let response = state
        .signing
        .create_document(&payload.to_provider_request())
        .await
        .map_err(|e| during(operation)(e.into()))?;

    let document = state
        .store
        .insert_document(&prepare_document(&response, &payload))
        .await
        .map_err(during(operation))?;

    let mut signers = Vec::new();
    match state
        .store
        .insert_signer(&prepare_signer(&response, &payload, document.id))
        .await
    {
        Ok(signer) => signers.push(signer),
        Err(e) => tracing::error!(
            document_id = document.id,
            error = ?e,
            "Failed to save signer for created document"
        ),
    }

    tracing::info!(document_id = document.id, token = %document.provider_token, "Document created");

    Ok(Envelope::created(
        CREATED,
        DocumentWithSigners { document, signers },
    ))
}

#[tracing::instrument(skip(state, payload))]
pub async fn update_document(
    State(state): State<AppState>,
    DocumentId(id): DocumentId,
    RequiredJson(payload): RequiredJson<UpdateDocumentPayload>,
) -> Result<Envelope<DocumentWithSigners>, AppError> {
    let operation = "document update";

    let document = find_document(&state, id).await.map_err(during(operation))?;

    state
        .signing
        .update_document(&document.provider_token, &payload.name)
        .await
        .map_err(|e| during(operation)(e.into()))?;

    state
        .store
        .rename_document(id, &payload.name)
        .await
        .map_err(during(operation))?
        .ok_or_else(|| AppError::NotFound("Document".to_string()))?;

    let updated = state
        .store
        .get_document_with_signers(id)
        .await
        .map_err(during(operation))?
        .ok_or_else(|| AppError::NotFound("Document".to_string()))?;

    Ok(Envelope::ok(UPDATED, updated))
}

#[tracing::instrument(skip(state))]
pub async fn delete_document(
    State(state): State<AppState>,
    DocumentId(id): DocumentId,
) -> Result<impl IntoResponse, AppError> {
    let operation = "document deletion";

    let document = find_document(&state, id).await.map_err(during(operation))?;

    state
        .signing
        .delete_document(&document.provider_token)
        .await
        .map_err(|e| during(operation)(e.into()))?;

    state
        .store
        .delete_document(id)
        .await
        .map_err(during(operation))?;

    tracing::info!(document_id = id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, payload))]
pub async fn add_signer(
    State(state): State<AppState>,
    DocumentId(id): DocumentId,
    RequiredJson(payload): RequiredJson<AddSignerPayload>,
) -> Result<Envelope<Signer>, AppError> {
    let operation = "signer addition";

    let document = find_document(&state, id).await.map_err(during(operation))?;

    let response = state
        .signing
        .add_signer(&document.provider_token, &payload.name, &payload.email)
        .await
        .map_err(|e| during(operation)(e.into()))?;

    let signer = state
        .store
        .insert_signer(&prepare_added_signer(&response, &payload, document.id))
        .await
        .map_err(during(operation))?;

    Ok(Envelope::created(SIGNER_ADDED, signer))
}
