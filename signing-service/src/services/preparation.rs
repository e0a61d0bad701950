//! Maps provider responses plus the incoming request into persistence-ready records.
//!
//! Pure functions: no I/O, no clock. Defaults fill in whatever the provider omits.

use crate::dtos::{AddSignerPayload, CreateDocumentPayload};
use crate::models::company::DEFAULT_COMPANY_ID;
use crate::models::{DocumentStatus, NewDocument, NewSigner, SignerStatus};
use crate::services::signing_client::{ProviderDocument, ProviderSigner};
use std::str::FromStr;

/// Creator recorded when the provider does not report one.
pub const DEFAULT_CREATED_BY: &str = "system";

/// External id stored when the provider response has no `external_id` field at all.
pub const DEFAULT_EXTERNAL_ID: &str = "empty";

pub fn prepare_document(
    response: &ProviderDocument,
    payload: &CreateDocumentPayload,
) -> NewDocument {
    NewDocument {
        external_open_id: response.open_id,
        provider_token: response.token.clone(),
        name: payload.name.clone(),
        status: parse_status(response.status.as_deref()),
        created_by: response
            .created_by
            .as_ref()
            .and_then(|creator| creator.email.clone())
            .unwrap_or_else(|| DEFAULT_CREATED_BY.to_string()),
        company_id: payload.company_id.unwrap_or(DEFAULT_COMPANY_ID),
        external_id: external_id_or_default(&response.external_id),
    }
}

/// Signer created together with the document.
///
/// Token, status and external id come from the provider's first signer when the
/// response lists one, otherwise from the document itself (a document status with no
/// signer counterpart becomes `pending`). Name and e-mail always come from the request.
pub fn prepare_signer(
    response: &ProviderDocument,
    payload: &CreateDocumentPayload,
    document_id: i64,
) -> NewSigner {
    let (token, status, external_id) = match response.signers.first() {
        Some(signer) => (
            &signer.token,
            parse_status(signer.status.as_deref()),
            &signer.external_id,
        ),
        None => (
            &response.token,
            SignerStatus::from(parse_status::<DocumentStatus>(response.status.as_deref())),
            &response.external_id,
        ),
    };

    NewSigner {
        provider_token: token.clone(),
        status,
        name: payload.nome_signatario.clone(),
        email: payload.email_signatario.clone(),
        external_id: external_id_or_default(external_id),
        document_id,
    }
}

/// Signer returned by the provider's add-signer call.
pub fn prepare_added_signer(
    response: &ProviderSigner,
    payload: &AddSignerPayload,
    document_id: i64,
) -> NewSigner {
    NewSigner {
        provider_token: response.token.clone(),
        status: parse_status(response.status.as_deref()),
        name: payload.name.clone(),
        email: payload.email.clone(),
        external_id: external_id_or_default(&response.external_id),
        document_id,
    }
}

fn external_id_or_default(external_id: &Option<Option<String>>) -> Option<String> {
    match external_id {
        None => Some(DEFAULT_EXTERNAL_ID.to_string()),
        Some(value) => value.clone(),
    }
}

/// Unknown statuses are cached as `pending`; the provider stays authoritative.
fn parse_status<S>(status: Option<&str>) -> S
where
    S: FromStr + Default,
{
    match status {
        None => S::default(),
        Some(raw) => S::from_str(raw).unwrap_or_else(|_| {
            tracing::warn!(status = %raw, "Unknown provider status, caching as pending");
            S::default()
        }),
    }
}
