//! Signing-provider call metrics.

use super::ProviderError;
use metrics::counter;

/// Count one provider call, labelled by operation and outcome.
///
/// Outcomes: `ok`, `rejected` (non-2xx), `transport`, `decode`, `configuration`.
pub fn record_provider_call<T>(operation: &'static str, result: &Result<T, ProviderError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(ProviderError::Api { .. }) => "rejected",
        Err(ProviderError::Transport(_)) => "transport",
        Err(ProviderError::Decode(_)) => "decode",
        Err(ProviderError::Configuration(_)) => "configuration",
    };

    counter!(
        "signing_provider_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
