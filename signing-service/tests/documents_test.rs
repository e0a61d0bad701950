mod common;

use common::{create_body, provider_document, TestApp};
use serde_json::{json, Value};
use signing_service::services::DocumentStore;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_create(app: &TestApp, response: Value) {
    Mock::given(method("POST"))
        .and(path("/docs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(&app.provider)
        .await;
}

/// Creates a document through the API and returns its local id.
async fn create_document(app: &TestApp) -> i64 {
    let response = app.post_create(&create_body()).await;
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    body["data"]["id"].as_i64().expect("created document has an id")
}

#[tokio::test]
async fn create_document_persists_provider_token() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/docs/"))
        .and(header("authorization", "Bearer test-api-token"))
        .and(body_json(json!({
            "name": "Doc",
            "url_pdf": "http://x/doc.pdf",
            "signers": [{"name": "A", "email": "a@x.com"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_document("T1")))
        .expect(1)
        .mount(&app.provider)
        .await;

    let response = app.post_create(&create_body()).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Document created successfully");
    assert_eq!(body["data"]["provider_token"], "T1");
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["name"], "Doc");
    assert_eq!(body["data"]["created_by"], "a@x.com");
    assert_eq!(body["data"]["external_id"], "empty");
    assert_eq!(body["data"]["signers"][0]["email"], "a@x.com");

    let id = body["data"]["id"].as_i64().unwrap();
    let stored = app.store.get_document(id).await.unwrap().unwrap();
    assert_eq!(stored.provider_token, "T1");
    assert_eq!(stored.name, "Doc");
}

#[tokio::test]
async fn create_with_missing_fields_never_calls_provider() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/docs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_document("T1")))
        .expect(0)
        .mount(&app.provider)
        .await;

    let response = app
        .post_create(&json!({"name": "Doc", "url_documento": "", "email_signatario": null}))
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "VAL_001");
    assert_eq!(
        body["error"],
        "Missing required fields: url_documento, nome_signatario, email_signatario"
    );
    assert!(app.store.list_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_with_empty_body_lists_every_required_field() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/docs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_document("T1")))
        .expect(0)
        .mount(&app.provider)
        .await;

    let without_content_type = app
        .client
        .post(app.url("/documento/create"))
        .send()
        .await
        .expect("Failed to execute request");
    let empty_json = app
        .client
        .post(app.url("/documento/create"))
        .header("content-type", "application/json")
        .body("")
        .send()
        .await
        .expect("Failed to execute request");

    for response in [without_content_type, empty_json] {
        assert_eq!(response.status().as_u16(), 400);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "VAL_001");
        assert_eq!(
            body["error"],
            "Missing required fields: name, url_documento, nome_signatario, email_signatario"
        );
    }
}

#[tokio::test]
async fn create_with_invalid_email_is_rejected() {
    let app = TestApp::spawn().await;

    let mut body = create_body();
    body["email_signatario"] = json!("not-an-email");
    let response = app.post_create(&body).await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error_code"], "VAL_001");
}

#[tokio::test]
async fn create_for_unknown_company_is_rejected_before_provider_call() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/docs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_document("T1")))
        .expect(0)
        .mount(&app.provider)
        .await;

    let mut body = create_body();
    body["company_id"] = json!(42);
    let response = app.post_create(&body).await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Invalid data: company 42 does not exist");
}

#[tokio::test]
async fn provider_rejection_returns_400_with_provider_message() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/docs/"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid pdf url"))
        .mount(&app.provider)
        .await;

    let response = app.post_create(&create_body()).await;
    assert_eq!(response.status().as_u16(), 400);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "EXT_001");
    assert_eq!(body["error"], "Signing provider error: invalid pdf url");
    assert!(app.store.list_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_provider_response_returns_generic_500() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/docs/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&app.provider)
        .await;

    let response = app.post_create(&create_body()).await;
    assert_eq!(response.status().as_u16(), 500);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Internal error during document creation");
}

#[tokio::test]
async fn signer_save_failure_does_not_fail_creation() {
    let app = TestApp::spawn().await;
    mount_create(&app, provider_document("T1")).await;
    app.store.reject_signer_writes(true);

    let response = app.post_create(&create_body()).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["data"]["provider_token"], "T1");
    assert_eq!(body["data"]["signers"], json!([]));
    assert_eq!(app.store.list_documents().await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_and_get_include_nested_signers() {
    let app = TestApp::spawn().await;
    mount_create(&app, provider_document("T1")).await;
    let id = create_document(&app).await;

    let response = app
        .client
        .get(app.url("/documento"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["signers"][0]["name"], "A");

    let response = app
        .client
        .get(app.url(&format!("/documento/{}", id)))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["signers"][0]["provider_token"], "T1");
}

#[tokio::test]
async fn get_unknown_document_returns_404() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/documento/999"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Document not found");
}

#[tokio::test]
async fn update_renames_after_provider_success() {
    let app = TestApp::spawn().await;
    mount_create(&app, provider_document("T1")).await;
    let id = create_document(&app).await;

    Mock::given(method("PUT"))
        .and(path("/docs/T1/"))
        .and(body_json(json!({"name": "Renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&app.provider)
        .await;

    let response = app
        .client
        .put(app.url(&format!("/documento/update/{}", id)))
        .json(&json!({"name": "Renamed"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["provider_token"], "T1");
    assert_eq!(body["data"]["signers"].as_array().unwrap().len(), 1);

    let stored = app.store.get_document(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Renamed");
}

#[tokio::test]
async fn update_keeps_local_name_when_provider_fails() {
    let app = TestApp::spawn().await;
    mount_create(&app, provider_document("T1")).await;
    let id = create_document(&app).await;

    Mock::given(method("PUT"))
        .and(path("/docs/T1/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("locked"))
        .mount(&app.provider)
        .await;

    let response = app
        .client
        .put(app.url(&format!("/documento/update/{}", id)))
        .json(&json!({"name": "Renamed"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Signing provider error: locked");

    let stored = app.store.get_document(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Doc");
}

#[tokio::test]
async fn non_numeric_ids_return_404_envelope() {
    let app = TestApp::spawn().await;

    let requests = [
        app.client.get(app.url("/documento/abc")),
        app.client
            .put(app.url("/documento/update/abc"))
            .json(&json!({"name": "Renamed"})),
        app.client.delete(app.url("/documento/delete/abc")),
        app.client
            .post(app.url("/documento/abc/signers"))
            .json(&json!({"name": "B", "email": "b@x.com"})),
    ];

    for request in requests {
        let response = request.send().await.expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 404);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Document not found");
    }
}

#[tokio::test]
async fn update_unknown_document_returns_404() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .put(app.url("/documento/update/999"))
        .json(&json!({"name": "Renamed"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn delete_removes_document_and_signers() {
    let app = TestApp::spawn().await;
    mount_create(&app, provider_document("T1")).await;
    let id = create_document(&app).await;
    assert_eq!(app.store.list_signers(id).await.unwrap().len(), 1);

    Mock::given(method("DELETE"))
        .and(path("/docs/T1/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.provider)
        .await;

    let response = app
        .client
        .delete(app.url(&format!("/documento/delete/{}", id)))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 204);
    assert!(app.store.get_document(id).await.unwrap().is_none());
    assert!(app.store.get_document_with_signers(id).await.unwrap().is_none());
    assert!(app.store.list_signers(id).await.unwrap().is_empty());
    assert!(app.store.list_documents().await.unwrap().is_empty());

    let response = app
        .client
        .get(app.url(&format!("/documento/{}", id)))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn delete_keeps_document_when_provider_fails() {
    let app = TestApp::spawn().await;
    mount_create(&app, provider_document("T1")).await;
    let id = create_document(&app).await;

    Mock::given(method("DELETE"))
        .and(path("/docs/T1/"))
        .respond_with(ResponseTemplate::new(409).set_body_string("already signed"))
        .mount(&app.provider)
        .await;

    let response = app
        .client
        .delete(app.url(&format!("/documento/delete/{}", id)))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Failed to delete document: already signed");
    assert!(app.store.get_document(id).await.unwrap().is_some());
}

#[tokio::test]
async fn add_signer_persists_provider_signer() {
    let app = TestApp::spawn().await;
    mount_create(&app, provider_document("T1")).await;
    let id = create_document(&app).await;

    Mock::given(method("POST"))
        .and(path("/docs/T1/add-signer/"))
        .and(body_json(json!({"name": "B", "email": "b@x.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "S2",
            "status": "pending",
            "external_id": null
        })))
        .expect(1)
        .mount(&app.provider)
        .await;

    let response = app
        .client
        .post(app.url(&format!("/documento/{}/signers", id)))
        .json(&json!({"name": "B", "email": "b@x.com"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Signer added successfully");
    assert_eq!(body["data"]["provider_token"], "S2");
    assert_eq!(body["data"]["external_id"], Value::Null);

    let document = app
        .store
        .get_document_with_signers(id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(document.signers.len(), 2);
}

#[tokio::test]
async fn add_signer_to_unknown_document_returns_404() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/documento/999/signers"))
        .json(&json!({"name": "B", "email": "b@x.com"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn wrong_method_returns_405() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/documento/create"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 405);

    let response = app
        .client
        .post(app.url("/documento/delete/1"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 405);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/documento"))
        .header("x-request-id", "req-123")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-123")
    );
}
