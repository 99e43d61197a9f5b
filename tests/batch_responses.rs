use crm_dashboard::api::memory::Operation;
use crm_dashboard::api::models::{ApiResponse, RecordResult};
use crm_dashboard::{
    ActivityService, ContactDraft, ContactService, CrmError, DealDraft, DealService,
    MemoryBackend, RecordInput,
};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn mixed_create_batch_surfaces_first_failure() {
    let backend = Arc::new(MemoryBackend::new());
    backend.script(
        Operation::Create,
        ApiResponse::with_results(vec![
            RecordResult::ok(json!({"Id": 1, "name_c": "Ok"})),
            RecordResult::failed("email_c must be unique"),
            RecordResult::failed("phone_c is too long"),
        ]),
    );
    let contacts = ContactService::new(backend.connector());

    let err = contacts.create(ContactDraft::named("Dup")).await.unwrap_err();

    assert!(matches!(err, CrmError::RecordFailed { .. }));
    assert_eq!(err.to_string(), "email_c must be unique");
}

#[tokio::test]
async fn create_without_results_is_unexpected() {
    let backend = Arc::new(MemoryBackend::new());
    backend.script(Operation::Create, ApiResponse::with_data(json!({"Id": 1})));
    let deals = DealService::new(backend.connector());

    let err = deals.create(DealDraft::default()).await.unwrap_err();

    assert!(matches!(err, CrmError::UnexpectedResponse { operation: "create" }));
    assert_eq!(err.to_string(), "Unexpected response format");
}

#[tokio::test]
async fn rejected_update_carries_backend_message() {
    let backend = Arc::new(MemoryBackend::new());
    backend.script(Operation::Update, ApiResponse::rejected("Invalid public key"));
    let deals = DealService::new(backend.connector());

    let err = deals
        .update(4, RecordInput::new().with("title", "Renamed"))
        .await
        .unwrap_err();

    assert!(matches!(err, CrmError::Rejected { .. }));
    assert_eq!(err.to_string(), "Invalid public key");
}

#[tokio::test]
async fn updating_missing_record_fails_with_backend_message() {
    let backend = Arc::new(MemoryBackend::new());
    let contacts = ContactService::new(backend.connector());

    let err = contacts
        .update(42, ContactDraft::named("Ghost"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Record with Id 42 does not exist");
}

#[tokio::test]
async fn delete_without_results_is_success() {
    let backend = Arc::new(MemoryBackend::new());
    backend.script(
        Operation::Delete,
        ApiResponse {
            success: true,
            ..ApiResponse::default()
        },
    );
    let activities = ActivityService::new(backend.connector());

    assert!(activities.delete(9).await.unwrap());
    let call = backend.last_call().unwrap();
    assert_eq!(call.table, "activity_c");
    assert_eq!(call.body, json!({"RecordIds": [9]}));
}

#[tokio::test]
async fn delete_of_missing_record_fails() {
    let backend = Arc::new(MemoryBackend::new());
    let activities = ActivityService::new(backend.connector());

    let err = activities.delete(5).await.unwrap_err();

    assert!(matches!(err, CrmError::RecordFailed { .. }));
}

#[tokio::test]
async fn fetch_without_data_is_empty() {
    let backend = Arc::new(MemoryBackend::new());
    backend.script(
        Operation::Fetch,
        ApiResponse {
            success: true,
            ..ApiResponse::default()
        },
    );
    let contacts = ContactService::new(backend.connector());

    assert!(contacts.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_with_null_data_is_not_found() {
    let backend = Arc::new(MemoryBackend::new());
    backend.script(Operation::Get, ApiResponse::with_data(json!(null)));
    let contacts = ContactService::new(backend.connector());

    let err = contacts.get_by_id(7).await.unwrap_err();

    assert!(matches!(err, CrmError::NotFound { table: "contact_c", id: 7 }));
}

#[tokio::test]
async fn fetch_request_uses_projection_order_and_paging() {
    let backend = Arc::new(MemoryBackend::new());
    let deals = DealService::new(backend.connector());

    deals.get_all().await.unwrap();

    let call = backend.last_call().unwrap();
    assert_eq!(call.operation, Operation::Fetch);
    assert_eq!(call.body["orderBy"], json!([{"fieldName": "created_at_c", "sorttype": "DESC"}]));
    assert_eq!(call.body["pagingInfo"], json!({"limit": 100, "offset": 0}));
    assert_eq!(call.body["fields"][6], json!({"field": {"Name": "contact_id_c"}}));
}
