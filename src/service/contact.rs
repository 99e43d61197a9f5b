use crate::fields::{FieldKind, FieldSpec};
use crate::model::Contact;
use crate::service::{Entity, EntityService};

pub type ContactService = EntityService<Contact>;

impl Entity for Contact {
    const NAME: &'static str = "contact";
    const PLURAL: &'static str = "contacts";
    const TABLE: &'static str = "contact_c";
    const PROJECTION: &'static [&'static str] = &[
        "name_c",
        "email_c",
        "phone_c",
        "company_c",
        "notes_c",
        "created_at_c",
        "updated_at_c",
    ];
    const NEWEST_FIRST_BY: &'static str = "created_at_c";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "name_c", FieldKind::Text),
        FieldSpec::new("email", "email_c", FieldKind::Text),
        FieldSpec::new("phone", "phone_c", FieldKind::Text),
        FieldSpec::new("company", "company_c", FieldKind::Text),
        FieldSpec::new("notes", "notes_c", FieldKind::Text),
    ];
    const CREATE_STAMPS: &'static [&'static str] = &["created_at_c", "updated_at_c"];
    const UPDATE_STAMPS: &'static [&'static str] = &["updated_at_c"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryBackend;
    use crate::api::memory::Operation;
    use crate::fields::RecordInput;
    use crate::format::is_valid_date;
    use crate::model::ContactDraft;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn create_stamps_both_timestamps() {
        let backend = Arc::new(MemoryBackend::new());
        let service = ContactService::new(backend.connector());

        let draft = ContactDraft {
            email: Some("ada@example.com".into()),
            ..ContactDraft::named("Ada Lovelace")
        };
        let created = service.create(draft).await.unwrap();

        assert_eq!(created.name.as_deref(), Some("Ada Lovelace"));
        assert!(is_valid_date(&created.created_at));
        assert_eq!(created.created_at, created.updated_at);

        let call = backend.last_call().unwrap();
        assert_eq!(call.operation, Operation::Create);
        assert_eq!(call.table, "contact_c");
        let record = &call.body["records"][0];
        assert_eq!(record["email_c"], json!("ada@example.com"));
        assert!(record.get("phone_c").is_none());
    }

    #[tokio::test]
    async fn update_restamps_only_updated_at() {
        let backend = Arc::new(MemoryBackend::new());
        let service = ContactService::new(backend.connector());
        let created = service.create(ContactDraft::named("Grace")).await.unwrap();

        service
            .update(created.id, RecordInput::new().with("company", "Navy"))
            .await
            .unwrap();

        let record = &backend.last_call().unwrap().body["records"][0];
        assert_eq!(record["Id"], json!(created.id));
        assert_eq!(record["company_c"], json!("Navy"));
        assert!(record.get("updated_at_c").is_some());
        assert!(record.get("created_at_c").is_none());
        assert!(record.get("name_c").is_none());
    }

    #[test]
    fn list_params_order_newest_first() {
        let params = serde_json::to_value(ContactService::list_params()).unwrap();
        assert_eq!(params["fields"].as_array().unwrap().len(), 7);
        assert_eq!(
            params["orderBy"],
            json!([{"fieldName": "created_at_c", "sorttype": "DESC"}])
        );
    }
}
