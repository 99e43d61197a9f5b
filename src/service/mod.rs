//! Entity services: one CRUD facade per backend table.
//!
//! Every operation asks the [`Connector`] for a fresh backend adapter, issues
//! exactly one call, and folds the response envelope into a value or a
//! [`CrmError`]. Failures are logged with the operation and id, then returned
//! unchanged. Nothing is retried.

pub mod activity;
pub mod contact;
pub mod deal;

use crate::api::Connector;
use crate::api::models::{ApiResponse, DeleteParams, FetchParams, ID_COLUMN, RecordsParams};
use crate::dashboard::DashboardSummary;
use crate::error::{CrmError, CrmResult};
use crate::fields::{FieldSpec, IntoRecordId, RecordInput, build_create, build_update};
use crate::format::now_iso;
use crate::model::{Activity, Contact, Deal};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

pub use activity::ActivityService;
pub use contact::ContactService;
pub use deal::DealService;

/// Static description of one backend table.
pub trait Entity: DeserializeOwned + Send + 'static {
    /// Singular noun used in log and error text.
    const NAME: &'static str;
    const PLURAL: &'static str;
    const TABLE: &'static str;
    /// Columns requested on every read, in order.
    const PROJECTION: &'static [&'static str];
    /// Column sorted descending by `get_all`.
    const NEWEST_FIRST_BY: &'static str;
    const FIELDS: &'static [FieldSpec];
    /// Columns set to the current time on create.
    const CREATE_STAMPS: &'static [&'static str] = &[];
    /// Columns set to the current time on update.
    const UPDATE_STAMPS: &'static [&'static str] = &[];
}

pub struct EntityService<E: Entity> {
    connector: Arc<dyn Connector>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            connector: self.connector.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityService<E> {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            _entity: PhantomData,
        }
    }

    pub fn list_params() -> FetchParams {
        FetchParams::projection(E::PROJECTION)
            .newest_first(E::NEWEST_FIRST_BY)
            .first_page()
    }

    /// First page (100 rows) of the table, newest first.
    pub async fn get_all(&self) -> CrmResult<Vec<E>> {
        self.fetch_all().await.inspect_err(|err| {
            log::error!("Error fetching {}: {err}", E::PLURAL);
        })
    }

    pub async fn get_by_id(&self, id: impl IntoRecordId) -> CrmResult<E> {
        let id = coerce_id(id, "fetching", E::NAME)?;
        self.fetch_one(id).await.inspect_err(|err| {
            log::error!("Error fetching {} {id}: {err}", E::NAME);
        })
    }

    /// Creates one record and returns it as stored by the backend.
    pub async fn create(&self, data: impl Into<RecordInput>) -> CrmResult<E> {
        let input = data.into();
        self.create_one(&input).await.inspect_err(|err| {
            log::error!("Error creating {}: {err}", E::NAME);
        })
    }

    /// Sends only the fields present in `data`.
    pub async fn update(&self, id: impl IntoRecordId, data: impl Into<RecordInput>) -> CrmResult<E> {
        let id = coerce_id(id, "updating", E::NAME)?;
        let input = data.into();
        self.update_one(id, &input).await.inspect_err(|err| {
            log::error!("Error updating {} {id}: {err}", E::NAME);
        })
    }

    pub async fn delete(&self, id: impl IntoRecordId) -> CrmResult<bool> {
        let id = coerce_id(id, "deleting", E::NAME)?;
        self.delete_one(id).await.inspect_err(|err| {
            log::error!("Error deleting {} {id}: {err}", E::NAME);
        })
    }

    async fn fetch_all(&self) -> CrmResult<Vec<E>> {
        let backend = self.connector.connect()?;
        let response = backend.fetch_records(E::TABLE, &Self::list_params()).await?;
        ensure_success(&response)?;
        match response.data {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(rows)) => Ok(rows.into_iter().filter_map(decode_row::<E>).collect()),
            Some(_) => Err(CrmError::UnexpectedResponse { operation: "fetch" }),
        }
    }

    async fn fetch_one(&self, id: i64) -> CrmResult<E> {
        let backend = self.connector.connect()?;
        let params = FetchParams::projection(E::PROJECTION);
        let response = backend.get_record_by_id(E::TABLE, id, &params).await?;
        ensure_success(&response)?;
        match response.data {
            None | Some(Value::Null) => Err(CrmError::NotFound {
                table: E::TABLE,
                id,
            }),
            Some(row) => Ok(serde_json::from_value(row)?),
        }
    }

    async fn create_one(&self, input: &RecordInput) -> CrmResult<E> {
        let now = now_iso();
        let mut record = build_create(E::FIELDS, input, &now)?;
        for column in E::CREATE_STAMPS {
            record.insert(column.to_string(), Value::String(now.clone()));
        }
        let backend = self.connector.connect()?;
        let response = backend
            .create_record(E::TABLE, &RecordsParams::single(record))
            .await?;
        let data = settle_batch(response, "create", E::NAME)?;
        Ok(serde_json::from_value(data)?)
    }

    async fn update_one(&self, id: i64, input: &RecordInput) -> CrmResult<E> {
        let mut record = build_update(E::FIELDS, input)?;
        record.insert(ID_COLUMN.to_string(), Value::from(id));
        if !E::UPDATE_STAMPS.is_empty() {
            let now = now_iso();
            for column in E::UPDATE_STAMPS {
                record.insert(column.to_string(), Value::String(now.clone()));
            }
        }
        let backend = self.connector.connect()?;
        let response = backend
            .update_record(E::TABLE, &RecordsParams::single(record))
            .await?;
        let data = settle_batch(response, "update", E::NAME)?;
        Ok(serde_json::from_value(data)?)
    }

    async fn delete_one(&self, id: i64) -> CrmResult<bool> {
        let backend = self.connector.connect()?;
        let params = DeleteParams {
            record_ids: vec![id],
        };
        let response = backend.delete_record(E::TABLE, &params).await?;
        settle_delete(response, E::NAME)
    }
}

/// Id coercion failures are logged like any other failed call.
fn coerce_id(id: impl IntoRecordId, action: &str, entity: &str) -> CrmResult<i64> {
    id.into_record_id().inspect_err(|err| {
        log::error!("Error {action} {entity}: {err}");
    })
}

/// One listed row. A row that does not fit the entity is skipped, not fatal.
fn decode_row<E: Entity>(row: Value) -> Option<E> {
    let id = row.get(ID_COLUMN).cloned().unwrap_or(Value::Null);
    serde_json::from_value(row)
        .inspect_err(|err| log::warn!("Skipping {} {id}: {err}", E::NAME))
        .ok()
}

/// Top-level `success: false` becomes [`CrmError::Rejected`].
pub fn ensure_success(response: &ApiResponse) -> CrmResult<()> {
    if response.success {
        Ok(())
    } else {
        Err(CrmError::rejected(response.message.as_deref()))
    }
}

/// Folds a create/update envelope into the first successful record's data.
///
/// Any failed record fails the whole call with that record's message. A
/// response without a usable `results` array is [`CrmError::UnexpectedResponse`].
pub fn settle_batch(response: ApiResponse, operation: &'static str, entity: &str) -> CrmResult<Value> {
    ensure_success(&response)?;
    let Some(results) = response.results else {
        return Err(CrmError::UnexpectedResponse { operation });
    };
    if let Some(failed) = results.iter().find(|r| !r.success) {
        let failures: Vec<_> = results.iter().filter(|r| !r.success).collect();
        log::error!("Failed to {operation} {entity}: {failures:?}");
        return Err(record_failed(failed.message.as_deref(), operation, entity));
    }
    results
        .into_iter()
        .find_map(|r| r.data.filter(|d| !d.is_null()))
        .ok_or(CrmError::UnexpectedResponse { operation })
}

/// Delete succeeds unless the backend or one of the records says otherwise.
pub fn settle_delete(response: ApiResponse, entity: &str) -> CrmResult<bool> {
    ensure_success(&response)?;
    if let Some(failed) = response
        .results
        .as_ref()
        .and_then(|results| results.iter().find(|r| !r.success))
    {
        log::error!("Failed to delete {entity}: {failed:?}");
        return Err(record_failed(failed.message.as_deref(), "delete", entity));
    }
    Ok(true)
}

fn record_failed(message: Option<&str>, operation: &str, entity: &str) -> CrmError {
    CrmError::RecordFailed {
        message: message
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Failed to {operation} {entity}")),
    }
}

/// The three entity services sharing one connector.
#[derive(Clone)]
pub struct CrmServices {
    pub contacts: ContactService,
    pub deals: DealService,
    pub activities: ActivityService,
}

impl CrmServices {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            contacts: ContactService::new(connector.clone()),
            deals: DealService::new(connector.clone()),
            activities: ActivityService::new(connector),
        }
    }

    /// Loads all three tables concurrently and summarizes them.
    pub async fn dashboard_summary(&self) -> CrmResult<DashboardSummary> {
        let (contacts, deals, activities): (Vec<Contact>, Vec<Deal>, Vec<Activity>) =
            tokio::try_join!(
                self.contacts.get_all(),
                self.deals.get_all(),
                self.activities.get_all(),
            )?;
        Ok(DashboardSummary::compute(&contacts, &deals, &activities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::RecordResult;
    use serde_json::json;

    #[test]
    fn batch_returns_first_success_data() {
        let response = ApiResponse::with_results(vec![RecordResult::ok(json!({"Id": 3}))]);
        assert_eq!(settle_batch(response, "create", "contact").unwrap(), json!({"Id": 3}));
    }

    #[test]
    fn mixed_batch_surfaces_first_failure() {
        let response = ApiResponse::with_results(vec![
            RecordResult::ok(json!({"Id": 1})),
            RecordResult::failed("email_c is invalid"),
            RecordResult::failed("second failure"),
        ]);
        let err = settle_batch(response, "create", "contact").unwrap_err();
        assert!(matches!(err, CrmError::RecordFailed { ref message } if message == "email_c is invalid"));
    }

    #[test]
    fn failure_without_message_uses_generic_text() {
        let response = ApiResponse::with_results(vec![RecordResult::default()]);
        let err = settle_batch(response, "update", "deal").unwrap_err();
        assert_eq!(err.to_string(), "Failed to update deal");
    }

    #[test]
    fn missing_or_empty_results_are_unexpected() {
        let missing = ApiResponse {
            success: true,
            ..ApiResponse::default()
        };
        assert!(matches!(
            settle_batch(missing, "create", "deal"),
            Err(CrmError::UnexpectedResponse { operation: "create" })
        ));
        let empty = ApiResponse::with_results(Vec::new());
        assert!(matches!(
            settle_batch(empty, "update", "deal"),
            Err(CrmError::UnexpectedResponse { operation: "update" })
        ));
    }

    #[test]
    fn top_level_rejection_wins() {
        let response = ApiResponse::rejected("Invalid public key");
        let err = settle_batch(response, "create", "contact").unwrap_err();
        assert!(matches!(err, CrmError::Rejected { ref message } if message == "Invalid public key"));
    }

    #[test]
    fn delete_without_results_is_true() {
        let response = ApiResponse {
            success: true,
            ..ApiResponse::default()
        };
        assert!(settle_delete(response, "activity").unwrap());
    }

    #[test]
    fn delete_failure_carries_message() {
        let response = ApiResponse::with_results(vec![RecordResult::failed("locked")]);
        let err = settle_delete(response, "activity").unwrap_err();
        assert_eq!(err.to_string(), "locked");
    }
}
