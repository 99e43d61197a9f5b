//! In-process record store speaking the same envelopes as the remote API.
//!
//! Used by the test suite and by the dashboard's `--offline` mode. Responses
//! can be scripted per operation to reproduce backend shapes that a healthy
//! store never produces (partial batch failures, missing `results`).

use crate::api::{Connector, RecordBackend};
use crate::api::models::{
    ApiResponse, DeleteParams, FetchParams, ID_COLUMN, RawRecord, RecordResult, RecordsParams,
    SortType,
};
use crate::error::CrmResult;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Older calls are dropped once the log holds this many.
pub const MAX_RECORDED_CALLS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    Get,
    Create,
    Update,
    Delete,
}

/// One call as the backend received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: Operation,
    pub table: String,
    pub body: Value,
}

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, RawRecord>,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, Table>,
    scripted: HashMap<Operation, VecDeque<ApiResponse>>,
    calls: VecDeque<RecordedCall>,
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares this store with services; every connect hands out the same store.
    pub fn connector(self: &Arc<Self>) -> Arc<dyn Connector> {
        Arc::new(self.clone())
    }

    /// Answers the next `operation` call with `response` instead of touching the store.
    pub fn script(&self, operation: Operation, response: ApiResponse) {
        self.lock()
            .scripted
            .entry(operation)
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.iter().cloned().collect()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.lock().calls.back().cloned()
    }

    /// Raw stored row, bypassing projections.
    pub fn row(&self, table: &str, id: i64) -> Option<RawRecord> {
        self.lock()
            .tables
            .get(table)
            .and_then(|t| t.rows.get(&id))
            .cloned()
    }

    pub fn len(&self, table: &str) -> usize {
        self.lock().tables.get(table).map_or(0, |t| t.rows.len())
    }

    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    /// Inserts `record` directly and returns the assigned id.
    pub fn insert(&self, table: &str, record: RawRecord) -> i64 {
        let mut state = self.lock();
        insert_row(state.tables.entry(table.to_string()).or_default(), record)
    }

    /// A store pre-filled with a handful of contacts, deals and activities.
    pub fn with_demo_data() -> Self {
        let backend = Self::new();
        let contacts = [
            ("Ada Lovelace", "ada@analytical.io", "Analytical Engines", "2024-03-01T09:00:00Z"),
            ("Grace Hopper", "grace@cobol.dev", "Compiler Co", "2024-03-04T14:30:00Z"),
            ("Alan Turing", "alan@bletchley.uk", "Bletchley Labs", "2024-03-07T11:15:00Z"),
        ];
        let mut contact_ids = Vec::new();
        for (name, email, company, created) in contacts {
            contact_ids.push(backend.insert(
                "contact_c",
                object(json!({
                    "name_c": name,
                    "email_c": email,
                    "company_c": company,
                    "created_at_c": created,
                    "updated_at_c": created,
                })),
            ));
        }
        let deals: [(&str, f64, &str, i64, usize); 4] = [
            ("Engine retrofit", 48000.0, "proposal", 60, 0),
            ("Compiler license", 12500.0, "negotiation", 80, 1),
            ("Codebreaking audit", 30000.0, "closed-won", 100, 2),
            ("Punch card supply", 4000.0, "lead", 10, 0),
        ];
        let mut deal_ids = Vec::new();
        for (title, value, stage, probability, contact) in deals {
            deal_ids.push(backend.insert(
                "deal_c",
                object(json!({
                    "title_c": title,
                    "value_c": value,
                    "stage_c": stage,
                    "probability_c": probability,
                    "expected_close_date_c": "2024-06-30",
                    "created_at_c": "2024-03-10T10:00:00Z",
                    "contact_id_c": contact_ids[contact],
                })),
            ));
        }
        let activities: [(&str, &str, &str, usize, Option<usize>); 4] = [
            ("call", "Intro call about the retrofit", "2024-03-11T15:00:00Z", 0, Some(0)),
            ("email", "Sent license terms", "2024-03-12T08:45:00Z", 1, Some(1)),
            ("meeting", "Audit kickoff", "2024-03-13T13:00:00Z", 2, Some(2)),
            ("note", "Prefers morning calls", "2024-03-14T09:30:00Z", 0, None),
        ];
        for (kind, description, timestamp, contact, deal) in activities {
            backend.insert(
                "activity_c",
                object(json!({
                    "type_c": kind,
                    "description_c": description,
                    "timestamp_c": timestamp,
                    "contact_id_c": contact_ids[contact],
                    "deal_id_c": deal.map(|d| deal_ids[d]),
                })),
            );
        }
        backend
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave rows half-written.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(
        &self,
        operation: Operation,
        table: &str,
        body: Value,
    ) -> (std::sync::MutexGuard<'_, State>, Option<ApiResponse>) {
        let mut state = self.lock();
        if state.calls.len() == MAX_RECORDED_CALLS {
            state.calls.pop_front();
        }
        state.calls.push_back(RecordedCall {
            operation,
            table: table.to_string(),
            body,
        });
        let scripted = state
            .scripted
            .get_mut(&operation)
            .and_then(VecDeque::pop_front);
        (state, scripted)
    }
}

#[async_trait]
impl RecordBackend for MemoryBackend {
    async fn fetch_records(&self, table: &str, params: &FetchParams) -> CrmResult<ApiResponse> {
        let (state, scripted) = self.begin(Operation::Fetch, table, serde_json::to_value(params)?);
        if let Some(response) = scripted {
            return Ok(response);
        }
        let Some(rows) = state.tables.get(table).map(|t| &t.rows) else {
            return Ok(ApiResponse::with_data(Value::Array(Vec::new())));
        };
        let mut matched: Vec<(&i64, &RawRecord)> = rows.iter().collect();
        let newest_first = params
            .order_by
            .first()
            .is_some_and(|o| o.sort_type == SortType::Desc);
        matched.sort_by(|(a_id, a), (b_id, b)| {
            for order in &params.order_by {
                let ord = compare_values(a.get(&order.field_name), b.get(&order.field_name));
                let ord = match order.sort_type {
                    SortType::Asc => ord,
                    SortType::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            if newest_first {
                b_id.cmp(a_id)
            } else {
                a_id.cmp(b_id)
            }
        });
        let page = params.paging_info.unwrap_or_default();
        let data: Vec<Value> = matched
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .map(|(id, row)| Value::Object(project(*id, row, params)))
            .collect();
        Ok(ApiResponse::with_data(Value::Array(data)))
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: i64,
        params: &FetchParams,
    ) -> CrmResult<ApiResponse> {
        let body = json!({ "id": id, "params": params });
        let (state, scripted) = self.begin(Operation::Get, table, body);
        if let Some(response) = scripted {
            return Ok(response);
        }
        let row = state.tables.get(table).and_then(|t| t.rows.get(&id));
        Ok(match row {
            Some(row) => ApiResponse::with_data(Value::Object(project(id, row, params))),
            None => ApiResponse::rejected(format!("Record with Id {id} does not exist")),
        })
    }

    async fn create_record(&self, table: &str, params: &RecordsParams) -> CrmResult<ApiResponse> {
        let (mut state, scripted) =
            self.begin(Operation::Create, table, serde_json::to_value(params)?);
        if let Some(response) = scripted {
            return Ok(response);
        }
        let rows = state.tables.entry(table.to_string()).or_default();
        let results = params
            .records
            .iter()
            .map(|record| {
                let id = insert_row(rows, record.clone());
                RecordResult::ok(Value::Object(with_id(id, &rows.rows[&id])))
            })
            .collect();
        Ok(ApiResponse::with_results(results))
    }

    async fn update_record(&self, table: &str, params: &RecordsParams) -> CrmResult<ApiResponse> {
        let (mut state, scripted) =
            self.begin(Operation::Update, table, serde_json::to_value(params)?);
        if let Some(response) = scripted {
            return Ok(response);
        }
        let rows = state.tables.entry(table.to_string()).or_default();
        let results = params
            .records
            .iter()
            .map(|record| {
                let Some(id) = record.get(ID_COLUMN).and_then(Value::as_i64) else {
                    return RecordResult::failed("Id is required for update");
                };
                match rows.rows.get_mut(&id) {
                    Some(row) => {
                        for (key, value) in record.iter().filter(|(k, _)| *k != ID_COLUMN) {
                            row.insert(key.clone(), value.clone());
                        }
                        RecordResult::ok(Value::Object(with_id(id, row)))
                    }
                    None => RecordResult::failed(format!("Record with Id {id} does not exist")),
                }
            })
            .collect();
        Ok(ApiResponse::with_results(results))
    }

    async fn delete_record(&self, table: &str, params: &DeleteParams) -> CrmResult<ApiResponse> {
        let (mut state, scripted) =
            self.begin(Operation::Delete, table, serde_json::to_value(params)?);
        if let Some(response) = scripted {
            return Ok(response);
        }
        let rows = state.tables.entry(table.to_string()).or_default();
        let results = params
            .record_ids
            .iter()
            .map(|id| match rows.rows.remove(id) {
                Some(_) => RecordResult::ok(json!({ ID_COLUMN: id })),
                None => RecordResult::failed(format!("Record with Id {id} does not exist")),
            })
            .collect();
        Ok(ApiResponse::with_results(results))
    }
}

fn insert_row(table: &mut Table, mut record: RawRecord) -> i64 {
    table.last_id += 1;
    let id = table.last_id;
    record.remove(ID_COLUMN);
    table.rows.insert(id, record);
    id
}

fn with_id(id: i64, row: &RawRecord) -> RawRecord {
    let mut out = RawRecord::new();
    out.insert(ID_COLUMN.to_string(), json!(id));
    out.extend(row.iter().map(|(k, v)| (k.clone(), v.clone())));
    out
}

fn project(id: i64, row: &RawRecord, params: &FetchParams) -> RawRecord {
    let mut out = RawRecord::new();
    out.insert(ID_COLUMN.to_string(), json!(id));
    for name in params.field_names() {
        if let Some(value) = row.get(name) {
            out.insert(name.to_string(), value.clone());
        }
    }
    out
}

/// Missing and null sort first; numbers numerically; everything else as text.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => value_text(a).cmp(&value_text(b)),
        },
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn object(value: Value) -> RawRecord {
    match value {
        Value::Object(map) => map,
        _ => RawRecord::new(),
    }
}
