//! Request parameter objects and response envelopes of the record API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record as the backend stores it: column name to JSON value.
pub type RawRecord = Map<String, Value>;

pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Backend-assigned primary key column.
pub const ID_COLUMN: &str = "Id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub field: FieldName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldName {
    #[serde(rename = "Name")]
    pub name: String,
}

impl FieldRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            field: FieldName { name: name.into() },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortType {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub field_name: String,
    #[serde(rename = "sorttype")]
    pub sort_type: SortType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PagingInfo {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// Parameters of `fetchRecords`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    pub fields: Vec<FieldRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging_info: Option<PagingInfo>,
}

impl FetchParams {
    pub fn projection(columns: &[&str]) -> Self {
        Self {
            fields: columns.iter().map(|c| FieldRef::named(*c)).collect(),
            ..Self::default()
        }
    }

    pub fn newest_first(mut self, column: &str) -> Self {
        self.order_by.push(OrderBy {
            field_name: column.to_string(),
            sort_type: SortType::Desc,
        });
        self
    }

    pub fn first_page(mut self) -> Self {
        self.paging_info = Some(PagingInfo::default());
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field.name.as_str())
    }
}

/// Parameters of `createRecord` / `updateRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordsParams {
    pub records: Vec<RawRecord>,
}

impl RecordsParams {
    pub fn single(record: RawRecord) -> Self {
        Self {
            records: vec![record],
        }
    }
}

/// Parameters of `deleteRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteParams {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<i64>,
}

/// Outcome of one record in a create/update/delete batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecordResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecordResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Envelope shared by every backend call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RecordResult>>,
}

impl ApiResponse {
    pub fn with_data(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn with_results(results: Vec<RecordResult>) -> Self {
        Self {
            success: true,
            results: Some(results),
            ..Self::default()
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}
