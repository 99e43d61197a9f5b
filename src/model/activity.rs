use crate::fields::RecordInput;
use crate::model::lookup::LookupRef;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
    Call,
    Email,
    Meeting,
    Note,
    Task,
    Other(String),
}

impl ActivityType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Call => "call",
            Self::Email => "email",
            Self::Meeting => "meeting",
            Self::Note => "note",
            Self::Task => "task",
            Self::Other(value) => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Call => "Call",
            Self::Email => "Email",
            Self::Meeting => "Meeting",
            Self::Note => "Note",
            Self::Task => "Task",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for ActivityType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "call" => Self::Call,
            "email" => Self::Email,
            "meeting" => Self::Meeting,
            "note" => Self::Note,
            "task" => Self::Task,
            _ => Self::Other(value),
        }
    }
}

impl From<ActivityType> for String {
    fn from(kind: ActivityType) -> Self {
        kind.as_str().to_string()
    }
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Activity {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "type_c", default)]
    pub kind: Option<ActivityType>,
    #[serde(rename = "description_c", default)]
    pub description: Option<String>,
    #[serde(rename = "timestamp_c", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "contact_id_c", default)]
    pub contact: Option<LookupRef>,
    #[serde(rename = "deal_id_c", default)]
    pub deal: Option<LookupRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityDraft {
    pub kind: Option<ActivityType>,
    pub description: Option<String>,
    /// Defaults to the creation time when left out.
    pub timestamp: Option<String>,
    pub contact_id: Option<i64>,
    pub deal_id: Option<i64>,
}

impl From<ActivityDraft> for RecordInput {
    fn from(draft: ActivityDraft) -> Self {
        RecordInput::new()
            .with_opt("type", draft.kind.map(String::from))
            .with_opt("description", draft.description)
            .with_opt("timestamp", draft.timestamp)
            .with_opt("contactId", draft.contact_id)
            .with_opt("dealId", draft.deal_id)
    }
}
