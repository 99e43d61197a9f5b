use serde::{Deserialize, Serialize};

/// A reference column. The backend sends either a bare id or `{ "Id", "Name" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LookupWire")]
pub struct LookupRef {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LookupRef {
    pub fn new(id: i64) -> Self {
        Self { id, name: None }
    }

    /// The display name if the backend sent one, else `#id`.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("#{}", self.id),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LookupWire {
    Id(i64),
    Text(String),
    Object {
        #[serde(rename = "Id")]
        id: i64,
        #[serde(rename = "Name", default)]
        name: Option<String>,
    },
}

impl TryFrom<LookupWire> for LookupRef {
    type Error = String;

    fn try_from(wire: LookupWire) -> Result<Self, Self::Error> {
        match wire {
            LookupWire::Id(id) => Ok(Self::new(id)),
            LookupWire::Text(text) => text
                .trim()
                .parse()
                .map(Self::new)
                .map_err(|_| format!("invalid lookup id `{text}`")),
            LookupWire::Object { id, name } => Ok(Self { id, name }),
        }
    }
}
