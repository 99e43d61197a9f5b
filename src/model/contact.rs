use crate::fields::RecordInput;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Contact {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "name_c", default)]
    pub name: Option<String>,
    #[serde(rename = "email_c", default)]
    pub email: Option<String>,
    #[serde(rename = "phone_c", default)]
    pub phone: Option<String>,
    #[serde(rename = "company_c", default)]
    pub company: Option<String>,
    #[serde(rename = "notes_c", default)]
    pub notes: Option<String>,
    #[serde(rename = "created_at_c", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at_c", default)]
    pub updated_at: Option<String>,
}

impl Contact {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or("Unnamed contact")
    }
}

/// Fields a caller may set on a contact. `None` means "leave out".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

impl ContactDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl From<ContactDraft> for RecordInput {
    fn from(draft: ContactDraft) -> Self {
        RecordInput::new()
            .with_opt("name", draft.name)
            .with_opt("email", draft.email)
            .with_opt("phone", draft.phone)
            .with_opt("company", draft.company)
            .with_opt("notes", draft.notes)
    }
}
