use crate::fields::RecordInput;
use crate::model::lenient;
use crate::model::lookup::LookupRef;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Pipeline stage. Unknown backend values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DealStage {
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
    Other(String),
}

impl DealStage {
    pub const PIPELINE: [DealStage; 6] = [
        DealStage::Lead,
        DealStage::Qualified,
        DealStage::Proposal,
        DealStage::Negotiation,
        DealStage::ClosedWon,
        DealStage::ClosedLost,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Lead => "lead",
            Self::Qualified => "qualified",
            Self::Proposal => "proposal",
            Self::Negotiation => "negotiation",
            Self::ClosedWon => "closed-won",
            Self::ClosedLost => "closed-lost",
            Self::Other(value) => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Lead => "Lead",
            Self::Qualified => "Qualified",
            Self::Proposal => "Proposal",
            Self::Negotiation => "Negotiation",
            Self::ClosedWon => "Closed Won",
            Self::ClosedLost => "Closed Lost",
            Self::Other(value) => value,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::ClosedWon | Self::ClosedLost)
    }
}

impl From<String> for DealStage {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "lead" => Self::Lead,
            "qualified" => Self::Qualified,
            "proposal" => Self::Proposal,
            "negotiation" => Self::Negotiation,
            "closed-won" | "won" => Self::ClosedWon,
            "closed-lost" | "lost" => Self::ClosedLost,
            _ => Self::Other(value),
        }
    }
}

impl From<DealStage> for String {
    fn from(stage: DealStage) -> Self {
        stage.as_str().to_string()
    }
}

impl Display for DealStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Deal {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "title_c", default)]
    pub title: Option<String>,
    #[serde(rename = "value_c", default, deserialize_with = "lenient::float")]
    pub value: Option<f64>,
    #[serde(rename = "stage_c", default)]
    pub stage: Option<DealStage>,
    #[serde(rename = "probability_c", default, deserialize_with = "lenient::int")]
    pub probability: Option<i64>,
    #[serde(rename = "expected_close_date_c", default)]
    pub expected_close_date: Option<String>,
    #[serde(rename = "created_at_c", default)]
    pub created_at: Option<String>,
    #[serde(rename = "contact_id_c", default)]
    pub contact: Option<LookupRef>,
}

impl Deal {
    pub fn value_or_zero(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }

    /// `value * probability / 100`, with probability clamped to 0..=100.
    pub fn weighted_value(&self) -> f64 {
        let probability = self.probability.unwrap_or(0).clamp(0, 100) as f64;
        self.value_or_zero() * probability / 100.0
    }

    pub fn is_open(&self) -> bool {
        !self.stage.as_ref().is_some_and(DealStage::is_closed)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealDraft {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<DealStage>,
    pub probability: Option<i64>,
    pub expected_close_date: Option<String>,
    pub contact_id: Option<i64>,
}

impl From<DealDraft> for RecordInput {
    fn from(draft: DealDraft) -> Self {
        RecordInput::new()
            .with_opt("title", draft.title)
            .with_opt("value", draft.value)
            .with_opt("stage", draft.stage.map(String::from))
            .with_opt("probability", draft.probability)
            .with_opt("expectedCloseDate", draft.expected_close_date)
            .with_opt("contactId", draft.contact_id)
    }
}
