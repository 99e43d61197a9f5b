//! CRM dashboard core: backend access, entity services and display helpers.
//!
//! Everything here works without a display. The GTK shell lives in the
//! `crm-dashboard` binary behind the `gui` feature.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fields;
pub mod format;
pub mod logging;
pub mod model;
pub mod service;
pub mod shell;
pub mod utils;

pub use api::{ApperClient, ApperConnector, Connector, MemoryBackend, RecordBackend};
pub use config::{AppConfig, CredentialSource, Credentials};
pub use dashboard::DashboardSummary;
pub use error::{CrmError, CrmResult};
pub use fields::{IntoRecordId, RecordInput};
pub use format::{DEFAULT_FALLBACK, is_valid_date, safe_format, safe_format_or_default};
pub use model::{
    Activity, ActivityDraft, ActivityType, Contact, ContactDraft, Deal, DealDraft, DealStage,
    LookupRef,
};
pub use service::{ActivityService, ContactService, CrmServices, DealService, EntityService};
pub use shell::{Route, ShellState};
