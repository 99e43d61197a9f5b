//! Records as the backend returns them, plus typed drafts for writes.
//!
//! Backend columns carry a `_c` suffix; every column except `Id` may be
//! missing from a response, so all of them decode as `Option`.

pub mod activity;
pub mod contact;
pub mod deal;
mod lenient;
pub mod lookup;

pub use activity::{Activity, ActivityDraft, ActivityType};
pub use contact::{Contact, ContactDraft};
pub use deal::{Deal, DealDraft, DealStage};
pub use lookup::LookupRef;
