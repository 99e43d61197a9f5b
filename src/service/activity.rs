use crate::fields::{FieldKind, FieldSpec, OnCreate};
use crate::model::Activity;
use crate::service::{Entity, EntityService};

pub type ActivityService = EntityService<Activity>;

impl Entity for Activity {
    const NAME: &'static str = "activity";
    const PLURAL: &'static str = "activities";
    const TABLE: &'static str = "activity_c";
    const PROJECTION: &'static [&'static str] = &[
        "type_c",
        "description_c",
        "timestamp_c",
        "contact_id_c",
        "deal_id_c",
    ];
    const NEWEST_FIRST_BY: &'static str = "timestamp_c";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("type", "type_c", FieldKind::Text),
        FieldSpec::new("description", "description_c", FieldKind::Text),
        FieldSpec::new("timestamp", "timestamp_c", FieldKind::DateTime).on_create(OnCreate::Now),
        FieldSpec::new("contactId", "contact_id_c", FieldKind::Integer)
            .on_create(OnCreate::Null)
            .clearable(),
        FieldSpec::new("dealId", "deal_id_c", FieldKind::Integer)
            .on_create(OnCreate::Null)
            .clearable(),
    ];
}
