use crate::fields::{FieldKind, FieldSpec, OnCreate};
use crate::model::Deal;
use crate::service::{Entity, EntityService};

pub type DealService = EntityService<Deal>;

impl Entity for Deal {
    const NAME: &'static str = "deal";
    const PLURAL: &'static str = "deals";
    const TABLE: &'static str = "deal_c";
    const PROJECTION: &'static [&'static str] = &[
        "title_c",
        "value_c",
        "stage_c",
        "probability_c",
        "expected_close_date_c",
        "created_at_c",
        "contact_id_c",
    ];
    const NEWEST_FIRST_BY: &'static str = "created_at_c";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("title", "title_c", FieldKind::Text),
        FieldSpec::new("value", "value_c", FieldKind::Float).on_create(OnCreate::Zero),
        FieldSpec::new("stage", "stage_c", FieldKind::Text),
        FieldSpec::new("probability", "probability_c", FieldKind::Integer)
            .on_create(OnCreate::Zero),
        FieldSpec::new("expectedCloseDate", "expected_close_date_c", FieldKind::Date),
        FieldSpec::new("contactId", "contact_id_c", FieldKind::Integer)
            .on_create(OnCreate::Null)
            .clearable(),
    ];
    const CREATE_STAMPS: &'static [&'static str] = &["created_at_c"];
}
