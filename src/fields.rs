//! Loosely-typed record input and the per-entity field tables.
//!
//! Callers may name a field by its short camelCase key (`contactId`) or by its
//! backend column (`contact_id_c`). The short key wins when both carry a
//! value. Values are coerced to the column's kind before anything is sent.

use crate::api::models::RawRecord;
use crate::error::{CrmError, CrmResult};
use crate::format::{DateInput, to_iso_string};
use serde::Serialize;
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    /// Sent as an ISO-8601 UTC timestamp.
    DateTime,
    /// Sent as `YYYY-MM-DD`.
    Date,
}

/// What `create` sends when the caller supplied nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnCreate {
    Omit,
    Zero,
    Null,
    Now,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
    pub on_create: OnCreate,
    /// An explicit `null`/empty value clears the column on update.
    pub clearable: bool,
}

impl FieldSpec {
    pub const fn new(key: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            column,
            kind,
            on_create: OnCreate::Omit,
            clearable: false,
        }
    }

    pub const fn on_create(mut self, on_create: OnCreate) -> Self {
        self.on_create = on_create;
        self
    }

    pub const fn clearable(mut self) -> Self {
        self.clearable = true;
        self
    }
}

/// How a field shows up in the caller's input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Absent,
    /// Key present but `null` or blank.
    Empty,
    Value(&'a Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordInput(Map<String, Value>);

impl RecordInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> CrmResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(CrmError::InvalidField {
                field: "record",
                reason: format!("expected an object, got {other}"),
            }),
        }
    }

    pub fn from_serialize<T: Serialize>(input: &T) -> CrmResult<Self> {
        Self::from_value(serde_json::to_value(input)?)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn with_opt<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short key first, then the column name.
    pub fn lookup(&self, spec: &FieldSpec) -> Lookup<'_> {
        let short = self.classify(spec.key);
        if let Lookup::Value(_) = short {
            return short;
        }
        match self.classify(spec.column) {
            Lookup::Value(value) => Lookup::Value(value),
            Lookup::Empty => Lookup::Empty,
            Lookup::Absent => short,
        }
    }

    fn classify(&self, key: &str) -> Lookup<'_> {
        match self.0.get(key) {
            None => Lookup::Absent,
            Some(Value::Null) => Lookup::Empty,
            Some(Value::String(s)) if s.trim().is_empty() => Lookup::Empty,
            Some(value) => Lookup::Value(value),
        }
    }
}

impl From<Map<String, Value>> for RecordInput {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Anything a record id can be coerced from.
pub trait IntoRecordId {
    fn into_record_id(self) -> CrmResult<i64>;
}

impl IntoRecordId for i64 {
    fn into_record_id(self) -> CrmResult<i64> {
        Ok(self)
    }
}

impl IntoRecordId for i32 {
    fn into_record_id(self) -> CrmResult<i64> {
        Ok(i64::from(self))
    }
}

impl IntoRecordId for u32 {
    fn into_record_id(self) -> CrmResult<i64> {
        Ok(i64::from(self))
    }
}

impl IntoRecordId for &Value {
    fn into_record_id(self) -> CrmResult<i64> {
        parse_int(self).ok_or_else(|| CrmError::InvalidField {
            field: "id",
            reason: format!("expected an integer, got {self}"),
        })
    }
}

impl IntoRecordId for &str {
    fn into_record_id(self) -> CrmResult<i64> {
        Value::String(self.to_string()).into_record_id()
    }
}

impl IntoRecordId for String {
    fn into_record_id(self) -> CrmResult<i64> {
        Value::String(self).into_record_id()
    }
}

impl IntoRecordId for Value {
    fn into_record_id(self) -> CrmResult<i64> {
        (&self).into_record_id()
    }
}

/// Payload for one new record. `now` fills `OnCreate::Now` fields.
pub fn build_create(specs: &[FieldSpec], input: &RecordInput, now: &str) -> CrmResult<RawRecord> {
    let mut record = RawRecord::new();
    for spec in specs {
        let value = match input.lookup(spec) {
            Lookup::Value(value) => coerce(spec, value)?,
            Lookup::Absent | Lookup::Empty => match spec.on_create {
                OnCreate::Omit => continue,
                OnCreate::Null => Value::Null,
                OnCreate::Zero => zero(spec.kind),
                OnCreate::Now => Value::String(now.to_string()),
            },
        };
        record.insert(spec.column.to_string(), value);
    }
    Ok(record)
}

/// Partial payload: only fields the caller actually supplied.
pub fn build_update(specs: &[FieldSpec], input: &RecordInput) -> CrmResult<RawRecord> {
    let mut record = RawRecord::new();
    for spec in specs {
        match input.lookup(spec) {
            Lookup::Value(value) => {
                record.insert(spec.column.to_string(), coerce(spec, value)?);
            }
            Lookup::Empty if spec.clearable => {
                record.insert(spec.column.to_string(), Value::Null);
            }
            Lookup::Empty | Lookup::Absent => {}
        }
    }
    Ok(record)
}

pub fn coerce(spec: &FieldSpec, value: &Value) -> CrmResult<Value> {
    let invalid = |reason: &str| CrmError::InvalidField {
        field: spec.key,
        reason: format!("{reason}, got {value}"),
    };
    match spec.kind {
        FieldKind::Text => match value {
            Value::String(s) => Ok(Value::String(s.clone())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(invalid("expected text")),
        },
        FieldKind::Integer => parse_int(value)
            .map(Value::from)
            .ok_or_else(|| invalid("expected an integer")),
        FieldKind::Float => parse_float(value)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid("expected a number")),
        FieldKind::DateTime => value
            .to_datetime()
            .map(|dt| Value::String(to_iso_string(&dt)))
            .ok_or_else(|| invalid("expected a date/time")),
        FieldKind::Date => value
            .to_datetime()
            .map(|dt| Value::String(dt.format("%Y-%m-%d").to_string()))
            .ok_or_else(|| invalid("expected a date")),
    }
}

/// Integer coercion: numbers truncate, strings use their leading digits.
pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            let sign_len = usize::from(s.starts_with(['+', '-']));
            let digits = s[sign_len..]
                .find(|c: char| !c.is_ascii_digit())
                .map_or(s.len(), |end| end + sign_len);
            if digits == sign_len {
                return None;
            }
            s[..digits].parse().ok()
        }
        _ => None,
    }
}

/// Float coercion: numbers as-is, strings use their longest numeric prefix.
pub fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            let candidate_end = s
                .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
                .unwrap_or(s.len());
            (1..=candidate_end)
                .rev()
                .filter(|end| s.is_char_boundary(*end))
                .find_map(|end| s[..end].parse::<f64>().ok())
                .filter(|f| f.is_finite())
        }
        _ => None,
    }
}

fn zero(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Float => Value::from(0.0),
        FieldKind::Integer => Value::from(0),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NAME: FieldSpec = FieldSpec::new("name", "name_c", FieldKind::Text);
    const CONTACT: FieldSpec = FieldSpec::new("contactId", "contact_id_c", FieldKind::Integer)
        .on_create(OnCreate::Null)
        .clearable();
    const VALUE: FieldSpec =
        FieldSpec::new("value", "value_c", FieldKind::Float).on_create(OnCreate::Zero);

    fn input(value: Value) -> RecordInput {
        RecordInput::from_value(value).unwrap()
    }

    #[test]
    fn short_key_wins_over_column() {
        let data = input(json!({"name": "Ada", "name_c": "Other"}));
        assert_eq!(data.lookup(&NAME), Lookup::Value(&json!("Ada")));
    }

    #[test]
    fn blank_short_key_falls_back_to_column() {
        let data = input(json!({"name": "", "name_c": "Ada"}));
        assert_eq!(data.lookup(&NAME), Lookup::Value(&json!("Ada")));
        let empty = input(json!({"name": null}));
        assert_eq!(empty.lookup(&NAME), Lookup::Empty);
        assert_eq!(input(json!({})).lookup(&NAME), Lookup::Absent);
    }

    #[test]
    fn parse_int_follows_leading_digits() {
        assert_eq!(parse_int(&json!("42")), Some(42));
        assert_eq!(parse_int(&json!(" -7px")), Some(-7));
        assert_eq!(parse_int(&json!(42.9)), Some(42));
        assert_eq!(parse_int(&json!("abc")), None);
        assert_eq!(parse_int(&json!("-")), None);
        assert_eq!(parse_int(&json!(true)), None);
    }

    #[test]
    fn parse_float_follows_numeric_prefix() {
        assert_eq!(parse_float(&json!("12.5")), Some(12.5));
        assert_eq!(parse_float(&json!("1e3 USD")), Some(1000.0));
        assert_eq!(parse_float(&json!("3.")), Some(3.0));
        assert_eq!(parse_float(&json!("$5")), None);
        assert_eq!(parse_float(&json!(7)), Some(7.0));
    }

    #[test]
    fn create_applies_defaults() {
        let record = build_create(&[NAME, CONTACT, VALUE], &input(json!({})), "now").unwrap();
        assert!(record.get("name_c").is_none());
        assert_eq!(record["contact_id_c"], Value::Null);
        assert_eq!(record["value_c"], json!(0.0));
    }

    #[test]
    fn update_only_includes_supplied_fields() {
        let record = build_update(&[NAME, CONTACT, VALUE], &input(json!({"value": "99.5"}))).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record["value_c"], json!(99.5));
    }

    #[test]
    fn update_clears_clearable_reference() {
        let record =
            build_update(&[NAME, CONTACT], &input(json!({"contactId": null, "name": null}))).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record["contact_id_c"], Value::Null);
    }

    #[test]
    fn bad_integer_is_invalid_field() {
        let err = build_create(&[CONTACT], &input(json!({"contactId": "abc"})), "now").unwrap_err();
        assert!(matches!(err, CrmError::InvalidField { field: "contactId", .. }));
    }

    #[test]
    fn date_kinds_normalize() {
        let at = FieldSpec::new("timestamp", "timestamp_c", FieldKind::DateTime);
        let on = FieldSpec::new("expectedCloseDate", "expected_close_date_c", FieldKind::Date);
        assert_eq!(
            coerce(&at, &json!("2024-03-01 09:00")).unwrap(),
            json!("2024-03-01T09:00:00.000Z")
        );
        assert_eq!(
            coerce(&on, &json!("2024-06-30T12:00:00Z")).unwrap(),
            json!("2024-06-30")
        );
        assert!(coerce(&on, &json!("someday")).is_err());
    }

    #[test]
    fn non_object_input_is_rejected() {
        assert!(RecordInput::from_value(json!([1, 2])).is_err());
        assert!(RecordInput::from_value(Value::Null).unwrap().is_empty());
    }
}
