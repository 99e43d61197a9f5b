//! Tolerant decoders for numeric columns.
//!
//! The backend is not strict about column types: a probability may come back
//! as `60.5` or `"60"`. These read such values the same way writes coerce them
//! and decode anything unreadable as `None`.

use crate::fields::{parse_float, parse_int};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(read(value, parse_int))
}

pub fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(read(value, parse_float))
}

fn read<T>(value: Option<Value>, parse: fn(&Value) -> Option<T>) -> Option<T> {
    let value = value.filter(|v| !v.is_null())?;
    let parsed = parse(&value);
    if parsed.is_none() {
        log::warn!("ignoring unreadable numeric value {value}");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::int")]
        count: Option<i64>,
        #[serde(default, deserialize_with = "super::float")]
        amount: Option<f64>,
    }

    fn row(value: serde_json::Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn drifted_numbers_are_read() {
        let parsed = row(json!({"count": 60.5, "amount": "1200.75"}));
        assert_eq!(parsed.count, Some(60));
        assert_eq!(parsed.amount, Some(1200.75));

        let parsed = row(json!({"count": "42", "amount": 10}));
        assert_eq!(parsed.count, Some(42));
        assert_eq!(parsed.amount, Some(10.0));
    }

    #[test]
    fn missing_null_and_garbage_are_none() {
        let parsed = row(json!({}));
        assert!(parsed.count.is_none());
        assert!(parsed.amount.is_none());

        let parsed = row(json!({"count": null, "amount": {"nested": true}}));
        assert!(parsed.count.is_none());
        assert!(parsed.amount.is_none());
    }
}
