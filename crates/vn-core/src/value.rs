use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A value held in the global or local variable store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VnValue {
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<VnValue>),
}

pub type ValueMap = BTreeMap<String, VnValue>;

impl VnValue {
    pub fn zero() -> Self {
        Self::Number(0.0)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[VnValue]> {
        match self {
            Self::Array(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
        }
    }

    /// Ordering for `greater_than` / `less_than`. Only numbers against numbers
    /// and strings against strings are ordered.
    pub fn compare(&self, other: &VnValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) => left.partial_cmp(right),
            (Self::String(left), Self::String(right)) => Some(left.cmp(right)),
            _ => None,
        }
    }

    /// Text form used when a value is spliced into dialogue or a sprite path.
    pub fn to_text(&self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::Number(value) => number_to_text(*value),
            Self::String(value) => value.clone(),
            Self::Array(values) => values
                .iter()
                .map(VnValue::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

fn number_to_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    format!("{}", value)
}

impl From<bool> for VnValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for VnValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for VnValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for VnValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for VnValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for VnValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn untagged_deserialize_picks_matching_variant() {
        let parsed: Vec<VnValue> =
            serde_json::from_str(r#"[true, 3, 2.5, "x", ["a", 1]]"#).expect("values");
        assert_eq!(
            parsed,
            vec![
                VnValue::Bool(true),
                VnValue::Number(3.0),
                VnValue::Number(2.5),
                VnValue::String("x".to_string()),
                VnValue::Array(vec![VnValue::from("a"), VnValue::from(1)]),
            ]
        );
    }

    #[test]
    fn to_text_renders_integers_without_fraction() {
        assert_eq!(VnValue::from(5).to_text(), "5");
        assert_eq!(VnValue::from(-2).to_text(), "-2");
        assert_eq!(VnValue::from(1.5).to_text(), "1.5");
        assert_eq!(VnValue::from(true).to_text(), "true");
        assert_eq!(VnValue::Number(f64::NAN).to_text(), "NaN");
        assert_eq!(
            VnValue::Array(vec![VnValue::from("a"), VnValue::from("b")]).to_text(),
            "a,b"
        );
    }

    #[test]
    fn compare_orders_only_like_kinds() {
        assert_eq!(
            VnValue::from(1).compare(&VnValue::from(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            VnValue::from("b").compare(&VnValue::from("a")),
            Some(Ordering::Greater)
        );
        assert_eq!(VnValue::from(1).compare(&VnValue::from("1")), None);
        assert_eq!(VnValue::from(true).compare(&VnValue::from(false)), None);
    }

    #[test]
    fn equality_is_strict_across_kinds() {
        assert_ne!(VnValue::from(1), VnValue::from("1"));
        assert_ne!(VnValue::from(0), VnValue::from(false));
        assert_eq!(VnValue::from(3), VnValue::Number(3.0));
    }
}
