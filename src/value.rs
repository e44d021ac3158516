//! Owned values carried in a statement's bind map.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Json(serde_json::Value),
    Uuid(Uuid),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    StringArray(Vec<String>),
    IntArray(Vec<i64>),
    Null,
}

impl Value {
    /// Renders the value as an inline SQL literal. Strings are quoted
    /// with single quotes (embedded quotes doubled); everything else
    /// uses its natural textual form.
    pub fn literal(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::String(v) => quote(v),
            Value::Boolean(v) => v.to_string(),
            Value::Json(v) => quote(&v.to_string()),
            Value::Uuid(v) => quote(&v.to_string()),
            Value::Date(v) => quote(&v.to_string()),
            Value::Timestamp(v) => quote(&v.to_rfc3339()),
            Value::StringArray(items) => {
                let items: Vec<String> = items.iter().map(|s| quote(s)).collect();
                format!("ARRAY[{}]", items.join(", "))
            }
            Value::IntArray(items) => {
                let items: Vec<String> = items.iter().map(|n| n.to_string()).collect();
                format!("ARRAY[{}]", items.join(", "))
            }
            Value::Null => "NULL".to_string(),
        }
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StringArray(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::IntArray(v)
    }
}
