//! Per-call key/value fields.

use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use crate::error::LogError;

/// Keys written by the logger itself; per-call fields may not use them.
pub const RESERVED_KEYS: [&str; 7] = [
    "time", "level", "logger", "module", "msg", "source", "error",
];

/// A loggable field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Duration(Duration),
    /// Rendered message of an error
    Error(String),
}

impl FieldValue {
    /// Capture an error by its message.
    pub fn error(err: &dyn StdError) -> Self {
        FieldValue::Error(err.to_string())
    }

    fn to_json(&self) -> Value {
        match self {
            FieldValue::Str(s) | FieldValue::Error(s) => Value::String(s.clone()),
            FieldValue::Int(i) => Value::from(*i),
            // Non-finite floats have no JSON form and become null.
            FieldValue::Float(f) => Value::from(*f),
            FieldValue::Duration(d) => Value::String(format!("{d:?}")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<Duration> for FieldValue {
    fn from(value: Duration) -> Self {
        FieldValue::Duration(value)
    }
}

/// Ordered, validated key/value fields attached to one entry.
///
/// `Display` renders the fields as a JSON object, which is how they
/// travel through the `tracing` event to the JSON layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build fields from key/value pairs, stopping at the first invalid key.
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self, LogError>
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: Into<String>,
    {
        let mut fields = Self::new();
        for (key, value) in pairs {
            fields.insert(key, value)?;
        }
        Ok(fields)
    }

    /// Add a field. Keys must be non-empty and must not be one of
    /// [`RESERVED_KEYS`]. A repeated key replaces the earlier value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<&mut Self, LogError> {
        let key = key.into();
        validate_key(&key)?;
        self.put(key, value.into());
        Ok(self)
    }

    /// Builder form of [`Fields::insert`].
    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<Self, LogError> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub(crate) fn trusted(key: &str, value: impl Into<FieldValue>) -> Self {
        let mut fields = Self::new();
        fields.put(key.to_string(), value.into());
        fields
    }

    fn put(&mut self, key: String, value: FieldValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The fields as a JSON object.
    pub fn to_json(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.to_json()))
    }
}

fn validate_key(key: &str) -> Result<(), LogError> {
    let reason = if key.trim().is_empty() {
        "empty key"
    } else if RESERVED_KEYS.contains(&key) {
        "reserved key"
    } else {
        return Ok(());
    };

    Err(LogError::InvalidField {
        key: key.to_string(),
        reason,
    })
}

/// Build [`Fields`] from `key => value` pairs.
///
/// Evaluates to `Result<Fields, LogError>`.
///
/// ```rust
/// use tradelog::fields;
///
/// let fields = fields!["symbol" => "ETH-USD", "qty" => 3].unwrap();
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        ::std::result::Result::<$crate::Fields, $crate::LogError>::Ok($crate::Fields::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Fields::from_pairs([
            $(($key, $crate::FieldValue::from($value))),+
        ])
    };
}
