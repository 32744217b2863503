use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use derive_more::Deref;
use derive_more::DerefMut;

/// Fixed display format for date fields, e.g. `January 10, 2024`.
///
/// Month names are always English; field formatting is deliberately not
/// locale-dependent so the same record renders the same bytes everywhere.
pub const DATE_FORMAT: &str = "%B %d, %Y";

/// A scalar value carried by a [`Record`] field.
///
/// Each variant binds into a placeholder through a fixed, documented string
/// form: text as-is, integers in plain decimal, floats via the shortest
/// round-trip decimal with `.` as the separator, booleans as `true`/`false`,
/// and dates per [`DATE_FORMAT`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FieldValue {
	Text(String),
	Integer(i64),
	Float(ApproxFloat),
	Bool(bool),
	Date(NaiveDate),
}

/// A float wrapper that implements equality via approximate comparison,
/// allowing `FieldValue` to derive `PartialEq` cleanly.
#[derive(Debug, Clone, Copy)]
pub struct ApproxFloat(pub f64);

impl PartialEq for ApproxFloat {
	fn eq(&self, other: &Self) -> bool {
		float_cmp::approx_eq!(f64, self.0, other.0)
	}
}

impl fmt::Display for ApproxFloat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(value) => f.write_str(value),
			Self::Integer(value) => write!(f, "{value}"),
			Self::Float(value) => write!(f, "{value}"),
			Self::Bool(value) => write!(f, "{value}"),
			Self::Date(value) => write!(f, "{}", value.format(DATE_FORMAT)),
		}
	}
}

impl FieldValue {
	/// Convert a JSON scalar into a field value.
	///
	/// `null`, arrays, and objects have no scalar representation and yield
	/// `None`; callers choose whether to skip or reject them.
	pub fn from_json(value: &serde_json::Value) -> Option<Self> {
		match value {
			serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
			serde_json::Value::Number(n) => {
				if let Some(i) = n.as_i64() {
					Some(Self::Integer(i))
				} else {
					n.as_f64().map(|f| Self::Float(ApproxFloat(f)))
				}
			}
			serde_json::Value::String(s) => Some(Self::Text(s.clone())),
			_ => None,
		}
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<f64> for FieldValue {
	fn from(value: f64) -> Self {
		Self::Float(ApproxFloat(value))
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<NaiveDate> for FieldValue {
	fn from(value: NaiveDate) -> Self {
		Self::Date(value)
	}
}

/// One set of field → value data bound into a single document.
///
/// Records are ephemeral: one exists for the duration of a single generation
/// request (or one batch row) and is never persisted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Deref, DerefMut)]
pub struct Record(
	#[deref]
	#[deref_mut]
	BTreeMap<String, FieldValue>,
);

impl Record {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a field, returning the record for chained construction.
	#[must_use]
	pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
		self.0.insert(name.into(), value.into());
		self
	}
}

impl<K, V> FromIterator<(K, V)> for Record
where
	K: Into<String>,
	V: Into<FieldValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter.into_iter()
				.map(|(name, value)| (name.into(), value.into()))
				.collect(),
		)
	}
}
