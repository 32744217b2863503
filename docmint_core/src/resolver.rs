use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::DocmintError;
use crate::DocmintResult;
use crate::record::Record;

/// The outcome of binding a token set against a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
	/// Token name → bound string, covering every requested token.
	pub bindings: BTreeMap<String, String>,
	/// Tokens with no matching record field, bound to the empty string.
	pub missing: BTreeSet<String>,
}

/// How a caller treats a resolution whose missing set is non-empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFieldPolicy {
	/// Bind missing fields to the empty string and carry on (default).
	#[default]
	Fill,
	/// Refuse to render when any requested token has no record field.
	Reject,
}

impl Resolution {
	/// Apply a missing-field policy, turning a non-empty missing set into a
	/// typed error under [`MissingFieldPolicy::Reject`].
	pub fn enforce(self, policy: MissingFieldPolicy) -> DocmintResult<Self> {
		if policy == MissingFieldPolicy::Reject && !self.missing.is_empty() {
			return Err(DocmintError::MissingFields {
				names: self.missing.into_iter().collect(),
			});
		}

		Ok(self)
	}
}

/// Resolve each token against the record by exact, case-sensitive name match.
///
/// Resolution itself never fails: a token without a matching field binds to
/// the empty string and its name is reported through [`Resolution::missing`],
/// so callers decide whether partial data blocks export.
pub fn resolve(tokens: &BTreeSet<String>, record: &Record) -> Resolution {
	let mut resolution = Resolution::default();

	for token in tokens {
		match record.get(token) {
			Some(value) => {
				resolution
					.bindings
					.insert(token.clone(), value.to_string());
			}
			None => {
				resolution.bindings.insert(token.clone(), String::new());
				resolution.missing.insert(token.clone());
			}
		}
	}

	resolution
}
