use std::collections::BTreeSet;

/// Opening delimiter of a placeholder marker.
pub const OPEN_MARKER: &str = "{{";
/// Closing delimiter of a placeholder marker.
pub const CLOSE_MARKER: &str = "}}";

/// A placeholder located in a template body.
///
/// `start..end` is the byte range of the whole marker including both
/// delimiters, so replacing that range substitutes the placeholder without
/// touching surrounding text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSpan {
	/// Token name with surrounding whitespace inside the markers trimmed.
	pub name: String,
	/// Byte offset of the opening `{{`.
	pub start: usize,
	/// Byte offset just past the closing `}}`.
	pub end: usize,
}

impl PlaceholderSpan {
	/// The marker text exactly as it appears in `body`.
	pub fn marker_text<'a>(&self, body: &'a str) -> &'a str {
		&body[self.start..self.end]
	}
}

/// Scan a template body for placeholder markers, in order of appearance.
///
/// The scanner is tolerant and never fails on template content. A
/// placeholder is `{{`, a name containing neither `{` nor `}`, then `}}`.
/// Everything that does not complete that shape stays literal text:
///
/// - an opening `{{` that runs into a stray brace or the end of input is
///   literal (`{{name`, `{{a}b}}`),
/// - a second `{{` before the close supersedes the pending open
///   (`{{a{{b}}` yields only `b`; `{{{x}}` yields `x` after a literal `{`),
/// - a marker pair whose trimmed name is empty (`{{}}`, `{{  }}`) is
///   literal.
pub fn scan(body: &str) -> Vec<PlaceholderSpan> {
	let bytes = body.as_bytes();
	let mut spans = Vec::new();
	let mut cursor = 0;

	while let Some(found) = body[cursor..].find(OPEN_MARKER) {
		let open = cursor + found;
		let name_start = open + OPEN_MARKER.len();

		// Advance to the first brace after the opening marker. Braces are
		// ASCII, so byte offsets here are always valid char boundaries.
		let mut pos = name_start;
		while pos < bytes.len() && bytes[pos] != b'{' && bytes[pos] != b'}' {
			pos += 1;
		}

		if body[pos..].starts_with(CLOSE_MARKER) {
			let name = body[name_start..pos].trim();
			let end = pos + CLOSE_MARKER.len();

			if !name.is_empty() {
				spans.push(PlaceholderSpan {
					name: name.to_string(),
					start: open,
					end,
				});
			}

			cursor = end;
		} else if body[pos..].starts_with(OPEN_MARKER) {
			// A fresh `{{` replaces the pending open; the text between them
			// stays literal.
			cursor = pos;
		} else {
			// Stray brace or end of input: the pending marker is literal.
			cursor = open + 1;
		}
	}

	spans
}

/// Extract the set of distinct placeholder token names from a template body.
///
/// Repeated occurrences of the same name collapse into one entry. An empty
/// set is a valid result for a template without placeholders.
pub fn extract_tokens(body: &str) -> BTreeSet<String> {
	scan(body).into_iter().map(|span| span.name).collect()
}
