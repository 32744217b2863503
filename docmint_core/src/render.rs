use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::DocmintError;
use crate::DocmintResult;
use crate::docx;
use crate::parser;
use crate::pdf;

/// Replace every bound placeholder in `body` with its bound string.
///
/// The pass is a single left-to-right splice over scanner spans: bound
/// values are copied into the output and never re-scanned, so a value
/// containing marker syntax cannot expand further (no recursion, no loops on
/// hostile data). Placeholders whose name is absent from `bindings` are left
/// verbatim, which keeps unresolved fields visible in the output.
pub fn render(body: &str, bindings: &BTreeMap<String, String>) -> String {
	let mut output = String::with_capacity(body.len());
	let mut cursor = 0;

	for span in parser::scan(body) {
		if let Some(value) = bindings.get(&span.name) {
			output.push_str(&body[cursor..span.start]);
			output.push_str(value);
			cursor = span.end;
		}
	}

	output.push_str(&body[cursor..]);
	output
}

/// Output formats supported by the exporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExportFormat {
	Pdf,
	Docx,
}

impl ExportFormat {
	/// File extension for documents in this format.
	pub fn extension(self) -> &'static str {
		match self {
			Self::Pdf => "pdf",
			Self::Docx => "docx",
		}
	}
}

impl fmt::Display for ExportFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.extension())
	}
}

impl FromStr for ExportFormat {
	type Err = DocmintError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.to_ascii_lowercase().as_str() {
			"pdf" => Ok(Self::Pdf),
			"docx" => Ok(Self::Docx),
			other => Err(DocmintError::UnsupportedFormat(other.to_string())),
		}
	}
}

/// Options shared by the exporters.
#[derive(Debug, Clone)]
pub struct ExportOptions {
	/// Directory holding the font family TTF files for PDF export.
	pub fonts_dir: PathBuf,
	/// Font family name; files are `<family>-Regular.ttf` and friends.
	pub font_family: String,
	/// Optional letterhead image placed above the content in PDF export.
	pub letterhead: Option<PathBuf>,
	/// Document title stamped into PDF metadata.
	pub title: Option<String>,
}

impl Default for ExportOptions {
	fn default() -> Self {
		Self {
			fonts_dir: PathBuf::from("fonts"),
			font_family: "LiberationSans".to_string(),
			letterhead: None,
			title: None,
		}
	}
}

/// Convert merged content to document bytes in the requested format.
///
/// Both exporters are pure transforms of the content and options: the same
/// input produces the same structural output. The engine never reads the
/// ambient clock here; the only non-reproducible bytes are the creation
/// timestamp genpdf itself embeds in PDF metadata.
pub fn export(
	content: &str,
	format: ExportFormat,
	options: &ExportOptions,
) -> DocmintResult<Vec<u8>> {
	match format {
		ExportFormat::Pdf => pdf::to_pdf(content, options),
		ExportFormat::Docx => docx::to_docx(content),
	}
}
