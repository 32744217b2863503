use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::DocmintError;
use crate::DocmintResult;
use crate::render::ExportOptions;

/// Default per-row time limit for batch runs, in milliseconds.
pub const DEFAULT_ROW_TIMEOUT_MS: u64 = 30_000;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["docmint.toml", ".docmint.toml", ".config/docmint.toml"];

/// Configuration loaded from a `docmint.toml` file.
///
/// Every field has a default, so a project without a config file behaves the
/// same as one with an empty config file.
///
/// ```toml
/// templates = "templates"
/// output = "generated"
/// audit_log = "audit.jsonl"
///
/// [fonts]
/// dir = "fonts"
/// family = "LiberationSans"
///
/// [pdf]
/// letterhead = "letterhead.png"
///
/// [batch]
/// row_timeout_ms = 30000
///
/// [exclude]
/// patterns = ["drafts/", "*.bak.toml"]
/// ```
#[derive(Debug, Deserialize)]
pub struct DocmintConfig {
	/// Directory holding template files, relative to the project root.
	#[serde(default = "default_templates_dir")]
	pub templates: PathBuf,
	/// Directory generated documents are written into, relative to the
	/// project root.
	#[serde(default = "default_output_dir")]
	pub output: PathBuf,
	/// Audit trail file, one JSON entry per line, relative to the project
	/// root.
	#[serde(default = "default_audit_log")]
	pub audit_log: PathBuf,
	/// Font files used for PDF export.
	#[serde(default)]
	pub fonts: FontsConfig,
	/// PDF-specific settings.
	#[serde(default)]
	pub pdf: PdfConfig,
	/// Batch run settings.
	#[serde(default)]
	pub batch: BatchConfig,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
}

/// Font configuration for PDF export.
///
/// The directory must contain the four standard family files, for example
/// `LiberationSans-Regular.ttf`, `-Bold.ttf`, `-Italic.ttf` and
/// `-BoldItalic.ttf`.
#[derive(Debug, Clone, Deserialize)]
pub struct FontsConfig {
	/// Directory holding the font files, relative to the project root.
	#[serde(default = "default_fonts_dir")]
	pub dir: PathBuf,
	/// Font family name shared by the files in `dir`.
	#[serde(default = "default_font_family")]
	pub family: String,
}

impl Default for FontsConfig {
	fn default() -> Self {
		Self {
			dir: default_fonts_dir(),
			family: default_font_family(),
		}
	}
}

/// PDF-specific settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PdfConfig {
	/// Letterhead image placed at the top of every exported PDF, relative to
	/// the project root. When absent, documents render without a letterhead.
	#[serde(default)]
	pub letterhead: Option<PathBuf>,
}

/// Batch run settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
	/// Per-row time limit in milliseconds. Rows exceeding it are abandoned
	/// and reported as timed out.
	#[serde(default = "default_row_timeout_ms")]
	pub row_timeout_ms: u64,
}

impl Default for BatchConfig {
	fn default() -> Self {
		Self {
			row_timeout_ms: default_row_timeout_ms(),
		}
	}
}

/// Configuration for excluding template files from listings.
///
/// Patterns follow gitignore syntax, relative to the templates directory.
/// Supports negation (`!pattern`), directory markers (trailing `/`), and all
/// standard gitignore wildcards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeConfig {
	/// Gitignore-style patterns for template files to skip.
	///
	/// Examples: `"drafts/"`, `"*.bak.toml"`, `"!keep.toml"`.
	#[serde(default)]
	pub patterns: Vec<String>,
}

fn default_templates_dir() -> PathBuf {
	PathBuf::from("templates")
}

fn default_output_dir() -> PathBuf {
	PathBuf::from("generated")
}

fn default_audit_log() -> PathBuf {
	PathBuf::from("audit.jsonl")
}

fn default_fonts_dir() -> PathBuf {
	PathBuf::from("fonts")
}

fn default_font_family() -> String {
	"LiberationSans".to_string()
}

fn default_row_timeout_ms() -> u64 {
	DEFAULT_ROW_TIMEOUT_MS
}

impl Default for DocmintConfig {
	fn default() -> Self {
		Self {
			templates: default_templates_dir(),
			output: default_output_dir(),
			audit_log: default_audit_log(),
			fonts: FontsConfig::default(),
			pdf: PdfConfig::default(),
			batch: BatchConfig::default(),
			exclude: ExcludeConfig::default(),
		}
	}
}

impl DocmintConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> DocmintResult<Option<DocmintConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: DocmintConfig =
			toml::from_str(&content).map_err(|e| DocmintError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Load the config at `root`, falling back to defaults when no config
	/// file exists.
	pub fn load_or_default(root: &Path) -> DocmintResult<DocmintConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// Templates directory resolved against the project root.
	#[must_use]
	pub fn templates_dir(&self, root: &Path) -> PathBuf {
		root.join(&self.templates)
	}

	/// Output directory resolved against the project root.
	#[must_use]
	pub fn output_dir(&self, root: &Path) -> PathBuf {
		root.join(&self.output)
	}

	/// Audit trail path resolved against the project root.
	#[must_use]
	pub fn audit_log_path(&self, root: &Path) -> PathBuf {
		root.join(&self.audit_log)
	}

	/// Export settings resolved against the project root.
	#[must_use]
	pub fn export_options(&self, root: &Path) -> ExportOptions {
		ExportOptions {
			fonts_dir: root.join(&self.fonts.dir),
			font_family: self.fonts.family.clone(),
			letterhead: self.pdf.letterhead.as_ref().map(|path| root.join(path)),
			title: None,
		}
	}

	/// Per-row batch time limit as a [`Duration`].
	#[must_use]
	pub fn row_timeout(&self) -> Duration {
		Duration::from_millis(self.batch.row_timeout_ms)
	}
}
