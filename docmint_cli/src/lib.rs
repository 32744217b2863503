use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate offer letters and certificates from templates, singly or in bulk.",
	long_about = "docmint is a template-merge engine for personalized paperwork: offer \
	              letters, certificates, and other templated documents rendered to PDF or \
	              DOCX, one record at a time or in bulk.\n\nTemplates are plain text with \
	              {{field}} placeholders. Records supply the field values; the engine \
	              binds them, renders the document, and writes every attempt to an \
	              append-only audit trail.\n\nQuick start:\n  docmint init      Scaffold \
	              a config and sample template\n  docmint tokens    List a template's \
	              placeholders\n  docmint generate  Merge one record into a document\n  \
	              docmint batch     Generate one document per CSV row\n  docmint audit    \
	              Show the latest audit trail entries"
)]
pub struct DocmintCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize docmint in a project by creating a config and sample
	/// template.
	///
	/// Creates a `docmint.toml` config file and a `templates/` directory
	/// containing a sample offer letter. Existing files are left untouched, so
	/// the command is safe to re-run.
	Init,
	/// List the distinct placeholders of a template.
	///
	/// Prints every `{{field}}` name the template body references, one per
	/// line in alphabetical order. Useful for discovering which columns a
	/// batch CSV needs.
	Tokens {
		/// Id of the template to inspect.
		#[arg(long, short, value_name = "ID")]
		template: String,
	},
	/// Generate a single document from a template and one record.
	///
	/// Field values come from repeated `--field name=value` flags, from a
	/// record file (JSON, TOML, or YAML, chosen by extension), or both, with
	/// flags taking precedence. The rendered document lands in the configured
	/// output directory under a timestamped name.
	///
	/// Missing fields render as blanks by default; pass
	/// `--require-all-fields` to refuse generation instead. Repeat `--format`
	/// to export the same merge in several formats.
	Generate {
		/// Id of the template to generate from.
		#[arg(long, short, value_name = "ID")]
		template: String,

		/// A field assignment in `name=value` form. May be repeated.
		#[arg(long, short, value_name = "NAME=VALUE")]
		field: Vec<String>,

		/// Path to a record file supplying field values. The extension picks
		/// the parser: `.json`, `.toml`, `.yaml`, or `.yml`.
		#[arg(long, short, value_name = "FILE")]
		record: Option<PathBuf>,

		/// Export format, `pdf` or `docx`. May be repeated to export both.
		/// Defaults to `docx`.
		#[arg(long, value_name = "FORMAT")]
		format: Vec<String>,

		/// Refuse generation when the record leaves any placeholder unbound.
		#[arg(long, default_value_t = false)]
		require_all_fields: bool,

		/// Actor recorded in the audit trail. Defaults to the `USER`
		/// environment variable.
		#[arg(long, value_name = "NAME")]
		actor: Option<String>,
	},
	/// Merge a record into a template and print the result without exporting.
	///
	/// Runs the same placeholder binding as `generate` but stops before
	/// rendering: the merged text goes to stdout, nothing is written to the
	/// output directory, and the audit trail records a preview.
	Preview {
		/// Id of the template to preview.
		#[arg(long, short, value_name = "ID")]
		template: String,

		/// A field assignment in `name=value` form. May be repeated.
		#[arg(long, short, value_name = "NAME=VALUE")]
		field: Vec<String>,

		/// Path to a record file supplying field values. The extension picks
		/// the parser: `.json`, `.toml`, `.yaml`, or `.yml`.
		#[arg(long, short, value_name = "FILE")]
		record: Option<PathBuf>,

		/// Actor recorded in the audit trail. Defaults to the `USER`
		/// environment variable.
		#[arg(long, value_name = "NAME")]
		actor: Option<String>,
	},
	/// Generate a single document and write it to an explicit path.
	///
	/// Behaves like `generate` but bypasses the output directory: the
	/// document is written to `--out` and the audit trail records an export.
	/// When `--format` is omitted the format is inferred from the `--out`
	/// extension.
	Export {
		/// Id of the template to export from.
		#[arg(long, short, value_name = "ID")]
		template: String,

		/// A field assignment in `name=value` form. May be repeated.
		#[arg(long, short, value_name = "NAME=VALUE")]
		field: Vec<String>,

		/// Path to a record file supplying field values. The extension picks
		/// the parser: `.json`, `.toml`, `.yaml`, or `.yml`.
		#[arg(long, short, value_name = "FILE")]
		record: Option<PathBuf>,

		/// Export format, `pdf` or `docx`. Defaults to the extension of
		/// `--out`, then to `docx`.
		#[arg(long, value_name = "FORMAT")]
		format: Option<String>,

		/// Destination path for the exported document.
		#[arg(long, short, value_name = "FILE")]
		out: PathBuf,

		/// Refuse generation when the record leaves any placeholder unbound.
		#[arg(long, default_value_t = false)]
		require_all_fields: bool,

		/// Actor recorded in the audit trail. Defaults to the `USER`
		/// environment variable.
		#[arg(long, value_name = "NAME")]
		actor: Option<String>,
	},
	/// Generate one document per row of a CSV file.
	///
	/// The CSV header row names the fields; each following row becomes one
	/// record and one document in the output directory. Rows with the wrong
	/// column count are carried through as failures without stopping the
	/// rest, and the run ends with a per-row summary.
	///
	/// Use `--watch` to re-run the batch whenever the CSV or the template
	/// store changes.
	Batch {
		/// Id of the template to generate from.
		#[arg(long, short, value_name = "ID")]
		template: String,

		/// Path to the CSV file supplying one record per row.
		#[arg(long, value_name = "FILE")]
		rows: PathBuf,

		/// Export format for every row, `pdf` or `docx`. Defaults to `docx`.
		#[arg(long, value_name = "FORMAT")]
		format: Option<String>,

		/// Fail rows that leave any placeholder unbound instead of rendering
		/// blanks.
		#[arg(long, default_value_t = false)]
		require_all_fields: bool,

		/// Watch the CSV file and template directory and re-run the batch on
		/// changes.
		#[arg(long, default_value_t = false)]
		watch: bool,

		/// Actor recorded in the audit trail. Defaults to the `USER`
		/// environment variable.
		#[arg(long, value_name = "NAME")]
		actor: Option<String>,
	},
	/// Manage the template store.
	///
	/// Templates live as TOML files in the configured templates directory.
	/// Saving over an existing id bumps its version and archives the previous
	/// revision for later retrieval.
	Template {
		#[command(subcommand)]
		command: TemplateCommands,
	},
	/// Print the most recent audit trail entries.
	///
	/// Reads the configured JSONL audit log and prints the newest entries,
	/// oldest first. Every generate, preview, and export attempt appears
	/// here, successful or not.
	Audit {
		/// Number of entries to print.
		#[arg(long, value_name = "N", default_value_t = 20)]
		tail: usize,

		/// Output format for audit entries. Use `text` for human-readable
		/// output or `json` for one JSON object per line.
		#[arg(long, value_enum, default_value_t = AuditOutputFormat::Text)]
		format: AuditOutputFormat,
	},
}

#[derive(Subcommand)]
pub enum TemplateCommands {
	/// List every template in the store.
	List,
	/// Show one template's metadata and body.
	Show {
		/// Id of the template to show.
		#[arg(value_name = "ID")]
		id: String,
	},
	/// Add a template from a TOML file, or bump its version if the id already
	/// exists.
	Add {
		/// Path to a template TOML file. The file stem becomes the template
		/// id.
		#[arg(value_name = "FILE")]
		file: PathBuf,
	},
	/// Remove a template from the store, archiving its current revision.
	Remove {
		/// Id of the template to remove.
		#[arg(value_name = "ID")]
		id: String,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AuditOutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each line is one audit
	/// entry in the on-disk JSONL shape.
	Json,
}
