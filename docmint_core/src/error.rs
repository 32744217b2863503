use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DocmintError {
	#[error(transparent)]
	#[diagnostic(code(docmint::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(docmint::config_parse),
		help("check that docmint.toml is valid TOML with [fonts], [batch], and/or [exclude] sections")
	)]
	ConfigParse(String),

	#[error("no template found with id: `{0}`")]
	#[diagnostic(
		code(docmint::template_not_found),
		help("run `docmint template list` to see available templates")
	)]
	TemplateNotFound(String),

	#[error("failed to parse template file `{path}`: {reason}")]
	#[diagnostic(
		code(docmint::template_parse),
		help("template files are TOML with `name`, `category`, and `body` keys")
	)]
	TemplateParse { path: String, reason: String },

	#[error("template `{id}` has no stored version {version}")]
	#[diagnostic(
		code(docmint::template_version),
		help("archived revisions live in the `.history` directory of the template store")
	)]
	TemplateVersionNotFound { id: String, version: u64 },

	#[error("invalid template id: `{0}`")]
	#[diagnostic(
		code(docmint::template_id),
		help("template ids use only letters, numbers, `-`, and `_`")
	)]
	InvalidTemplateId(String),

	#[error("unknown template category: `{0}`")]
	#[diagnostic(
		code(docmint::template_category),
		help("categories: offer, appointment, experience, certificate")
	)]
	InvalidCategory(String),

	#[error("record is missing field(s): {}", names.join(", "))]
	#[diagnostic(
		code(docmint::missing_fields),
		help("add the missing fields to the record or generate without `--require-all-fields`")
	)]
	MissingFields { names: Vec<String> },

	#[error("unsupported export format: `{0}`")]
	#[diagnostic(
		code(docmint::unsupported_format),
		help("supported formats: pdf, docx")
	)]
	UnsupportedFormat(String),

	#[error("failed to load font family `{family}` from `{dir}`: {reason}")]
	#[diagnostic(
		code(docmint::font_load),
		help(
			"the fonts directory must contain `<family>-Regular.ttf`, `<family>-Bold.ttf`, \
			 `<family>-Italic.ttf`, and `<family>-BoldItalic.ttf`"
		)
	)]
	FontLoad {
		family: String,
		dir: String,
		reason: String,
	},

	#[error("failed to render PDF: {0}")]
	#[diagnostic(code(docmint::pdf_render))]
	PdfRender(String),

	#[error("failed to render DOCX: {0}")]
	#[diagnostic(code(docmint::docx_render))]
	DocxRender(String),

	#[error("failed to load letterhead image `{path}`: {reason}")]
	#[diagnostic(
		code(docmint::letterhead),
		help("the letterhead must be a readable image file (png or jpeg)")
	)]
	LetterheadImage { path: String, reason: String },

	#[error("failed to load record file `{path}`: {reason}")]
	#[diagnostic(
		code(docmint::record_parse),
		help("supported record formats: json, toml, yaml, yml")
	)]
	RecordParse { path: String, reason: String },

	#[error("malformed row: {0}")]
	#[diagnostic(code(docmint::malformed_row))]
	MalformedRow(String),

	#[error("row processing exceeded the {limit_ms} ms limit")]
	#[diagnostic(
		code(docmint::row_timeout),
		help("raise `row_timeout_ms` under [batch] in docmint.toml for slow templates")
	)]
	RowTimeout { limit_ms: u64 },

	#[error("row worker terminated before returning a result")]
	#[diagnostic(code(docmint::worker_lost))]
	WorkerLost,

	#[error("audit sink unavailable: {0}")]
	#[diagnostic(
		code(docmint::audit_sink),
		help("check that the audit log path is writable; generation itself is never blocked")
	)]
	AuditSink(String),

	#[error("invalid field assignment: `{0}`")]
	#[diagnostic(
		code(docmint::invalid_field),
		help("fields are passed as `--field name=value`")
	)]
	InvalidField(String),
}

pub type DocmintResult<T> = Result<T, DocmintError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
