use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;

use crate::CancelFlag;
use crate::DocmintError;
use crate::DocmintResult;
use crate::DocumentRef;
use crate::DocumentStore;
use crate::GenerationContext;
use crate::MemoryDocumentStore;
use crate::Record;
use crate::Template;
use crate::TemplateCategory;
use crate::audit::AuditAction;
use crate::audit::AuditEntry;
use crate::audit::AuditOutcome;
use crate::audit::AuditSink;

pub(crate) fn offer_template() -> Template {
	let body = r"Dear {{candidate_name}},

We are pleased to offer you the **{{position}}** role at {{company}}.

- Start date: {{start_date}}
- Annual salary: {{salary}}

*This offer expires in 14 days.*
";

	Template::new("offer-standard", "Standard Offer", TemplateCategory::Offer, body)
}

pub(crate) fn certificate_template() -> Template {
	Template::new(
		"cert-completion",
		"Completion Certificate",
		TemplateCategory::Certificate,
		"This certifies that {{student}} completed {{course}}.\n",
	)
}

/// A record covering every token of [`offer_template`].
pub(crate) fn ada_record() -> Record {
	Record::new()
		.with("candidate_name", "Ada Lovelace")
		.with("position", "Staff Engineer")
		.with("company", "Initech")
		.with("start_date", "2024-03-01")
		.with("salary", 185_000_i64)
}

/// A record leaving `company`, `salary`, and `start_date` unbound.
pub(crate) fn sparse_record() -> Record {
	Record::new()
		.with("candidate_name", "Ada Lovelace")
		.with("position", "Staff Engineer")
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
	NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| panic!("valid date"))
}

/// 2024-01-10 09:30:00 UTC.
pub(crate) fn test_timestamp() -> DateTime<Utc> {
	DateTime::from_timestamp(1_704_879_000, 0).unwrap_or_else(|| panic!("valid timestamp"))
}

pub(crate) fn test_context() -> GenerationContext {
	GenerationContext::new("hr@initech.test", test_timestamp())
}

pub(crate) fn success_entry() -> AuditEntry {
	AuditEntry {
		actor: "hr@initech.test".to_string(),
		action: AuditAction::Generate,
		template_id: "offer-standard".to_string(),
		document: Some(DocumentRef(
			"offer_offer-standard_20240110093000.docx".to_string(),
		)),
		timestamp: test_timestamp(),
		outcome: AuditOutcome::Success,
	}
}

/// Locate a system Liberation Sans installation usable by the PDF tests.
///
/// PDF export needs real TTF files. When no well-known location has the
/// full family, PDF tests return early instead of failing.
pub(crate) fn liberation_fonts_dir() -> Option<PathBuf> {
	const CANDIDATES: [&str; 5] = [
		"/usr/share/fonts/truetype/liberation",
		"/usr/share/fonts/truetype/liberation2",
		"/usr/share/fonts/liberation-sans",
		"/usr/share/fonts/liberation",
		"/usr/share/fonts/TTF",
	];

	CANDIDATES.iter().map(PathBuf::from).find(|dir| {
		["Regular", "Bold", "Italic", "BoldItalic"]
			.iter()
			.all(|variant| dir.join(format!("LiberationSans-{variant}.ttf")).is_file())
	})
}

/// Audit sink that always fails, for exercising the non-fatal audit path.
pub(crate) struct FailingSink;

impl AuditSink for FailingSink {
	fn record(&self, _entry: &AuditEntry) -> DocmintResult<()> {
		Err(DocmintError::AuditSink("sink unavailable".to_string()))
	}
}

/// Document store that sleeps past the configured row timeout.
pub(crate) struct SlowStore {
	pub delay: Duration,
}

impl DocumentStore for SlowStore {
	fn store(&self, name: &str, _bytes: &[u8]) -> DocmintResult<DocumentRef> {
		thread::sleep(self.delay);
		Ok(DocumentRef(name.to_string()))
	}
}

/// Document store that panics, simulating a crashing row worker.
pub(crate) struct PanickingStore;

impl DocumentStore for PanickingStore {
	fn store(&self, _name: &str, _bytes: &[u8]) -> DocmintResult<DocumentRef> {
		panic!("store crashed");
	}
}

/// Document store that trips a cancel flag on first use.
pub(crate) struct CancellingStore {
	pub inner: MemoryDocumentStore,
	pub flag: CancelFlag,
}

impl DocumentStore for CancellingStore {
	fn store(&self, name: &str, bytes: &[u8]) -> DocmintResult<DocumentRef> {
		self.flag.cancel();
		self.inner.store(name, bytes)
	}
}
