use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::PoisonError;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::DocmintResult;
use crate::audit::AuditAction;
use crate::audit::AuditEntry;
use crate::audit::AuditOutcome;
use crate::audit::AuditSink;
use crate::audit::record_or_warn;
use crate::parser;
use crate::record::Record;
use crate::render;
use crate::render::ExportFormat;
use crate::render::ExportOptions;
use crate::resolver;
use crate::resolver::MissingFieldPolicy;
use crate::store::Template;

/// Pipeline states of a single generation request.
///
/// A request advances `Received → TokensExtracted → Bound → Rendered →
/// Exported → Audited`; a failure at any point is terminal and the audit
/// entry records the stage that was being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
	Received,
	TokensExtracted,
	Bound,
	Rendered,
	Exported,
	Audited,
}

impl fmt::Display for GenerationStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Received => "received",
			Self::TokensExtracted => "tokens_extracted",
			Self::Bound => "bound",
			Self::Rendered => "rendered",
			Self::Exported => "exported",
			Self::Audited => "audited",
		};

		f.write_str(name)
	}
}

/// Explicit per-request context.
///
/// The engine never reads ambient state: who is generating and when comes in
/// from the caller, so the same request always produces the same document
/// names and audit timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationContext {
	pub actor: String,
	pub issued_at: DateTime<Utc>,
}

impl GenerationContext {
	pub fn new(actor: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
		Self {
			actor: actor.into(),
			issued_at,
		}
	}
}

/// Reference under which a generated document is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRef(pub String);

impl DocumentRef {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DocumentRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Deterministic document name for a generation request.
///
/// Shape: `<category>_<template-id>[_row<NNNN>]_<stamp>.<ext>` where the
/// stamp is the context timestamp as `%Y%m%d%H%M%S` in UTC. Equal inputs
/// name equal documents; batch rows stay distinct through the row number.
pub fn document_name(
	template: &Template,
	format: ExportFormat,
	row: Option<usize>,
	context: &GenerationContext,
) -> String {
	let stamp = context.issued_at.format("%Y%m%d%H%M%S");

	match row {
		Some(index) => {
			format!(
				"{}_{}_row{index:04}_{stamp}.{}",
				template.category,
				template.id,
				format.extension()
			)
		}
		None => {
			format!(
				"{}_{}_{stamp}.{}",
				template.category,
				template.id,
				format.extension()
			)
		}
	}
}

/// A successfully generated document. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
	pub template_id: String,
	pub template_version: u64,
	pub content: String,
	pub format: ExportFormat,
	pub bytes: Vec<u8>,
	pub reference: DocumentRef,
	pub generated_at: DateTime<Utc>,
	pub generated_by: String,
	/// The record this document was bound from.
	pub record: Record,
}

/// The outcome of a successful single-document run.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
	pub document: GeneratedDocument,
	/// Tokens that had no record field and were bound to the empty string.
	pub missing: BTreeSet<String>,
}

/// One single-document generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
	pub template: &'a Template,
	pub record: &'a Record,
	pub format: ExportFormat,
	pub policy: MissingFieldPolicy,
	/// Recorded in the audit trail; `Generate` for stored documents,
	/// `Export` when the caller routes bytes to a path of its own choosing.
	pub action: AuditAction,
}

/// An error tagged with the pipeline stage that was being attempted.
#[derive(Debug)]
pub(crate) struct StagedError {
	pub stage: GenerationStage,
	pub error: crate::DocmintError,
}

/// Run resolve → render → export without touching the audit trail.
///
/// Token extraction happens in the caller so a batch can extract once and
/// share the set across every row. Shared by [`generate`] and the batch
/// orchestrator, which audit their own outcomes.
pub(crate) fn run_pipeline(
	template: &Template,
	tokens: &BTreeSet<String>,
	record: &Record,
	format: ExportFormat,
	policy: MissingFieldPolicy,
	row: Option<usize>,
	context: &GenerationContext,
	options: &ExportOptions,
) -> Result<Generation, StagedError> {
	let resolution = resolver::resolve(tokens, record)
		.enforce(policy)
		.map_err(|error| {
			StagedError {
				stage: GenerationStage::Bound,
				error,
			}
		})?;

	let content = render::render(&template.body, &resolution.bindings);

	let mut options = options.clone();
	if options.title.is_none() {
		options.title = Some(template.name.clone());
	}

	let bytes = render::export(&content, format, &options).map_err(|error| {
		StagedError {
			stage: GenerationStage::Exported,
			error,
		}
	})?;

	let reference = DocumentRef(document_name(template, format, row, context));

	let document = GeneratedDocument {
		template_id: template.id.clone(),
		template_version: template.version,
		content,
		format,
		bytes,
		reference,
		generated_at: context.issued_at,
		generated_by: context.actor.clone(),
		record: record.clone(),
	};

	Ok(Generation {
		document,
		missing: resolution.missing,
	})
}

/// Generate one document and audit the outcome.
///
/// On success the audit entry carries the document reference; on failure it
/// carries the stage and reason instead, and the error propagates to the
/// caller as a typed result. Audit sink trouble never fails the request.
pub fn generate(
	request: &GenerateRequest<'_>,
	context: &GenerationContext,
	options: &ExportOptions,
	sink: &dyn AuditSink,
) -> DocmintResult<Generation> {
	let tokens = parser::extract_tokens(&request.template.body);
	let outcome = run_pipeline(
		request.template,
		&tokens,
		request.record,
		request.format,
		request.policy,
		None,
		context,
		options,
	);

	match outcome {
		Ok(generation) => {
			record_or_warn(sink, &AuditEntry {
				actor: context.actor.clone(),
				action: request.action,
				template_id: request.template.id.clone(),
				document: Some(generation.document.reference.clone()),
				timestamp: context.issued_at,
				outcome: AuditOutcome::Success,
			});

			tracing::debug!(
				template = %request.template.id,
				reference = %generation.document.reference,
				"document generated"
			);

			Ok(generation)
		}
		Err(staged) => {
			record_or_warn(sink, &AuditEntry {
				actor: context.actor.clone(),
				action: request.action,
				template_id: request.template.id.clone(),
				document: None,
				timestamp: context.issued_at,
				outcome: AuditOutcome::Failure {
					stage: staged.stage,
					reason: staged.error.to_string(),
				},
			});

			Err(staged.error)
		}
	}
}

/// Merged content without export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
	pub content: String,
	pub missing: BTreeSet<String>,
}

/// Render merged content without producing a document.
///
/// Previews cannot fail: resolution and substitution are total. The run is
/// still audited, with a `preview` action and no document reference.
pub fn preview(
	template: &Template,
	record: &Record,
	context: &GenerationContext,
	sink: &dyn AuditSink,
) -> Preview {
	let tokens = parser::extract_tokens(&template.body);
	let resolution = resolver::resolve(&tokens, record);
	let content = render::render(&template.body, &resolution.bindings);

	record_or_warn(sink, &AuditEntry {
		actor: context.actor.clone(),
		action: AuditAction::Preview,
		template_id: template.id.clone(),
		document: None,
		timestamp: context.issued_at,
		outcome: AuditOutcome::Success,
	});

	Preview {
		content,
		missing: resolution.missing,
	}
}

/// Storage for generated document bytes.
///
/// Batch workers run on their own threads, so implementations must be
/// shareable across threads.
pub trait DocumentStore: Send + Sync {
	fn store(&self, name: &str, bytes: &[u8]) -> DocmintResult<DocumentRef>;
}

/// Document storage writing into a directory, one file per document.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
	root: PathBuf,
}

impl FileDocumentStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

impl DocumentStore for FileDocumentStore {
	fn store(&self, name: &str, bytes: &[u8]) -> DocmintResult<DocumentRef> {
		std::fs::create_dir_all(&self.root)?;
		let path = self.root.join(name);
		std::fs::write(&path, bytes)?;

		Ok(DocumentRef(path.display().to_string()))
	}
}

/// In-memory document storage for tests.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
	documents: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryDocumentStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn names(&self) -> Vec<String> {
		self.documents
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.iter()
			.map(|(name, _)| name.clone())
			.collect()
	}
}

impl DocumentStore for MemoryDocumentStore {
	fn store(&self, name: &str, bytes: &[u8]) -> DocmintResult<DocumentRef> {
		self.documents
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push((name.to_string(), bytes.to_vec()));

		Ok(DocumentRef(name.to_string()))
	}
}
