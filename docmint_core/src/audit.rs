use std::fmt;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::PoisonError;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::DocmintError;
use crate::DocmintResult;
use crate::engine::DocumentRef;
use crate::engine::GenerationStage;

/// What the actor did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum AuditAction {
	Generate,
	Preview,
	Export,
}

impl fmt::Display for AuditAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Generate => "generate",
			Self::Preview => "preview",
			Self::Export => "export",
		};

		f.write_str(name)
	}
}

/// How a generation request ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AuditOutcome {
	Success,
	Failure { stage: GenerationStage, reason: String },
}

impl AuditOutcome {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success)
	}
}

/// Immutable log record of one generation event.
///
/// Append-only: entries are never mutated or deleted. Every generated
/// document has exactly one entry recording its creation; a failed request
/// produces an entry with no document reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
	pub actor: String,
	pub action: AuditAction,
	pub template_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub document: Option<DocumentRef>,
	pub timestamp: DateTime<Utc>,
	pub outcome: AuditOutcome,
}

/// Destination for audit entries.
///
/// Sinks are append-only. A failing sink never blocks generation; the
/// engine routes every record through [`record_or_warn`].
pub trait AuditSink {
	fn record(&self, entry: &AuditEntry) -> DocmintResult<()>;
}

/// Record an entry, demoting sink failure to a logged warning.
///
/// The audit trail is secondary to the deliverable: when the sink is
/// unavailable the document still ships.
pub fn record_or_warn(sink: &dyn AuditSink, entry: &AuditEntry) {
	if let Err(error) = sink.record(entry) {
		tracing::warn!(%error, template = %entry.template_id, "audit entry dropped");
	}
}

/// Audit sink appending one JSON object per line to a log file.
pub struct JsonlAuditSink {
	path: PathBuf,
}

impl JsonlAuditSink {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl AuditSink for JsonlAuditSink {
	fn record(&self, entry: &AuditEntry) -> DocmintResult<()> {
		let line = serde_json::to_string(entry)
			.map_err(|e| DocmintError::AuditSink(e.to_string()))?;

		if let Some(dir) = self.path.parent() {
			std::fs::create_dir_all(dir).map_err(|e| DocmintError::AuditSink(e.to_string()))?;
		}

		let mut file = std::fs::OpenOptions::new()
			.create(true)
			.append(true)
			.open(&self.path)
			.map_err(|e| DocmintError::AuditSink(e.to_string()))?;

		writeln!(file, "{line}").map_err(|e| DocmintError::AuditSink(e.to_string()))?;

		Ok(())
	}
}

/// In-memory sink for tests and in-process inspection.
#[derive(Default)]
pub struct MemoryAuditSink {
	entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn entries(&self) -> Vec<AuditEntry> {
		self.entries
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}
}

impl AuditSink for MemoryAuditSink {
	fn record(&self, entry: &AuditEntry) -> DocmintResult<()> {
		self.entries
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push(entry.clone());

		Ok(())
	}
}

/// Read the last `limit` entries of a JSONL audit log, oldest first.
///
/// Unparseable lines are skipped rather than failing the read: the log is
/// append-only and a torn final line must not hide the rest of the history.
/// A missing file reads as empty.
pub fn read_tail(path: &Path, limit: usize) -> DocmintResult<Vec<AuditEntry>> {
	if !path.is_file() {
		return Ok(Vec::new());
	}

	let raw = std::fs::read_to_string(path)?;
	let entries: Vec<AuditEntry> = raw
		.lines()
		.filter_map(|line| serde_json::from_str(line).ok())
		.collect();

	let skip = entries.len().saturating_sub(limit);
	Ok(entries.into_iter().skip(skip).collect())
}
