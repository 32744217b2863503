use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::Duration;

use crate::DocmintError;
use crate::audit::AuditAction;
use crate::audit::AuditEntry;
use crate::audit::AuditOutcome;
use crate::audit::AuditSink;
use crate::audit::record_or_warn;
use crate::engine::DocumentRef;
use crate::engine::DocumentStore;
use crate::engine::GenerationContext;
use crate::engine::GenerationStage;
use crate::engine::run_pipeline;
use crate::parser;
use crate::record::Record;
use crate::render::ExportFormat;
use crate::render::ExportOptions;
use crate::resolver::MissingFieldPolicy;
use crate::store::Template;

/// Per-row time limit applied when the caller does not set one.
pub const DEFAULT_ROW_TIMEOUT: Duration = Duration::from_secs(30);

/// One row of batch input.
///
/// Malformed rows are carried through rather than dropped so the result
/// sequence stays aligned with the input: every submitted row produces
/// exactly one [`RowResult`].
#[derive(Debug, Clone, PartialEq)]
pub enum RowInput {
	Record(Record),
	Malformed { reason: String },
}

/// Terminal state of one batch row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowStatus {
	Success {
		reference: DocumentRef,
		missing: BTreeSet<String>,
	},
	Failure {
		stage: GenerationStage,
		reason: String,
	},
}

impl RowStatus {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success { .. })
	}
}

/// Outcome of one batch row, tagged with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct RowResult {
	pub row_index: usize,
	pub status: RowStatus,
}

/// Cooperative cancellation handle shared between a caller and a batch run.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}
}

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
	pub format: ExportFormat,
	pub policy: MissingFieldPolicy,
	pub export: ExportOptions,
	pub row_timeout: Duration,
	pub cancel: Option<CancelFlag>,
}

impl BatchOptions {
	pub fn new(format: ExportFormat) -> Self {
		Self {
			format,
			policy: MissingFieldPolicy::default(),
			export: ExportOptions::default(),
			row_timeout: DEFAULT_ROW_TIMEOUT,
			cancel: None,
		}
	}
}

/// Everything a row worker needs, shared across the whole batch.
struct RowJob {
	template: Template,
	tokens: BTreeSet<String>,
	format: ExportFormat,
	policy: MissingFieldPolicy,
	export: ExportOptions,
	context: GenerationContext,
	store: Arc<dyn DocumentStore>,
}

/// Generate one document per input row.
///
/// Rows run in submission order, each on its own worker thread so a
/// panicking or hanging row cannot take the batch down. The per-row audit
/// entries are written from the orchestrating thread, also in submission
/// order. A full run returns exactly one result per input row; a cancelled
/// run returns results for the rows attempted before the flag was seen.
pub fn run_batch(
	template: &Template,
	rows: Vec<RowInput>,
	options: &BatchOptions,
	context: &GenerationContext,
	store: &Arc<dyn DocumentStore>,
	sink: &dyn AuditSink,
) -> Vec<RowResult> {
	let job = Arc::new(RowJob {
		template: template.clone(),
		tokens: parser::extract_tokens(&template.body),
		format: options.format,
		policy: options.policy,
		export: options.export.clone(),
		context: context.clone(),
		store: Arc::clone(store),
	});

	let mut results = Vec::with_capacity(rows.len());

	for (row_index, row) in rows.into_iter().enumerate() {
		if let Some(cancel) = &options.cancel {
			if cancel.is_cancelled() {
				tracing::info!(completed = results.len(), "batch cancelled");
				break;
			}
		}

		let status = match row {
			RowInput::Malformed { reason } => {
				RowStatus::Failure {
					stage: GenerationStage::Received,
					reason,
				}
			}
			RowInput::Record(record) => {
				dispatch_row(&job, record, row_index, options.row_timeout)
			}
		};

		record_or_warn(sink, &AuditEntry {
			actor: context.actor.clone(),
			action: AuditAction::Generate,
			template_id: template.id.clone(),
			document: match &status {
				RowStatus::Success { reference, .. } => Some(reference.clone()),
				RowStatus::Failure { .. } => None,
			},
			timestamp: context.issued_at,
			outcome: match &status {
				RowStatus::Success { .. } => AuditOutcome::Success,
				RowStatus::Failure { stage, reason } => {
					AuditOutcome::Failure {
						stage: *stage,
						reason: reason.clone(),
					}
				}
			},
		});

		if let RowStatus::Failure { stage, reason } = &status {
			tracing::debug!(row = row_index, %stage, %reason, "row failed");
		}

		results.push(RowResult { row_index, status });
	}

	let failed = results
		.iter()
		.filter(|result| !result.status.is_success())
		.count();
	tracing::info!(
		rows = results.len(),
		generated = results.len() - failed,
		failed,
		"batch finished"
	);

	results
}

/// Run one row on its own thread and wait for it, bounded by the timeout.
///
/// A worker that panics drops its channel sender and surfaces as a lost
/// worker; one that outlives the timeout is abandoned and left to finish
/// in the background. Neither can poison shared state because workers only
/// receive the job through an [`Arc`] and report through the channel.
fn dispatch_row(
	job: &Arc<RowJob>,
	record: Record,
	row_index: usize,
	timeout: Duration,
) -> RowStatus {
	let (sender, receiver) = mpsc::channel();
	let worker_job = Arc::clone(job);

	let spawned = thread::Builder::new()
		.name(format!("docmint-row-{row_index}"))
		.spawn(move || {
			let status = run_row(&worker_job, &record, row_index);
			// The orchestrator may have timed out and dropped the receiver.
			let _ = sender.send(status);
		});

	let Ok(handle) = spawned else {
		return RowStatus::Failure {
			stage: GenerationStage::Received,
			reason: DocmintError::WorkerLost.to_string(),
		};
	};

	match receiver.recv_timeout(timeout) {
		Ok(status) => {
			let _ = handle.join();
			status
		}
		Err(RecvTimeoutError::Timeout) => {
			RowStatus::Failure {
				stage: GenerationStage::Received,
				reason: DocmintError::RowTimeout {
					limit_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
				}
				.to_string(),
			}
		}
		Err(RecvTimeoutError::Disconnected) => {
			let _ = handle.join();
			RowStatus::Failure {
				stage: GenerationStage::Received,
				reason: DocmintError::WorkerLost.to_string(),
			}
		}
	}
}

fn run_row(job: &RowJob, record: &Record, row_index: usize) -> RowStatus {
	let outcome = run_pipeline(
		&job.template,
		&job.tokens,
		record,
		job.format,
		job.policy,
		Some(row_index),
		&job.context,
		&job.export,
	);

	match outcome {
		Ok(generation) => {
			let stored = job.store.store(
				generation.document.reference.as_str(),
				&generation.document.bytes,
			);

			match stored {
				Ok(reference) => {
					RowStatus::Success {
						reference,
						missing: generation.missing,
					}
				}
				Err(error) => {
					RowStatus::Failure {
						stage: GenerationStage::Exported,
						reason: error.to_string(),
					}
				}
			}
		}
		Err(staged) => {
			RowStatus::Failure {
				stage: staged.stage,
				reason: staged.error.to_string(),
			}
		}
	}
}
