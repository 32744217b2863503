//! `docmint_core` is the core library for the docmint document generation
//! engine. It merges office document templates with person records and
//! exports the result as PDF or DOCX files, leaving one audit trail entry
//! per generation request.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Template body ({{token}} placeholders)
//!   → Parser (scans the body into placeholder spans)
//!   → Resolver (binds tokens to record fields, tracks missing ones)
//!   → Renderer (substitutes bindings into the body)
//!   → Styled lexer (splits lines into *italic* / **bold** spans)
//!   → Export (PDF via genpdf, DOCX via docx-rs)
//!   → Audit (one JSON line per request, success or failure)
//! ```
//!
//! ## Modules
//!
//! - [`store`] — Template persistence: TOML files with a version history,
//!   plus an in-memory store for tests.
//! - [`config`] — Configuration loading from `docmint.toml`: directories,
//!   fonts, batch limits, and exclude patterns.
//! - [`audit`] — Append-only audit trail sinks and entry types.
//!
//! ## Key Types
//!
//! - [`Template`] — A named, versioned document body with `{{token}}`
//!   placeholders.
//! - [`Record`] — An ordered map of field names to typed values.
//! - [`GenerateRequest`] — One template + record + format, run through
//!   [`generate`].
//! - [`RowInput`] — One batch row, run through [`run_batch`] alongside its
//!   siblings.
//! - [`AuditEntry`] — Who generated what, when, and how it went.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use docmint_core::{
//! 	AuditAction, ExportFormat, ExportOptions, FileTemplateStore, GenerateRequest,
//! 	GenerationContext, MemoryAuditSink, MissingFieldPolicy, Record, TemplateStore, generate,
//! };
//! use std::path::Path;
//!
//! let store = FileTemplateStore::new(Path::new("templates")).unwrap();
//! let template = store.get("offer-standard").unwrap();
//! let record = Record::new()
//! 	.with("candidate_name", "Ada Lovelace")
//! 	.with("position", "Staff Engineer");
//!
//! let generation = generate(
//! 	&GenerateRequest {
//! 		template: &template,
//! 		record: &record,
//! 		format: ExportFormat::Docx,
//! 		policy: MissingFieldPolicy::Fill,
//! 		action: AuditAction::Generate,
//! 	},
//! 	&GenerationContext::new("hr@example.com", Utc::now()),
//! 	&ExportOptions::default(),
//! 	&MemoryAuditSink::new(),
//! )
//! .unwrap();
//!
//! std::fs::write(
//! 	generation.document.reference.as_str(),
//! 	&generation.document.bytes,
//! )
//! .unwrap();
//! ```

pub use audit::*;
pub use batch::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use parser::*;
pub use record::*;
pub use render::*;
pub use resolver::*;
pub use store::*;

pub mod audit;
mod batch;
pub mod config;
pub(crate) mod docx;
mod engine;
mod error;
pub(crate) mod lexer;
mod parser;
pub(crate) mod pdf;
mod record;
mod render;
mod resolver;
pub mod store;

#[cfg(test)]
mod __fixtures;
