use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use docmint_cli::AuditOutputFormat;
use docmint_cli::Commands;
use docmint_cli::DocmintCli;
use docmint_cli::TemplateCommands;
use docmint_core::AuditAction;
use docmint_core::AuditEntry;
use docmint_core::AuditOutcome;
use docmint_core::BatchOptions;
use docmint_core::DocmintConfig;
use docmint_core::DocmintError;
use docmint_core::DocumentRef;
use docmint_core::DocumentStore;
use docmint_core::ExportFormat;
use docmint_core::FieldValue;
use docmint_core::FileDocumentStore;
use docmint_core::FileTemplateStore;
use docmint_core::GenerateRequest;
use docmint_core::GenerationContext;
use docmint_core::JsonlAuditSink;
use docmint_core::MissingFieldPolicy;
use docmint_core::Record;
use docmint_core::RowInput;
use docmint_core::RowStatus;
use docmint_core::Template;
use docmint_core::TemplateStore;
use docmint_core::extract_tokens;
use docmint_core::generate;
use docmint_core::preview;
use docmint_core::read_tail;
use owo_colors::OwoColorize;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = DocmintCli::parse();

	// Respect the NO_COLOR env var, the --no-color flag, and terminal
	// capability.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	// Route engine tracing to stderr; --verbose lowers the threshold.
	let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		let level = if args.verbose { "debug" } else { "warn" };
		tracing_subscriber::EnvFilter::new(format!("docmint_core={level}"))
	});
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init()
		.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Tokens { template }) => run_tokens(&args, template),
		Some(Commands::Generate {
			template,
			field,
			record,
			format,
			require_all_fields,
			actor,
		}) => {
			let inputs = MergeInputs {
				template_id: template,
				fields: field,
				record_file: record.as_deref(),
				actor: actor.as_deref(),
			};
			run_generate(&args, &inputs, format, *require_all_fields)
		}
		Some(Commands::Preview {
			template,
			field,
			record,
			actor,
		}) => {
			let inputs = MergeInputs {
				template_id: template,
				fields: field,
				record_file: record.as_deref(),
				actor: actor.as_deref(),
			};
			run_preview(&args, &inputs)
		}
		Some(Commands::Export {
			template,
			field,
			record,
			format,
			out,
			require_all_fields,
			actor,
		}) => {
			let inputs = MergeInputs {
				template_id: template,
				fields: field,
				record_file: record.as_deref(),
				actor: actor.as_deref(),
			};
			run_export(&args, &inputs, format.as_deref(), out, *require_all_fields)
		}
		Some(Commands::Batch {
			template,
			rows,
			format,
			require_all_fields,
			watch,
			actor,
		}) => {
			run_batch(
				&args,
				template,
				rows,
				format.as_deref(),
				*require_all_fields,
				*watch,
				actor.as_deref(),
			)
		}
		Some(Commands::Template { command }) => run_template(&args, command),
		Some(Commands::Audit { tail, format }) => run_audit(&args, *tail, *format),
		None => {
			eprintln!("No subcommand specified. Run `docmint --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<DocmintError>() {
			Ok(docmint_err) => {
				let report: miette::Report = (*docmint_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Record-building inputs shared by `generate`, `preview`, and `export`.
struct MergeInputs<'a> {
	template_id: &'a str,
	fields: &'a [String],
	record_file: Option<&'a Path>,
	actor: Option<&'a str>,
}

fn resolve_root(args: &DocmintCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("{label:<16} {value}");
}

fn run_init(args: &DocmintCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config_path = root.join("docmint.toml");
	let templates_dir = root.join("templates");
	let template_path = templates_dir.join("offer-standard.toml");

	let config_exists = config_path.exists();
	let template_exists = template_path.exists();

	if config_exists {
		println!("Config file already exists: {}", config_path.display());
	} else {
		let sample_config = "# docmint configuration\n\n# Where template TOML files \
		                     live, relative to this file.\ntemplates = \
		                     \"templates\"\n\n# Where generated documents are \
		                     written.\noutput = \"generated\"\n\n# Append-only audit \
		                     trail, one JSON entry per line.\naudit_log = \
		                     \"audit.jsonl\"\n\n# PDF export needs the four \
		                     LiberationSans files in this directory.\n# [fonts]\n# dir \
		                     = \"fonts\"\n# family = \"LiberationSans\"\n\n# Optional \
		                     letterhead image placed at the top of every PDF.\n# \
		                     [pdf]\n# letterhead = \"letterhead.png\"\n\n# Per-row time \
		                     limit for batch runs.\n# [batch]\n# row_timeout_ms = \
		                     30000\n\n# Gitignore-style patterns hiding drafts from \
		                     template listings.\n# [exclude]\n# patterns = \
		                     [\"drafts/\", \"*.bak.toml\"]\n";

		std::fs::write(&config_path, sample_config)?;
		println!("Created docmint.toml");
	}

	if template_exists {
		println!("Template file already exists: {}", template_path.display());
	} else {
		let sample_template = "name = \"Standard Offer\"\ncategory = \"offer\"\nbody = \
		                       \"\"\"\nDear {{candidate_name}},\n\nWe are pleased to \
		                       offer you the **{{position}}** role at {{company}}.\n\n- \
		                       Start date: {{start_date}}\n- Annual salary: \
		                       {{salary}}\n\n*This offer expires in 14 \
		                       days.*\n\"\"\"\n";

		std::fs::create_dir_all(&templates_dir)?;
		std::fs::write(&template_path, sample_template)?;
		println!("Created template file: {}", template_path.display());
	}

	if !template_exists {
		println!();
		println!("Next steps:");
		println!(
			"  1. Edit {} or drop more templates beside it",
			template_path.display()
		);
		println!("  2. Run `docmint tokens --template offer-standard` to list its placeholders");
		println!("  3. Run `docmint generate --template offer-standard --field candidate_name=Ada`");
	}

	Ok(())
}

fn run_tokens(args: &DocmintCli, template_id: &str) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = DocmintConfig::load_or_default(&root)?;
	let store = open_template_store(&root, &config)?;
	let template = store.get(template_id)?;
	let tokens = extract_tokens(&template.body);

	if tokens.is_empty() {
		println!("Template `{template_id}` has no placeholders.");
		return Ok(());
	}

	for name in &tokens {
		println!("{name}");
	}

	Ok(())
}

fn run_generate(
	args: &DocmintCli,
	inputs: &MergeInputs<'_>,
	formats: &[String],
	require_all_fields: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = DocmintConfig::load_or_default(&root)?;
	let store = open_template_store(&root, &config)?;
	let template = store.get(inputs.template_id)?;
	let record = build_record(inputs.fields, inputs.record_file)?;
	let formats = parse_formats(formats)?;

	let output_dir = config.output_dir(&root);
	let documents = FileDocumentStore::new(&output_dir);
	let sink = JsonlAuditSink::new(config.audit_log_path(&root));
	let context = generation_context(inputs.actor);
	let export = config.export_options(&root);

	for (index, format) in formats.into_iter().enumerate() {
		let request = GenerateRequest {
			template: &template,
			record: &record,
			format,
			policy: missing_policy(require_all_fields),
			action: AuditAction::Generate,
		};

		let generation = generate(&request, &context, &export, &sink)?;
		if index == 0 {
			warn_missing(&generation.missing);
		}

		let reference = documents.store(
			generation.document.reference.as_str(),
			&generation.document.bytes,
		)?;
		println!(
			"Generated {}",
			make_relative(Path::new(reference.as_str()), &root)
		);
	}

	Ok(())
}

fn run_preview(
	args: &DocmintCli,
	inputs: &MergeInputs<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = DocmintConfig::load_or_default(&root)?;
	let store = open_template_store(&root, &config)?;
	let template = store.get(inputs.template_id)?;
	let record = build_record(inputs.fields, inputs.record_file)?;
	let sink = JsonlAuditSink::new(config.audit_log_path(&root));
	let context = generation_context(inputs.actor);

	let merged = preview(&template, &record, &context, &sink);
	warn_missing(&merged.missing);

	print!("{}", merged.content);
	if !merged.content.ends_with('\n') {
		println!();
	}

	Ok(())
}

fn run_export(
	args: &DocmintCli,
	inputs: &MergeInputs<'_>,
	format: Option<&str>,
	out: &Path,
	require_all_fields: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = DocmintConfig::load_or_default(&root)?;
	let store = open_template_store(&root, &config)?;
	let template = store.get(inputs.template_id)?;
	let record = build_record(inputs.fields, inputs.record_file)?;

	let format: ExportFormat = match format {
		Some(raw) => raw.parse()?,
		None => {
			match out.extension().and_then(|e| e.to_str()) {
				Some(extension) => extension.parse()?,
				None => ExportFormat::Docx,
			}
		}
	};

	let sink = JsonlAuditSink::new(config.audit_log_path(&root));
	let context = generation_context(inputs.actor);
	let export = config.export_options(&root);

	let request = GenerateRequest {
		template: &template,
		record: &record,
		format,
		policy: missing_policy(require_all_fields),
		action: AuditAction::Export,
	};

	let generation = generate(&request, &context, &export, &sink)?;
	warn_missing(&generation.missing);

	if let Some(parent) = out.parent() {
		if !parent.as_os_str().is_empty() {
			std::fs::create_dir_all(parent)?;
		}
	}
	std::fs::write(out, &generation.document.bytes)?;
	println!("Exported {}", out.display());

	Ok(())
}

fn run_batch(
	args: &DocmintCli,
	template_id: &str,
	rows_file: &Path,
	format: Option<&str>,
	require_all_fields: bool,
	watch: bool,
	actor: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
	// Run the initial batch.
	let has_failures =
		run_batch_once(args, template_id, rows_file, format, require_all_fields, actor)?;

	if !watch {
		if has_failures {
			process::exit(1);
		}
		return Ok(());
	}

	// Watch mode
	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let root = resolve_root(args);
	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_) | notify::EventKind::Create(_)
				) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&root, notify::RecursiveMode::Recursive)?;
	if !rows_file.starts_with(&root) {
		watcher.watch(rows_file, notify::RecursiveMode::NonRecursive)?;
	}

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, re-running batch...");
		if let Err(e) =
			run_batch_once(args, template_id, rows_file, format, require_all_fields, actor)
		{
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

/// Run a single batch pass and return whether any rows failed (true = failed
/// rows present).
fn run_batch_once(
	args: &DocmintCli,
	template_id: &str,
	rows_file: &Path,
	format: Option<&str>,
	require_all_fields: bool,
	actor: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = DocmintConfig::load_or_default(&root)?;
	let store = open_template_store(&root, &config)?;
	let template = store.get(template_id)?;
	let rows = read_rows(rows_file)?;

	if rows.is_empty() {
		println!("No data rows found in {}", make_relative(rows_file, &root));
		return Ok(false);
	}

	let format: ExportFormat = match format {
		Some(raw) => raw.parse()?,
		None => ExportFormat::Docx,
	};

	let mut options = BatchOptions::new(format);
	options.policy = missing_policy(require_all_fields);
	options.export = config.export_options(&root);
	options.row_timeout = config.row_timeout();

	let output_dir = config.output_dir(&root);
	let documents: Arc<dyn DocumentStore> = Arc::new(FileDocumentStore::new(&output_dir));
	let sink = JsonlAuditSink::new(config.audit_log_path(&root));
	let context = generation_context(actor);

	let total = rows.len();
	let results = docmint_core::run_batch(&template, rows, &options, &context, &documents, &sink);

	let mut failures = Vec::new();
	for result in &results {
		match &result.status {
			RowStatus::Success { reference, missing } => {
				if args.verbose {
					println!(
						"  row {} -> {}",
						result.row_index,
						make_relative(Path::new(reference.as_str()), &root)
					);
				}
				if !missing.is_empty() {
					let names: Vec<_> = missing.iter().map(String::as_str).collect();
					eprintln!(
						"{} row {} rendered {} placeholder(s) blank: {}",
						colored!("warning:", yellow),
						result.row_index,
						missing.len(),
						names.join(", ")
					);
				}
			}
			RowStatus::Failure { stage, reason } => {
				failures.push((result.row_index, stage, reason));
			}
		}
	}

	let succeeded = total - failures.len();

	if !failures.is_empty() {
		eprintln!();
		eprintln!("Failed rows:");
		for (row_index, stage, reason) in &failures {
			eprintln!("  row {row_index} ({stage}): {reason}");
		}
		eprintln!();
	}

	println!(
		"Batch finished: {succeeded} of {total} row(s) generated into {}",
		make_relative(&output_dir, &root)
	);

	Ok(!failures.is_empty())
}

fn run_template(
	args: &DocmintCli,
	command: &TemplateCommands,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = DocmintConfig::load_or_default(&root)?;
	let store = open_template_store(&root, &config)?;

	match command {
		TemplateCommands::List => {
			let templates = store.list()?;

			if templates.is_empty() {
				println!(
					"No templates found in {}",
					make_relative(store.root(), &root)
				);
				return Ok(());
			}

			println!("{}", colored!("Templates:", bold));
			for template in &templates {
				println!(
					"  {} v{} [{}] {}",
					template.id, template.version, template.category, template.name
				);
			}
			println!("\n{} template(s)", templates.len());
		}
		TemplateCommands::Show { id } => {
			let template = store.get(id)?;
			let tokens = extract_tokens(&template.body);
			let placeholders = if tokens.is_empty() {
				"none".to_string()
			} else {
				let names: Vec<_> = tokens.iter().map(String::as_str).collect();
				names.join(", ")
			};

			print_field("Id", &template.id);
			print_field("Name", &template.name);
			print_field("Category", template.category);
			print_field("Version", template.version);
			print_field("Created", template.created_at);
			print_field("Updated", template.updated_at);
			print_field("Placeholders", placeholders);

			print_section("Body");
			print!("{}", template.body);
			if !template.body.ends_with('\n') {
				println!();
			}
		}
		TemplateCommands::Add { file } => {
			let template = load_template_file(file)?;
			let saved = store.save(template)?;
			println!("Saved template `{}` at version {}", saved.id, saved.version);
		}
		TemplateCommands::Remove { id } => {
			store.remove(id)?;
			println!("Removed template `{id}`. Archived revisions remain available.");
		}
	}

	Ok(())
}

fn run_audit(
	args: &DocmintCli,
	tail: usize,
	format: AuditOutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = DocmintConfig::load_or_default(&root)?;
	let log_path = config.audit_log_path(&root);
	let entries = read_tail(&log_path, tail)?;

	if entries.is_empty() {
		println!(
			"No audit entries found in {}",
			make_relative(&log_path, &root)
		);
		return Ok(());
	}

	match format {
		AuditOutputFormat::Json => {
			for entry in &entries {
				let line = serde_json::to_string(entry)
					.map_err(|e| DocmintError::AuditSink(e.to_string()))?;
				println!("{line}");
			}
		}
		AuditOutputFormat::Text => {
			for entry in &entries {
				print_audit_entry(entry);
			}
		}
	}

	Ok(())
}

/// Print one audit entry as a single aligned line.
fn print_audit_entry(entry: &AuditEntry) {
	let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
	let action = format!("{:<8}", entry.action.to_string());

	match &entry.outcome {
		AuditOutcome::Success => {
			let document = entry.document.as_ref().map_or("-", DocumentRef::as_str);
			println!(
				"{timestamp}  {}  {action} {:<20} {document} ({})",
				colored!("ok    ", green),
				entry.template_id,
				entry.actor
			);
		}
		AuditOutcome::Failure { stage, reason } => {
			println!(
				"{timestamp}  {}  {action} {:<20} {stage}: {reason} ({})",
				colored!("failed", red),
				entry.template_id,
				entry.actor
			);
		}
	}
}

fn open_template_store(
	root: &Path,
	config: &DocmintConfig,
) -> Result<FileTemplateStore, Box<dyn std::error::Error>> {
	let store =
		FileTemplateStore::with_excludes(config.templates_dir(root), &config.exclude.patterns)?;
	Ok(store)
}

fn generation_context(actor: Option<&str>) -> GenerationContext {
	let actor = actor
		.map(ToString::to_string)
		.or_else(|| std::env::var("USER").ok())
		.unwrap_or_else(|| "docmint".to_string());

	GenerationContext::new(actor, Utc::now())
}

fn missing_policy(require_all_fields: bool) -> MissingFieldPolicy {
	if require_all_fields {
		MissingFieldPolicy::Reject
	} else {
		MissingFieldPolicy::Fill
	}
}

/// Build the record from a record file (when given) plus `--field`
/// assignments, with assignments taking precedence.
fn build_record(
	fields: &[String],
	record_file: Option<&Path>,
) -> Result<Record, Box<dyn std::error::Error>> {
	let mut record = match record_file {
		Some(path) => load_record_file(path)?,
		None => Record::new(),
	};

	for assignment in fields {
		let Some((name, value)) = assignment.split_once('=') else {
			return Err(DocmintError::InvalidField(assignment.clone()).into());
		};

		let name = name.trim();
		if name.is_empty() {
			return Err(DocmintError::InvalidField(assignment.clone()).into());
		}

		record.insert(name.to_string(), FieldValue::Text(value.to_string()));
	}

	Ok(record)
}

/// Load a record from a JSON, TOML, or YAML file, keeping scalar fields and
/// skipping nulls, arrays, and nested tables.
fn load_record_file(path: &Path) -> Result<Record, Box<dyn std::error::Error>> {
	let raw = std::fs::read_to_string(path)?;
	let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

	let value: serde_json::Value = match extension {
		"json" => serde_json::from_str(&raw).map_err(|e| record_parse_error(path, &e))?,
		"toml" => toml::from_str(&raw).map_err(|e| record_parse_error(path, &e))?,
		"yaml" | "yml" => {
			serde_yaml_ng::from_str(&raw).map_err(|e| record_parse_error(path, &e))?
		}
		other => {
			return Err(DocmintError::RecordParse {
				path: path.display().to_string(),
				reason: format!("unsupported record file extension `{other}`"),
			}
			.into());
		}
	};

	let serde_json::Value::Object(map) = value else {
		return Err(DocmintError::RecordParse {
			path: path.display().to_string(),
			reason: "expected a top-level table of field values".to_string(),
		}
		.into());
	};

	let mut record = Record::new();
	for (name, value) in &map {
		if let Some(field) = FieldValue::from_json(value) {
			record.insert(name.clone(), field);
		}
	}

	Ok(record)
}

fn record_parse_error(path: &Path, error: &dyn std::fmt::Display) -> DocmintError {
	DocmintError::RecordParse {
		path: path.display().to_string(),
		reason: error.to_string(),
	}
}

/// Parse repeated `--format` flags, defaulting to DOCX and dropping
/// duplicates.
fn parse_formats(formats: &[String]) -> Result<Vec<ExportFormat>, Box<dyn std::error::Error>> {
	if formats.is_empty() {
		return Ok(vec![ExportFormat::Docx]);
	}

	let mut parsed = Vec::new();
	for raw in formats {
		let format = raw.parse::<ExportFormat>()?;
		if !parsed.contains(&format) {
			parsed.push(format);
		}
	}

	Ok(parsed)
}

/// Read batch rows from a CSV file whose header row names the fields.
fn read_rows(path: &Path) -> Result<Vec<RowInput>, Box<dyn std::error::Error>> {
	let mut reader = csv::ReaderBuilder::new()
		.flexible(true)
		.trim(csv::Trim::All)
		.from_path(path)?;

	let headers: Vec<String> = reader.headers()?.iter().map(ToString::to_string).collect();
	let expected = headers.len();

	let mut rows = Vec::new();
	for (index, result) in reader.records().enumerate() {
		// The header occupies line 1.
		let line = index + 2;

		match result {
			Ok(fields) if fields.len() == expected => {
				let record: Record = headers
					.iter()
					.cloned()
					.zip(fields.iter().map(|value| FieldValue::Text(value.to_string())))
					.collect();
				rows.push(RowInput::Record(record));
			}
			Ok(fields) => {
				rows.push(RowInput::Malformed {
					reason: format!("line {line} has {} of {expected} columns", fields.len()),
				});
			}
			Err(e) => {
				rows.push(RowInput::Malformed {
					reason: e.to_string(),
				});
			}
		}
	}

	Ok(rows)
}

/// Read a template from a TOML file, taking the id from the file stem.
fn load_template_file(path: &Path) -> Result<Template, Box<dyn std::error::Error>> {
	let raw = std::fs::read_to_string(path)?;
	let mut template: Template = toml::from_str(&raw).map_err(|e| {
		DocmintError::TemplateParse {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})?;

	if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
		template.id = stem.to_string();
	}

	Ok(template.with_timestamps(Utc::now()))
}

fn warn_missing(missing: &BTreeSet<String>) {
	if missing.is_empty() {
		return;
	}

	let names: Vec<_> = missing.iter().map(String::as_str).collect();
	eprintln!(
		"{} {} placeholder(s) rendered blank: {}",
		colored!("warning:", yellow),
		missing.len(),
		names.join(", ")
	);
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
