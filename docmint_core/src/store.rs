use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;
use std::sync::PoisonError;

use chrono::DateTime;
use chrono::Utc;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use serde::Deserialize;
use serde::Serialize;

use crate::DocmintError;
use crate::DocmintResult;

/// Document categories offered by the template library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TemplateCategory {
	Offer,
	Appointment,
	Experience,
	Certificate,
}

impl fmt::Display for TemplateCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Offer => "offer",
			Self::Appointment => "appointment",
			Self::Experience => "experience",
			Self::Certificate => "certificate",
		};

		f.write_str(name)
	}
}

impl FromStr for TemplateCategory {
	type Err = DocmintError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.to_ascii_lowercase().as_str() {
			"offer" => Ok(Self::Offer),
			"appointment" => Ok(Self::Appointment),
			"experience" => Ok(Self::Experience),
			"certificate" => Ok(Self::Certificate),
			other => Err(DocmintError::InvalidCategory(other.to_string())),
		}
	}
}

/// A stored document skeleton containing placeholder tokens.
///
/// Templates are owned by the store and never mutated during generation;
/// edits go through [`TemplateStore::save`], which bumps `version` and
/// archives the previous revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
	#[serde(default)]
	pub id: String,
	pub name: String,
	pub category: TemplateCategory,
	pub body: String,
	#[serde(default = "default_version")]
	pub version: u64,
	#[serde(default = "default_timestamp")]
	pub created_at: DateTime<Utc>,
	#[serde(default = "default_timestamp")]
	pub updated_at: DateTime<Utc>,
}

fn default_version() -> u64 {
	1
}

fn default_timestamp() -> DateTime<Utc> {
	DateTime::UNIX_EPOCH
}

impl Template {
	/// A fresh version-1 template with epoch timestamps.
	pub fn new(
		id: impl Into<String>,
		name: impl Into<String>,
		category: TemplateCategory,
		body: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			category,
			body: body.into(),
			version: default_version(),
			created_at: default_timestamp(),
			updated_at: default_timestamp(),
		}
	}

	/// Stamp both timestamps, for callers creating a template right now.
	#[must_use]
	pub fn with_timestamps(mut self, at: DateTime<Utc>) -> Self {
		self.created_at = at;
		self.updated_at = at;
		self
	}
}

/// Narrow interface to template storage.
///
/// The merge engine only ever reads templates; writes happen through
/// explicit edit operations. `save` assigns the next version and preserves
/// the previous revision for [`TemplateStore::get_version`].
pub trait TemplateStore {
	/// Fetch the current revision of a template.
	fn get(&self, id: &str) -> DocmintResult<Template>;
	/// Store a template, bumping its version past any existing revision.
	/// Returns the template as stored.
	fn save(&self, template: Template) -> DocmintResult<Template>;
	/// All current templates, ordered by id.
	fn list(&self) -> DocmintResult<Vec<Template>>;
	/// Remove the current revision. Archived revisions stay available.
	fn remove(&self, id: &str) -> DocmintResult<()>;
	/// Fetch a specific archived or current revision.
	fn get_version(&self, id: &str, version: u64) -> DocmintResult<Template>;
}

fn validate_id(id: &str) -> DocmintResult<()> {
	let valid = !id.is_empty()
		&& id
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

	if valid {
		Ok(())
	} else {
		Err(DocmintError::InvalidTemplateId(id.to_string()))
	}
}

/// Template storage backed by a directory of TOML files.
///
/// The file stem is the template id (`offer-standard.toml` holds
/// `offer-standard`); previous revisions are archived under `.history/` as
/// `<id>-v<version>.toml`. Exclude patterns follow gitignore syntax and are
/// applied when listing, so drafts can sit in the directory without showing
/// up.
pub struct FileTemplateStore {
	root: PathBuf,
	exclude: Gitignore,
}

impl FileTemplateStore {
	pub fn new(root: impl Into<PathBuf>) -> DocmintResult<Self> {
		Self::with_excludes(root, &[])
	}

	pub fn with_excludes(root: impl Into<PathBuf>, patterns: &[String]) -> DocmintResult<Self> {
		let root = root.into();
		let mut builder = GitignoreBuilder::new(&root);

		for pattern in patterns {
			builder.add_line(None, pattern).map_err(|e| {
				DocmintError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
			})?;
		}

		let exclude = builder
			.build()
			.map_err(|e| DocmintError::ConfigParse(format!("failed to build exclude rules: {e}")))?;

		Ok(Self { root, exclude })
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn template_path(&self, id: &str) -> PathBuf {
		self.root.join(format!("{id}.toml"))
	}

	fn history_path(&self, id: &str, version: u64) -> PathBuf {
		self.root.join(".history").join(format!("{id}-v{version}.toml"))
	}

	fn load_file(path: &Path) -> DocmintResult<Template> {
		let raw = std::fs::read_to_string(path)?;
		let mut template: Template =
			toml::from_str(&raw).map_err(|e| {
				DocmintError::TemplateParse {
					path: path.display().to_string(),
					reason: e.to_string(),
				}
			})?;

		// The file stem is authoritative for the id.
		if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
			stem.clone_into(&mut template.id);
		}

		Ok(template)
	}

	fn write_file(path: &Path, template: &Template) -> DocmintResult<()> {
		let payload = toml::to_string_pretty(template).map_err(|e| {
			DocmintError::TemplateParse {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})?;

		if let Some(dir) = path.parent() {
			std::fs::create_dir_all(dir)?;
		}

		// Write-and-rename keeps readers from observing partial files.
		let temp_path = path.with_extension(format!("toml.tmp-{}", std::process::id()));
		std::fs::write(&temp_path, payload)?;

		if let Err(error) = std::fs::rename(&temp_path, path) {
			let _ = std::fs::remove_file(&temp_path);
			return Err(error.into());
		}

		Ok(())
	}
}

impl TemplateStore for FileTemplateStore {
	fn get(&self, id: &str) -> DocmintResult<Template> {
		validate_id(id)?;
		let path = self.template_path(id);

		if !path.is_file() {
			return Err(DocmintError::TemplateNotFound(id.to_string()));
		}

		Self::load_file(&path)
	}

	fn save(&self, mut template: Template) -> DocmintResult<Template> {
		validate_id(&template.id)?;
		let path = self.template_path(&template.id);

		if path.is_file() {
			let previous = Self::load_file(&path)?;
			Self::write_file(&self.history_path(&previous.id, previous.version), &previous)?;
			template.version = previous.version + 1;
			template.created_at = previous.created_at;
		} else {
			template.version = default_version();
		}

		Self::write_file(&path, &template)?;
		Ok(template)
	}

	fn list(&self) -> DocmintResult<Vec<Template>> {
		let mut paths = Vec::new();

		if self.root.is_dir() {
			for entry in std::fs::read_dir(&self.root)? {
				let path = entry?.path();
				let is_template = path.is_file()
					&& path.extension().and_then(|e| e.to_str()) == Some("toml");

				if !is_template || self.exclude.matched(&path, false).is_ignore() {
					continue;
				}

				paths.push(path);
			}
		}

		// Sort for deterministic ordering.
		paths.sort();
		paths.iter().map(|path| Self::load_file(path)).collect()
	}

	fn remove(&self, id: &str) -> DocmintResult<()> {
		validate_id(id)?;
		let path = self.template_path(id);

		if !path.is_file() {
			return Err(DocmintError::TemplateNotFound(id.to_string()));
		}

		// Archive before deleting so removal is recoverable.
		let current = Self::load_file(&path)?;
		Self::write_file(&self.history_path(id, current.version), &current)?;
		std::fs::remove_file(&path)?;

		Ok(())
	}

	fn get_version(&self, id: &str, version: u64) -> DocmintResult<Template> {
		validate_id(id)?;
		let current_path = self.template_path(id);

		if current_path.is_file() {
			let current = Self::load_file(&current_path)?;
			if current.version == version {
				return Ok(current);
			}
		}

		let archived = self.history_path(id, version);

		if archived.is_file() {
			Self::load_file(&archived)
		} else {
			Err(DocmintError::TemplateVersionNotFound {
				id: id.to_string(),
				version,
			})
		}
	}
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemoryTemplateStore {
	// id → revisions, oldest first; the last entry is current. Removed
	// templates move to `archived` so old versions stay reachable.
	revisions: Mutex<BTreeMap<String, Vec<Template>>>,
	archived: Mutex<BTreeMap<String, Vec<Template>>>,
}

impl MemoryTemplateStore {
	pub fn new() -> Self {
		Self::default()
	}
}

impl TemplateStore for MemoryTemplateStore {
	fn get(&self, id: &str) -> DocmintResult<Template> {
		validate_id(id)?;
		let revisions = self
			.revisions
			.lock()
			.unwrap_or_else(PoisonError::into_inner);

		revisions
			.get(id)
			.and_then(|all| all.last())
			.cloned()
			.ok_or_else(|| DocmintError::TemplateNotFound(id.to_string()))
	}

	fn save(&self, mut template: Template) -> DocmintResult<Template> {
		validate_id(&template.id)?;
		let mut revisions = self
			.revisions
			.lock()
			.unwrap_or_else(PoisonError::into_inner);

		let all = revisions.entry(template.id.clone()).or_default();

		if let Some(previous) = all.last() {
			template.version = previous.version + 1;
			template.created_at = previous.created_at;
		} else {
			template.version = default_version();
		}

		all.push(template.clone());
		Ok(template)
	}

	fn list(&self) -> DocmintResult<Vec<Template>> {
		let revisions = self
			.revisions
			.lock()
			.unwrap_or_else(PoisonError::into_inner);

		Ok(revisions
			.values()
			.filter_map(|all| all.last().cloned())
			.collect())
	}

	fn remove(&self, id: &str) -> DocmintResult<()> {
		validate_id(id)?;
		let mut revisions = self
			.revisions
			.lock()
			.unwrap_or_else(PoisonError::into_inner);

		let Some(all) = revisions.remove(id) else {
			return Err(DocmintError::TemplateNotFound(id.to_string()));
		};

		self.archived
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.entry(id.to_string())
			.or_default()
			.extend(all);

		Ok(())
	}

	fn get_version(&self, id: &str, version: u64) -> DocmintResult<Template> {
		validate_id(id)?;

		let found = {
			let revisions = self
				.revisions
				.lock()
				.unwrap_or_else(PoisonError::into_inner);

			revisions
				.get(id)
				.and_then(|all| all.iter().find(|t| t.version == version))
				.cloned()
		};

		let found = found.or_else(|| {
			let archived = self
				.archived
				.lock()
				.unwrap_or_else(PoisonError::into_inner);

			archived
				.get(id)
				.and_then(|all| all.iter().find(|t| t.version == version))
				.cloned()
		});

		found.ok_or_else(|| {
			DocmintError::TemplateVersionNotFound {
				id: id.to_string(),
				version,
			}
		})
	}
}
