use std::path::Path;

use assert_cmd::Command;
use docmint_core::AnyEmptyResult;

fn write_offer_template(root: &Path) {
	let dir = root.join("templates");
	std::fs::create_dir_all(&dir).unwrap_or_else(|e| panic!("create {}: {e}", dir.display()));
	std::fs::write(
		dir.join("offer-standard.toml"),
		"name = \"Standard Offer\"\ncategory = \"offer\"\nbody = \"\"\"\nDear \
		 {{candidate_name}},\n\nWe are pleased to offer you the **{{position}}** role at \
		 {{company}}.\n\n- Start date: {{start_date}}\n- Annual salary: {{salary}}\n\n*This \
		 offer expires in 14 days.*\n\"\"\"\n",
	)
	.unwrap_or_else(|e| panic!("write template: {e}"));
}

#[test]
fn template_list_shows_catalog() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());
	std::fs::write(
		tmp.path().join("templates/completion-cert.toml"),
		"name = \"Completion Certificate\"\ncategory = \"certificate\"\nbody = \"Awarded to \
		 {{student_name}} on {{completion_date}}.\"\n",
	)?;

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("template")
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Templates:"))
		.stdout(predicates::str::contains(
			"completion-cert v1 [certificate] Completion Certificate",
		))
		.stdout(predicates::str::contains(
			"offer-standard v1 [offer] Standard Offer",
		))
		.stdout(predicates::str::contains("2 template(s)"));

	Ok(())
}

#[test]
fn template_list_reports_empty_directory() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("template")
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No templates found in templates"));

	Ok(())
}

#[test]
fn template_show_prints_details() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("template")
		.arg("show")
		.arg("offer-standard")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Standard Offer"))
		.stdout(predicates::str::contains(
			"candidate_name, company, position, salary, start_date",
		))
		.stdout(predicates::str::contains("Body"))
		.stdout(predicates::str::contains("Dear {{candidate_name}},"))
		// Files without timestamps fall back to the epoch.
		.stdout(predicates::str::contains("1970-01-01"));

	Ok(())
}

#[test]
fn template_add_assigns_versions() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("new-offer.toml"),
		"name = \"New Offer\"\ncategory = \"offer\"\nbody = \"Hello {{name}}.\"\n",
	)?;

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("template")
		.arg("add")
		.arg(tmp.path().join("new-offer.toml"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Saved template `new-offer` at version 1",
		));
	assert!(tmp.path().join("templates/new-offer.toml").exists());

	// Saving again bumps the version and archives the previous revision.
	let mut again = Command::cargo_bin("docmint")?;
	again
		.env("NO_COLOR", "1")
		.arg("template")
		.arg("add")
		.arg(tmp.path().join("new-offer.toml"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Saved template `new-offer` at version 2",
		));
	assert!(
		tmp.path()
			.join("templates/.history/new-offer-v1.toml")
			.exists()
	);

	Ok(())
}

#[test]
fn template_remove_archives_current_revision() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("template")
		.arg("remove")
		.arg("offer-standard")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Removed template `offer-standard`"));

	assert!(!tmp.path().join("templates/offer-standard.toml").exists());
	assert!(
		tmp.path()
			.join("templates/.history/offer-standard-v1.toml")
			.exists()
	);

	// Removing a template that is already gone fails.
	let mut again = Command::cargo_bin("docmint")?;
	again
		.env("NO_COLOR", "1")
		.arg("template")
		.arg("remove")
		.arg("offer-standard")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.stderr(predicates::str::contains("no template found with id"));

	Ok(())
}
