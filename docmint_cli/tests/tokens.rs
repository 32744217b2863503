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
fn tokens_lists_placeholders_sorted() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("tokens")
		.arg("--template")
		.arg("offer-standard")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("candidate_name\ncompany\nposition\nsalary\nstart_date\n");

	Ok(())
}

#[test]
fn tokens_reports_placeholder_free_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let dir = tmp.path().join("templates");
	std::fs::create_dir_all(&dir)?;
	std::fs::write(
		dir.join("plain-note.toml"),
		"name = \"Plain Note\"\ncategory = \"certificate\"\nbody = \"Nothing to merge here.\"\n",
	)?;

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("tokens")
		.arg("--template")
		.arg("plain-note")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("has no placeholders"));

	Ok(())
}

#[test]
fn tokens_fails_for_unknown_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("tokens")
		.arg("--template")
		.arg("ghost")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.stderr(predicates::str::contains("no template found with id: `ghost`"));

	Ok(())
}
