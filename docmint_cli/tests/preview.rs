use std::path::Path;

use assert_cmd::Command;
use docmint_core::AnyEmptyResult;
use docmint_core::AnyResult;
use predicates::prelude::PredicateBooleanExt;

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
fn preview_prints_merged_content() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("preview")
		.arg("--template")
		.arg("offer-standard")
		.arg("--field")
		.arg("candidate_name=Ada Lovelace")
		.arg("--field")
		.arg("position=Staff Engineer")
		.arg("--field")
		.arg("company=Initech")
		.arg("--field")
		.arg("start_date=2026-09-01")
		.arg("--field")
		.arg("salary=185000")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dear Ada Lovelace,"))
		.stdout(predicates::str::contains(
			"**Staff Engineer** role at Initech.",
		))
		.stdout(predicates::str::contains("*This offer expires in 14 days.*"));

	// Previews are audited but never stored.
	assert!(!tmp.path().join("generated").exists());

	let audit = std::fs::read_to_string(tmp.path().join("audit.jsonl"))?;
	assert!(audit.contains("\"action\":\"preview\""));
	assert!(audit.contains("\"result\":\"success\""));

	Ok(())
}

#[test]
fn preview_blanks_missing_fields() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("preview")
		.arg("--template")
		.arg("offer-standard")
		.arg("--field")
		.arg("candidate_name=Ada")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dear Ada,"))
		.stdout(predicates::str::contains("the **** role at ."))
		.stderr(predicates::str::contains("rendered blank"));

	Ok(())
}

fn preview_output(root: &Path) -> AnyResult<String> {
	let mut cmd = Command::cargo_bin("docmint")?;
	let output = cmd
		.env("NO_COLOR", "1")
		.arg("preview")
		.arg("--template")
		.arg("offer-standard")
		.arg("--field")
		.arg("candidate_name=Ada")
		.arg("--field")
		.arg("position=Engineer")
		.arg("--path")
		.arg(root)
		.output()?;
	Ok(String::from_utf8(output.stdout)?)
}

#[test]
fn preview_is_deterministic() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());

	let first = preview_output(tmp.path())?;
	let second = preview_output(tmp.path())?;
	similar_asserts::assert_eq!(first, second);

	Ok(())
}

#[test]
fn preview_prefers_field_flags_over_record_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());
	std::fs::write(
		tmp.path().join("record.json"),
		"{\"candidate_name\": \"Grace Hopper\", \"position\": \"Rear Admiral\"}",
	)?;

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("preview")
		.arg("--template")
		.arg("offer-standard")
		.arg("--record")
		.arg(tmp.path().join("record.json"))
		.arg("--field")
		.arg("candidate_name=Ada")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dear Ada,"))
		.stdout(predicates::str::contains("**Rear Admiral**"))
		.stdout(predicates::str::contains("Grace").not());

	Ok(())
}
