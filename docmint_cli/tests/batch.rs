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

fn generated_names(root: &Path) -> Vec<String> {
	let dir = root.join("generated");
	let mut names: Vec<String> = std::fs::read_dir(&dir)
		.unwrap_or_else(|e| panic!("read_dir {}: {e}", dir.display()))
		.map(|entry| {
			entry
				.unwrap_or_else(|e| panic!("entry: {e}"))
				.file_name()
				.to_string_lossy()
				.into_owned()
		})
		.collect();
	names.sort();
	names
}

#[test]
fn batch_generates_one_document_per_row() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());
	std::fs::write(
		tmp.path().join("rows.csv"),
		"candidate_name,position,company,start_date,salary\n\
		 Ada Lovelace,Staff Engineer,Initech,2026-09-01,185000\n\
		 Grace Hopper,Rear Admiral,US Navy,1944-07-01,172000\n",
	)?;

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("batch")
		.arg("--template")
		.arg("offer-standard")
		.arg("--rows")
		.arg(tmp.path().join("rows.csv"))
		.arg("--actor")
		.arg("batch@initech.test")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Batch finished: 2 of 2 row(s) generated into generated",
		));

	let names = generated_names(tmp.path());
	assert_eq!(names.len(), 2);
	assert!(names[0].contains("_row0000_"));
	assert!(names[1].contains("_row0001_"));

	let audit = std::fs::read_to_string(tmp.path().join("audit.jsonl"))?;
	assert_eq!(audit.lines().count(), 2);
	assert_eq!(audit.matches("\"result\":\"success\"").count(), 2);
	assert!(audit.contains("batch@initech.test"));

	Ok(())
}

#[test]
fn batch_reports_malformed_rows_and_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());
	std::fs::write(
		tmp.path().join("rows.csv"),
		"candidate_name,position,company,start_date,salary\n\
		 Ada Lovelace,Staff Engineer,Initech,2026-09-01,185000\n\
		 Grace Hopper,Rear Admiral\n\
		 Third Person,Analyst,Initrode,2026-01-01,90000\n",
	)?;

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("batch")
		.arg("--template")
		.arg("offer-standard")
		.arg("--rows")
		.arg(tmp.path().join("rows.csv"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.stdout(predicates::str::contains("Batch finished: 2 of 3 row(s)"))
		.stderr(predicates::str::contains("Failed rows:"))
		.stderr(predicates::str::contains(
			"row 1 (received): line 3 has 2 of 5 columns",
		));

	// The well-formed rows still went through.
	let names = generated_names(tmp.path());
	assert_eq!(names.len(), 2);
	assert!(names[0].contains("_row0000_"));
	assert!(names[1].contains("_row0002_"));

	// Every row is audited, including the rejected one.
	let audit = std::fs::read_to_string(tmp.path().join("audit.jsonl"))?;
	assert_eq!(audit.lines().count(), 3);
	assert!(audit.contains("\"stage\":\"received\""));

	Ok(())
}

#[test]
fn batch_reports_empty_rows_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());
	std::fs::write(
		tmp.path().join("rows.csv"),
		"candidate_name,position,company,start_date,salary\n",
	)?;

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("batch")
		.arg("--template")
		.arg("offer-standard")
		.arg("--rows")
		.arg(tmp.path().join("rows.csv"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No data rows found in rows.csv"));

	assert!(!tmp.path().join("generated").exists());
	assert!(!tmp.path().join("audit.jsonl").exists());

	Ok(())
}

#[test]
fn batch_enforces_required_fields_per_row() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_offer_template(tmp.path());

	// The salary column is missing entirely.
	std::fs::write(
		tmp.path().join("rows.csv"),
		"candidate_name,position,company,start_date\n\
		 Ada Lovelace,Staff Engineer,Initech,2026-09-01\n",
	)?;

	let mut cmd = Command::cargo_bin("docmint")?;
	cmd.env("NO_COLOR", "1")
		.arg("batch")
		.arg("--template")
		.arg("offer-standard")
		.arg("--rows")
		.arg(tmp.path().join("rows.csv"))
		.arg("--require-all-fields")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.stdout(predicates::str::contains("Batch finished: 0 of 1 row(s)"))
		.stderr(predicates::str::contains(
			"row 0 (bound): record is missing field(s): salary",
		));

	let audit = std::fs::read_to_string(tmp.path().join("audit.jsonl"))?;
	assert!(audit.contains("\"stage\":\"bound\""));

	Ok(())
}
