// End-to-end tests driving the built `logirecon` binary.
//
// Input workbooks are generated per test with rust_xlsxwriter; the report is
// read back with calamine.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::Workbook;

fn logirecon() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_logirecon"));
    cmd.env_remove("RUST_LOG").env_remove("LOGIRECON_CONFIG");
    cmd
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

enum V {
    S(&'static str),
    N(f64),
}

fn write_xlsx(path: &Path, headers: &[&str], rows: &[Vec<V>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, h) in headers.iter().enumerate() {
        sheet.write_string(0, c as u16, *h).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            let (r, c) = (r as u32 + 1, c as u16);
            match v {
                V::S(s) => sheet.write_string(r, c, *s).unwrap(),
                V::N(n) => sheet.write_number(r, c, *n).unwrap(),
            };
        }
    }
    workbook.save(path).unwrap();
}

/// Two shipments (A twice, X123 unmatched) and two sales documents.
fn fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let shipments = dir.join("venipak.xlsx");
    write_xlsx(
        &shipments,
        &["Data", "Kl.Siuntos Nr.", "Kaina, EUR", "Gavėjas"],
        &[
            vec![V::S("2024-05-02"), V::S("A"), V::N(10.0), V::S("UAB Ąžuolas")],
            vec![V::S("2024-05-02"), V::S("A"), V::N(20.0), V::S("UAB Ąžuolas")],
            vec![V::S("2024-05-03"), V::S("X123"), V::N(5.0), V::S("Jonas")],
        ],
    );

    let sales = dir.join("rivile.xlsx");
    write_xlsx(
        &sales,
        &["Dokumento Nr.", "Menedžeris", "Suma Be PVM"],
        &[
            vec![V::S("A"), V::S("Ona"), V::N(100.0)],
            vec![V::S("B"), V::S("Petras"), V::N(50.0)],
        ],
    );

    (shipments, sales)
}

fn read_sheets(path: &Path) -> Vec<(String, calamine::Range<Data>)> {
    let bytes = std::fs::read(path).unwrap();
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
    let names = workbook.sheet_names().to_vec();
    names
        .into_iter()
        .map(|n| {
            let range = workbook.worksheet_range(&n).unwrap();
            (n, range)
        })
        .collect()
}

// ===========================================================================
// run
// ===========================================================================

#[test]
fn run_writes_report_with_three_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let (shipments, sales) = fixtures(dir.path());
    let out = dir.path().join("Result.xlsx");

    let output = logirecon()
        .args(["run", shipments.to_str().unwrap(), sales.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("wrote"), "success summary on stderr");
    assert!(output.stdout.is_empty(), "no stdout without --json");

    let sheets = read_sheets(&out);
    let names: Vec<&str> = sheets.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["Results", "Raw table 1", "Raw table 2"]);

    let results = &sheets[0].1;
    assert_eq!(results.get_value((1, 0)), Some(&Data::String("A".into())));
    assert_eq!(results.get_value((2, 3)), Some(&Data::String("NEATPAŽINTAS".into())));
    assert_eq!(results.get_value((0, 8)), Some(&Data::String("Menedžeris".into())));
}

#[test]
fn run_defaults_output_to_result_xlsx() {
    let dir = tempfile::tempdir().unwrap();
    let (shipments, sales) = fixtures(dir.path());

    let output = logirecon()
        .current_dir(dir.path())
        .args(["run", shipments.to_str().unwrap(), sales.to_str().unwrap(), "-q"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.path().join("Result.xlsx").exists());
    // Engine warnings (unmatched X123) still go to stderr; the summary does not
    assert!(!stderr(&output).contains("wrote"), "{}", stderr(&output));
}

#[test]
fn run_json_is_single_document_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let (shipments, sales) = fixtures(dir.path());
    let out = dir.path().join("r.xlsx");

    let output = logirecon()
        .args(["run", shipments.to_str().unwrap(), sales.to_str().unwrap()])
        .args(["-o", out.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let val: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(val["stats"]["shipments"], 2);
    assert_eq!(val["stats"]["unmatched_shipments"], 1);
    assert!(val["shipments"][1]["ratio"].is_null(), "X123 has no sales");
    assert_eq!(val["managers"][1]["manager"], "Ona");
    assert_eq!(val["managers"][1]["ratio"], 0.39);
}

#[test]
fn run_summary_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let (shipments, sales) = fixtures(dir.path());
    let out = dir.path().join("r.xlsx");
    let summary = dir.path().join("summary.json");

    let output = logirecon()
        .args(["run", shipments.to_str().unwrap(), sales.to_str().unwrap()])
        .args(["-o", out.to_str().unwrap(), "--summary-json", summary.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let val: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(val["meta"]["markup"], 1.3);
    assert_eq!(val["totals"]["net_sales"], 100.0);
}

#[test]
fn run_accepts_csv_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let shipments = dir.path().join("venipak.csv");
    std::fs::write(&shipments, "Kl.Siuntos Nr.;Kaina, EUR;Gavėjas\nA;10;R\nA;20;R\n").unwrap();
    let sales = dir.path().join("rivile.csv");
    std::fs::write(&sales, "Dokumento Nr.;Menedžeris;Suma Be PVM\nA;Ona;100,00\n").unwrap();
    let out = dir.path().join("r.xlsx");

    let output = logirecon()
        .args(["run", shipments.to_str().unwrap(), sales.to_str().unwrap()])
        .args(["-o", out.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let val: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ratio = val["shipments"][0]["ratio"].as_f64().unwrap();
    assert!((ratio - 0.39).abs() < 1e-9);
}

#[test]
fn run_with_custom_config() {
    let dir = tempfile::tempdir().unwrap();
    let (shipments, sales) = fixtures(dir.path());
    let config = dir.path().join("imone.toml");
    std::fs::write(
        &config,
        "markup = 1.0\n\n[report]\nresults_sheet = \"Rezultatai\"\n",
    )
    .unwrap();
    let out = dir.path().join("r.xlsx");

    let output = logirecon()
        .args(["run", shipments.to_str().unwrap(), sales.to_str().unwrap()])
        .args(["-o", out.to_str().unwrap(), "--config", config.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let sheets = read_sheets(&out);
    assert_eq!(sheets[0].0, "Rezultatai");
    assert_eq!(sheets[0].1.get_value((1, 1)), Some(&Data::Float(30.0)));
}

// ===========================================================================
// Failures and exit codes
// ===========================================================================

#[test]
fn missing_column_exits_3_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let (shipments, _) = fixtures(dir.path());
    let sales = dir.path().join("bad.xlsx");
    write_xlsx(&sales, &["Dokumento Nr.", "Suma Be PVM"], &[vec![V::S("A"), V::N(1.0)]]);
    let out = dir.path().join("r.xlsx");

    let output = logirecon()
        .args(["run", shipments.to_str().unwrap(), sales.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let err = stderr(&output);
    assert!(err.contains("error: sales table: missing column 'Menedžeris'"), "{err}");
    assert!(err.contains("hint:"), "{err}");
    assert!(!out.exists(), "no partial output");
}

#[test]
fn bad_amount_exits_4() {
    let dir = tempfile::tempdir().unwrap();
    let (_, sales) = fixtures(dir.path());
    let shipments = dir.path().join("bad.xlsx");
    write_xlsx(
        &shipments,
        &["Kl.Siuntos Nr.", "Kaina, EUR", "Gavėjas"],
        &[vec![V::S("A"), V::N(1.0), V::S("R")], vec![V::S("B"), V::S("n/a"), V::S("R")]],
    );
    let out = dir.path().join("r.xlsx");

    let output = logirecon()
        .args(["run", shipments.to_str().unwrap(), sales.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("row 3"), "{}", stderr(&output));
    assert!(!out.exists());
}

#[test]
fn unreadable_input_exits_5() {
    let dir = tempfile::tempdir().unwrap();
    let (_, sales) = fixtures(dir.path());
    let missing = dir.path().join("nera.xlsx");

    let output = logirecon()
        .current_dir(dir.path())
        .args(["run", missing.to_str().unwrap(), sales.to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("cannot load shipments file"));
}

#[test]
fn invalid_config_exits_6() {
    let dir = tempfile::tempdir().unwrap();
    let (shipments, sales) = fixtures(dir.path());
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "markup = -1.0\n").unwrap();

    let output = logirecon()
        .current_dir(dir.path())
        .args(["run", shipments.to_str().unwrap(), sales.to_str().unwrap()])
        .args(["--config", config.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(6));
    assert!(!dir.path().join("Result.xlsx").exists());

    let output = logirecon()
        .args(["validate", config.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn unknown_config_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("typo.toml");
    std::fs::write(&config, "markupp = 1.3\n").unwrap();

    let output = logirecon()
        .args(["validate", config.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(6));
    assert!(stderr(&output).contains("markupp"), "{}", stderr(&output));
}

#[test]
fn output_over_input_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let (shipments, sales) = fixtures(dir.path());
    let before = std::fs::read(&sales).unwrap();

    let output = logirecon()
        .args(["run", shipments.to_str().unwrap(), sales.to_str().unwrap(), "-o", sales.to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(std::fs::read(&sales).unwrap(), before);
}

#[test]
fn dotted_output_path_over_input_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let (_, sales) = fixtures(dir.path());
    let before = std::fs::read(&sales).unwrap();

    let output = logirecon()
        .current_dir(dir.path())
        .args(["run", "venipak.xlsx", "rivile.xlsx", "-o", "./rivile.xlsx"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2), "{}", stderr(&output));
    assert!(stderr(&output).contains("would overwrite an input file"), "{}", stderr(&output));
    assert_eq!(std::fs::read(&sales).unwrap(), before);
}

#[test]
fn failed_summary_write_leaves_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let (shipments, sales) = fixtures(dir.path());
    let out = dir.path().join("r.xlsx");
    let summary = dir.path().join("nera").join("summary.json");

    let output = logirecon()
        .args([
            "run",
            shipments.to_str().unwrap(),
            sales.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--summary-json",
            summary.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(7), "{}", stderr(&output));
    assert!(!out.exists());
    assert!(!summary.exists());
}

#[test]
fn missing_arguments_is_usage_error() {
    let output = logirecon().args(["run", "only-one.xlsx"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ===========================================================================
// validate / default-config
// ===========================================================================

#[test]
fn default_config_round_trips_through_validate() {
    let output = logirecon().arg("default-config").output().unwrap();
    assert!(output.status.success());
    let toml = String::from_utf8(output.stdout).unwrap();
    assert!(toml.contains("markup = 1.3"), "{toml}");
    assert!(toml.contains("Kl.Siuntos Nr."), "{toml}");

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("default.toml");
    std::fs::write(&config, &toml).unwrap();

    let output = logirecon()
        .args(["validate", config.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).starts_with("valid:"));
}
