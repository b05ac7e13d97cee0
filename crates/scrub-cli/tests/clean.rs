//! File-to-file cleaning runs.

use std::fs;
use std::path::Path;

use scrub_cli::clean::{clean_file, default_output_path, report_json};
use scrub_cli::config::{Preset, load_config, read_config, render_config};
use scrub_model::ScrubConfig;
use scrub_transform::Stage;

const CALL_LIST: &str = "\
CustomerID,First_Name,Last_Name,Phone_Number,Address,Paying Customer,Do_Not_Contact,Not_Useful_Column
1001,Frodo,Baggins,123-545-5421,\"123 Shire Lane, Shire\",Yes,No,True
1001,Frodo,Baggins,123-545-5421,\"123 Shire Lane, Shire\",Yes,No,True
1002,Abed,Nadir,123/643/9775,93 West Main Street,No,Yes,False
1003,Walter,/White,7066950392,\"298 Drugs Driveway, Arizona, 85001\",N,,True
1004,Dwight,Schrute...,N/a,\"1 Paper Way, PA, 18503\",Y,N,False
";

fn write_input(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("customer_call_list.csv");
    fs::write(&path, CALL_LIST).expect("write input");
    path
}

#[test]
fn cleans_call_list_with_preset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(dir.path());
    let config = load_config(None, Some(Preset::CustomerCallList)).expect("config");

    let result = clean_file(&input, None, &config, false).expect("clean");
    let output = result.output.clone().expect("output path");
    assert_eq!(output, dir.path().join("customer_call_list_clean.csv"));
    assert_eq!(result.ingest.rows_read, 5);
    assert_eq!(result.report.rows_out(), 3);

    let written = fs::read_to_string(&output).expect("read output");
    insta::assert_snapshot!(written, @r"
    CustomerID,First_Name,Last_Name,Phone_Number,Street_Address,State,Zip_Code,Paying Customer,Do_Not_Contact
    1001,Frodo,Baggins,123-545-5421,123 Shire Lane,Shire,,Yes,No
    1003,Walter,White,706-695-0392,298 Drugs Driveway,Arizona,85001,No,
    1004,Dwight,Schrute,N/a,1 Paper Way,PA,18503,Yes,No
    ");
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(dir.path());
    let config = ScrubConfig::customer_call_list();

    let result = clean_file(&input, None, &config, true).expect("clean");
    assert!(result.output.is_none());
    assert!(!default_output_path(&input).exists());
    let dedupe = result.report.stage(Stage::Dedupe).expect("dedupe");
    assert_eq!(dedupe.duplicate_rows, 1);
}

#[test]
fn report_json_redacts_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(dir.path());
    let config = ScrubConfig::customer_call_list();

    let result = clean_file(&input, None, &config, true).expect("clean");
    let json = report_json(&result.report).expect("json");
    assert!(json.contains("\"unparsed_phone\""));
    assert!(json.contains("[REDACTED]"));
    assert!(!json.contains("N/a"));
}

#[test]
fn missing_column_is_reported_with_stage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("other.csv");
    fs::write(&input, "id,name\n1,A\n").expect("write input");

    let err = clean_file(&input, None, &ScrubConfig::customer_call_list(), true).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Address"), "{message}");
    assert!(message.contains("project"), "{message}");
}

#[test]
fn explicit_output_directories_are_created() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_input(dir.path());
    let output = dir.path().join("cleaned").join("calls.csv");

    // An empty configuration still drops the exact duplicate row.
    clean_file(&input, Some(&output), &ScrubConfig::default(), false).expect("clean");
    let written = fs::read_to_string(&output).expect("read output");
    assert_eq!(written.lines().count(), 5);
    assert!(written.contains("\"123 Shire Lane, Shire\""));
}

#[test]
fn rendered_preset_reads_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scrub.toml");
    let config = ScrubConfig::customer_call_list();
    fs::write(&path, render_config(&config).expect("render")).expect("write config");

    assert_eq!(read_config(&path).expect("read config"), config);
}

#[test]
fn bad_config_names_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[pipeline.phones]\ncolumn = [\"Phone\"]\n").expect("write config");

    let err = read_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.toml"));
}

#[test]
fn default_output_sits_next_to_input() {
    assert_eq!(
        default_output_path(Path::new("data/raw/calls.csv")),
        Path::new("data/raw/calls_clean.csv")
    );
}
