//! End-to-end behaviour of the stage pipeline.

use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;

use scrub_model::{
    CanonicalMap, CellValue, ColumnDefault, DedupeConfig, PipelineConfig, Record, RowId,
    SplitSpec, Table,
};
use scrub_transform::{Pipeline, Stage, TransformError, dedupe, fill_missing};

/// Builds a text table; empty strings become missing cells.
fn text_table(columns: &[&str], rows: &[&[&str]]) -> Table {
    let records = rows
        .iter()
        .enumerate()
        .map(|(idx, values)| {
            let mut record = Record::new(RowId::new(idx as u64 + 1));
            for (column, value) in columns.iter().zip(values.iter()) {
                let cell = if value.is_empty() {
                    CellValue::Missing
                } else {
                    CellValue::text(*value)
                };
                record.set(*column, cell);
            }
            record
        })
        .collect();
    Table::from_rows(columns.iter().copied(), records).expect("table")
}

fn column(table: &Table, name: &str) -> Vec<CellValue> {
    table.column_values(name).cloned().collect()
}

fn row_ids(table: &Table) -> Vec<u64> {
    table.rows().iter().map(|row| row.id.get()).collect()
}

#[test]
fn phone_layouts_converge() {
    let table = text_table(
        &["phone"],
        &[
            &["(555) 123-4567"],
            &["555.123.4567"],
            &["555 123 4567"],
            &["+1-555-123-4567"],
            &["5551234567"],
            &["12345"],
        ],
    );
    let mut config = PipelineConfig::new();
    config.phones.columns = vec!["phone".into()];
    let output = Pipeline::from_config(&config)
        .expect("pipeline")
        .execute(table)
        .expect("execute");

    let mut expected = vec![CellValue::text("555-123-4567"); 5];
    expected.push(CellValue::text("12345"));
    assert_eq!(column(&output.table, "phone"), expected);

    let phones = output.report.stage(Stage::Phones).expect("phones report");
    assert_eq!(phones.unparsed_phones, 1);
    assert_eq!(phones.cells_changed, 5);
    assert_eq!(phones.issues[0].row, RowId::new(6));
}

#[test]
fn dedupe_on_key_keeps_first() {
    let table = text_table(&["id", "name"], &[&["1", "A"], &["1", "A"], &["2", "B"]]);
    let mut config = PipelineConfig::new();
    config.dedupe.key_columns = Some(vec!["id".into()]);
    let output = Pipeline::from_config(&config)
        .expect("pipeline")
        .execute(table)
        .expect("execute");

    assert_eq!(column(&output.table, "id"), [CellValue::text("1"), CellValue::text("2")]);
    assert_eq!(column(&output.table, "name"), [CellValue::text("A"), CellValue::text("B")]);
    assert_eq!(output.report.stage(Stage::Dedupe).map(|r| r.duplicate_rows), Some(1));
}

#[test]
fn state_spellings_canonicalize() {
    let table = text_table(&["state"], &[&["NY"], &["new york"], &[" ny "]]);
    let mut config = PipelineConfig::new();
    config.strings.columns = vec!["state".into()];
    config.strings.canonical.insert(
        "state".into(),
        CanonicalMap::from_pairs([("ny", "New York")]).expect("map"),
    );
    let output = Pipeline::from_config(&config)
        .expect("pipeline")
        .execute(table)
        .expect("execute");

    assert_eq!(
        column(&output.table, "state"),
        vec![CellValue::text("New York"); 3]
    );
}

#[test]
fn median_fills_missing_age() {
    let rows = vec![
        Record::new(RowId::new(1)).with_cell("age", 25.0),
        Record::new(RowId::new(2)).with_cell("age", CellValue::Missing),
        Record::new(RowId::new(3)).with_cell("age", 35.0),
    ];
    let table = Table::from_rows(["age"], rows).expect("table");
    let mut config = PipelineConfig::new();
    config.fill.insert("age".into(), ColumnDefault::Median);
    let output = Pipeline::from_config(&config)
        .expect("pipeline")
        .execute(table)
        .expect("execute");

    assert_eq!(
        column(&output.table, "age"),
        [
            CellValue::Number(25.0),
            CellValue::Number(30.0),
            CellValue::Number(35.0)
        ]
    );
    let fill = output.report.stage(Stage::Fill).expect("fill report");
    assert_eq!(fill.filled.get("age"), Some(&1));
}

#[test]
fn combined_column_splits_fail_soft() {
    let table = text_table(
        &["key", "combined"],
        &[&["a", "2024-03-15|Active"], &["b", "2024-03-15"]],
    );
    let mut config = PipelineConfig::new();
    config.project.split = Some(SplitSpec::new("combined", "|", ["date", "status"]));
    let output = Pipeline::from_config(&config)
        .expect("pipeline")
        .execute(table)
        .expect("execute");

    assert_eq!(output.table.columns(), ["key", "date", "status"]);
    assert_eq!(
        column(&output.table, "date"),
        vec![CellValue::text("2024-03-15"); 2]
    );
    assert_eq!(
        column(&output.table, "status"),
        [CellValue::text("Active"), CellValue::Missing]
    );
    let project = output.report.stage(Stage::Project).expect("project report");
    assert_eq!(project.malformed_splits, 1);
}

#[test]
fn split_can_keep_source_column() {
    let table = text_table(&["combined", "z"], &[&["x|y", "1"]]);
    let mut split = SplitSpec::new("combined", "|", ["left", "right"]);
    split.keep_source = true;
    let mut config = PipelineConfig::new();
    config.project.split = Some(split);
    let output = Pipeline::from_config(&config)
        .expect("pipeline")
        .execute(table)
        .expect("execute");

    assert_eq!(output.table.columns(), ["combined", "left", "right", "z"]);
}

#[test]
fn drop_list_may_name_split_source() {
    let table = text_table(&["key", "combined", "z"], &[&["a", "x|y", "1"]]);
    let mut config = PipelineConfig::new();
    config.project.split = Some(SplitSpec::new("combined", "|", ["l", "r"]));
    config.project.drop = vec!["combined".into(), "z".into()];
    let output = Pipeline::from_config(&config)
        .expect("pipeline")
        .execute(table.clone())
        .expect("execute");
    assert_eq!(output.table.columns(), ["key", "l", "r"]);

    config.project.split.as_mut().expect("split").keep_source = true;
    let output = Pipeline::from_config(&config)
        .expect("pipeline")
        .execute(table)
        .expect("execute");
    assert_eq!(output.table.columns(), ["key", "l", "r"]);
}

#[test]
fn keep_list_preserves_table_order() {
    let table = text_table(&["a", "b", "c"], &[&["1", "2", "3"]]);
    let mut config = PipelineConfig::new();
    config.project.keep = Some(vec!["c".into(), "a".into()]);
    let output = Pipeline::from_config(&config)
        .expect("pipeline")
        .execute(table)
        .expect("execute");

    assert_eq!(output.table.columns(), ["a", "c"]);
    assert_eq!(output.table.rows()[0].cells.len(), 2);
}

#[test]
fn customer_call_list_preset() {
    let columns = [
        "CustomerID",
        "First_Name",
        "Last_Name",
        "Phone_Number",
        "Address",
        "Paying Customer",
        "Do_Not_Contact",
        "Not_Useful_Column",
    ];
    let table = text_table(
        &columns,
        &[
            &["1001", "Frodo", "Baggins", "123-545-5421", "123 Shire Lane, Shire", "Yes", "No", "True"],
            &["1001", "Frodo", "Baggins", "123-545-5421", "123 Shire Lane, Shire", "Yes", "No", "True"],
            &["1002", "Abed", "Nadir", "123/643/9775", "93 West Main Street", "No", "Yes", "False"],
            &["1003", "Walter", "/White", "7066950392", "298 Drugs Driveway, Arizona, 85001", "N", "", "True"],
            &["1004", "Dwight", "Schrute...", "N/a", "1 Paper Way, PA, 18503", "Y", "N", "False"],
        ],
    );
    let pipeline = Pipeline::from_config(&PipelineConfig::customer_call_list()).expect("pipeline");
    let output = pipeline.execute(table).expect("execute");
    let cleaned = &output.table;

    assert_eq!(
        cleaned.columns(),
        [
            "CustomerID",
            "First_Name",
            "Last_Name",
            "Phone_Number",
            "Street_Address",
            "State",
            "Zip_Code",
            "Paying Customer",
            "Do_Not_Contact",
        ]
    );
    assert_eq!(row_ids(cleaned), [1, 4, 5]);
    assert_eq!(
        column(cleaned, "Last_Name"),
        [
            CellValue::text("Baggins"),
            CellValue::text("White"),
            CellValue::text("Schrute")
        ]
    );
    assert_eq!(
        column(cleaned, "Phone_Number"),
        [
            CellValue::text("123-545-5421"),
            CellValue::text("706-695-0392"),
            CellValue::text("N/a")
        ]
    );
    assert_eq!(
        column(cleaned, "State"),
        [
            CellValue::text("Shire"),
            CellValue::text("Arizona"),
            CellValue::text("PA")
        ]
    );
    assert_eq!(
        column(cleaned, "Zip_Code"),
        [
            CellValue::text(""),
            CellValue::text("85001"),
            CellValue::text("18503")
        ]
    );
    assert_eq!(
        column(cleaned, "Paying Customer"),
        [
            CellValue::text("Yes"),
            CellValue::text("No"),
            CellValue::text("Yes")
        ]
    );
    assert_eq!(
        column(cleaned, "Do_Not_Contact"),
        [
            CellValue::text("No"),
            CellValue::text(""),
            CellValue::text("No")
        ]
    );

    let report = &output.report;
    assert_eq!(report.rows_in(), 5);
    assert_eq!(report.rows_out(), 3);
    let project = report.stage(Stage::Project).expect("project");
    assert_eq!(project.malformed_splits, 3);
    let dedupe = report.stage(Stage::Dedupe).expect("dedupe");
    assert_eq!((dedupe.irrelevant_rows, dedupe.duplicate_rows), (1, 1));
    let phones = report.stage(Stage::Phones).expect("phones");
    assert_eq!((phones.cells_changed, phones.unparsed_phones), (1, 1));
    let fill = report.stage(Stage::Fill).expect("fill");
    assert_eq!(fill.filled.get("Zip_Code"), Some(&1));
    assert_eq!(fill.filled.get("Do_Not_Contact"), Some(&1));
}

#[test]
fn closure_relevance_overrides_configured_rule() {
    let table = text_table(&["id", "status"], &[&["1", "open"], &["2", "closed"]]);
    let output = Pipeline::from_config(&PipelineConfig::new())
        .expect("pipeline")
        .with_relevance(|record: &Record| record.get("status") != &CellValue::text("closed"))
        .execute(table)
        .expect("execute");
    assert_eq!(row_ids(&output.table), [1]);
}

#[test]
fn unknown_column_names_stage() {
    let table = text_table(&["a"], &[&["1"]]);
    let mut config = PipelineConfig::new();
    config.phones.columns = vec!["Phone".into()];
    let err = Pipeline::from_config(&config)
        .expect("pipeline")
        .execute(table)
        .unwrap_err();
    assert!(matches!(
        &err,
        TransformError::UnknownColumn { stage: Stage::Phones, column } if column == "Phone"
    ));
    assert_eq!(
        err.to_string(),
        "phones: column \"Phone\" does not exist at this stage"
    );
}

#[test]
fn split_result_may_not_collide() {
    let table = text_table(&["combined", "status"], &[&["a|b", "x"]]);
    let mut config = PipelineConfig::new();
    config.project.split = Some(SplitSpec::new("combined", "|", ["date", "status"]));
    let err = Pipeline::from_config(&config)
        .expect("pipeline")
        .execute(table)
        .unwrap_err();
    assert!(matches!(err, TransformError::ColumnConflict { stage: Stage::Project, .. }));
}

#[test]
fn statistic_without_data_is_fatal() {
    let table = text_table(&["age"], &[&[""], &["unknown"]]);
    let defaults = BTreeMap::from([("age".to_string(), ColumnDefault::Median)]);
    let err = fill_missing(table, &defaults).unwrap_err();
    assert!(matches!(
        err,
        TransformError::NoStatisticData { ref column, statistic: "median" } if column == "age"
    ));
}

#[test]
fn statistics_use_input_values_only() {
    // Text cells that parse as numbers count; the fill of one column never
    // feeds the statistic of another.
    let table = text_table(
        &["a", "b"],
        &[&["1", ""], &["", "10"], &["3", "x"], &["", "x"]],
    );
    let defaults = BTreeMap::from([
        ("a".to_string(), ColumnDefault::Mean),
        ("b".to_string(), ColumnDefault::Mode),
    ]);
    let filled = fill_missing(table, &defaults).expect("fill");
    assert_eq!(
        column(&filled, "a"),
        [
            CellValue::text("1"),
            CellValue::Number(2.0),
            CellValue::text("3"),
            CellValue::Number(2.0)
        ]
    );
    assert_eq!(
        column(&filled, "b"),
        [
            CellValue::text("x"),
            CellValue::text("10"),
            CellValue::text("x"),
            CellValue::text("x")
        ]
    );
}

#[test]
fn report_serializes_stage_names() {
    let table = text_table(&["a"], &[&["1"]]);
    let output = Pipeline::from_config(&PipelineConfig::new())
        .expect("pipeline")
        .execute(table)
        .expect("execute");
    let json = serde_json::to_value(&output.report).expect("json");
    let stages: Vec<&str> = json["stages"]
        .as_array()
        .expect("stages")
        .iter()
        .filter_map(|stage| stage["stage"].as_str())
        .collect();
    assert_eq!(stages, ["project", "dedupe", "strings", "phones", "fill"]);
}

fn small_table() -> impl Strategy<Value = Table> {
    prop::collection::vec((0u8..4, prop::option::of(0u8..3)), 0..24).prop_map(|rows| {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(idx, (id, score))| {
                Record::new(RowId::new(idx as u64 + 1))
                    .with_cell("id", f64::from(id))
                    .with_cell("score", score.map_or(CellValue::Missing, |s| f64::from(s).into()))
            })
            .collect();
        Table::from_rows(["id", "score"], records).expect("table")
    })
}

proptest! {
    #[test]
    fn dedupe_never_grows_and_keys_are_unique(table in small_table()) {
        let rows_in = table.len();
        let config = DedupeConfig { key_columns: Some(vec!["id".into()]), relevance: None };
        let out = dedupe(table, &config).expect("dedupe");
        prop_assert!(out.len() <= rows_in);
        let mut seen = HashSet::new();
        for value in out.column_values("id") {
            prop_assert!(seen.insert(value.clone()));
        }
        let ids = row_ids(&out);
        prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn stages_keep_relative_row_order(table in small_table()) {
        let before = row_ids(&table);
        let mut config = PipelineConfig::new();
        config.phones.columns = vec!["id".into()];
        config.strings.columns = vec!["score".into()];
        config.fill.insert("score".into(), ColumnDefault::Number { value: 0.0 });
        let output = Pipeline::from_config(&config).expect("pipeline").execute(table).expect("execute");
        let after = row_ids(&output.table);
        prop_assert!(after.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(after.iter().all(|id| before.contains(id)));
    }

    #[test]
    fn fill_leaves_no_missing(table in small_table()) {
        prop_assume!(table.column_values("score").any(|cell| !cell.is_missing()));
        let defaults = BTreeMap::from([("score".to_string(), ColumnDefault::Median)]);
        let filled = fill_missing(table, &defaults).expect("fill");
        prop_assert!(filled.column_values("score").all(|cell| !cell.is_missing()));
    }
}
