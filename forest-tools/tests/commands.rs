//! Tests d'intégration des commandes sur des répertoires temporaires

use std::fs;
use std::path::Path;
use std::process::Command;

use forest_tools::cli;
use forest_tools::{Config, RunReport, RunStatus};
use serde_json::{json, Value};

fn point(lon: f64, lat: f64, props: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [lon, lat] },
        "properties": props
    })
}

fn write_fc(path: &Path, features: Vec<Value>) {
    let fc = json!({ "type": "FeatureCollection", "features": features });
    fs::write(path, serde_json::to_string_pretty(&fc).unwrap()).unwrap();
}

fn read_fc(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn feature_count(path: &Path) -> usize {
    read_fc(path)["features"].as_array().unwrap().len()
}

#[test]
fn test_categorize_proximity_end_to_end() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_fc(
        &input.path().join("forest.geojson"),
        vec![
            point(0.0, 0.0, json!({ "description": "Pine" })),
            point(0.0, 0.01, json!({ "description": "Pine" })),
            point(10.0, 10.0, json!({ "description": "Oak" })),
        ],
    );
    fs::write(input.path().join("notes.txt"), "not geojson").unwrap();

    let mut report = RunReport::new("categorize-proximity");
    cli::cmd_categorize_proximity(input.path(), output.path(), &Config::default(), &mut report)
        .unwrap();

    assert_eq!(feature_count(&output.path().join("Pine_group_1.geojson")), 2);
    assert_eq!(feature_count(&output.path().join("Oak_group_1.geojson")), 1);
    assert!(!output.path().join("Pine_group_2.geojson").exists());
    assert_eq!(report.files_skipped, 1);
    assert_eq!(report.outputs_written, 2);

    let content = fs::read_to_string(output.path().join("Oak_group_1.geojson")).unwrap();
    assert!(content.contains("\n  \"features\""));
    assert_eq!(read_fc(&output.path().join("Oak_group_1.geojson"))["type"], "FeatureCollection");
}

#[test]
fn test_categorize_proximity_continues_after_bad_file() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("a_broken.geojson"), "{ not json").unwrap();
    write_fc(
        &input.path().join("b_forest.geojson"),
        vec![
            point(80.0, 7.0, json!({})),
            json!({
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[80.0, 7.0], [80.1, 7.1]] },
                "properties": { "description": "Pine" }
            }),
        ],
    );

    let mut report = RunReport::new("categorize-proximity");
    cli::cmd_categorize_proximity(input.path(), output.path(), &Config::default(), &mut report)
        .unwrap();
    report.finalize();

    assert_eq!(report.files_failed, 1);
    assert_eq!(report.features_dropped, 1);
    assert_eq!(report.status, RunStatus::PartialSuccess);
    assert_eq!(
        feature_count(&output.path().join("noForestType_group_1.geojson")),
        1
    );
    assert!(!output.path().join("Pine_group_1.geojson").exists());
}

#[test]
fn test_categorize_proximity_missing_dir() {
    let output = tempfile::tempdir().unwrap();
    let mut report = RunReport::new("categorize-proximity");
    let result = cli::cmd_categorize_proximity(
        Path::new("/nonexistent/forest"),
        output.path(),
        &Config::default(),
        &mut report,
    );
    assert!(result.is_err());
}

#[test]
fn test_categorize_proximity_without_input_dir_exits_with_usage() {
    let cwd = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_forest-tools"))
        .arg("categorize-proximity")
        .current_dir(cwd.path())
        .env_remove("FOREST_PROXIMITY_OUTPUT")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"));
    assert!(!cwd.path().join("FST").exists());
    assert_eq!(fs::read_dir(cwd.path()).unwrap().count(), 0);
}

#[test]
fn test_categorize_proximity_unknown_geometry_keeps_valid_points() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_fc(
        &input.path().join("forest.geojson"),
        vec![
            json!({
                "type": "Feature",
                "geometry": { "type": "Circle", "coordinates": [0.0, 0.0], "radius": 1 },
                "properties": { "description": "Pine" }
            }),
            point(0.0, 0.0, json!({ "description": "Pine" })),
        ],
    );

    let mut report = RunReport::new("categorize-proximity");
    cli::cmd_categorize_proximity(input.path(), output.path(), &Config::default(), &mut report)
        .unwrap();

    assert_eq!(report.files_failed, 0);
    assert_eq!(report.features_dropped, 1);
    assert_eq!(feature_count(&output.path().join("Pine_group_1.geojson")), 1);
}

#[test]
fn test_split_command() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("forest.geojson");
    write_fc(
        &input,
        (0..5).map(|i| point(80.0, 7.0 + i as f64, json!({ "objectid": i }))).collect(),
    );

    let mut report = RunReport::new("split");
    cli::cmd_split(&input, 2, &mut report).unwrap();

    assert_eq!(feature_count(&dir.path().join("forest.geojson_part1.geojson")), 3);
    assert_eq!(feature_count(&dir.path().join("forest.geojson_part2.geojson")), 2);
    assert!(cli::cmd_split(&input, 0, &mut report).is_err());
}

#[test]
fn test_combine_command() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("parts");
    fs::create_dir_all(input.join("sub")).unwrap();
    write_fc(&input.join("a.geojson"), vec![point(80.0, 7.0, json!({ "objectid": 1 }))]);
    write_fc(
        &input.join("sub").join("b.geojson"),
        vec![point(80.0, 7.0, json!({ "objectid": 2 }))],
    );
    fs::write(input.join("c.geojson"), r#"{"type": "Feature"}"#).unwrap();

    let flat = dir.path().join("flat.geojson");
    let mut report = RunReport::new("combine");
    cli::cmd_combine(&input, &flat, false, &mut report).unwrap();
    assert_eq!(feature_count(&flat), 1);
    assert_eq!(report.files_failed, 1);

    let deep = dir.path().join("deep.geojson");
    let mut report = RunReport::new("combine");
    cli::cmd_combine(&input, &deep, true, &mut report).unwrap();
    let ids: Vec<_> = read_fc(&deep)["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["properties"]["objectid"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);

    let empty = dir.path().join("empty");
    fs::create_dir_all(&empty).unwrap();
    assert!(cli::cmd_combine(&empty, &dir.path().join("x.geojson"), false, &mut report).is_err());
}

#[test]
fn test_merge_json_command() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    fs::write(&a, r#"{"1": {"name": "Sinharaja"}, "2": {"name": "Knuckles"}}"#).unwrap();
    fs::write(&b, r#"{"2": {"district": "Kandy"}, "3": {"name": "Wilpattu"}}"#).unwrap();
    let output = dir.path().join("a_combined.json");

    let mut report = RunReport::new("merge-json");
    cli::cmd_merge_json(&a, &b, &output, &mut report).unwrap();

    let merged = read_fc(&output);
    assert_eq!(merged["2"], json!({ "name": "Knuckles", "district": "Kandy" }));
    assert_eq!(merged["3"], json!({ "name": "Wilpattu" }));
}

#[test]
fn test_remove_keys_command() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("forest");
    fs::create_dir_all(&input).unwrap();
    write_fc(
        &input.join("a.geojson"),
        vec![point(
            80.0,
            7.0,
            json!({ "objectid": 1, "shape_leng": 2.0, "remarks": null, "description": "Pine" }),
        )],
    );
    let output = cli::update_dir(&input);

    let mut report = RunReport::new("remove-keys");
    cli::cmd_remove_keys(&input, &["shape_leng".to_string()], &output, &mut report).unwrap();

    let fc = read_fc(&output.join("a.geojson"));
    assert_eq!(
        fc["features"][0]["properties"],
        json!({ "objectid": 1, "description": "Pine" })
    );
    assert!(cli::cmd_remove_keys(&input, &[], &output, &mut report).is_err());
}

#[test]
fn test_extract_properties_command() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("forest.geojson");
    write_fc(
        &input,
        vec![
            point(80.0, 7.0, json!({ "objectid": 10, "description": "Pine" })),
            point(80.0, 7.0, json!({ "description": "no id" })),
        ],
    );
    let output = dir.path().join("forest_properties.json");

    let mut report = RunReport::new("extract-properties");
    cli::cmd_extract_properties(&input, &output, &mut report).unwrap();

    let table = read_fc(&output);
    assert_eq!(table.as_object().unwrap().len(), 1);
    assert_eq!(table["10"]["description"], "Pine");
}

#[test]
fn test_simplify_command() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("gnd.json");
    fs::write(
        &input,
        json!([{ "unique_id": 1, "gnd_name": "Galle", "snme_t1": "Kali" }]).to_string(),
    )
    .unwrap();
    let output = cli::simplified_path(&input);

    let mut report = RunReport::new("simplify");
    cli::cmd_simplify(&input, &output, &mut report).unwrap();

    let cleaned = read_fc(&output);
    assert_eq!(cleaned[0]["sinhalaNames"], json!(["Galle"]));
    assert_eq!(cleaned[0]["tamilNames"], json!(["Kali"]));
    assert_eq!(report.features_read, 1);
}

#[test]
fn test_by_district_command() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("forest.geojson");
    write_fc(
        &input,
        vec![
            point(80.2, 6.0, json!({ "district": "gall", "gfcode": "G1", "objectid": 1, "description": "Pine" })),
            point(80.2, 6.0, json!({ "gfcode": "G2", "objectid": 2 })),
        ],
    );
    let output = dir.path().join("FST");

    let mut report = RunReport::new("by-district");
    cli::cmd_by_district(&input, &output, &Config::default(), &mut report).unwrap();

    let galle = output.join("categorized").join("Galle");
    assert_eq!(feature_count(&galle.join("Pine").join("FST_Galle_G1_1.geojson")), 1);
    assert_eq!(feature_count(&galle.join("Pine").join("FST_Galle_Pine_combined.geojson")), 1);
    assert_eq!(feature_count(&galle.join("FST_Galle_combined.geojson")), 1);
    assert_eq!(
        feature_count(&output.join("uncategorized").join("FST_G2_2.geojson")),
        1
    );
}

#[test]
fn test_organize_command() {
    let dir = tempfile::tempdir().unwrap();
    let gnd = json!({ "province_name": "SOUTHERN", "district_name": "GALLE", "ds_division_name": "HABARADUWA" });
    write_fc(&dir.path().join("gnd_1.geojson"), vec![point(80.3, 6.0, gnd.clone())]);
    write_fc(&dir.path().join("gnd_2.geojson"), vec![point(80.3, 6.1, gnd)]);
    fs::write(dir.path().join("broken.geojson"), "oops").unwrap();

    let mut report = RunReport::new("organize");
    cli::cmd_organize(dir.path(), &mut report).unwrap();

    let district = dir.path().join("Southern").join("Galle");
    assert!(district.join("Habaraduwa").join("gnd_1.geojson").is_file());
    assert!(district.join("Habaraduwa").join("gnd_2.geojson").is_file());
    assert_eq!(feature_count(&district.join("Habaraduwa_combined.geojson")), 2);
    assert_eq!(feature_count(&district.join("Galle_combined.geojson")), 2);
    assert!(dir.path().join("uncategorized").join("broken.geojson").is_file());
    assert_eq!(report.files_failed, 1);
}

#[test]
fn test_validate_names_command() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Galle_12_345.geojson"), "{}").unwrap();
    fs::write(dir.path().join("Galle_12.geojson"), "{}").unwrap();
    fs::write(dir.path().join("readme.md"), "").unwrap();

    let mut report = RunReport::new("validate-names");
    cli::cmd_validate_names(dir.path(), &mut report).unwrap();

    assert!(dir.path().join("complete").join("Galle_12_345.geojson").is_file());
    assert!(dir.path().join("incomplete").join("Galle_12.geojson").is_file());
    assert!(dir.path().join("readme.md").is_file());
}

#[test]
fn test_lowercase_copy_command() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    fs::create_dir_all(src.path().join("Galle")).unwrap();
    fs::write(src.path().join("Galle").join("FST_Pine.GEOJSON"), "{}").unwrap();

    let mut report = RunReport::new("lowercase-copy");
    cli::cmd_lowercase_copy(src.path(), &dest.path().join("out"), &mut report).unwrap();

    assert!(dest.path().join("out").join("galle").join("fst_pine.geojson").is_file());
    assert_eq!(report.outputs_written, 1);
}
