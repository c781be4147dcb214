use assert_approx_eq::assert_approx_eq;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use usage_forecast::{resolve_parameters, run_algorithm, Algorithm, DataLoader, ForecastError};

fn write_usage(dir: &Path, records: Value) -> std::path::PathBuf {
    let path = dir.join("usage.json");
    fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();
    path
}

fn run_files(algorithm: Algorithm, data: &Path, output: &Path, parameters: &Path) -> Value {
    let parameters = resolve_parameters(&algorithm.default_parameters(), parameters);
    let records = DataLoader::from_path(data).unwrap();
    let document = run_algorithm(algorithm, &parameters, &records).unwrap();
    document.write_to_file(output, true).unwrap();

    serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap()
}

#[test]
fn test_linear_end_to_end() {
    let dir = TempDir::new().unwrap();
    let data = write_usage(
        dir.path(),
        json!([
            {"municipal": "100", "usageType": "household", "date": "2020-01-01T00:00:00Z", "amount": 50.0},
            {"municipal": "100", "usageType": "household", "date": "2021-01-01T00:00:00Z", "amount": 60.0},
            {"municipal": "100", "usageType": "household", "date": "2022-01-01T00:00:00Z", "amount": 70.0}
        ]),
    );
    let parameter_file = dir.path().join("parameters.json");
    fs::write(&parameter_file, r#"{"size": 2, "degree": 1}"#).unwrap();
    let output = dir.path().join("output.json");

    let document = run_files(Algorithm::Linear, &data, &output, &parameter_file);

    let points = document["data"].as_array().unwrap();
    assert_eq!(points.len(), 5);
    assert_eq!(points[0], json!({"label": 100, "x": 2020, "y": 50.0}));

    assert_eq!(points[3]["x"], json!(2023));
    assert_approx_eq!(points[3]["y"].as_f64().unwrap(), 80.0, 1e-6);
    assert_eq!(points[4]["x"], json!(2024));
    assert_approx_eq!(points[4]["y"].as_f64().unwrap(), 90.0, 1e-6);

    let meta = &document["meta"]["100"];
    assert_approx_eq!(meta["rScore"].as_f64().unwrap(), 1.0, 1e-9);
    assert_eq!(meta["realDataUntil"], json!(2022));
    assert!(meta["curve"].as_str().unwrap().contains("x"));
}

#[test]
fn test_absent_parameter_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let data = write_usage(
        dir.path(),
        json!([
            {"municipal": 7, "usageType": "household", "date": "2018-05-01", "amount": 10.0},
            {"municipal": 7, "usageType": "household", "date": "2019-05-01", "amount": 12.0},
            {"municipal": 7, "usageType": "household", "date": "2020-05-01", "amount": 15.0}
        ]),
    );
    let output = dir.path().join("output.json");

    let document = run_files(
        Algorithm::Linear,
        &data,
        &output,
        &dir.path().join("does-not-exist.json"),
    );

    // Default size is 30 forecast years on top of 3 observations
    assert_eq!(document["data"].as_array().unwrap().len(), 33);
    assert_eq!(document["meta"]["7"]["realDataUntil"], json!(2020));
}

#[test]
fn test_every_algorithm_emits_unique_years_per_group() {
    let records: Vec<Value> = (2005..2021)
        .flat_map(|year| {
            let offset = f64::from(year - 2005);
            vec![
                json!({
                    "municipal": "0301",
                    "usageType": "a",
                    "date": format!("{}-02-01", year),
                    "amount": 200.0 + 3.0 * offset
                }),
                json!({
                    "municipal": "Bergen",
                    "usageType": "b",
                    "date": format!("{}-07-01", year),
                    "amount": 90.0 + 5.0 * (offset + 1.0).ln() + offset % 3.0
                }),
            ]
        })
        .collect();

    let dir = TempDir::new().unwrap();
    let data = write_usage(dir.path(), Value::Array(records));
    let parameter_file = dir.path().join("parameters.json");
    fs::write(&parameter_file, r#"{"size": 4}"#).unwrap();

    for algorithm in Algorithm::ALL {
        let output = dir.path().join(format!("{}.json", algorithm));
        let document = run_files(algorithm, &data, &output, &parameter_file);
        let points = document["data"].as_array().unwrap();

        for label in ["0301", "Bergen"] {
            let years: Vec<i64> = points
                .iter()
                .filter(|point| point["label"] == json!(label))
                .map(|point| point["x"].as_i64().unwrap())
                .collect();
            let unique: HashSet<_> = years.iter().collect();

            assert_eq!(years.len(), 16 + 4, "{} {}", algorithm, label);
            assert_eq!(unique.len(), years.len(), "{} {}", algorithm, label);
            assert!(years.windows(2).all(|pair| pair[0] < pair[1]));
        }

        assert_eq!(
            document["meta"].as_object().unwrap().keys().collect::<Vec<_>>(),
            vec!["0301", "Bergen"]
        );
    }
}

#[test]
fn test_group_by_usage_type() {
    let dir = TempDir::new().unwrap();
    let data = write_usage(
        dir.path(),
        json!([
            {"municipal": "1", "usageType": "industry", "date": "2019-01-01", "amount": 5.0},
            {"municipal": "2", "usageType": "industry", "date": "2019-06-01", "amount": 5.0},
            {"municipal": "1", "usageType": "industry", "date": "2020-01-01", "amount": 8.0},
            {"municipal": "2", "usageType": "industry", "date": "2020-06-01", "amount": 8.0}
        ]),
    );
    let parameter_file = dir.path().join("parameters.json");
    fs::write(&parameter_file, r#"{"groupBy": "usageType", "size": 1}"#).unwrap();
    let output = dir.path().join("output.json");

    let document = run_files(Algorithm::Linear, &data, &output, &parameter_file);

    let points = document["data"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0], json!({"label": "industry", "x": 2019, "y": 10.0}));
    assert_approx_eq!(points[2]["y"].as_f64().unwrap(), 22.0, 1e-6);
}

#[test]
fn test_oversized_forecast_is_rejected() {
    let dir = TempDir::new().unwrap();
    let data = write_usage(
        dir.path(),
        json!([
            {"municipal": "1", "usageType": "x", "date": "2019-01-01", "amount": 5.0},
            {"municipal": "1", "usageType": "x", "date": "2020-01-01", "amount": 6.0}
        ]),
    );
    let parameter_file = dir.path().join("parameters.json");
    fs::write(&parameter_file, r#"{"size": 18446744073709551615}"#).unwrap();

    let parameters = resolve_parameters(&Algorithm::Linear.default_parameters(), &parameter_file);
    let records = DataLoader::from_path(&data).unwrap();

    for algorithm in Algorithm::ALL {
        match run_algorithm(algorithm, &parameters, &records) {
            Err(ForecastError::InvalidParameter(message)) => assert!(message.contains("size")),
            other => panic!("{}: expected invalid size, got {:?}", algorithm, other),
        }
    }
}

#[test]
fn test_group_failure_aborts_run() {
    let dir = TempDir::new().unwrap();
    let data = write_usage(
        dir.path(),
        json!([
            {"municipal": "9", "usageType": "x", "date": "2019-01-01", "amount": 5.0},
            {"municipal": "9", "usageType": "x", "date": "2020-01-01", "amount": 6.0}
        ]),
    );

    let records = DataLoader::from_path(&data).unwrap();
    let parameters = Algorithm::Cubic.default_parameters();
    let err = run_algorithm(Algorithm::Cubic, &parameters, &records).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("9"));
    assert!(message.contains("4 yearly points required"));
}
