// Load delimited data from disk, train, and score the held-out split.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use ferrite_mlp::data::{load_delimited, CsvOptions};
use ferrite_mlp::{regression_errors, train_loop, Error, Metric, Network, RunConfig, Strategy};

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ferrite-mlp-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

fn quality_csv(rows: usize) -> String {
    let mut text = String::from("\"a\";\"b\";\"quality\"\n");
    for i in 0..rows {
        let a = (i % 10) as f64 / 10.0;
        let b = ((i * 7) % 10) as f64 / 10.0;
        let quality = 1 + (a * 9.0).round() as usize;
        text.push_str(&format!("{a};{b};{quality}\n"));
    }
    text
}

#[test]
fn load_train_and_evaluate() {
    let train_path = write_temp("train.csv", &quality_csv(60));
    let test_path = write_temp("test.csv", &quality_csv(20));

    let run = RunConfig {
        layer_sizes: vec![2, 4, 1],
        learning_rate: 1.0,
        batch_size: 10,
        epochs: 200,
        strategy: Strategy::Concurrent,
        seed: Some(11),
        workers: Some(2),
        ..RunConfig::default()
    };
    run.validate().unwrap();

    let train = load_delimited(&train_path, &run.csv).unwrap();
    let test = load_delimited(&test_path, &run.csv).unwrap();
    assert_eq!(train.inputs.dims(), (60, 2));
    assert!(train.targets.as_slice().iter().all(|t| (0.0..=1.0).contains(t)));

    let mut rng = run.rng();
    let mut network = Network::new(&run.layer_sizes, &mut rng).unwrap();
    let before = regression_errors(&network, &test.inputs, &test.targets).unwrap();
    train_loop(&mut network, &train.inputs, &train.targets, &run.train_config(), &mut rng).unwrap();
    let after = regression_errors(&network, &test.inputs, &test.targets).unwrap();

    assert!(after.mse.is_finite() && after.mae.is_finite());
    assert!(after.mse < before.mse, "mse went from {} to {}", before.mse, after.mse);

    std::fs::remove_file(train_path).ok();
    std::fs::remove_file(test_path).ok();
}

#[test]
fn bad_data_stops_before_training() {
    let path = write_temp("broken.csv", "a;b\n1;2\n3;oops\n");
    let err = load_delimited(&path, &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Data(_)));
    assert!(err.to_string().contains("oops"));
    std::fs::remove_file(path).ok();
}

#[test]
fn wrong_target_width_is_rejected_up_front() {
    let path = write_temp("wide.csv", "1;0;1\n0;1;0\n");
    let options = CsvOptions { target_cols: 2, ..CsvOptions::default() };
    let data = load_delimited(&path, &options).unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let mut network = Network::new(&[1, 3, 1], &mut rng).unwrap();
    let before = network.clone();
    let config = RunConfig { batch_size: 1, ..RunConfig::default() }.train_config();
    let err = train_loop(&mut network, &data.inputs, &data.targets, &config, &mut rng).unwrap_err();

    assert!(matches!(err, Error::DimensionMismatch { op: "network_output", .. }));
    assert_eq!(network, before);
    std::fs::remove_file(path).ok();
}

#[test]
fn run_config_survives_save_and_load() {
    let path = std::env::temp_dir().join(format!("ferrite-mlp-{}-run.json", std::process::id()));
    let config = RunConfig {
        layer_sizes: vec![4, 8, 3],
        learning_rate: 0.125,
        batch_size: 16,
        epochs: 12,
        strategy: Strategy::Sequential,
        seed: Some(5),
        workers: Some(2),
        train_path: Some(PathBuf::from("train.csv")),
        test_path: None,
        csv: CsvOptions { delimiter: ',', has_header: Some(false), target_cols: 3, ..CsvOptions::default() },
        metric: Metric::Accuracy,
    };

    config.save_json(&path).unwrap();
    let loaded = RunConfig::load_json(&path).unwrap();
    assert_eq!(loaded, config);

    std::fs::remove_file(path).ok();
}

#[test]
fn unreadable_config_is_invalid() {
    let path = write_temp("broken.json", "{ \"layer_sizes\": [2, ");
    assert!(matches!(RunConfig::load_json(&path), Err(Error::InvalidConfig(_))));
    assert!(matches!(
        RunConfig::load_json("/definitely/not/here.json"),
        Err(Error::InvalidConfig(_))
    ));
    std::fs::remove_file(path).ok();
}
