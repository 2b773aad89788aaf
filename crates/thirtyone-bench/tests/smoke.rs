use std::fs;
use std::path::Path;

use thirtyone_bench::config::SimulationConfig;
use thirtyone_bench::runner::SimulationRunner;

fn load_config(records_dir: &Path, seed: u64) -> SimulationConfig {
    let yaml = format!(
        r#"
table:
  player_count: 3
  hero_id: 0
  threshold: 22
samples:
  count: 40
  seed: {seed}
outputs:
  records_dir: "{records}"
"#,
        records = records_dir.display()
    );

    let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

#[test]
fn identical_runs_write_identical_csv() {
    let dir_a = tempfile::tempdir().expect("temp dir");
    let dir_b = tempfile::tempdir().expect("temp dir");

    let run_a = SimulationRunner::new(load_config(dir_a.path(), 4242), 0)
        .expect("runner")
        .run()
        .expect("run");
    let run_b = SimulationRunner::new(load_config(dir_b.path(), 4242), 0)
        .expect("runner")
        .run()
        .expect("run");

    let path_a = run_a.records_path.expect("csv written");
    let path_b = run_b.records_path.expect("csv written");
    assert_eq!(path_a, dir_a.path().join("0.csv"));

    let bytes_a = fs::read(&path_a).expect("readable");
    let bytes_b = fs::read(&path_b).expect("readable");
    assert_eq!(bytes_a, bytes_b);
    assert_eq!(run_a.summary, run_b.summary);

    let text = String::from_utf8(bytes_a).expect("utf8");
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("winner,turns,0_hand,0_val,1_hand,1_val,2_hand,2_val")
    );
    let rows: Vec<_> = lines.collect();
    assert_eq!(rows.len(), 40);
    for row in rows {
        let fields: Vec<_> = row.split(',').collect();
        assert_eq!(fields.len(), 8, "{row}");
        let winner: usize = fields[0].parse().expect("winner column");
        assert!(winner < 3);
        let _turns: usize = fields[1].parse().expect("turns column");
        for seat in 0..3 {
            assert_eq!(fields[2 + seat * 2].split(' ').count(), 3, "{row}");
            let value: u8 = fields[3 + seat * 2].parse().expect("value column");
            assert!((2..=31).contains(&value));
        }
    }
}

#[test]
fn repeated_runs_number_files_and_write_summaries() {
    let dir = tempfile::tempdir().expect("temp dir");

    let first = SimulationRunner::new(load_config(dir.path(), 1), 0)
        .expect("runner")
        .run()
        .expect("run");
    let second = SimulationRunner::new(load_config(dir.path(), 2), 0)
        .expect("runner")
        .run()
        .expect("run");

    assert_eq!(first.records_path, Some(dir.path().join("0.csv")));
    assert_eq!(second.records_path, Some(dir.path().join("1.csv")));
    assert_eq!(first.summary_path, Some(dir.path().join("0.summary.json")));
    assert!(dir.path().join("1.summary.json").exists());

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("0.summary.json")).unwrap())
            .expect("summary json");
    assert_eq!(summary["trials"], 40);
    assert_eq!(summary["seed"], 1);
}

#[test]
fn fallback_seed_applies_only_without_configured_seed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = load_config(dir.path(), 9);
    let runner = SimulationRunner::new(config.clone(), 1234).expect("runner");
    assert_eq!(runner.params().seed, 9);

    config.samples.seed = None;
    let runner = SimulationRunner::new(config, 1234).expect("runner");
    assert_eq!(runner.params().seed, 1234);
}

#[test]
fn invalid_parameters_fail_before_running() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = load_config(dir.path(), 9);
    config.table.hero_id = 5;
    assert!(config.validate().is_err());
    assert!(SimulationRunner::new(config, 0).is_err());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
