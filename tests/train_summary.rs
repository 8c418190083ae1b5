use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use clap::Parser;
use mountain_car::{
    cli::commands::train::{TrainArgs, execute, execute_with_visualizer},
    visualization::TerminalVisualizer,
};
use tempfile::tempdir;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn parse_args<I, T>(args: I) -> TrainArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    TrainArgs::parse_from(args)
}

fn curve_lines(path: &std::path::Path) -> Vec<Vec<f64>> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| {
            line.split_whitespace()
                .map(|field| field.parse().unwrap())
                .collect()
        })
        .collect()
}

#[test]
fn learning_curve_has_one_line_per_episode() {
    let tmp = tempdir().unwrap();
    let curve = tmp.path().join("curve.txt");

    let args = parse_args([
        "mountain-car",
        curve.to_str().unwrap(),
        "-p",
        "6",
        "-m",
        "50",
        "--seed",
        "11",
    ]);
    execute(args).expect("training should succeed");

    let lines = curve_lines(&curve);
    assert_eq!(lines.len(), 6);
    for (index, fields) in lines.iter().enumerate() {
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], (index + 1) as f64);
        assert!(fields[1] <= -1.0 && fields[1] >= -50.0);
        assert!(fields[3] >= 1.0 && fields[3] <= 50.0);
        assert_eq!(fields[1], -fields[3]);
    }
}

#[test]
fn summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let curve = tmp.path().join("curve.txt");
    let summary_stem = tmp.path().join("run_overview");

    let args = parse_args([
        "mountain-car",
        curve.to_str().unwrap(),
        "-p",
        "3",
        "-m",
        "40",
        "--seed",
        "1",
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);

    execute(args).expect("training with summary should succeed");

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );

    let contents = std::fs::read_to_string(&expected_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["config"]["episodes"], 3);
    assert_eq!(parsed["config"]["max_steps"], 40);
    assert_eq!(parsed["final_episode"]["episode"], 3);
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let curve = tmp.path().join("curve.txt");
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}{}", summary_dir.display(), std::path::MAIN_SEPARATOR);

    let args = parse_args([
        "mountain-car",
        curve.to_str().unwrap(),
        "-p",
        "2",
        "-m",
        "30",
        "--summary",
        summary_arg.as_str(),
    ]);

    execute(args).expect("training with summary directory should succeed");

    let expected_path = summary_dir.join("training_summary.json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );
}

#[test]
fn observations_record_every_episode_of_every_trial() {
    let tmp = tempdir().unwrap();
    let curve = tmp.path().join("curve.txt");
    let observations = tmp.path().join("episodes.jsonl");

    let args = parse_args([
        "mountain-car",
        curve.to_str().unwrap(),
        "-t",
        "3",
        "-p",
        "4",
        "-m",
        "25",
        "--seed",
        "8",
        "--progress",
        "false",
        "--observations",
        observations.to_str().unwrap(),
    ]);
    execute(args).expect("training with observations should succeed");

    let contents = std::fs::read_to_string(&observations).unwrap();
    let records: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 12);
    assert_eq!(records[0]["trial"], 1);
    assert_eq!(records[0]["episode"], 1);
    assert_eq!(records[11]["trial"], 3);
    assert_eq!(records[11]["episode"], 4);

    // Several trials still yield one averaged line per episode
    assert_eq!(curve_lines(&curve).len(), 4);
}

#[test]
fn display_with_several_trials_runs_headless() {
    let tmp = tempdir().unwrap();
    let curve = tmp.path().join("curve.txt");

    let args = parse_args([
        "mountain-car",
        curve.to_str().unwrap(),
        "-t",
        "2",
        "-p",
        "2",
        "-m",
        "20",
        "-d",
        "1",
        "--progress",
        "false",
    ]);
    execute(args).expect("display request should not abort training");
    assert_eq!(curve_lines(&curve).len(), 2);
}

#[test]
fn failed_display_init_falls_back_to_headless() {
    let tmp = tempdir().unwrap();
    let curve = tmp.path().join("curve.txt");

    let args = parse_args([
        "mountain-car",
        curve.to_str().unwrap(),
        "-t",
        "1",
        "-p",
        "3",
        "-m",
        "30",
        "-d",
        "1",
    ]);
    // Too narrow to draw, so initialisation fails
    let visualizer = TerminalVisualizer::new(Box::new(io::sink()), 4);
    execute_with_visualizer(args, Box::new(visualizer))
        .expect("display failure should not abort training");

    let lines = curve_lines(&curve);
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|fields| fields.len() == 4));
}

#[test]
fn display_draws_selected_episodes() {
    let tmp = tempdir().unwrap();
    let curve = tmp.path().join("curve.txt");
    let frames = SharedBuffer::default();

    let args = parse_args([
        "mountain-car",
        curve.to_str().unwrap(),
        "-p",
        "2",
        "-m",
        "10",
        "-d",
        "1",
    ]);
    let visualizer = TerminalVisualizer::new(Box::new(frames.clone()), 30);
    execute_with_visualizer(args, Box::new(visualizer)).expect("training with display");

    let text = String::from_utf8(frames.0.lock().unwrap().clone()).unwrap();
    assert!(text.matches('\r').count() > 1);
    assert!(text.ends_with('\n'));
    assert_eq!(curve_lines(&curve).len(), 2);
}

#[test]
fn unwritable_output_file_is_an_error() {
    let tmp = tempdir().unwrap();
    let curve = tmp.path().join("missing").join("curve.txt");

    let args = parse_args(["mountain-car", curve.to_str().unwrap(), "-p", "1"]);
    let err = execute(args).unwrap_err();
    assert!(err.to_string().contains("failed to open output file"));
    assert!(!curve.exists());
}

#[test]
fn invalid_parameters_are_rejected() {
    let tmp = tempdir().unwrap();
    let curve = tmp.path().join("curve.txt");

    let args = parse_args(["mountain-car", curve.to_str().unwrap(), "-p", "0"]);
    assert!(execute(args).is_err());
    assert!(!curve.exists());
}
