//! Data-file layout tests.
//!
//! A short run writes real files into a scratch directory; the files are
//! parsed back and checked against the documented layouts.

mod common;

use std::path::PathBuf;

use breakthrough_rs::output::{plot_breakthrough_curves, DataSink};
use breakthrough_rs::simulation::Breakthrough;

fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("breakthrough_rs_{}_{}", tag, std::process::id()))
}

/// Runs a 20-step, write-every-5 simulation into `dir` and returns the sink.
fn short_run(dir: &PathBuf) -> DataSink {
    let mut config = common::weak_sorbate(5, 0.1, 20, 5.0e-4, 0.5);
    config.write_every = 5;
    let mut sim = Breakthrough::new(config).unwrap();
    let mut sink = DataSink::create(dir, sim.config()).unwrap();
    sim.run(Some(&mut sink)).unwrap();
    sink
}

#[test]
fn test_component_files_have_three_columns_and_monotone_time() {
    let dir = scratch_dir("component");
    let _sink = short_run(&dir);

    for name in ["component_0_He.data", "component_1_CO2.data"] {
        let content = std::fs::read_to_string(dir.join(name)).unwrap();
        let mut previous_tau = f64::NEG_INFINITY;
        let mut lines = 0;
        for line in content.lines() {
            let fields: Vec<f64> =
                line.split_whitespace().map(|f| f.parse().unwrap()).collect();
            assert_eq!(fields.len(), 3, "{name}: expected 3 columns, got {line:?}");
            assert!(fields.iter().all(|v| v.is_finite()));
            assert!(fields[0] > previous_tau, "{name}: τ must increase");
            previous_tau = fields[0];
            lines += 1;
        }
        // steps 0, 5, 10, 15 were logged
        assert_eq!(lines, 4, "{name}: one line per logged step");
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_column_file_layout() {
    let dir = scratch_dir("column");
    let _sink = short_run(&dir);

    let content = std::fs::read_to_string(dir.join("column.data")).unwrap();
    let nc = 2;
    let fields_per_line = 3 + 6 * nc;

    let header_lines: Vec<&str> =
        content.lines().filter(|l| l.starts_with('#')).collect();
    assert_eq!(
        header_lines.len(),
        fields_per_line,
        "one self-documenting header comment per column"
    );
    assert!(header_lines[0].contains("column position"));
    assert!(header_lines[2].contains("total pressure"));

    let data_lines: Vec<&str> = content
        .lines()
        .filter(|l| !l.starts_with('#') && !l.trim().is_empty())
        .collect();
    // 4 logged frames, 6 nodes each (Ng = 5)
    assert_eq!(data_lines.len(), 4 * 6);

    for line in &data_lines {
        let fields: Vec<f64> =
            line.split_whitespace().map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields.len(), fields_per_line);
    }

    // first node of a frame sits at z = 0, last at z = L
    let first: Vec<f64> =
        data_lines[0].split_whitespace().map(|f| f.parse().unwrap()).collect();
    let last: Vec<f64> =
        data_lines[5].split_whitespace().map(|f| f.parse().unwrap()).collect();
    assert_eq!(first[0], 0.0);
    assert!((last[0] - 1.0).abs() < 1e-12, "outlet node at z = L");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_frames_are_separated_by_blank_lines() {
    let dir = scratch_dir("frames");
    let _sink = short_run(&dir);

    let content = std::fs::read_to_string(dir.join("column.data")).unwrap();
    // gnuplot index convention: two blank lines between frames
    let frames: Vec<&str> = content
        .split("\n\n\n")
        .filter(|block| block.lines().any(|l| !l.trim().is_empty() && !l.starts_with('#')))
        .collect();
    assert_eq!(frames.len(), 4, "expected 4 logged frames");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_history_matches_component_files() {
    let dir = scratch_dir("history");
    let sink = short_run(&dir);

    let history = sink.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].len(), 4);

    let content = std::fs::read_to_string(dir.join("component_1_CO2.data")).unwrap();
    for (line, &(tau, normalized)) in content.lines().zip(history[1].iter()) {
        let fields: Vec<f64> = line.split_whitespace().map(|f| f.parse().unwrap()).collect();
        assert!((fields[0] - tau).abs() < 1e-12);
        assert!((fields[2] - normalized).abs() < 1e-12);
    }

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_plot_rejects_empty_history() {
    let err = plot_breakthrough_curves(&[], &[], "empty", scratch_dir("plot").join("x.png"));
    assert!(err.is_err());
}
