//! End-to-end tests: batch files through generation, lowering and the CLI

use padder_lower::{lower, Endianness};
use padder_topology::{BatchConfig, Topology};
use std::io::Write;
use std::process::Command;

const BATCH: &str = r#"
bit_widths = [8, 16]
big_endian = true

[[topology]]
kind = "ladner_fischer"
levels = 2

[[topology]]
kind = "knowles"
max_wiring = 4

[[topology]]
kind = "rcbk"
"#;

fn batch_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(BATCH.as_bytes()).unwrap();
    file
}

fn padder() -> Command {
    Command::new(env!("CARGO_BIN_EXE_padder"))
}

#[test]
fn test_batch_pipeline() {
    let file = batch_file();
    let config = BatchConfig::load(file.path()).unwrap();
    assert!(config.big_endian);
    assert_eq!(config.jobs().count(), 6);

    for (width, topology) in config.jobs() {
        let matrix = topology.generate(width).unwrap();
        assert!(matrix.verify().is_ok(), "{} at {} bits", topology, width);

        let dag = lower(&matrix, Endianness::Big);
        let max = (1u128 << width) - 1;
        for (a, b) in [(0, 0), (max, 1), (max, max), (0x5a, 0xa5)] {
            assert_eq!(dag.simulate(a, b).unwrap(), a + b);
        }
    }
}

#[test]
fn test_cli_show_sklansky() {
    let output = padder()
        .args(["show", "sk", "-w", "8"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("0   2   4   6 \n  1 1     5 5 \n      3 3 3 3 \n"));
    assert!(stdout.contains("nodes:      12"));
}

#[test]
fn test_cli_lower_writes_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ks4.json");
    let status = padder()
        .args(["lower", "kogge-stone", "-w", "4", "-o"])
        .arg(&path)
        .status()
        .unwrap();
    assert!(status.success());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 24);
    assert_eq!(items[0], serde_json::json!([0, 4, "AND"]));
    assert_eq!(items[23], serde_json::json!([12, 28, 29, 30, 25]));
}

#[test]
fn test_cli_batch() {
    let file = batch_file();
    let output = padder().arg("batch").arg(file.path()).output().unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 6);
    assert_eq!(reports[0]["topology"]["kind"], "ladner_fischer");
    assert_eq!(reports[1]["topology"]["max_wiring"], 4);
    assert!(reports.iter().all(|r| r["metrics"]["error"] == 0));
}

#[test]
fn test_cli_rejects_bad_shapes() {
    let output = padder()
        .args(["show", "knowles", "-w", "16", "--max-fanout", "4", "--max-wiring", "4"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let output = padder()
        .args(["show", "wallace", "-w", "16"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown topology"));

    let output = padder()
        .args(["show", "lf", "-w", "16", "--levels", "0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_topology_survey_ordering() {
    // Kogge-Stone has the lowest delay and Ripple-Carry the fewest nodes
    let width = 32;
    let ks = Topology::KoggeStone.generate(width).unwrap();
    let rca = Topology::RippleCarry.generate(width).unwrap();
    for kind in padder_topology::registry::kinds() {
        let matrix = kind.default_topology().generate(width).unwrap();
        assert!(matrix.active_level_count() >= ks.active_level_count());
        assert!(matrix.node_count() >= rca.node_count());
    }
}
