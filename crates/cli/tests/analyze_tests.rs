// Integration tests for `rollscope analyze`.
//
// stdout from --json commands must be exactly one JSON value; all human
// output goes to stderr.

use std::path::PathBuf;
use std::process::Command;

fn rollscope() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rollscope"))
}

fn write_roll(dir: &tempfile::TempDir, name: &str, data: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, data).unwrap();
    path
}

/// Assert stdout is a single, parseable JSON value.
fn assert_single_json(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");
    serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!("stdout must be valid JSON.\nParse error: {e}\nstdout:\n{trimmed}")
    })
}

const FAMILY_ROLL: &str = "\
voter_id,name,relation_type,relation_name,house_number,age,gender,part_no
TN0000001,Mohan Kumar,S/O,Krishna Kumar,12/5,78,Male,PART-09
TN0000002,Raj Kumar,S/O,Mohan Kumar,12/5,52,Male,PART-09
TN0000003,Selvi,W/O,Raj Kumar,12/5,47,Female,PART-09
TN0000004,Anbu Chezhian,S/O,Perumal,44,61,Male,PART-09
";

#[test]
fn analyze_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    let roll = write_roll(&dir, "ward.csv", FAMILY_ROLL);

    let output = rollscope()
        .args(["analyze", roll.to_str().unwrap(), "--json"])
        .output()
        .expect("rollscope analyze --json");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert!(val["meta"]["engine_version"].is_string());
    assert_eq!(val["summary"]["households"], 2);
    assert_eq!(val["summary"]["members"], 4);
    assert_eq!(val["summary"]["flagged"], 0);
    // Mohan -> Raj and Raj -> Selvi both link
    assert_eq!(val["summary"]["links"], 2);

    let first = &val["households"][0];
    assert_eq!(first["key"]["batch"], "PART-09");
    assert_eq!(first["key"]["house"], "12/5");
    // Head is the oldest member
    assert_eq!(first["members"][0]["name"], "MOHAN KUMAR");
}

#[test]
fn analyze_dedups_repeated_voter_ids() {
    let dir = tempfile::tempdir().unwrap();
    let roll = write_roll(
        &dir,
        "dup.csv",
        "\
voter_id,name,house_number,age
A,Mohan Kumar,1,70
B,Raj Kumar,1,40
A,Mohan Kumar,1,70
C,Selvi,2,35
",
    );

    let output = rollscope()
        .args(["analyze", roll.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["summary"]["members"], 3);
}

#[test]
fn analyze_flags_unlinked_large_household() {
    let mut data = String::from("voter_id,name,relation_type,house_number,age\n");
    for i in 1..=9 {
        data.push_str(&format!("V{i},Member {i} Distinct,C/O,33,{}\n", 18 + i * 6));
    }

    let dir = tempfile::tempdir().unwrap();
    let roll = write_roll(&dir, "large.csv", &data);

    let output = rollscope()
        .args(["analyze", roll.to_str().unwrap(), "--json", "--flagged-only"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no family links"), "stderr: {stderr}");

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["households"].as_array().unwrap().len(), 1);
    let anomaly = &val["households"][0]["anomaly"];
    assert_eq!(anomaly["flagged"], true);
    assert!(anomaly["score"].as_u64().unwrap() >= 2);
    assert_eq!(val["summary"]["rule_counts"]["unlinked_large_household"], 1);
}

#[test]
fn analyze_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let roll = write_roll(&dir, "ward.csv", FAMILY_ROLL);
    let out = dir.path().join("result.json");

    let output = rollscope()
        .args([
            "analyze",
            roll.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    // Without --json, stdout stays empty
    assert!(output.stdout.is_empty());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["summary"]["households"], 2);
}

#[test]
fn analyze_respects_config_thresholds() {
    let dir = tempfile::tempdir().unwrap();
    let roll = write_roll(
        &dir,
        "gap.csv",
        "\
voter_id,name,relation_type,relation_name,house_number,age
A,Mohan Kumar,S/O,,7,30
B,Raj Kumar,S/O,Mohan Kumar,7,25
",
    );
    // Default min_parent_gap (15) flags the 5-year gap; a looser config does not
    let config = dir.path().join("loose.toml");
    std::fs::write(&config, "[anomaly]\nmin_parent_gap = 5\n").unwrap();

    let default_run = rollscope()
        .args(["analyze", roll.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    let val = assert_single_json(&String::from_utf8_lossy(&default_run.stdout));
    assert_eq!(val["summary"]["flagged"], 1);

    let loose_run = rollscope()
        .args([
            "analyze",
            roll.to_str().unwrap(),
            "--json",
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    let val = assert_single_json(&String::from_utf8_lossy(&loose_run.stdout));
    assert_eq!(val["summary"]["flagged"], 0);
}

#[test]
fn analyze_missing_file_exits_runtime_error() {
    let output = rollscope()
        .args(["analyze", "/nonexistent/ward.csv"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&output.stderr).is_empty());
}

#[test]
fn validate_accepts_and_rejects_configs() {
    let dir = tempfile::tempdir().unwrap();

    let good = dir.path().join("good.toml");
    std::fs::write(&good, "name = \"audit\"\n[linker]\nsimilarity_threshold = 0.7\n").unwrap();
    let output = rollscope()
        .args(["validate", good.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("audit"));

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "[linker]\nsimilarity_threshold = 2.0\n").unwrap();
    let output = rollscope()
        .args(["validate", bad.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}
