use std::io::Write;
use std::process::{Command, Output};

const ENV_VARS: [&str; 6] = [
    "MCMM_CORES",
    "MCMM_MAT_SIZE",
    "MCMM_COORDINATOR",
    "MCMM_TIMEOUT_MS",
    "MCMM_CACHE_MODEL",
    "RUST_LOG",
];

fn mcmm(args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mcmm"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.args(args).envs(env.iter().copied());
    cmd.output().expect("failed to run mcmm")
}

fn stdout(out: &Output) -> String {
    assert!(
        out.status.success(),
        "mcmm failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout.clone()).unwrap()
}

#[test]
fn test_run_prints_product_and_timing() {
    let out = stdout(&mcmm(&["run", "--cores", "2", "--mat-size", "4"], &[]));
    assert!(
        out.starts_with("0123\n4567\n89ab\ncdef\n\nExecution time for 2 cores is "),
        "{out}"
    );
    assert!(out.ends_with(" clock cycles\n"), "{out}");
}

#[test]
fn test_flag_beats_env() {
    let out = stdout(&mcmm(
        &["run", "--cores", "2", "--mat-size", "8"],
        &[("MCMM_CORES", "4")],
    ));
    assert!(out.contains("for 2 cores"), "{out}");
}

#[test]
fn test_env_beats_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "cores = 8\nmat-size = 16").unwrap();
    let path = file.path().to_str().unwrap();

    let out = stdout(&mcmm(&["run", "--config", path], &[("MCMM_CORES", "4")]));
    assert!(out.contains("for 4 cores"), "{out}");
    assert_eq!(out.lines().count(), 16 + 2);

    let out = stdout(&mcmm(&["run", "--config", path], &[]));
    assert!(out.contains("for 8 cores"), "{out}");
}

#[test]
fn test_json_summary() {
    let out = stdout(&mcmm(
        &[
            "run",
            "--cores",
            "4",
            "--cache-model",
            "write-back",
            "--timeout-ms",
            "30000",
            "--json",
        ],
        &[],
    ));
    let summary: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(summary["cores"], 4);
    assert_eq!(summary["mat_size"], 104);
    assert_eq!(summary["cache_model"], "write-back");
    assert_eq!(summary["timeout_ms"], 30000);
    assert_eq!(summary["verified"], true);
}

#[test]
fn test_invalid_configuration_exits_with_error() {
    let out = mcmm(&["run", "--cores", "3"], &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.starts_with("Error: "), "{err}");
    assert!(err.contains("not divisible"), "{err}");
}

#[test]
fn test_oversized_matrix_is_a_configuration_error() {
    let out = mcmm(&["run", "--cores", "1", "--mat-size", "4294967296"], &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.starts_with("Error: "), "{err}");
    assert!(err.contains("too large"), "{err}");
    assert!(!err.contains("panicked"), "{err}");
}

#[test]
fn test_partition_table() {
    let out = stdout(&mcmm(
        &["partition", "--cores", "4", "--coordinator", "1"],
        &[],
    ));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "104x104 matrix over 4 cores (26 rows each)");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].contains("peer") && lines[1].ends_with("rows 0..26"));
    assert!(lines[2].contains("coordinator") && lines[2].ends_with("rows 26..52"));
    assert!(lines[4].ends_with("rows 78..104"));
}
