use std::fs;
use std::process::Command;

fn sql2hg() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sql2hg"));
    cmd.env_remove("SQL2HG_DIALECT").env_remove("SQL2HG_OUT_DIR");
    cmd
}

#[test]
fn test_cli_writes_hg_and_map_files() {
    let dir = tempfile::tempdir().unwrap();
    let query = dir.path().join("q1.sql");
    fs::write(&query, "SELECT * FROM R, S, T, U WHERE R.a = S.b AND T.c = U.d").unwrap();
    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();

    let output = sql2hg()
        .arg(&query)
        .arg("--out-dir")
        .arg(&out_dir)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tables: [R, S, T, U]"));
    assert!(stdout.contains("Joins: [R.a = S.b, T.c = U.d]"));

    assert_eq!(
        fs::read_to_string(out_dir.join("q1.hg")).unwrap(),
        "R(v0)\nS(v0)\nT(v1)\nU(v1)\n"
    );
    assert_eq!(
        fs::read_to_string(out_dir.join("q1.map")).unwrap(),
        "v0=R.a,S.b\nv1=T.c,U.d\n"
    );
}

#[test]
fn test_cli_json_without_files() {
    let dir = tempfile::tempdir().unwrap();
    let query = dir.path().join("q2.sql");
    fs::write(&query, "SELECT * FROM R JOIN S ON R.a = S.a").unwrap();

    let output = sql2hg()
        .arg(&query)
        .args(["--json", "--no-write", "--dialect", "postgres"])
        .arg("--out-dir")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["tables"], serde_json::json!(["R", "S"]));
    assert!(!dir.path().join("q2.hg").exists());
    assert!(!dir.path().join("q2.map").exists());
}

#[test]
fn test_cli_fails_without_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let query = dir.path().join("bad.sql");
    fs::write(&query, "SELECT * FROM R, S WHERE R.a = Q.b").unwrap();

    let output = sql2hg()
        .arg(&query)
        .arg("--out-dir")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown table 'Q'"));
    assert!(!dir.path().join("bad.hg").exists());
    assert!(!dir.path().join("bad.map").exists());
}
