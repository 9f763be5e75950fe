//! Integration tests for rayo-bench
//!
//! Runs the real binary over small sweeps

use std::process::Command;

/// Helper to run the rayo-bench binary with a clean environment
fn run_bench(args: &[&str], env: &[(&str, &str)]) -> std::process::Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rayo-bench"));
    cmd.args(args)
        .env_remove("RAYO_LOOPS")
        .env_remove("RAYO_INCX")
        .env_remove("RAYO_INCY")
        .env_remove("OMP_NUM_THREADS");
    for (k, v) in env {
        cmd.env(k, v);
    }
    cmd.output().expect("Failed to run rayo-bench")
}

/// B001: `rayo-bench --help` lists the options
#[test]
fn b001_help_shows_options() {
    let output = run_bench(&["--help"], &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Help should succeed");
    for flag in ["--loops", "--incx", "--incy", "--precision", "--backend", "--seed"] {
        assert!(stdout.contains(flag), "Should show {flag}");
    }
    assert!(stdout.contains("RAYO_LOOPS"), "Should show env override");
}

/// B002: linear sweep writes one CSV row per size
#[test]
fn b002_linear_sweep_rows() {
    let output = run_bench(&["100", "300", "100", "--seed", "1"], &[]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let sizes: Vec<usize> = stdout
        .lines()
        .map(|line| line.split(',').next().unwrap().trim().parse().unwrap())
        .collect();
    assert_eq!(sizes, vec![100, 200, 300]);

    for line in stdout.lines() {
        let mflops: f64 = line.split(',').nth(1).unwrap().trim().parse().unwrap();
        assert!(mflops > 0.0, "MFLOP/s should be positive: {line}");
    }
}

/// B003: header on stderr reflects environment overrides
#[test]
fn b003_env_overrides_in_header() {
    let output = run_bench(
        &["16", "32", "16", "--precision", "single"],
        &[("RAYO_LOOPS", "3"), ("RAYO_INCX", "2"), ("RAYO_INCY", "3")],
    );
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("From :  16  To :  32 Step =  16 Inc_x = 2 Inc_y = 3 Loops = 3"),
        "unexpected header: {stderr}"
    );
    assert_eq!(stderr.matches("MFlops").count(), 2);
}

/// B004: thread count is echoed as the first CSV column
#[test]
fn b004_thread_count_prefix() {
    let output = run_bench(&["8", "8", "1"], &[("OMP_NUM_THREADS", "4")]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("4,     8,"), "unexpected row: {stdout}");
}

/// B005: a zero step fails with a message
#[test]
fn b005_zero_step_fails() {
    let output = run_bench(&["1", "10", "0"], &[]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("step"), "Should explain the failure: {stderr}");
}

/// B006: zero loops fails with a message
#[test]
fn b006_zero_loops_fails() {
    let output = run_bench(&["1", "10", "1"], &[("RAYO_LOOPS", "0")]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("loop"));
}

/// B007: scalar backend is always selectable
#[test]
fn b007_scalar_backend() {
    let output = run_bench(&["64", "64", "1", "--backend", "scalar"], &[]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 1);
}
