//! CommandSigner tests against real subprocesses
//!
//! Each test writes a small shell script standing in for the signer binary,
//! so the full argv contract and exit-status handling are exercised without
//! any real key material.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

use mina_sender::{CommandSigner, PipelineError, TransactionSigner};

/// Write an executable script into `dir` and return its path
fn write_script(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("signer.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn test_sign_passes_expected_argv_and_trims_output() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        r#"[ "$1" = "sign" ] || exit 2
[ "$2" = "-private-key" ] || exit 2
[ "$4" = "-unsigned-transaction" ] || exit 2
echo "SIG:$3:$5""#,
    );

    let signer = CommandSigner::new(script.to_str().unwrap(), Duration::from_secs(5));
    let signature = signer.sign("UNSIGNED_BLOB", "SECRET_KEY").await.unwrap();
    assert_eq!(signature, "SIG:SECRET_KEY:UNSIGNED_BLOB");
}

#[tokio::test]
async fn test_nonzero_exit_surfaces_stderr() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, r#"echo "invalid private key" >&2; exit 1"#);

    let signer = CommandSigner::new(script.to_str().unwrap(), Duration::from_secs(5));
    let err = signer.sign("U", "K").await.unwrap_err();
    match err {
        PipelineError::Signing(reason) => {
            assert!(reason.contains("invalid private key"));
        }
        other => panic!("expected Signing error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_output_is_a_signing_failure() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "exit 0");

    let signer = CommandSigner::new(script.to_str().unwrap(), Duration::from_secs(5));
    let err = signer.sign("U", "K").await.unwrap_err();
    assert!(matches!(err, PipelineError::Signing(_)));
}

#[tokio::test]
async fn test_missing_binary_is_a_signing_failure() {
    let signer = CommandSigner::new("/nonexistent/signer-binary", Duration::from_secs(5));
    let err = signer.sign("U", "K").await.unwrap_err();
    assert!(matches!(err, PipelineError::Signing(_)));
}

#[tokio::test]
async fn test_hung_signer_times_out() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "sleep 30");

    let signer = CommandSigner::new(script.to_str().unwrap(), Duration::from_millis(200));
    let err = signer.sign("U", "K").await.unwrap_err();
    match err {
        PipelineError::Timeout { step } => assert_eq!(step.name(), "sign"),
        other => panic!("expected Timeout, got {other:?}"),
    }
}
