//! Runs unit tests with different feature flags.
//!
//! The `serde` impls are compiled into unit tests unconditionally, so the feature itself needs a
//! separate run to check that the library builds with it enabled.

use std::{env, ffi::OsString, process::Command};

fn test(args: &[&str]) {
    let cargo = env::var_os("CARGO").unwrap_or_else(|| OsString::from("cargo"));
    let output = Command::new(cargo)
        .args(&["test", "-p", "tabmap", "--lib"]) // avoid infinite recursion
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "cargo exited with error code {:?}. stderr:\n{}\nstdout: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr),
        String::from_utf8_lossy(&output.stdout),
    );
}

#[test]
fn serde() {
    test(&["--features", "serde"]);
}
