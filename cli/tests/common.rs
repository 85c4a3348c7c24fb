//! # LookAroun CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test runs
//! the compiled `lookaroun` binary inside a throwaway workspace so that no
//! user or project configuration on the machine leaks into the result.
//!

// Not every test file uses every helper.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// # Get LookAroun Command (`lookaroun_cmd`)
///
/// Returns an `assert_cmd::Command` for the compiled `lookaroun` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn lookaroun_cmd() -> Command {
    Command::cargo_bin("lookaroun").expect("Failed to find lookaroun binary for testing")
}

/// Creates an empty workspace: a directory with a `.git` marker, so the
/// project configuration search stops there.
pub fn workspace() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp workspace");
    std::fs::create_dir(dir.path().join(".git")).expect("Failed to create .git marker");
    dir
}

/// `lookaroun_cmd()` running in `dir`, with home and config directories
/// redirected into it and no inherited `PORT`/`RUST_LOG`.
pub fn lookaroun_in(dir: &Path) -> Command {
    let mut cmd = lookaroun_cmd();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("PORT")
        .env_remove("RUST_LOG");
    cmd
}

/// A small, valid knowledge file.
pub const SAMPLE_KNOWLEDGE: &str = r#"
[[starters]]
trigger = "hi"
answer = "Hi from the test tables!"

[[knowledge]]
trigger = "opening hours"
answer = "We are open from nine to five."

[[knowledge]]
trigger = "pricing"
answer = "Test pricing answer."
"#;
