//! # LookAroun CLI Ask Integration Tests
//!
//! File: cli/tests/ask.rs
//!
//! ## Overview
//!
//! Integration tests for `lookaroun ask`, which answers one question with the
//! configured strategy and exits.
//!

mod common;
use common::*;
use predicates::prelude::*;

const FALLBACK: &str = "I'd be happy to help you learn about LookAroun!";

#[test]
fn test_ask_known_question() {
    let dir = workspace();
    lookaroun_in(dir.path())
        .args(["ask", "what", "is", "lookaroun"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "LookAroun is a mobile networking app",
        ));
}

#[test]
fn test_ask_unmatched_question_gets_fallback() {
    let dir = workspace();
    lookaroun_in(dir.path())
        .args(["ask", "qwerty"])
        .assert()
        .success()
        .stdout(predicate::str::contains(FALLBACK));
}

#[test]
fn test_ask_with_knowledge_flag() {
    let dir = workspace();
    let kb = dir.path().join("kb.toml");
    std::fs::write(&kb, SAMPLE_KNOWLEDGE).unwrap();

    lookaroun_in(dir.path())
        .args(["ask", "--knowledge"])
        .arg(&kb)
        .args(["what", "are", "your", "opening", "hours"])
        .assert()
        .success()
        .stdout(predicate::str::contains("We are open from nine to five."));
}

#[test]
fn test_ask_uses_project_config() {
    let dir = workspace();
    std::fs::write(dir.path().join("kb.toml"), SAMPLE_KNOWLEDGE).unwrap();
    std::fs::write(
        dir.path().join(".lookaroun.toml"),
        "[knowledge]\nfile = \"kb.toml\"\n",
    )
    .unwrap();

    lookaroun_in(dir.path())
        .args(["ask", "hi", "there"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hi from the test tables!"));
}

#[test]
fn test_ask_missing_knowledge_file_fails() {
    let dir = workspace();
    lookaroun_in(dir.path())
        .args(["ask", "--knowledge", "does-not-exist.toml", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_ask_legacy_without_generator_fails() {
    let dir = workspace();
    lookaroun_in(dir.path())
        .args(["ask", "--strategy", "legacy", "zzz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Conversational model unavailable"));
}

#[test]
fn test_ask_legacy_keyword_hit_needs_no_generator() {
    let dir = workspace();
    lookaroun_in(dir.path())
        .args(["ask", "--strategy", "legacy", "tell", "me", "about", "pricing"])
        .assert()
        .success();
}
