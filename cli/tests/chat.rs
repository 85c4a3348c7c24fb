//! # LookAroun CLI Chat Integration Tests
//!
//! File: cli/tests/chat.rs
//!
//! ## Overview
//!
//! Integration tests for the `lookaroun chat` terminal conversation, driven
//! through stdin.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_chat_answers_and_quits() {
    let dir = workspace();
    lookaroun_in(dir.path())
        .arg("chat")
        .write_stdin("what is lookaroun\nbye\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Chat with the LookAroun Assistant!"))
        .stdout(predicate::str::contains(
            "LookAroun: LookAroun is a mobile networking app",
        ))
        .stdout(predicate::str::contains("LookAroun: Goodbye!"));
}

#[test]
fn test_chat_clear_and_history() {
    let dir = workspace();
    lookaroun_in(dir.path())
        .arg("chat")
        .write_stdin("pricing\n/clear\n/history\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(conversation cleared)"));
}

#[test]
fn test_chat_ends_on_eof() {
    let dir = workspace();
    lookaroun_in(dir.path())
        .arg("chat")
        .write_stdin("hello\n")
        .assert()
        .success();
}
