//! # CLI Command Tests
//!
//! Runs the `noterag-cli` binary against an `httpmock` server.

use assert_cmd::prelude::*;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::process::Command;

#[test]
fn test_ask_prints_answer_and_provenance() {
    // Arrange
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/rag/query")
            .json_body(json!({
                "query": "What is a trait object?",
                "useWebSearch": true,
                "webSearchResults": 3,
                "topK": 5
            }));
        then.status(200).json_body(json!({
            "answer": "A value of type dyn Trait.",
            "webSearchUsed": true,
            "sourcesCount": 3
        }));
    });

    // Act
    let mut cmd = Command::cargo_bin("noterag-cli").unwrap();
    cmd.arg("--server")
        .arg(server.base_url())
        .arg("ask")
        .arg("What is a trait object?");

    // Assert
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Answer:\nA value of type dyn Trait."))
        .stdout(predicate::str::contains("Web search used | 3 sources"))
        .stdout(predicate::str::contains("Local knowledge only").not());
    mock.assert();
}

#[test]
fn test_ask_local_only_with_options() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/rag/query")
            .json_body(json!({
                "query": "ownership",
                "useWebSearch": false,
                "webSearchResults": 3,
                "topK": 2
            }));
        then.status(200).json_body(json!({
            "answer": "Each value has one owner.",
            "webSearchUsed": false,
            "sourcesCount": 2,
            "sources": [
                {"content": "Ownership rules...", "metadata": {"source": "notes/ownership.md"}}
            ]
        }));
    });

    let mut cmd = Command::cargo_bin("noterag-cli").unwrap();
    cmd.env("NOTERAG_SERVER_URL", server.base_url())
        .args(["ask", "ownership", "--no-web-search", "--top-k", "2", "--show-sources"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Local knowledge only | 2 sources"))
        .stdout(predicate::str::contains("[1] notes/ownership.md: Ownership rules..."));
    mock.assert();
}

#[test]
fn test_ask_reports_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/rag/query");
        then.status(500);
    });

    let mut cmd = Command::cargo_bin("noterag-cli").unwrap();
    cmd.arg("--server")
        .arg(server.base_url())
        .args(["ask", "anything"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("API error: 500"));
}

#[test]
fn test_ask_refuses_blank_question() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/rag/query");
        then.status(200);
    });

    let mut cmd = Command::cargo_bin("noterag-cli").unwrap();
    cmd.arg("--server")
        .arg(server.base_url())
        .args(["ask", "   "]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a question."));
    mock.assert_hits(0);
}

#[test]
fn test_ask_rejects_zero_counts_before_sending() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/rag/query");
        then.status(200);
    });

    for flag in ["--top-k", "--web-search-results"] {
        let mut cmd = Command::cargo_bin("noterag-cli").unwrap();
        cmd.arg("--server")
            .arg(server.base_url())
            .args(["ask", "What is Pin?", flag, "0"]);

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains(flag));
    }
    mock.assert_hits(0);
}

#[test]
fn test_repl_answers_each_line() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/rag/query");
        then.status(200).json_body(json!({
            "answer": "pong",
            "webSearchUsed": false,
            "sourcesCount": 0
        }));
    });

    // `assert_cmd::Command` can feed stdin.
    let mut cmd = assert_cmd::Command::cargo_bin("noterag-cli").unwrap();
    cmd.arg("--server")
        .arg(server.base_url())
        .arg("repl")
        .write_stdin("ping\n\nexit\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Answer:\npong"))
        .stdout(predicate::str::contains("Please enter a question."));
}
