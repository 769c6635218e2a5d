//! Integration tests for the nlquery binary
//!
//! Every test points the config directory at a temp dir and the search
//! backend at a closed port, so nothing leaves the machine.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use tempfile::TempDir;

fn nlquery_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("nlquery").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env("NLQUERY_ES_URL", "http://127.0.0.1:1")
        .env_remove("NLQUERY_LLM_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    nlquery_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("schema"))
        .stdout(predicate::str::contains("mcp"));
}

#[test]
fn test_ask_without_api_key_fails() {
    let home = TempDir::new().unwrap();
    nlquery_cmd(&home)
        .args(["ask", "show", "all"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn test_prompt_preview_falls_back_to_default_fields() {
    let home = TempDir::new().unwrap();
    nlquery_cmd(&home)
        .args(["prompt", "show", "me", "CVE-2020-1472"])
        .assert()
        .success()
        .stdout(predicate::str::contains("package.friendly_name"))
        .stdout(predicate::str::contains(
            "Prompt: show me CVE-2020-1472\nElasticsearch Query:",
        ));
}

#[test]
fn test_config_show_redacts_key() {
    let home = TempDir::new().unwrap();
    nlquery_cmd(&home)
        .env("NLQUERY_LLM_API_KEY", "super-secret-value")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("result_limit"))
        .stdout(predicate::str::contains("super-secret-value").not());
}

#[test]
fn test_config_path_under_config_dir() {
    let home = TempDir::new().unwrap();
    nlquery_cmd(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yml"));
}

#[test]
fn test_config_file_is_read() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("nlquery");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.yml"),
        "search:\n  index: vuln_records\n",
    )
    .unwrap();

    nlquery_cmd(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vuln_records"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("nlquery");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.yml"), "search:\n  result_limit: 0\n").unwrap();

    nlquery_cmd(&home)
        .args(["config", "show"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("result_limit"));
}

#[test]
fn test_schema_show_without_backend() {
    let home = TempDir::new().unwrap();
    nlquery_cmd(&home)
        .args(["schema", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("null"));
}

/// Answer a single chat completion request with `status` and `body`
fn one_shot_llm(status: &str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let status = status.to_string();

    std::thread::spawn(move || {
        let Ok((stream, _)) = listener.accept() else {
            return;
        };
        let mut reader = BufReader::new(stream);
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 {
                return;
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }
        let mut request_body = vec![0; content_length];
        let _ = reader.read_exact(&mut request_body);

        let reply = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let mut stream = reader.into_inner();
        let _ = stream.write_all(reply.as_bytes());
        let _ = stream.flush();
    });

    url
}

#[test]
fn test_ask_rate_limited_exits_with_code_2() {
    let home = TempDir::new().unwrap();
    let llm_url = one_shot_llm(
        "429 Too Many Requests",
        r#"{"error": {"code": 429, "status": "RESOURCE_EXHAUSTED"}}"#,
    );

    nlquery_cmd(&home)
        .env("NLQUERY_LLM_API_KEY", "test-key")
        .env("NLQUERY_LLM_URL", &llm_url)
        .args(["ask", "show", "me", "CVE-2020-1472"])
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("rate-limit"));
}

#[test]
fn test_rust_log_enables_debug_output() {
    let home = TempDir::new().unwrap();
    nlquery_cmd(&home)
        .env("RUST_LOG", "debug")
        .env("NLQUERY_LLM_API_KEY", "test-key")
        .env("NLQUERY_LLM_URL", "http://127.0.0.1:1")
        .args(["ask", "log4j"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Sending prompt"));
}
