use assert_cmd::Command;
use mockito::{Matcher, Server, ServerGuard};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

/// A `coda` invocation isolated in `home`, talking to `api_base`.
fn coda(home: &TempDir, api_base: &str) -> Command {
    let mut cmd = Command::cargo_bin("coda").unwrap();
    cmd.current_dir(home.path())
        .env("CODA_HOME", home.path())
        .env("CODA_API_BASE", api_base)
        .env("CODA_API_KEY", "test-key")
        .env_remove("RUST_LOG");
    cmd
}

fn offline(home: &TempDir) -> Command {
    coda(home, "http://127.0.0.1:9")
}

/// Serve the "ProjectAlpha" document: one section owning one table with one column.
fn serve_sample_doc(server: &mut ServerGuard) {
    server
        .mock("GET", "/docs/doc-1")
        .with_body(json!({"id": "doc-1", "name": "ProjectAlpha", "ownerName": "Test User"}).to_string())
        .create();
    server
        .mock("GET", "/docs/doc-1/pages")
        .with_body(
            json!({"items": [{"id": "canvas-1", "name": "Section One", "contentType": "canvas"}]})
                .to_string(),
        )
        .create();
    server
        .mock("GET", "/docs/doc-1/tables")
        .match_query(Matcher::UrlEncoded("tableTypes".into(), "table".into()))
        .with_body(
            json!({"items": [{"id": "grid-1", "name": "Rich Table",
                              "parent": {"id": "canvas-1", "name": "Section One"}}]})
            .to_string(),
        )
        .create();
    server
        .mock("GET", "/docs/doc-1/tables/grid-1/columns")
        .with_body(
            json!({"items": [{"id": "c-1", "name": "Task", "format": {"type": "text"}}]})
                .to_string(),
        )
        .create();
}

#[test]
fn test_register_list_remove_template() {
    let home = tempfile::tempdir().unwrap();

    offline(&home)
        .args(["register-template", "--name", "kickoff", "--doc", "doc-abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Template 'kickoff' registered successfully with document ID: doc-abc",
        ));

    assert!(home.path().join("templates.json").exists());

    offline(&home)
        .arg("list-templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("kickoff  doc-abc"));

    offline(&home)
        .args(["remove-template", "--name", "kickoff"])
        .assert()
        .success();

    offline(&home)
        .arg("list-templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates registered"));
}

#[test]
fn test_remove_unknown_template_fails() {
    let home = tempfile::tempdir().unwrap();

    offline(&home)
        .args(["remove-template", "--name", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error: Template 'ghost' not found in registry",
        ));
}

#[test]
fn test_register_empty_name_is_invalid_input() {
    let home = tempfile::tempdir().unwrap();

    offline(&home)
        .args(["register-template", "--name", "", "--doc", "doc-abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error: Invalid template registration: template name must not be empty",
        ));

    assert!(!home.path().join("templates.json").exists());
}

#[test]
fn test_import_missing_file_fails() {
    let home = tempfile::tempdir().unwrap();

    offline(&home)
        .args(["import-template", "--file", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template file 'nope.yaml' not found"));
}

#[test]
fn test_import_invalid_yaml_reports_parse_stage() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("bad.yaml"), "document: [unclosed").unwrap();

    offline(&home)
        .args(["import-template", "--file", "bad.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("template parsing").and(predicate::str::contains("Invalid YAML")));
}

#[test]
fn test_export_template_by_registered_name() {
    let mut server = Server::new();
    serve_sample_doc(&mut server);
    let home = tempfile::tempdir().unwrap();

    coda(&home, &server.url())
        .args(["register-template", "--name", "alpha", "--doc", "doc-1"])
        .assert()
        .success();

    coda(&home, &server.url())
        .args(["export-template", "--doc", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("document:"))
        .stdout(predicate::str::contains("{{DOC_NAME}}"))
        .stdout(predicate::str::contains("Rich Table"))
        .stderr(predicate::str::contains("Detected variable OWNER_NAME = Test User"));
}

#[test]
fn test_export_template_to_file_then_import() {
    let mut server = Server::new();
    serve_sample_doc(&mut server);
    let create = server
        .mock("POST", "/docs")
        .match_body(Matcher::Json(json!({"title": "Launch"})))
        .with_status(201)
        .with_body(json!({"id": "doc-new", "name": "Launch"}).to_string())
        .create();
    let section = server
        .mock("POST", "/docs/doc-new/pages")
        .match_body(Matcher::PartialJson(json!({"name": "Section One"})))
        .with_status(202)
        .with_body(json!({"id": "canvas-new", "name": "Section One"}).to_string())
        .create();
    let home = tempfile::tempdir().unwrap();

    coda(&home, &server.url())
        .args(["export-template", "--doc", "doc-1", "--output", "alpha.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Template exported to alpha.yaml"));

    coda(&home, &server.url())
        .args([
            "import-template",
            "--file",
            "alpha.yaml",
            "--variables",
            "DOC_NAME=Launch OWNER_NAME='New Owner'",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Document created successfully: ID=doc-new, Name='Launch'",
        ));

    create.assert();
    section.assert();
}

#[test]
fn test_export_table_csv() {
    let mut server = Server::new();
    server
        .mock("GET", "/docs/doc-1/tables/grid-1/columns")
        .with_body(json!({"items": [{"id": "c-1", "name": "Task"}, {"id": "c-2", "name": "Done"}]}).to_string())
        .create();
    server
        .mock("GET", "/docs/doc-1/tables/grid-1/rows")
        .with_body(
            json!({"items": [{"values": {"c-1": "Write, test", "c-2": false}}]}).to_string(),
        )
        .create();
    let home = tempfile::tempdir().unwrap();

    coda(&home, &server.url())
        .args(["export-table", "--doc", "doc-1", "--table", "grid-1"])
        .assert()
        .success()
        .stdout(predicate::str::diff("Task,Done\n\"Write, test\",false\n"));
}

#[test]
fn test_list_tables_text_format() {
    let mut server = Server::new();
    server
        .mock("GET", "/docs/doc-1/tables")
        .match_query(Matcher::Any)
        .with_body(json!({"items": [{"id": "grid-1", "name": "Rich Table"}]}).to_string())
        .create();
    let home = tempfile::tempdir().unwrap();

    coda(&home, &server.url())
        .args(["list-tables", "--doc", "doc-1", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("grid-1  Rich Table"));
}

#[test]
fn test_missing_api_key_is_reported() {
    let home = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("coda").unwrap();
    cmd.current_dir(home.path())
        .env("CODA_HOME", home.path())
        .env_remove("CODA_API_KEY")
        .arg("list-docs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key"));
}

#[test]
fn test_help_groups_commands() {
    let home = tempfile::tempdir().unwrap();

    offline(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Registry Commands:"));
}
