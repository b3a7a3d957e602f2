//! Integration tests for the cine CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a cine command isolated from the caller's environment
fn cine() -> Command {
    let mut cmd = Command::cargo_bin("cine").unwrap();
    cmd.env_remove("CINE_PROJECT")
        .env_remove("CINE_LOG")
        .env("CINE_AUTHOR", "tester")
        .env("CINE_EDITOR", "true");
    cmd
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    cine().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to create a cinematic with the starter template
fn create_cinematic(tmp: &TempDir, name: &str, extra: &[&str]) {
    let mut args = vec!["new", "--name", name, "--no-edit"];
    args.extend_from_slice(extra);
    cine().current_dir(tmp.path()).args(&args).assert().success();
}

fn write_cinematic(tmp: &TempDir, file: &str, content: &str) -> std::path::PathBuf {
    let path = tmp.path().join("cinematics").join(file);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    cine()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cinematic"));
}

#[test]
fn test_version_displays() {
    cine()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cine"));
}

#[test]
fn test_unknown_command_fails() {
    cine()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_completions_bash() {
    cine()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cine"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    cine()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".cine").is_dir());
    assert!(tmp.path().join(".cine/config.yaml").exists());
    assert!(tmp.path().join("cinematics").is_dir());
}

#[test]
fn test_init_twice_warns() {
    let tmp = setup_test_project();

    cine()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    cine()
        .current_dir(tmp.path())
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));
}

#[test]
fn test_commands_outside_project_fail() {
    let tmp = TempDir::new().unwrap();

    cine()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .failure();
}

// ============================================================================
// New / List / Show / Edit Tests
// ============================================================================

#[test]
fn test_new_creates_file() {
    let tmp = setup_test_project();

    cine()
        .current_dir(tmp.path())
        .args(["new", "--name", "Ogre Ambush", "--no-edit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created cinematic ogre-ambush"));

    let path = tmp.path().join("cinematics/ogre-ambush.cine.yaml");
    let content = fs::read_to_string(path).unwrap();
    assert!(content.contains("name: \"Ogre Ambush\""));
    assert!(content.contains("cameraType: dual"));
    assert!(content.contains("dialogClear: true"));
    assert!(content.contains("by tester"));
}

#[test]
fn test_new_with_characters() {
    let tmp = setup_test_project();
    create_cinematic(
        &tmp,
        "Intro",
        &[
            "--camera",
            "left-close",
            "--left",
            "hero",
            "--right",
            "ogre-munchkin-m",
            "--background",
            "forest-bg",
        ],
    );

    let content = fs::read_to_string(tmp.path().join("cinematics/intro.cine.yaml")).unwrap();
    assert!(content.contains("cameraType: left-close"));
    assert!(content.contains("type: hero"));
    assert!(content.contains("slug: \"ogre-munchkin-m\""));
    assert!(content.contains("slug: \"forest-bg\""));
    assert!(content.contains("speaker: left"));
}

#[test]
fn test_new_requires_name() {
    let tmp = setup_test_project();

    cine()
        .current_dir(tmp.path())
        .args(["new", "--no-edit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Name is required"));
}

#[test]
fn test_new_rejects_invalid_camera() {
    let tmp = setup_test_project();

    cine()
        .current_dir(tmp.path())
        .args(["new", "--name", "X", "--camera", "zoom", "--no-edit"])
        .assert()
        .failure();
}

#[test]
fn test_new_refuses_to_overwrite() {
    let tmp = setup_test_project();
    create_cinematic(&tmp, "Intro", &[]);

    cine()
        .current_dir(tmp.path())
        .args(["new", "--name", "Intro", "--no-edit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_new_custom_slug_and_id_format() {
    let tmp = setup_test_project();

    cine()
        .current_dir(tmp.path())
        .args(["new", "--name", "Intro", "--slug", "chapter-1-intro", "--no-edit", "-f", "id"])
        .assert()
        .success()
        .stdout("chapter-1-intro\n");

    assert!(tmp.path().join("cinematics/chapter-1-intro.cine.yaml").exists());
}

#[test]
fn test_list_formats() {
    let tmp = setup_test_project();
    create_cinematic(&tmp, "Intro", &["--left", "hero"]);
    create_cinematic(&tmp, "Outro", &["--camera", "right-close", "--right", "hero"]);

    cine()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("intro"))
        .stdout(predicate::str::contains("outro"))
        .stdout(predicate::str::contains("2 cinematic(s) found"));

    cine()
        .current_dir(tmp.path())
        .args(["list", "-f", "id"])
        .assert()
        .success()
        .stdout("intro\noutro\n");

    let output = cine()
        .current_dir(tmp.path())
        .args(["list", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 2);
    assert_eq!(rows[0]["slug"], "intro");
    assert_eq!(rows[0]["dialog_nodes"], 1);

    cine()
        .current_dir(tmp.path())
        .args(["list", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("outro\tOutro\t1\t1\tright-close\t- / hero"));
}

#[test]
fn test_list_filters() {
    let tmp = setup_test_project();
    create_cinematic(&tmp, "Intro", &[]);
    create_cinematic(&tmp, "Outro", &["--camera", "right-close", "--right", "hero"]);

    cine()
        .current_dir(tmp.path())
        .args(["list", "--camera", "right-close", "-f", "id"])
        .assert()
        .success()
        .stdout("outro\n");

    cine()
        .current_dir(tmp.path())
        .args(["list", "--search", "INT", "--count"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_list_empty_project() {
    let tmp = setup_test_project();

    cine()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No cinematics found"));
}

#[test]
fn test_show_formats() {
    let tmp = setup_test_project();
    create_cinematic(&tmp, "Intro", &["--left", "hero"]);

    cine()
        .current_dir(tmp.path())
        .args(["show", "intro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Intro"))
        .stdout(predicate::str::contains("Write the first line of dialog here."));

    let output = cine()
        .current_dir(tmp.path())
        .args(["show", "intro", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["slug"], "intro");
    assert_eq!(doc["shots"][0]["shotSetup"]["leftThangType"]["type"], "hero");
    assert_eq!(doc["shots"][0]["dialogNodes"][0]["dialogClear"], true);

    cine()
        .current_dir(tmp.path())
        .args(["show", "intro", "-f", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Cinematic: Intro"));
}

#[test]
fn test_show_by_prefix_and_missing() {
    let tmp = setup_test_project();
    create_cinematic(&tmp, "Ogre Ambush", &[]);

    cine()
        .current_dir(tmp.path())
        .args(["show", "ogre", "-f", "id"])
        .assert()
        .success()
        .stdout("ogre-ambush\n");

    cine()
        .current_dir(tmp.path())
        .args(["show", "nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No cinematic found"));
}

#[test]
fn test_edit_runs_configured_editor() {
    let tmp = setup_test_project();
    create_cinematic(&tmp, "Intro", &[]);

    cine()
        .current_dir(tmp.path())
        .args(["edit", "intro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("intro.cine.yaml"));
}

#[test]
fn test_project_flag_from_elsewhere() {
    let tmp = setup_test_project();
    create_cinematic(&tmp, "Intro", &[]);
    let elsewhere = TempDir::new().unwrap();

    cine()
        .current_dir(elsewhere.path())
        .args(["list", "-f", "id", "--project"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout("intro\n");
}

// ============================================================================
// Validate Command Tests
// ============================================================================

#[test]
fn test_validate_new_project_passes() {
    let tmp = setup_test_project();
    create_cinematic(&tmp, "Intro", &["--left", "hero", "--right", "ogre-munchkin-m"]);
    create_cinematic(&tmp, "Outro", &[]);

    cine()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Files checked:  2"))
        .stdout(predicate::str::contains("All files passed validation!"));
}

#[test]
fn test_validate_reports_schema_errors() {
    let tmp = setup_test_project();
    write_cinematic(
        &tmp,
        "broken.cine.yaml",
        "name: Broken\nslug: broken\nshots:\n  - shotSetup:\n      cameraType: zoom\n    dialogNodes:\n      - text: Hi\n",
    );

    cine()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("broken.cine.yaml - 2 error(s)"))
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_validate_rejects_unknown_property() {
    let tmp = setup_test_project();
    let path = write_cinematic(
        &tmp,
        "extra.cine.yaml",
        "name: Extra\nslug: extra\nsoundtrack: epic\nshots: []\n",
    );

    cine()
        .current_dir(tmp.path())
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("soundtrack"));
}

#[test]
fn test_validate_rejects_long_text() {
    let tmp = setup_test_project();
    let long = "a".repeat(501);
    write_cinematic(
        &tmp,
        "long.cine.yaml",
        &format!(
            "name: Long\nslug: long\nshots:\n  - dialogNodes:\n      - text: {}\n        dialogClear: true\n",
            long
        ),
    );

    cine()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure();
}

#[test]
fn test_validate_accepts_text_at_limit() {
    let tmp = setup_test_project();
    for (file, text) in [("ascii.cine.yaml", "a".repeat(500)), ("accented.cine.yaml", "é".repeat(500))] {
        write_cinematic(
            &tmp,
            file,
            &format!(
                "name: Limit\nslug: limit\nshots:\n  - dialogNodes:\n      - text: {}\n        dialogClear: true\n",
                text
            ),
        );
    }

    cine()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Files passed:   2"));
}

#[test]
fn test_validate_syntax_error_after_accented_text() {
    let tmp = setup_test_project();
    write_cinematic(&tmp, "accent.cine.yaml", "name: ééé: x\n");

    cine()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("YAML parse error"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_validate_warnings_and_strict() {
    let tmp = setup_test_project();
    write_cinematic(&tmp, "empty.cine.yaml", "name: Empty\nslug: empty\nshots: []\n");

    cine()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 warning(s)"))
        .stdout(predicate::str::contains("Cinematic has no shots"));

    cine()
        .current_dir(tmp.path())
        .args(["validate", "--strict"])
        .assert()
        .failure();
}

#[test]
fn test_validate_keep_going_and_summary() {
    let tmp = setup_test_project();
    write_cinematic(&tmp, "a.cine.yaml", "name: A\nshots: nope\n");
    write_cinematic(&tmp, "b.cine.yaml", "name: B\nshots: nope\n");

    cine()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Files failed:   1"));

    cine()
        .current_dir(tmp.path())
        .args(["validate", "--keep-going", "--summary"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Files failed:   2"))
        .stdout(predicate::str::contains("a.cine.yaml").not());
}

#[test]
fn test_validate_yaml_syntax_error() {
    let tmp = setup_test_project();
    write_cinematic(&tmp, "bad.cine.yaml", "name: [unclosed\n");

    cine()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("YAML parse error"));
}

#[test]
fn test_validate_json_document() {
    let tmp = setup_test_project();
    write_cinematic(
        &tmp,
        "intro.cine.json",
        r#"{"name": "Intro", "slug": "intro", "shots": [{"dialogNodes": [{"text": "Hi", "dialogClear": false}]}]}"#,
    );

    cine()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success();
}

// ============================================================================
// Schema Command Tests
// ============================================================================

#[test]
fn test_schema_list() {
    cine()
        .args(["schema", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cinematic"))
        .stdout(predicate::str::contains("dialog-node"));
}

#[test]
fn test_schema_show() {
    cine()
        .args(["schema", "show", "shot-setup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cameraType"))
        .stdout(predicate::str::contains("right-close, left-close, dual"));

    let output = cine()
        .args(["schema", "show", "cinematic", "--raw"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["additionalProperties"], false);
    assert!(schema["properties"]["shots"].is_object());

    cine()
        .args(["schema", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown schema"));
}

#[test]
fn test_schema_export() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");

    cine()
        .args(["schema", "export", "--out"])
        .arg(&out)
        .assert()
        .success();

    let content = fs::read_to_string(out.join("cinematic.schema.json")).unwrap();
    let schema: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(schema["title"], "Cinematic");
    assert!(out.join("dialog-node.schema.json").exists());
    assert!(out.join("thang-type.schema.json").exists());
}
