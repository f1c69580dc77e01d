use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MY_EVENT: &str = "<?php
/**
 * Fires on event.
 *
 * @since 1.0.0
 *
 * @param int    $a The first value.
 * @param string $b The second value.
 */
do_action( 'my_event', $a, $b );
";

const REUSED: &str = "<?php
/** This action is documented in wp-includes/load.php */
do_action( 'my_event', $a, $b );
";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn hookdoc() -> Command {
    Command::cargo_bin("hookdoc").unwrap()
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn extracts_documented_hook() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("wordpress");
    write(&input, "wp-includes/load.php", MY_EVENT);
    let output = dir.path().join("hooks.json");

    hookdoc()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracting hooks from"))
        .stdout(predicate::str::contains("Done."));

    let json = read_json(&output);
    let hooks = json["hooks"].as_array().unwrap();
    assert_eq!(hooks.len(), 1);

    let hook = &hooks[0];
    assert_eq!(hook["name"], "my_event");
    assert_eq!(hook["type"], "action");
    assert_eq!(hook["numArgs"], 2);
    assert_eq!(hook["path"], "/wp-includes/load.php");
    assert_eq!(hook["line"], 10);
    assert!(hook.get("endLine").is_none());
    assert_eq!(hook["doc"]["summary"], "Fires on event.");

    let tags = hook["doc"]["tags"].as_array().unwrap();
    assert_eq!(tags[0]["name"], "since");
    assert_eq!(tags[0]["content"], "1.0.0");
    assert_eq!(tags[1]["name"], "param");
    assert_eq!(tags[1]["variable"], "a");
    assert_eq!(tags[1]["types"][0], "int");
    assert_eq!(tags[1]["content"], "The first value.");

    assert!(json["generatedOn"].as_str().unwrap().ends_with("+00:00"));
}

#[test]
fn skips_content_directory_by_default() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "wp-content/plugins/plugin.php", MY_EVENT);
    let output = dir.path().join("hooks.json");

    hookdoc()
        .arg("--input")
        .arg(dir.path())
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    assert!(read_json(&output)["hooks"].as_array().unwrap().is_empty());
}

#[test]
fn keep_reused_includes_duplicate_hooks() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("src");
    write(&input, "a.php", REUSED);
    let output = dir.path().join("hooks.json");

    hookdoc()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();
    assert!(read_json(&output)["hooks"].as_array().unwrap().is_empty());

    hookdoc()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--keep-reused")
        .assert()
        .success();
    assert_eq!(read_json(&output)["hooks"].as_array().unwrap().len(), 1);
}

#[test]
fn input_must_be_a_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("file.php");
    fs::write(&file, MY_EVENT).unwrap();

    hookdoc()
        .arg("--input")
        .arg(&file)
        .arg("--output")
        .arg(dir.path().join("hooks.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn output_directory_must_exist() {
    let dir = TempDir::new().unwrap();

    hookdoc()
        .arg("--input")
        .arg(dir.path())
        .arg("--output")
        .arg(dir.path().join("missing").join("hooks.json"))
        .assert()
        .code(4);

    assert!(!dir.path().join("missing").exists());
}

#[test]
fn missing_arguments_exit_with_usage_error() {
    hookdoc()
        .env_remove("HOOKDOC_OUTPUT")
        .arg("--input")
        .arg(".")
        .assert()
        .code(1);
}

#[test]
fn bad_config_exits_with_usage_error() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("hookdoc.toml");
    fs::write(&config, "exclude = 3").unwrap();

    hookdoc()
        .arg("--input")
        .arg(dir.path())
        .arg("--output")
        .arg(dir.path().join("hooks.json"))
        .arg("--config")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn read_only_output_is_rejected() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("hooks.json");
    fs::write(&output, "{}").unwrap();

    let mut permissions = fs::metadata(&output).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&output, permissions).unwrap();

    // Privileged users can still write the file
    if fs::OpenOptions::new().append(true).open(&output).is_ok() {
        return;
    }

    hookdoc()
        .arg("--input")
        .arg(dir.path())
        .arg("--output")
        .arg(&output)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not writable"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "{}");
}

#[test]
fn output_directory_path_fails_to_write() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("src");
    write(&input, "a.php", MY_EVENT);
    let output = dir.path().join("hooks.json");
    fs::create_dir(&output).unwrap();

    hookdoc()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Failed to write"));
}

#[cfg(unix)]
#[test]
fn unreadable_directory_fails_the_scan() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("src");
    write(&input, "a.php", MY_EVENT);
    write(&input, "locked/b.php", MY_EVENT);
    let locked = input.join("locked");
    let output = dir.path().join("hooks.json");

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read the directory
    if fs::read_dir(&locked).is_err() {
        hookdoc()
            .arg("--input")
            .arg(&input)
            .arg("--output")
            .arg(&output)
            .assert()
            .code(6)
            .stderr(predicate::str::contains("Failed to scan"));

        assert!(!output.exists());
    }

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
}
