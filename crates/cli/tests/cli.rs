use assert_cmd::Command;

fn shelf(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.current_dir(config_dir)
        .env("SHELF_CONFIG_DIR", config_dir)
        .env("SHELF_ENV", "local")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn migrate_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("books.db").display());

    let first = shelf(dir.path())
        .env("SHELF_DATABASE__URL", &url)
        .arg("migrate")
        .assert()
        .success();
    assert!(String::from_utf8_lossy(&first.get_output().stdout).contains("applied 1 migration(s)"));

    let second = shelf(dir.path())
        .env("SHELF_DATABASE__URL", &url)
        .arg("migrate")
        .assert()
        .success();
    assert!(String::from_utf8_lossy(&second.get_output().stdout).contains("applied 0 migration(s)"));
}

#[test]
fn config_prints_file_values() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("local.toml"), "[server]\nport = 9321\n").unwrap();

    let output = shelf(dir.path()).arg("config").assert().success();
    assert!(String::from_utf8_lossy(&output.get_output().stdout).contains("9321"));
}

#[test]
fn unknown_environment_fails() {
    let dir = tempfile::tempdir().unwrap();
    shelf(dir.path()).env("SHELF_ENV", "qa").arg("config").assert().failure();
}
