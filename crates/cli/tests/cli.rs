use assert_cmd::Command;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("catalog-cli").unwrap();
    cmd.env("CATALOG_CONFIG_DIR", "/nonexistent/catalog-config")
        .env_remove("CATALOG_ENV")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = cli().arg("--help").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("serve"));
    assert!(text.contains("config"));
}

#[test]
fn config_prints_defaults_as_json() {
    let output = cli().arg("config").assert().success().get_output().stdout.clone();
    let settings: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(settings["server"]["port"], 5000);
    assert_eq!(settings["catalog"]["default_page_size"], 10);
    assert_eq!(settings["catalog"]["max_page_size"], 100);
    assert_eq!(settings["store"]["backend"], "memory");
}

#[test]
fn config_honours_environment_overrides() {
    let output = cli()
        .env("CATALOG_SERVER__PORT", "8088")
        .arg("config")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let settings: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(settings["server"]["port"], 8088);
}

#[test]
fn unknown_environment_fails() {
    cli().env("CATALOG_ENV", "qa").arg("config").assert().failure();
}

#[test]
fn serve_rejects_invalid_port() {
    cli().args(["serve", "--port", "not-a-port"]).assert().failure();
}
