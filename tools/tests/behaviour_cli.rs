//! End-to-end behaviour tests for the `sysconf` binary.
//!
//! Each scenario runs the binary against database files in a temporary
//! directory with a controlled locale environment.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const DEMO_TEMPLATES: &str = "\
Template: demo/host
Type: string
Description: Host name
Description-fr: Nom d'hôte

Template: demo/port
Type: string
Default: 80
Description: Port
";

struct CliWorld {
    temp_dir: TempDir,
    language: RefCell<String>,
    output: RefCell<Option<Output>>,
}

#[fixture]
fn cli_world() -> CliWorld {
    CliWorld {
        temp_dir: TempDir::new().expect("failed to create temp dir"),
        language: RefCell::new("C".to_owned()),
        output: RefCell::new(None),
    }
}

impl CliWorld {
    fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    fn template_file(&self) -> PathBuf {
        self.path("demo.templates")
    }

    fn write_template_file(&self) {
        std::fs::write(self.template_file(), DEMO_TEMPLATES).expect("write templates");
    }

    /// Run `sysconf` with databases in the scenario directory.
    fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sysconf"));
        cmd.arg("--templates-db")
            .arg(self.path("templates.json"))
            .arg("--config-db")
            .arg(self.path("config.json"))
            .args(args)
            .env("LANG", self.language.borrow().as_str())
            .env("XDG_CONFIG_HOME", self.path("xdg-config"))
            .env_remove("LC_ALL")
            .env_remove("LC_MESSAGES")
            .env_remove("LANGUAGE")
            .env_remove("SYSCONF_C_VALUES")
            .env_remove("SYSCONF_CHARMAP");
        cmd.output().expect("failed to run sysconf")
    }

    fn record(&self, output: Output) {
        self.output.replace(Some(output));
    }
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path should be UTF-8")
}

fn get_output(cli_world: &CliWorld) -> std::cell::Ref<'_, Output> {
    let output = cli_world.output.borrow();
    std::cell::Ref::map(output, |opt| opt.as_ref().expect("output not set"))
}

#[given("a template file describing two templates")]
fn given_template_file(cli_world: &CliWorld) {
    cli_world.write_template_file();
}

#[given("the demo templates are loaded")]
fn given_templates_loaded(cli_world: &CliWorld) {
    cli_world.write_template_file();
    let file = cli_world.template_file();
    let output = cli_world.run(&["load", "--owner", "demo", path_arg(&file)]);
    assert!(
        output.status.success(),
        "load failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[given("the user's language is \"{locale}\"")]
fn given_language(cli_world: &CliWorld, locale: String) {
    cli_world.language.replace(locale);
}

#[when("sysconf loads the template file")]
fn when_load(cli_world: &CliWorld) {
    let file = cli_world.template_file();
    cli_world.record(cli_world.run(&["load", "--owner", "demo", path_arg(&file)]));
}

#[when("sysconf shows the \"{field}\" field of \"{template}\"")]
fn when_show_field(cli_world: &CliWorld, field: String, template: String) {
    cli_world.record(cli_world.run(&["show", &template, "--field", &field]));
}

#[when("sysconf shows the untranslated \"{field}\" field of \"{template}\"")]
fn when_show_untranslated(cli_world: &CliWorld, field: String, template: String) {
    cli_world.record(cli_world.run(&["show", &template, "--field", &field, "--c-values"]));
}

#[when("sysconf shows \"{template}\" as JSON")]
fn when_show_json(cli_world: &CliWorld, template: String) {
    cli_world.record(cli_world.run(&["show", &template, "--json"]));
}

#[when("sysconf copies the questions to a backup database")]
fn when_copy(cli_world: &CliWorld) {
    let from = cli_world.path("config.json");
    let to = cli_world.path("backup.json");
    cli_world.record(cli_world.run(&[
        "copy",
        "--from",
        path_arg(&from),
        "--to",
        path_arg(&to),
    ]));
}

#[then("the command exits successfully")]
fn then_success(cli_world: &CliWorld) {
    let output = get_output(cli_world);
    assert!(
        output.status.success(),
        "expected success, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[then("the command fails")]
fn then_failure(cli_world: &CliWorld) {
    let output = get_output(cli_world);
    assert_eq!(output.status.code(), Some(1));
}

#[then("stdout contains \"{expected}\"")]
fn then_stdout_contains(cli_world: &CliWorld, expected: String) {
    let output = get_output(cli_world);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&expected), "stdout was: {stdout}");
}

#[then("stderr contains \"{expected}\"")]
fn then_stderr_contains(cli_world: &CliWorld, expected: String) {
    let output = get_output(cli_world);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&expected), "stderr was: {stderr}");
}

#[then("the JSON output sets \"{field}\" to \"{value}\"")]
fn then_json_field(cli_world: &CliWorld, field: String, value: String) {
    let output = get_output(cli_world);
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let fields = json["fields"].as_array().expect("fields should be an array");
    let entry = fields
        .iter()
        .find(|entry| entry["name"] == field.as_str())
        .unwrap_or_else(|| panic!("no {field} entry in {json}"));
    assert_eq!(entry["value"], value.as_str());
}

// Bindings are index-based; keep them in the order of tests/features/cli.feature.
#[scenario(path = "tests/features/cli.feature", index = 0)]
fn scenario_load_reports_count(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 1)]
fn scenario_show_localised(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 2)]
fn scenario_show_untranslated(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 3)]
fn scenario_show_json(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 4)]
fn scenario_show_unknown_template(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 5)]
fn scenario_copy_to_backup(cli_world: CliWorld) {
    let _ = cli_world;
}
