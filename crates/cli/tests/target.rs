mod support;

use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use support::*;
use tempfile::tempdir;

fn summary(home: &Path, args: &[&str]) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let output = tempguard(home)?
        .arg("rewrite")
        .arg(home.join("units"))
        .args(args)
        .args(["--format", "json", "--quiet"])
        .output()?;
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(serde_json::from_slice(&output.stdout)?)
}

fn write_main_and_test(home: &Path) -> Result<(), Box<dyn std::error::Error>> {
    write_unit(
        &home.join("units/Main.json"),
        &direct_unit("src/main/java/Main.java"),
    )?;
    write_unit(
        &home.join("units/MainTest.json"),
        &direct_unit("src/test/java/MainTest.java"),
    )?;
    Ok(())
}

#[test]
fn non_test_source_leaves_tests_alone() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    write_main_and_test(tmp.path())?;
    let s = summary(tmp.path(), &["--target", "Non-Test Source"])?;
    assert_eq!(s["changed"].as_array().map(Vec::len), Some(1));
    assert_eq!(s["changed"][0]["source_path"], "src/main/java/Main.java");
    Ok(())
}

#[test]
fn change_in_main_sources_widens_to_tests() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    write_main_and_test(tmp.path())?;
    let s = summary(
        tmp.path(),
        &["--target", "All Source if detected in Non Test Source"],
    )?;
    assert_eq!(s["changed"].as_array().map(Vec::len), Some(2));
    assert_eq!(s["cycles"], 2);
    assert_eq!(s["escalated"][0], "java.secure-temp-file-creation");
    Ok(())
}

#[test]
fn unknown_target_flag_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    write_main_and_test(tmp.path())?;
    tempguard(tmp.path())?
        .arg("rewrite")
        .arg(tmp.path().join("units"))
        .args(["--target", "Tests Only"])
        .assert()
        .failure()
        .stderr(contains("unknown target: Tests Only"));
    Ok(())
}

#[test]
fn rule_file_target_is_validated_before_rewriting() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    write_main_and_test(tmp.path())?;
    let rules = tmp.path().join("rules.yaml");
    fs::write(&rules, "rules:\n  - id: r\n")?;
    let before = fs::read_to_string(tmp.path().join("units/Main.json"))?;

    tempguard(tmp.path())?
        .arg("rewrite")
        .arg(tmp.path().join("units"))
        .arg("--rules")
        .arg(&rules)
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(contains("unknown target: `null`"));
    assert_eq!(fs::read_to_string(tmp.path().join("units/Main.json"))?, before);
    Ok(())
}

#[test]
fn rule_file_selects_the_target() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    write_main_and_test(tmp.path())?;
    let rules = tmp.path().join("rules.json");
    fs::write(
        &rules,
        r#"{"rules": [{"id": "custom", "target": "Non-Test Source"}]}"#,
    )?;
    let rules = rules.to_string_lossy().into_owned();
    let s = summary(tmp.path(), &["--rules", &rules])?;
    assert_eq!(s["changed"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn user_config_supplies_default_target() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    write_main_and_test(tmp.path())?;
    let cfg_dir = tmp.path().join(".config").join("tempguard");
    fs::create_dir_all(&cfg_dir)?;
    fs::write(
        cfg_dir.join("config.toml"),
        "[rewrite]\ntarget = \"Non-Test Source\"\n",
    )?;

    let s = summary(tmp.path(), &[])?;
    assert_eq!(s["changed"].as_array().map(Vec::len), Some(1));

    // The flag still wins over the config file.
    let s = summary(tmp.path(), &["--target", "All Source"])?;
    assert_eq!(s["changed"].as_array().map(Vec::len), Some(1));
    assert_eq!(s["changed"][0]["source_path"], "src/test/java/MainTest.java");
    Ok(())
}
