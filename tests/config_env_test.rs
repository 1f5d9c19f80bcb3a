//! Environment overrides live in their own test binary so the variable
//! does not leak into other config tests.

use std::fs;

use tempfile::TempDir;

use doclineage::config::Settings;

#[test]
fn given_env_var_and_local_config_when_load_then_env_wins() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doclineage.toml");
    fs::write(&path, "org_abbreviation = \"BNV\"\n").unwrap();
    std::env::set_var("DOCLINEAGE_ORG_ABBREVIATION", "SYT");

    let settings = Settings::load(Some(&path)).expect("load settings");
    std::env::remove_var("DOCLINEAGE_ORG_ABBREVIATION");

    assert_eq!(settings.org_abbreviation, "SYT");
}
