use std::fs;
use std::path::PathBuf;

use projman::config::{Config, LOCAL_CONFIG_FILE};
use projman::error::Error;

#[test]
fn config_defaults_when_missing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let explicit = dir.path().join("projman.toml");
    fs::write(&explicit, "")?;

    let config = Config::discover(Some(&explicit), dir.path())?;

    assert_eq!(config.store.path, PathBuf::from("data").join("users.json"));
    assert_eq!(config.display.date_format, "%B %d, %Y");
    assert_eq!(config.display.description_width, 50);
    assert_eq!(
        config.store_path(dir.path()),
        dir.path().join("data").join("users.json")
    );
    Ok(())
}

#[test]
fn config_overrides_from_local_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let toml = r#"
[store]
path = "state/projects.json"

[display]
date_format = "%d/%m/%Y"
description_width = 20
"#;
    fs::write(dir.path().join(LOCAL_CONFIG_FILE), toml)?;

    let config = Config::discover(None, dir.path())?;

    assert_eq!(config.store.path, PathBuf::from("state/projects.json"));
    assert_eq!(config.display.date_format, "%d/%m/%Y");
    assert_eq!(config.display.description_width, 20);
    Ok(())
}

#[test]
fn absolute_store_path_is_kept() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let absolute = dir.path().join("elsewhere.json");
    let mut config = Config::default();
    config.store.path = absolute.clone();

    assert_eq!(config.store_path(PathBuf::from("/tmp").as_path()), absolute);
    Ok(())
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = Config::discover(Some(&dir.path().join("nope.toml")), dir.path());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn invalid_values_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(LOCAL_CONFIG_FILE);

    fs::write(&path, "[display]\ndescription_width = 2\n")?;
    assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));

    fs::write(&path, "[display]\ndate_format = \"  \"\n")?;
    assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));

    fs::write(&path, "[store\npath = 3")?;
    assert!(matches!(Config::load(&path), Err(Error::TomlParse(_))));
    Ok(())
}
