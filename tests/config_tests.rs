//! Configuration loading and validation.

use std::fs;

use anyhow::Result;
use tempfile::TempDir;

use bucket_uploader::config::{Credentials, UploadConfig, UploadSettings};
use bucket_uploader::UploadError;

#[test]
fn test_yaml_file_to_config() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("uploader.yaml");
    fs::write(
        &path,
        r#"
cwd: ./dist
bucket: static-site
region: us-west-2
profile: deploy
includes:
  - "**/*.html"
  - "**/*.css"
excludes:
  - "*.map"
compress: true
concurrency: 8
cache_control: "max-age=60"
"#,
    )?;

    let config = UploadConfig::from_settings(UploadSettings::from_yaml_file(&path)?)?;
    assert_eq!(config.bucket, "static-site");
    assert_eq!(config.region.name(), "us-west-2");
    assert_eq!(config.concurrency, 8);
    assert!(config.compress);
    assert_eq!(config.cache_control, "max-age=60");
    assert_eq!(config.acl, "public-read");
    assert_eq!(config.includes.len(), 2);
    assert_eq!(config.excludes[0].as_str(), "*.map");
    assert_eq!(config.credentials, Credentials::Profile { name: "deploy".to_string() });
    Ok(())
}

#[test]
fn test_missing_bucket_fails_before_enumeration() {
    // The root does not exist: an enumeration attempt would fail differently
    let settings = UploadSettings {
        cwd: Some("/definitely/not/here".into()),
        ..Default::default()
    };

    match UploadConfig::from_settings(settings) {
        Err(UploadError::Configuration(message)) => {
            assert_eq!(message, "\"bucket\" is a required parameter")
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_cli_values_override_file_values() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("uploader.yaml");
    fs::write(&path, "cwd: ./public\nbucket: from-file\nprofile: deploy\ndry_run: false\n")?;

    let file = UploadSettings::from_yaml_file(&path)?;
    let cli = UploadSettings {
        bucket: Some("from-cli".to_string()),
        dry_run: Some(true),
        ..Default::default()
    };

    let config = UploadConfig::from_settings(file.merge(cli))?;
    assert_eq!(config.bucket, "from-cli");
    assert!(config.dry_run);
    assert_eq!(config.root.to_str(), Some("./public"));
    Ok(())
}

#[test]
fn test_unknown_region_is_configuration_error() {
    let settings = UploadSettings {
        cwd: Some("./public".into()),
        bucket: Some("b".to_string()),
        region: Some("atlantis-1".to_string()),
        profile: Some("deploy".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        UploadConfig::from_settings(settings),
        Err(UploadError::Configuration(_))
    ));
}

#[test]
fn test_malformed_yaml_is_reported() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "bucket: [unclosed\n")?;

    let err = UploadSettings::from_yaml_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse YAML config"));
    Ok(())
}

#[test]
fn test_settings_without_credentials_are_rejected() {
    let settings = UploadSettings {
        cwd: Some("./public".into()),
        bucket: Some("static-site".to_string()),
        ..Default::default()
    };

    match UploadConfig::from_settings(settings) {
        Err(UploadError::Configuration(message)) => assert!(message.contains("\"profile\"")),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_init_config_template_is_a_valid_config() -> Result<()> {
    let config = UploadConfig::from_settings(UploadSettings::template())?;
    assert_eq!(config.credentials, Credentials::Profile { name: "default".to_string() });
    Ok(())
}
