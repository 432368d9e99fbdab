use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ACL, DEFAULT_CACHE_CONTROL, DEFAULT_CONCURRENCY, DEFAULT_INCLUDE_PATTERN,
    DEFAULT_REGION,
};

/// Raw upload settings as written in a YAML file or collected from the CLI.
///
/// Every field is optional here; [`crate::config::UploadConfig::from_settings`]
/// enforces the required ones and fills in defaults.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UploadSettings {
    /// Directory whose contents are uploaded
    pub cwd: Option<PathBuf>,
    /// Destination bucket
    pub bucket: Option<String>,
    pub region: Option<String>,
    /// Endpoint of an S3-compatible service
    pub endpoint: Option<String>,
    /// Shared credentials file profile
    pub profile: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Glob patterns selecting files, in order
    pub includes: Option<Vec<String>>,
    /// Glob patterns removing files from the selection
    pub excludes: Option<Vec<String>>,
    pub compress: Option<bool>,
    pub concurrency: Option<usize>,
    /// List the keys that would be uploaded without uploading them
    pub dry_run: Option<bool>,
    pub logging: Option<bool>,
    pub acl: Option<String>,
    pub cache_control: Option<String>,
    /// Prefix prepended to every key
    pub key_prefix: Option<String>,
    /// Regex a (prefixed) key must match to be uploaded
    pub key_pattern: Option<String>,
}

impl UploadSettings {
    /// Load settings from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let settings: UploadSettings = serde_yaml::from_str(&content)
            .context(format!("Failed to parse YAML config: {}", path.display()))?;

        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize settings to YAML")?;

        fs::write(path, yaml).context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Settings with every default spelled out, used by `init-config`
    pub fn template() -> Self {
        UploadSettings {
            cwd: Some(PathBuf::from("./public")),
            bucket: Some("my-bucket".to_string()),
            region: Some(DEFAULT_REGION.to_string()),
            endpoint: None,
            profile: Some("default".to_string()),
            access_key_id: None,
            secret_access_key: None,
            includes: Some(vec![DEFAULT_INCLUDE_PATTERN.to_string()]),
            excludes: Some(Vec::new()),
            compress: Some(false),
            concurrency: Some(DEFAULT_CONCURRENCY),
            dry_run: Some(false),
            logging: Some(true),
            acl: Some(DEFAULT_ACL.to_string()),
            cache_control: Some(DEFAULT_CACHE_CONTROL.to_string()),
            key_prefix: None,
            key_pattern: None,
        }
    }

    /// Layer `overrides` on top of these settings; set fields in `overrides` win
    pub fn merge(self, overrides: UploadSettings) -> UploadSettings {
        UploadSettings {
            cwd: overrides.cwd.or(self.cwd),
            bucket: overrides.bucket.or(self.bucket),
            region: overrides.region.or(self.region),
            endpoint: overrides.endpoint.or(self.endpoint),
            profile: overrides.profile.or(self.profile),
            access_key_id: overrides.access_key_id.or(self.access_key_id),
            secret_access_key: overrides.secret_access_key.or(self.secret_access_key),
            includes: overrides.includes.or(self.includes),
            excludes: overrides.excludes.or(self.excludes),
            compress: overrides.compress.or(self.compress),
            concurrency: overrides.concurrency.or(self.concurrency),
            dry_run: overrides.dry_run.or(self.dry_run),
            logging: overrides.logging.or(self.logging),
            acl: overrides.acl.or(self.acl),
            cache_control: overrides.cache_control.or(self.cache_control),
            key_prefix: overrides.key_prefix.or(self.key_prefix),
            key_pattern: overrides.key_pattern.or(self.key_pattern),
        }
    }
}

impl fmt::Debug for UploadSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadSettings")
            .field("cwd", &self.cwd)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("profile", &self.profile)
            .field("access_key_id", &self.access_key_id.as_ref().map(|_| "[REDACTED]"))
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "[REDACTED]"))
            .field("includes", &self.includes)
            .field("excludes", &self.excludes)
            .field("compress", &self.compress)
            .field("concurrency", &self.concurrency)
            .field("dry_run", &self.dry_run)
            .field("logging", &self.logging)
            .field("acl", &self.acl)
            .field("cache_control", &self.cache_control)
            .field("key_prefix", &self.key_prefix)
            .field("key_pattern", &self.key_pattern)
            .finish()
    }
}
