use std::fmt;
use std::path::PathBuf;

use regex::Regex;
use rusoto_core::Region;

use crate::cloud::resolve_region;
use crate::config::UploadSettings;
use crate::constants::{
    DEFAULT_ACL, DEFAULT_CACHE_CONTROL, DEFAULT_CONCURRENCY, DEFAULT_INCLUDE_PATTERN,
    DEFAULT_REGION,
};
use crate::error::UploadError;
use crate::filter::KeyHooks;
use crate::glob::{compile_all, GlobPattern};

/// How the S3 client authenticates
#[derive(Clone, PartialEq)]
pub enum Credentials {
    /// Named profile from the shared credentials file
    Profile { name: String },
    /// Explicit access key pair
    Static {
        access_key_id: String,
        secret_access_key: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Profile { name } => f.debug_struct("Profile").field("name", name).finish(),
            Credentials::Static { .. } => f
                .debug_struct("Static")
                .field("access_key_id", &"[REDACTED]")
                .field("secret_access_key", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Validated configuration for one upload run.
///
/// Built once from [`UploadSettings`] and shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Root directory; object keys are paths relative to it
    pub root: PathBuf,
    pub includes: Vec<GlobPattern>,
    pub excludes: Vec<GlobPattern>,
    pub compress: bool,
    /// Maximum number of candidates in flight, at least 1
    pub concurrency: usize,
    pub dry_run: bool,
    pub logging: bool,
    pub bucket: String,
    pub region: Region,
    pub acl: String,
    pub cache_control: String,
    pub credentials: Credentials,
    pub hooks: KeyHooks,
}

impl UploadConfig {
    /// Validate settings and fill in defaults.
    ///
    /// Fails before touching the filesystem or the network when a required
    /// value is missing or malformed.
    pub fn from_settings(settings: UploadSettings) -> Result<Self, UploadError> {
        let root = settings
            .cwd
            .filter(|cwd| !cwd.as_os_str().is_empty())
            .ok_or_else(|| UploadError::config("\"cwd\" is a required parameter"))?;

        let bucket = settings
            .bucket
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| UploadError::config("\"bucket\" is a required parameter"))?;

        let concurrency = settings.concurrency.unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(UploadError::config("\"concurrency\" must be at least 1"));
        }

        let region_name = settings.region.unwrap_or_else(|| DEFAULT_REGION.to_string());
        let region = resolve_region(&region_name, settings.endpoint.as_deref())?;

        let credentials = match (settings.access_key_id, settings.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Credentials::Static {
                access_key_id,
                secret_access_key,
            },
            (None, None) => match settings.profile.filter(|p| !p.trim().is_empty()) {
                Some(name) => Credentials::Profile { name },
                None => {
                    return Err(UploadError::config(
                        "\"profile\" or \"access_key_id\"/\"secret_access_key\" is a required parameter",
                    ))
                }
            },
            _ => {
                return Err(UploadError::config(
                    "\"access_key_id\" and \"secret_access_key\" must be given together",
                ))
            }
        };

        let includes = match settings.includes {
            Some(patterns) if !patterns.is_empty() => compile_all(&patterns)?,
            _ => compile_all(&[DEFAULT_INCLUDE_PATTERN])?,
        };
        let excludes = compile_all(&settings.excludes.unwrap_or_default())?;

        let hooks = build_hooks(settings.key_prefix, settings.key_pattern.as_deref())?;

        Ok(UploadConfig {
            root,
            includes,
            excludes,
            compress: settings.compress.unwrap_or(false),
            concurrency,
            dry_run: settings.dry_run.unwrap_or(false),
            logging: settings.logging.unwrap_or(true),
            bucket,
            region,
            acl: settings.acl.unwrap_or_else(|| DEFAULT_ACL.to_string()),
            cache_control: settings
                .cache_control
                .unwrap_or_else(|| DEFAULT_CACHE_CONTROL.to_string()),
            credentials,
            hooks,
        })
    }

    /// Replace the key hooks, e.g. with closures supplied by a library caller
    pub fn with_hooks(mut self, hooks: KeyHooks) -> Self {
        self.hooks = hooks;
        self
    }
}

/// `key_prefix` becomes the transform and `key_pattern` the filter
fn build_hooks(prefix: Option<String>, pattern: Option<&str>) -> Result<KeyHooks, UploadError> {
    let mut hooks = KeyHooks::default();

    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        hooks = hooks.with_transform(move |key| format!("{}{}", prefix, key));
    }

    if let Some(pattern) = pattern {
        let regex = Regex::new(pattern).map_err(|e| {
            UploadError::config(format!("invalid key pattern '{}': {}", pattern, e))
        })?;
        hooks = hooks.with_filter(move |key| regex.is_match(key));
    }

    Ok(hooks)
}
