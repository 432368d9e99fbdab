use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::UploadSettings;
use crate::constants::DEFAULT_CONFIG_NAME;

/// Command-line arguments for bucket-uploader.
///
/// Every option is optional here so that values from `--config` are only
/// overridden by flags that were actually given.
#[derive(Parser, Debug)]
#[clap(
    name = "bucket-uploader",
    version,
    about = "Upload a directory to an S3 bucket, optionally gzip-compressed"
)]
pub struct Args {
    /// Path to configuration YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Directory whose contents are uploaded
    #[clap(long)]
    pub cwd: Option<PathBuf>,

    /// Destination S3 bucket
    #[clap(short, long)]
    pub bucket: Option<String>,

    /// AWS region (default: ap-northeast-1)
    #[clap(long)]
    pub region: Option<String>,

    /// Endpoint of an S3-compatible service
    #[clap(long)]
    pub endpoint: Option<String>,

    /// AWS profile from the shared credentials file
    #[clap(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Access key ID, used together with --secret-access-key
    #[clap(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key_id: Option<String>,

    /// Secret access key, used together with --access-key-id
    #[clap(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// Glob selecting files to upload; repeatable (default: **/**)
    #[clap(short, long = "include")]
    pub includes: Vec<String>,

    /// Glob removing files from the upload; repeatable
    #[clap(short, long = "exclude")]
    pub excludes: Vec<String>,

    /// Gzip compressible files and upload them with Content-Encoding: gzip
    #[clap(long)]
    pub compress: bool,

    /// Maximum number of files processed at once (default: 5)
    #[clap(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Show the keys that would be uploaded without uploading
    #[clap(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress per-file log lines
    #[clap(short, long)]
    pub quiet: bool,

    /// Canned ACL for uploaded objects (default: public-read)
    #[clap(long)]
    pub acl: Option<String>,

    /// Cache-Control header for uploaded objects (default: max-age=300)
    #[clap(long)]
    pub cache_control: Option<String>,

    /// Prefix prepended to every key
    #[clap(long)]
    pub key_prefix: Option<String>,

    /// Only upload keys matching this regex (checked after the prefix is applied)
    #[clap(long)]
    pub key_pattern: Option<String>,

    /// Write a JSON report of the run to this file
    #[clap(long)]
    pub report: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a configuration file with every default filled in
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = DEFAULT_CONFIG_NAME)]
        path: PathBuf,
    },
}

impl Args {
    /// Settings given on the command line; unset flags stay `None`
    pub fn to_settings(&self) -> UploadSettings {
        UploadSettings {
            cwd: self.cwd.clone(),
            bucket: self.bucket.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            profile: self.profile.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            includes: non_empty(&self.includes),
            excludes: non_empty(&self.excludes),
            compress: self.compress.then_some(true),
            concurrency: self.concurrency,
            dry_run: self.dry_run.then_some(true),
            logging: self.quiet.then_some(false),
            acl: self.acl.clone(),
            cache_control: self.cache_control.clone(),
            key_prefix: self.key_prefix.clone(),
            key_pattern: self.key_pattern.clone(),
        }
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values.to_vec())
    }
}
