//! # bucket-uploader
//!
//! Uploads the contents of a local directory to an S3 bucket.
//!
//! Files are selected with include globs, dropped by a fixed ignore list
//! (`.DS_Store`, `node_modules`, ...), exclude globs and optional key hooks,
//! given a content type from their extension and optionally gzip-compressed.
//! A fixed pool of workers processes them with bounded concurrency.
//!
//! ## Usage
//!
//! ```no_run
//! use bucket_uploader::config::{UploadConfig, UploadSettings};
//! use bucket_uploader::pipeline::upload;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), bucket_uploader::UploadError> {
//! let settings = UploadSettings {
//!     cwd: Some(PathBuf::from("./public")),
//!     bucket: Some("static-site".to_string()),
//!     compress: Some(true),
//!     ..Default::default()
//! };
//!
//! let report = upload(UploadConfig::from_settings(settings)?).await?;
//! println!("{}", report.tally());
//! # Ok(())
//! # }
//! ```
//!
//! Key hooks can be supplied as closures:
//!
//! ```
//! use bucket_uploader::filter::KeyHooks;
//!
//! let hooks = KeyHooks::default()
//!     .with_transform(|key| format!("v2/{}", key))
//!     .with_filter(|key| !key.ends_with(".map"));
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: YAML settings and the validated run configuration
//! - [`walker`] and [`glob`]: file enumeration
//! - [`filter`], [`classifier`], [`encoder`]: per-file decisions
//! - [`cloud`]: the put abstraction and its S3 implementation
//! - [`pipeline`]: the bounded worker pool
//! - [`summary`]: batch report and completion signal

pub mod classifier;
pub mod cli;
pub mod cloud;
pub mod config;
pub mod constants;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod glob;
pub mod pipeline;
pub mod summary;
pub mod walker;

#[cfg(test)]
pub mod test_utils;

pub use error::UploadError;
pub use pipeline::{upload, Outcome, UploadPipeline};
pub use summary::{BatchReport, BatchResult};
