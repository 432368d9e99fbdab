//! Object storage boundary.
//!
//! The pipeline only ever talks to an [`ObjectPutter`]: one call stores one
//! object and reports success or failure, with no retry. [`S3Putter`] is the
//! production implementation over rusoto; tests substitute their own.
//!
//! ```no_run
//! use bucket_uploader::cloud::{create_s3_client, resolve_region, S3Putter};
//! use bucket_uploader::config::Credentials;
//!
//! # fn example() -> Result<(), bucket_uploader::UploadError> {
//! let region = resolve_region("ap-northeast-1", None)?;
//! let credentials = Credentials::Profile { name: "default".to_string() };
//! let putter = S3Putter::new(create_s3_client(region, &credentials)?);
//! # Ok(())
//! # }
//! ```

/// Region resolution and S3 client construction
pub mod client;

/// The put-one-object abstraction
pub mod putter;

/// rusoto-backed putter
pub mod s3;

pub use client::{create_s3_client, resolve_region};
pub use putter::{ObjectPutter, PutObject};
pub use s3::S3Putter;

#[cfg(test)]
pub use putter::MockObjectPutter;
