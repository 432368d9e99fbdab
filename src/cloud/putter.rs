use std::fmt;

use async_trait::async_trait;

use crate::error::UploadError;

/// Everything needed to store one object
#[derive(Clone, PartialEq)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    /// `Some("gzip")` when the body is compressed
    pub content_encoding: Option<String>,
    pub cache_control: String,
    pub acl: String,
}

impl fmt::Debug for PutObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PutObject")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .field("body_len", &self.body.len())
            .field("content_type", &self.content_type)
            .field("content_encoding", &self.content_encoding)
            .field("cache_control", &self.cache_control)
            .field("acl", &self.acl)
            .finish()
    }
}

/// Stores a single object in remote storage.
///
/// Implementations make exactly one remote call per `put` and never retry.
/// They are shared by every upload worker, so concurrent calls must be safe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectPutter: Send + Sync {
    async fn put(&self, object: PutObject) -> Result<(), UploadError>;
}
