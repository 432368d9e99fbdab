use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use rusoto_core::ByteStream;
use rusoto_s3::{PutObjectRequest, S3Client, S3};

use crate::cloud::client::create_s3_client;
use crate::cloud::putter::{ObjectPutter, PutObject};
use crate::config::UploadConfig;
use crate::constants::{VARY_METADATA_KEY, VARY_METADATA_VALUE};
use crate::error::UploadError;

/// [`ObjectPutter`] backed by a rusoto S3 client
pub struct S3Putter {
    client: S3Client,
}

impl S3Putter {
    pub fn new(client: S3Client) -> Self {
        S3Putter { client }
    }

    /// Build the client from a run configuration's region and credentials
    pub fn from_config(config: &UploadConfig) -> Result<Self, UploadError> {
        let client = create_s3_client(config.region.clone(), &config.credentials)?;
        Ok(S3Putter::new(client))
    }
}

/// Translate a put into the rusoto request, adding `Vary: Accept-Encoding`
/// metadata to gzip-encoded objects
pub fn build_request(object: PutObject) -> PutObjectRequest {
    let metadata = object.content_encoding.as_ref().map(|_| {
        let mut metadata = HashMap::new();
        metadata.insert(VARY_METADATA_KEY.to_string(), VARY_METADATA_VALUE.to_string());
        metadata
    });

    PutObjectRequest {
        bucket: object.bucket,
        key: object.key,
        content_length: Some(object.body.len() as i64),
        body: Some(ByteStream::from(object.body)),
        acl: Some(object.acl),
        cache_control: Some(object.cache_control),
        content_type: Some(object.content_type),
        content_encoding: object.content_encoding,
        metadata,
        ..Default::default()
    }
}

#[async_trait]
impl ObjectPutter for S3Putter {
    async fn put(&self, object: PutObject) -> Result<(), UploadError> {
        let bucket = object.bucket.clone();
        let key = object.key.clone();
        let size = object.body.len();

        self.client
            .put_object(build_request(object))
            .await
            .map_err(|e| UploadError::Put {
                bucket: bucket.clone(),
                key: key.clone(),
                reason: e.to_string(),
            })?;

        debug!("Stored s3://{}/{} ({} bytes)", bucket, key, size);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::client::resolve_region;
    use crate::config::Credentials;

    fn object(content_encoding: Option<&str>) -> PutObject {
        PutObject {
            bucket: "site".to_string(),
            key: "index.html".to_string(),
            body: b"<html></html>".to_vec(),
            content_type: "text/html; charset=utf-8".to_string(),
            content_encoding: content_encoding.map(str::to_string),
            cache_control: "max-age=300".to_string(),
            acl: "public-read".to_string(),
        }
    }

    #[test]
    fn test_request_carries_headers() {
        let request = build_request(object(None));
        assert_eq!(request.bucket, "site");
        assert_eq!(request.key, "index.html");
        assert_eq!(request.content_length, Some(13));
        assert_eq!(request.acl.as_deref(), Some("public-read"));
        assert_eq!(request.cache_control.as_deref(), Some("max-age=300"));
        assert_eq!(request.content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert!(request.content_encoding.is_none());
        assert!(request.metadata.is_none());
        assert!(request.body.is_some());
    }

    #[test]
    fn test_gzip_request_adds_vary_metadata() {
        let request = build_request(object(Some("gzip")));
        assert_eq!(request.content_encoding.as_deref(), Some("gzip"));
        let metadata = request.metadata.unwrap();
        assert_eq!(metadata.get("Vary").map(String::as_str), Some("Accept-Encoding"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_put_error() {
        let region = resolve_region("local", Some("http://127.0.0.1:9")).unwrap();
        let credentials = Credentials::Static {
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
        };
        let putter = S3Putter::new(create_s3_client(region, &credentials).unwrap());

        let err = putter.put(object(None)).await.unwrap_err();
        match err {
            UploadError::Put { bucket, key, .. } => {
                assert_eq!(bucket, "site");
                assert_eq!(key, "index.html");
            }
            other => panic!("expected put error, got {:?}", other),
        }
    }
}
