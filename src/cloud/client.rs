use log::debug;
use rusoto_core::{HttpClient, Region};
use rusoto_credential::{ProfileProvider, StaticProvider};
use rusoto_s3::S3Client;

use crate::config::Credentials;
use crate::error::UploadError;

/// Resolve a region name, or a custom region when an S3-compatible endpoint is given
pub fn resolve_region(name: &str, endpoint: Option<&str>) -> Result<Region, UploadError> {
    match endpoint {
        Some(endpoint) => Ok(Region::Custom {
            name: name.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }),
        None => name
            .parse::<Region>()
            .map_err(|_| UploadError::config(format!("unknown region '{}'", name))),
    }
}

/// Create an S3 client for the region with the given credentials.
///
/// The client is built once per run and shared by every worker.
pub fn create_s3_client(region: Region, credentials: &Credentials) -> Result<S3Client, UploadError> {
    let http_client = HttpClient::new()
        .map_err(|e| UploadError::config(format!("Failed to create HTTP client: {}", e)))?;

    let client = match credentials {
        Credentials::Static { access_key_id, secret_access_key } => {
            debug!("Using static credentials for region {}", region.name());
            let provider = StaticProvider::new_minimal(access_key_id.clone(), secret_access_key.clone());
            S3Client::new_with(http_client, provider, region)
        }
        Credentials::Profile { name } => {
            debug!("Using AWS profile '{}' for region {}", name, region.name());
            let mut provider = ProfileProvider::new().map_err(|e| {
                UploadError::config(format!("Failed to create AWS profile provider: {}", e))
            })?;
            provider.set_profile(name.clone());
            S3Client::new_with(http_client, provider, region)
        }
    };

    Ok(client)
}
