//! Public URL construction for stored objects.

/// Builds the retrieval URL for a storage key from configuration alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicUrlBuilder {
    /// CDN distribution in front of the bucket: `https://{host}/{key}`
    Cdn { host: String },
    /// AWS virtual-hosted style: `https://{bucket}.s3.{region}.amazonaws.com/{key}`
    S3 { bucket: String, region: String },
    /// S3-compatible provider, path style: `{endpoint}/{bucket}/{key}`
    S3Compatible { endpoint: String, bucket: String },
    /// Local backend served from `{base_url}/{key}`
    Local { base_url: String },
}

impl PublicUrlBuilder {
    pub fn url_for(&self, key: &str) -> String {
        let key = key.trim_start_matches('/');
        match self {
            PublicUrlBuilder::Cdn { host } => {
                let host = host
                    .trim_start_matches("https://")
                    .trim_start_matches("http://")
                    .trim_end_matches('/');
                format!("https://{}/{}", host, key)
            }
            PublicUrlBuilder::S3 { bucket, region } => {
                format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
            }
            PublicUrlBuilder::S3Compatible { endpoint, bucket } => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
            }
            PublicUrlBuilder::Local { base_url } => {
                format!("{}/{}", base_url.trim_end_matches('/'), key)
            }
        }
    }
}
