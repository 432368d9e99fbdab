//! Global constants for bucket-uploader.
//!
//! Defaults applied to a run configuration, the fixed deny list of file
//! system artifacts, and the extensions that are never gzip-encoded.

// Run defaults
/// Number of upload workers when none is configured
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Cache-Control header sent with every object
pub const DEFAULT_CACHE_CONTROL: &str = "max-age=300";

/// Canned ACL sent with every object
pub const DEFAULT_ACL: &str = "public-read";

/// Region used when none is configured
pub const DEFAULT_REGION: &str = "ap-northeast-1";

/// Include pattern selecting every file below the root
pub const DEFAULT_INCLUDE_PATTERN: &str = "**/**";

// Object headers
/// Content-Encoding value for compressed payloads
pub const GZIP_ENCODING: &str = "gzip";

/// Metadata added to gzip-encoded objects so caches key on the encoding
pub const VARY_METADATA_KEY: &str = "Vary";
pub const VARY_METADATA_VALUE: &str = "Accept-Encoding";

// File selection
/// Names that are never uploaded, wherever they appear in a path
pub const IGNORED_NAMES: &[&str] = &[".DS_Store", "Thumbs.db", "bower_components", "node_modules"];

/// Extensions whose content is already compressed (media, archives, fonts)
pub const UNCOMPRESSIBLE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "webp", "avif", "mp3", "ogg", "m4a", "aac", "flac", "mp4",
    "webm", "mov", "zip", "gz", "br", "woff", "woff2",
];

// Default file names
pub const DEFAULT_CONFIG_NAME: &str = "uploader.yaml";
