//! Extension to content-type classification.
//!
//! Common web extensions are pinned to fixed types; everything else goes
//! through the `mime_guess` extension database. Lookups fail closed: an
//! extension neither knows yields `None` and the pipeline skips the file
//! rather than upload it with a guessed type.

use std::collections::HashMap;
use std::path::Path;

use lazy_static::lazy_static;
use mime::Mime;

use crate::constants::UNCOMPRESSIBLE_EXTENSIONS;

lazy_static! {
    static ref WEB_CONTENT_TYPES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        // Documents and text
        m.insert("html", "text/html");
        m.insert("htm", "text/html");
        m.insert("shtml", "text/html");
        m.insert("css", "text/css");
        m.insert("txt", "text/plain");
        m.insert("text", "text/plain");
        m.insert("log", "text/plain");
        m.insert("md", "text/markdown");
        m.insert("markdown", "text/markdown");
        m.insert("csv", "text/csv");
        m.insert("xml", "application/xml");
        m.insert("rss", "application/rss+xml");
        m.insert("atom", "application/atom+xml");
        m.insert("yaml", "text/yaml");
        m.insert("yml", "text/yaml");
        m.insert("ics", "text/calendar");
        m.insert("vtt", "text/vtt");
        m.insert("pdf", "application/pdf");
        // Scripts and data
        m.insert("js", "application/javascript");
        m.insert("mjs", "application/javascript");
        m.insert("json", "application/json");
        m.insert("map", "application/json");
        m.insert("jsonld", "application/ld+json");
        m.insert("webmanifest", "application/manifest+json");
        m.insert("wasm", "application/wasm");
        // Images
        m.insert("png", "image/png");
        m.insert("jpg", "image/jpeg");
        m.insert("jpeg", "image/jpeg");
        m.insert("gif", "image/gif");
        m.insert("ico", "image/x-icon");
        m.insert("svg", "image/svg+xml");
        m.insert("webp", "image/webp");
        m.insert("avif", "image/avif");
        m.insert("bmp", "image/bmp");
        m.insert("tif", "image/tiff");
        m.insert("tiff", "image/tiff");
        // Audio
        m.insert("mp3", "audio/mpeg");
        m.insert("ogg", "audio/ogg");
        m.insert("m4a", "audio/mp4");
        m.insert("aac", "audio/aac");
        m.insert("flac", "audio/flac");
        m.insert("wav", "audio/wav");
        // Video
        m.insert("mp4", "video/mp4");
        m.insert("webm", "video/webm");
        m.insert("mov", "video/quicktime");
        // Fonts
        m.insert("woff", "font/woff");
        m.insert("woff2", "font/woff2");
        m.insert("ttf", "font/ttf");
        m.insert("otf", "font/otf");
        m.insert("eot", "application/vnd.ms-fontobject");
        // Archives
        m.insert("zip", "application/zip");
        m.insert("gz", "application/gzip");
        m.insert("br", "application/x-brotli");
        m.insert("tar", "application/x-tar");
        m
    };
}

/// Result of classifying an extension
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Header value, with a UTF-8 charset for textual types
    pub content_type: String,
    /// Whether gzip is worth applying when compression is enabled
    pub compressible: bool,
}

/// Classify a bare extension (`"html"`, with or without a leading dot).
///
/// Returns `None` when the type cannot be resolved.
pub fn classify(extension: &str) -> Option<Classification> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    if ext.is_empty() {
        return None;
    }

    let mime: Mime = match WEB_CONTENT_TYPES.get(ext.as_str()) {
        Some(essence) => essence.parse().ok()?,
        None => mime_guess::from_ext(&ext).first()?,
    };

    let content_type = if has_utf8_charset(&mime) {
        format!("{}; charset=utf-8", mime.essence_str())
    } else {
        mime.essence_str().to_string()
    };

    Some(Classification {
        content_type,
        compressible: !UNCOMPRESSIBLE_EXTENSIONS.contains(&ext.as_str()),
    })
}

/// Classify a path by its extension
pub fn classify_path(path: &Path) -> Option<Classification> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(classify)
}

fn has_utf8_charset(mime: &Mime) -> bool {
    mime.type_() == mime::TEXT
        || (mime.type_() == mime::APPLICATION
            && (mime.subtype() == mime::JAVASCRIPT || mime.subtype() == mime::JSON))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_types_carry_charset() {
        let html = classify("html").unwrap();
        assert_eq!(html.content_type, "text/html; charset=utf-8");
        assert!(html.compressible);

        let js = classify(".js").unwrap();
        assert_eq!(js.content_type, "application/javascript; charset=utf-8");

        let json = classify("json").unwrap();
        assert_eq!(json.content_type, "application/json; charset=utf-8");
    }

    #[test]
    fn test_binary_types_have_no_charset() {
        let png = classify("png").unwrap();
        assert_eq!(png.content_type, "image/png");
        assert!(!png.compressible);

        assert_eq!(classify("svg").unwrap().content_type, "image/svg+xml");
    }

    #[test]
    fn test_media_is_not_compressible() {
        for ext in ["png", "jpg", "gif", "ico", "mp3", "mp4", "ogg", "webm", "woff2"] {
            let class = classify(ext).unwrap_or_else(|| panic!("{} should resolve", ext));
            assert!(!class.compressible, "{} should not be compressible", ext);
        }
    }

    #[test]
    fn test_text_and_scripts_are_compressible() {
        for ext in ["html", "css", "js", "json", "svg", "txt", "xml", "wasm"] {
            assert!(classify(ext).unwrap().compressible, "{} should be compressible", ext);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(classify("PNG"), classify("png"));
        assert_eq!(classify("Html").unwrap().content_type, "text/html; charset=utf-8");
    }

    #[test]
    fn test_database_covers_other_extensions() {
        let docx = classify("docx").unwrap();
        assert_eq!(
            docx.content_type,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert!(docx.compressible);

        assert_eq!(classify("EPUB").unwrap().content_type, "application/epub+zip");
    }

    #[test]
    fn test_unknown_extension_is_unresolvable() {
        assert!(classify("unknownext").is_none());
        assert!(classify("").is_none());
        assert!(classify(".").is_none());
    }

    #[test]
    fn test_classify_path() {
        assert!(classify_path(Path::new("css/site.css")).is_some());
        assert!(classify_path(Path::new("LICENSE")).is_none());
        assert!(classify_path(Path::new(".gitignore")).is_none());
    }
}
