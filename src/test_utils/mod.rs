//! Shared fixtures for unit tests.

#![cfg(test)]

use std::fs;
use std::path::Path;

use anyhow::Result;
use tempfile::TempDir;

use crate::config::UploadSettings;

/// Creates a small static site in a temporary directory:
///
/// ```text
/// index.html  about.html  LICENSE  .DS_Store
/// css/site.css  js/app.js  img/logo.png  logs/app.log
/// node_modules/lib/c.js
/// ```
pub fn create_site_tree() -> Result<TempDir> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    for dir in ["css", "js", "img", "logs", "node_modules/lib"] {
        fs::create_dir_all(root.join(dir))?;
    }

    fs::write(root.join("index.html"), "<html><body>home</body></html>".repeat(20))?;
    fs::write(root.join("about.html"), "<html><body>about</body></html>")?;
    fs::write(root.join("LICENSE"), "MIT")?;
    fs::write(root.join(".DS_Store"), [0u8; 16])?;
    fs::write(root.join("css/site.css"), "body { margin: 0 }")?;
    fs::write(root.join("js/app.js"), "console.log('hi');")?;
    fs::write(root.join("img/logo.png"), [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a])?;
    fs::write(root.join("logs/app.log"), "started")?;
    fs::write(root.join("node_modules/lib/c.js"), "module.exports = 1;")?;

    Ok(temp_dir)
}

/// Minimal settings uploading `root` to the `site` bucket with static credentials
pub fn settings_for(root: &Path) -> UploadSettings {
    UploadSettings {
        cwd: Some(root.to_path_buf()),
        bucket: Some("site".to_string()),
        access_key_id: Some("AKIATEST".to_string()),
        secret_access_key: Some("test-secret".to_string()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_tree_layout() {
        let dir = create_site_tree().unwrap();
        assert!(dir.path().join("node_modules/lib/c.js").is_file());
        assert!(dir.path().join("img/logo.png").is_file());
    }
}
