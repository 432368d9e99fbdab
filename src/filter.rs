//! Per-candidate key decisions: ignore list, exclude patterns and the
//! caller-supplied key hooks.

use std::fmt;
use std::sync::Arc;

use crate::constants::IGNORED_NAMES;
use crate::glob::GlobPattern;

/// Rewrites a relative path into the final object key
pub type KeyTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Decides whether a (transformed) key is uploaded
pub type KeyFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Optional key hooks. An absent transform is the identity and an absent
/// filter accepts every key.
#[derive(Clone, Default)]
pub struct KeyHooks {
    pub transform: Option<KeyTransform>,
    pub filter: Option<KeyFilter>,
}

impl KeyHooks {
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }
}

impl fmt::Debug for KeyHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyHooks")
            .field("transform", &self.transform.is_some())
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// True for names on the fixed deny list of OS metadata files and
/// dependency directories
pub fn is_ignored_name(basename: &str) -> bool {
    IGNORED_NAMES.contains(&basename)
}

/// True if any segment of a `/`-separated relative path is on the deny list,
/// so files below `node_modules/` are ignored as well as the name itself
pub fn is_ignored_path(relative_path: &str) -> bool {
    relative_path.split('/').any(is_ignored_name)
}

/// True if any exclude pattern matches the path or its final segment
pub fn is_excluded(relative_path: &str, excludes: &[GlobPattern]) -> bool {
    !relative_path.is_empty() && excludes.iter().any(|p| p.matches_base(relative_path))
}

/// Apply the transform hook once, or return the key unchanged
pub fn transform_key(key: &str, transform: Option<&KeyTransform>) -> String {
    match transform {
        Some(transform) => transform(key),
        None => key.to_string(),
    }
}

/// Evaluate the filter hook against an already transformed key
pub fn accepts_key(key: &str, filter: Option<&KeyFilter>) -> bool {
    filter.map_or(true, |filter| filter(key))
}
