//! Glob patterns compiled to anchored regular expressions.
//!
//! Supported syntax: `*` and `?` within one path segment, `[abc]` / `[!abc]`
//! character classes, `{a,b}` alternation, `\` escapes and `**` spanning any
//! number of directories. Paths are always `/`-separated.
//!
//! Wildcards never match a path segment that starts with `.`. Such a segment
//! is only matched by a pattern segment that itself starts with a dot, so
//! `**/**` skips `.git/config` while `.well-known/*` selects it.

use regex::Regex;

use crate::error::UploadError;

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
    has_separator: bool,
    /// Pattern segments that may match a dot-prefixed path segment
    dot_segments: Vec<Regex>,
}

impl GlobPattern {
    /// Compile a glob pattern, rejecting malformed input as a configuration error
    pub fn new(pattern: &str) -> Result<Self, UploadError> {
        if pattern.is_empty() {
            return Err(UploadError::config("empty glob pattern"));
        }

        let regex = compile(pattern)?;
        let dot_segments = split_segments(pattern)
            .into_iter()
            .filter(|segment| explicitly_dotted(segment))
            .map(compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GlobPattern {
            source: pattern.to_string(),
            regex,
            has_separator: pattern.contains('/'),
            dot_segments,
        })
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match against the whole relative path
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path) && self.allows_dot_segments(path)
    }

    /// Every dot-prefixed segment of `path` must be named by a dotted pattern segment
    fn allows_dot_segments(&self, path: &str) -> bool {
        path.split('/')
            .filter(|segment| segment.starts_with('.'))
            .all(|segment| self.dot_segments.iter().any(|r| r.is_match(segment)))
    }

    /// Match against the whole path, or against the final segment when the
    /// pattern itself has no `/`
    pub fn matches_base(&self, path: &str) -> bool {
        if self.matches(path) {
            return true;
        }
        if self.has_separator {
            return false;
        }
        match path.rsplit('/').next() {
            Some(basename) if basename != path => self.matches(basename),
            _ => false,
        }
    }
}

/// Compile a list of patterns, failing on the first malformed one
pub fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<GlobPattern>, UploadError> {
    patterns.iter().map(|p| GlobPattern::new(p.as_ref())).collect()
}

fn compile(pattern: &str) -> Result<Regex, UploadError> {
    let translated = translate(pattern)?;
    Regex::new(&translated)
        .map_err(|e| UploadError::config(format!("invalid glob pattern '{}': {}", pattern, e)))
}

/// Split on `/` outside of braces and character classes
fn split_segments(pattern: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut in_class = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in pattern.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '{' if !in_class => depth += 1,
            '}' if !in_class && depth > 0 => depth -= 1,
            '/' if !in_class && depth == 0 => {
                segments.push(&pattern[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&pattern[start..]);
    segments
}

/// A segment written with a leading dot, directly, escaped or inside braces
fn explicitly_dotted(segment: &str) -> bool {
    segment.starts_with('.')
        || segment.starts_with("\\.")
        || (segment.starts_with('{') && (segment.contains("{.") || segment.contains(",.")))
}

fn translate(pattern: &str) -> Result<String, UploadError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    out.push('^');

    let mut brace_depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let at_segment_start = i == 0 || chars[i - 1] == '/';
                i += 2;
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                if at_segment_start && chars.get(i) == Some(&'/') {
                    // "**/" matches zero or more whole directories
                    out.push_str("(?:[^/]*/)*");
                    i += 1;
                } else {
                    out.push_str(".*");
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i + 1..end]));
                    i = end + 1;
                    continue;
                }
                None => out.push_str(r"\["),
            },
            '{' => {
                brace_depth += 1;
                out.push_str("(?:");
            }
            ',' if brace_depth > 0 => out.push('|'),
            '}' if brace_depth > 0 => {
                brace_depth -= 1;
                out.push(')');
            }
            '\\' => {
                i += 1;
                match chars.get(i) {
                    Some(escaped) => out.push_str(&regex::escape(&escaped.to_string())),
                    None => out.push_str(r"\\"),
                }
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
        i += 1;
    }

    if brace_depth > 0 {
        return Err(UploadError::config(format!(
            "unbalanced '{{' in glob pattern '{}'",
            pattern
        )));
    }

    out.push('$');
    Ok(out)
}

/// Index of the `]` closing the class opened at `start`, if any
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if matches!(chars.get(j), Some('!') | Some('^')) {
        j += 1;
    }
    // A leading ']' is a literal member
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() {
        if chars[j] == ']' {
            return Some(j);
        }
        j += 1;
    }
    None
}

fn translate_class(body: &[char]) -> String {
    let mut class = String::from("[");
    let mut rest = body;

    if let Some(('!' | '^', tail)) = rest.split_first() {
        class.push('^');
        rest = tail;
    }

    for &c in rest {
        match c {
            '\\' | '[' | ']' | '&' | '~' => {
                class.push('\\');
                class.push(c);
            }
            _ => class.push(c),
        }
    }

    class.push(']');
    class
}
