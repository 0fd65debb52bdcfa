//! Path and value formalization.
//!
//! Manifest values pass through formalization before they are written to the
//! environment or handed to the module loader: `${VAR}` placeholders are
//! resolved against the environment store and path separators are normalized
//! to forward slashes.

use crate::error::EnvironmentError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Separator used when joining multiple values into one environment entry.
#[cfg(windows)]
pub const LIST_SEPARATOR: char = ';';
/// Separator used when joining multiple values into one environment entry.
#[cfg(not(windows))]
pub const LIST_SEPARATOR: char = ':';

static VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder pattern"));

/// Formalize a manifest value: expand `${VAR}` placeholders through `lookup`
/// and normalize path separators.
///
/// A placeholder naming a variable `lookup` cannot resolve is an error; the
/// caller decides whether that skips the directive or aborts. Text without
/// placeholders passes through with separators normalized only.
pub fn formalize<F>(raw: &str, lookup: F) -> Result<String, EnvironmentError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut expanded = String::with_capacity(raw.len());
    let mut last = 0;

    for caps in VAR_PATTERN.captures_iter(raw) {
        if let (Some(full), Some(name)) = (caps.get(0), caps.get(1)) {
            expanded.push_str(&raw[last..full.start()]);
            match lookup(name.as_str()) {
                Some(value) => expanded.push_str(&value),
                None => return Err(EnvironmentError::UnknownVariable(name.as_str().to_string())),
            }
            last = full.end();
        }
    }
    expanded.push_str(&raw[last..]);

    Ok(normalize_separators(&expanded))
}

/// Normalize backslashes to forward slashes, collapse runs of slashes, and
/// strip a trailing slash (keeping a lone root).
fn normalize_separators(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_slash = false;

    for ch in value.chars() {
        let slash = ch == '/' || ch == '\\';
        if slash {
            if !prev_slash {
                out.push('/');
            }
        } else {
            out.push(ch);
        }
        prev_slash = slash;
    }

    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}
