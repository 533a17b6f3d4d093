use std::fmt;

use itertools::Itertools;
use serde_json::Value;
use tracing::trace;

use crate::parser::parse_path;

/// A parsed path: mapping keys or sequence indices, consumed left to right.
///
/// Segments stay as text; whether `"0"` is an index or a key is decided
/// against the value being walked, not at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    pub segments: Vec<String>,
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .segments
            .iter()
            .map(|s| {
                if is_index(s) {
                    format!("[{s}]")
                } else if !s.is_empty() && s.chars().all(|c| c == '_' || c.is_alphanumeric()) {
                    format!(".{s}")
                } else {
                    format!("['{s}']")
                }
            })
            .join("");
        write!(f, "${rendered}")
    }
}

/// Outcome of walking a context with a [`Path`].
///
/// `null` at the end of the walk counts as not found: absent and null are the
/// same thing to callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extraction<'a> {
    Found(&'a Value),
    NotFound,
}

impl<'a> Extraction<'a> {
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Extraction::Found(v) => Some(v),
            Extraction::NotFound => None,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, Extraction::Found(_))
    }
}

/// Follow `path` from `root`.
pub fn extract<'a>(root: &'a Value, path: &Path) -> Extraction<'a> {
    let mut current = root;
    for seg in &path.segments {
        let next = match current {
            Value::Array(arr) if is_index(seg) => {
                // digits that overflow usize are out of range anyway
                seg.parse::<usize>().ok().and_then(|i| arr.get(i))
            }
            Value::Object(map) => map.get(seg),
            _ => None,
        };
        match next {
            Some(v) => current = v,
            None => {
                trace!(segment = %seg, "path segment did not match");
                return Extraction::NotFound;
            }
        }
    }
    if current.is_null() {
        Extraction::NotFound
    } else {
        Extraction::Found(current)
    }
}

/// Parse and extract in one go. `path` is the template text, e.g. `$.a[0]`.
pub fn extract_str<'a>(root: &'a Value, path: &str) -> Extraction<'a> {
    extract(root, &parse_path(path))
}

fn is_index(seg: &str) -> bool {
    !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit())
}
