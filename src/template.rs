use serde_json::Value;
use tracing::trace;

use crate::context::ResolveOptions;
use crate::errors::ResolveError;
use crate::jsonpath::{extract_str, Extraction};

/// Substituted for templates whose path located nothing.
pub const NO_VALUE: &str = "{No Value}";

/// One `{$...}` occurrence inside a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateMatch<'a> {
    /// Byte offset of the opening `{`.
    pub start: usize,
    /// Byte offset just past the closing `}`.
    pub end: usize,
    /// Text between the braces, starting with `$`.
    pub path: &'a str,
}

/// Left-to-right scanner over `{$` + non-`}` characters + `}`.
///
/// Holds no state beyond its cursor into one string.
#[derive(Debug, Clone)]
pub struct Templates<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Iterator for Templates<'a> {
    type Item = TemplateMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.s[self.pos..];
        let start = self.pos + rest.find("{$")?;
        // the first `}` after `{$` closes the template; without one nothing later can match either
        let close = start + 2 + self.s[start + 2..].find('}')?;
        self.pos = close + 1;
        Some(TemplateMatch {
            start,
            end: close + 1,
            path: &self.s[start + 1..close],
        })
    }
}

pub fn find_templates(s: &str) -> Templates<'_> {
    Templates { s, pos: 0 }
}

/// True when the whole string is exactly one template.
pub fn is_exact_template(s: &str) -> bool {
    s.starts_with("{$") && s.ends_with('}') && s.find('}') == Some(s.len() - 1)
}

/// Largest magnitude at which every whole f64 is an exact integer (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// String form used for substitution: strings verbatim, `null` as empty,
/// everything else as compact canonical JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => canonical(other).to_string(),
    }
}

/// Whole floats are written as integers (`100.0` -> `100`), at any depth.
fn canonical(value: &Value) -> Value {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
                Value::from(f as i64)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        Value::Object(map) => Value::Object(
            map.iter().map(|(k, v)| (k.clone(), canonical(v))).collect(),
        ),
        other => other.clone(),
    }
}

/// Replace every template in `s` with its value from `context`, recording a
/// [`ResolveError`] for each one that is missing or empty.
pub fn resolve_template_string(
    s: &str,
    context: &Value,
    opts: &ResolveOptions,
    errors: &mut Vec<ResolveError>,
) -> String {
    let mut matches = find_templates(s).peekable();
    if matches.peek().is_none() {
        return s.to_string();
    }
    let exact = is_exact_template(s);

    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for m in matches {
        out.push_str(&s[last..m.start]);
        out.push_str(&substitute(m.path, exact, context, opts, errors));
        last = m.end;
    }
    out.push_str(&s[last..]);
    out
}

fn substitute(
    path: &str,
    exact: bool,
    context: &Value,
    opts: &ResolveOptions,
    errors: &mut Vec<ResolveError>,
) -> String {
    match extract_str(context, path) {
        Extraction::NotFound => {
            trace!(path, exact, "template value not found");
            errors.push(ResolveError::FieldNotFound { path: path.to_string() });
            if exact && opts.omit_no_value_for_exact_templates {
                String::new()
            } else {
                NO_VALUE.to_string()
            }
        }
        Extraction::Found(value) => {
            let text = stringify(value);
            if text.is_empty() {
                trace!(path, "template value is empty");
                errors.push(ResolveError::FieldEmpty { path: path.to_string() });
            }
            text
        }
    }
}
