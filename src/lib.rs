pub mod errors;
pub mod context;
pub mod engine;     // structural walk over inputs
pub mod namespace;  // runtime values merged into the job context
pub mod template;
mod jsonpath;
mod parser;

use serde_json::Value;
use errors::{InputError, Result};
use context::ResolveOptions;

pub use engine::{Resolution, Resolver};
pub use errors::ResolveError;
pub use jsonpath::{extract, extract_str, Extraction, Path};
pub use namespace::{inject_namespace, Clock, FixedClock, SystemClock};
pub use parser::parse_path;
pub use template::{find_templates, resolve_template_string, NO_VALUE};

/// Resolve every `{$...}` template in `input` against `context`.
///
/// Returns the resolved value (same shape as `input`) and the error messages
/// collected along the way; an empty list means everything resolved.
pub fn resolve(
    input: &Value,
    context: Option<&Value>,
    options: ResolveOptions,
) -> (Value, Vec<String>) {
    Resolver::new(options).resolve(input, context).into_parts()
}

/// Convenience: parse JSON text for input and context, then resolve.
/// Fails only when either document is not valid JSON.
pub fn resolve_json_str(
    input: &str,
    context: Option<&str>,
    options: ResolveOptions,
) -> Result<Resolution> {
    let input: Value = serde_json::from_str(input)
        .map_err(|source| InputError::Json { what: "input", source })?;
    let context = context
        .map(serde_json::from_str::<Value>)
        .transpose()
        .map_err(|source| InputError::Json { what: "context", source })?;
    Ok(Resolver::new(options).resolve(&input, context.as_ref()))
}
