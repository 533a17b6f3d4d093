use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::context::ResolveOptions;
use crate::errors::ResolveError;
use crate::namespace::{inject_namespace, Clock, SystemClock};
use crate::template::resolve_template_string;

static NULL: Value = Value::Null;

// =========================
// Public API (Structural)
// =========================

/// A resolved value plus every finding gathered on the way, in encounter order.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub value: Value,
    pub errors: Vec<ResolveError>,
}

impl Resolution {
    /// No template was missing or empty.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn into_parts(self) -> (Value, Vec<String>) {
        let messages = self.error_messages();
        (self.value, messages)
    }
}

/// Walks JSON-shaped input and resolves every `{$...}` template in its strings.
///
/// Cheap to clone and safe to share: each [`Resolver::resolve`] call owns its
/// context copy and error list.
#[derive(Clone)]
pub struct Resolver {
    options: ResolveOptions,
    clock: Arc<dyn Clock>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolveOptions::default())
    }
}

impl Resolver {
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            options,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve `input` against `context`. Never fails; see [`Resolution::errors`].
    pub fn resolve(&self, input: &Value, context: Option<&Value>) -> Resolution {
        let injected;
        let context = if self.options.inject_namespace {
            // once per call, so every `now` reference agrees
            injected = inject_namespace(context, self.clock.as_ref());
            &injected
        } else {
            context.unwrap_or(&NULL)
        };

        let mut errors = Vec::new();
        let value = self.resolve_value(input, context, &mut errors);
        debug!(errors = errors.len(), "resolved templates");
        Resolution { value, errors }
    }

    fn resolve_value(&self, value: &Value, context: &Value, errors: &mut Vec<ResolveError>) -> Value {
        match value {
            Value::String(s) => {
                Value::String(resolve_template_string(s, context, &self.options, errors))
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_value(item, context, errors))
                    .filter(|resolved| self.keep(resolved))
                    .collect(),
            ),
            Value::Object(map) => {
                let mut out = Map::new();
                for (key, val) in map {
                    let resolved = self.resolve_value(val, context, errors);
                    if self.keep(&resolved) {
                        out.insert(key.clone(), resolved);
                    }
                }
                Value::Object(out)
            }
            // numbers, booleans and null are never templates
            other => other.clone(),
        }
    }

    /// Under the omit option, empty strings vanish from sequences and mappings.
    fn keep(&self, resolved: &Value) -> bool {
        !(self.options.omit_no_value_for_exact_templates && resolved.as_str() == Some(""))
    }
}
