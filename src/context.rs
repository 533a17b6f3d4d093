use serde::{Deserialize, Serialize};

/// Knobs for a single resolution call.
///
/// Deserializes from the camelCase document callers already pass around, e.g.
/// `{"omitNoValueForExactTemplates": true}`; missing fields keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ResolveOptions {
    /// Unresolved exact templates become `""` instead of `{No Value}`, and empty
    /// strings are dropped from sequences and mappings.
    pub omit_no_value_for_exact_templates: bool,
    /// Merge runtime values (`sgnl.time.now`) into the context first.
    pub inject_namespace: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            omit_no_value_for_exact_templates: false,
            inject_namespace: true,
        }
    }
}

impl ResolveOptions {
    pub fn omit_no_value(mut self, on: bool) -> Self {
        self.omit_no_value_for_exact_templates = on;
        self
    }

    pub fn inject_namespace(mut self, on: bool) -> Self {
        self.inject_namespace = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_document_keeps_defaults() {
        let opts: ResolveOptions =
            serde_json::from_str(r#"{"omitNoValueForExactTemplates": true}"#).unwrap();
        assert_eq!(
            opts,
            ResolveOptions {
                omit_no_value_for_exact_templates: true,
                inject_namespace: true,
            }
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<ResolveOptions>(r#"{"omitNoValue": true}"#).is_err());
    }

    #[test]
    fn builder_overrides() {
        let opts = ResolveOptions::default().omit_no_value(true).inject_namespace(false);
        assert!(opts.omit_no_value_for_exact_templates);
        assert!(!opts.inject_namespace);
    }
}
