//! Runtime values merged into the job context before resolution.
//!
//! Today that is only `sgnl.time.now`. Values the caller already placed under
//! `sgnl.time` win over the computed ones, so a caller can pin the clock by
//! supplying `sgnl.time.now` itself.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::trace;

/// Top-level key owned by the injector.
pub const NAMESPACE_KEY: &str = "sgnl";

/// Source of "now" for injection.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// `2025-12-04T17:30:00Z`: second precision, literal `Z`.
pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Copy of `context` with `sgnl.time.now` filled in from `clock`.
///
/// The result is always a mapping. Sequences are lifted to index keys
/// (`"0"`, `"1"`, ...); absent, `null` and scalar contexts start out empty.
pub fn inject_namespace(context: Option<&Value>, clock: &dyn Clock) -> Value {
    let mut root = match context {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::Array(items)) => {
            trace!(len = items.len(), "lifting sequence context to index keys");
            items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect()
        }
        _ => Map::new(),
    };

    let mut sgnl = take_object(&mut root, NAMESPACE_KEY);
    let mut time = take_object(&mut sgnl, "time");
    if time.contains_key("now") {
        trace!("caller supplied sgnl.time.now; keeping it");
    } else {
        time.insert("now".into(), Value::String(format_timestamp(clock.now())));
    }
    sgnl.insert("time".into(), Value::Object(time));
    root.insert(NAMESPACE_KEY.into(), Value::Object(sgnl));

    Value::Object(root)
}

/// Removes the mapping under `key`; anything that is not a mapping is dropped.
fn take_object(map: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match map.remove(key) {
        Some(Value::Object(inner)) => inner,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 12, 4, 17, 30, 0).unwrap())
    }

    #[test]
    fn formats_without_fraction_or_offset() {
        let t = Utc.with_ymd_and_hms(2024, 2, 29, 1, 2, 3).unwrap()
            + chrono::Duration::milliseconds(456);
        assert_eq!(format_timestamp(t), "2024-02-29T01:02:03Z");
    }

    #[test]
    fn absent_context_gets_namespace() {
        assert_eq!(
            inject_namespace(None, &clock()),
            json!({"sgnl": {"time": {"now": "2025-12-04T17:30:00Z"}}})
        );
        assert_eq!(
            inject_namespace(Some(&Value::Null), &clock()),
            json!({"sgnl": {"time": {"now": "2025-12-04T17:30:00Z"}}})
        );
    }

    #[test]
    fn keeps_caller_keys_and_siblings() {
        let ctx = json!({"a": 1, "sgnl": {"env": "prod", "time": {"zone": "UTC"}}});
        assert_eq!(
            inject_namespace(Some(&ctx), &clock()),
            json!({
                "a": 1,
                "sgnl": {"env": "prod", "time": {"zone": "UTC", "now": "2025-12-04T17:30:00Z"}}
            })
        );
    }

    #[test]
    fn caller_now_wins() {
        let ctx = json!({"sgnl": {"time": {"now": "1999-01-01T00:00:00Z"}}});
        assert_eq!(inject_namespace(Some(&ctx), &clock()), ctx);
    }

    #[test]
    fn non_mapping_namespace_is_replaced() {
        let ctx = json!({"sgnl": "legacy"});
        assert_eq!(
            inject_namespace(Some(&ctx), &clock()),
            json!({"sgnl": {"time": {"now": "2025-12-04T17:30:00Z"}}})
        );
    }

    #[test]
    fn sequence_context_is_lifted_to_index_keys() {
        let ctx = json!([1, {"a": 2}]);
        assert_eq!(
            inject_namespace(Some(&ctx), &clock()),
            json!({"0": 1, "1": {"a": 2}, "sgnl": {"time": {"now": "2025-12-04T17:30:00Z"}}})
        );
    }

    #[test]
    fn scalar_context_starts_empty() {
        for ctx in [json!("text"), json!(7), json!(true)] {
            assert_eq!(
                inject_namespace(Some(&ctx), &clock()),
                json!({"sgnl": {"time": {"now": "2025-12-04T17:30:00Z"}}})
            );
        }
    }

    #[test]
    fn does_not_mutate_input() {
        let ctx = json!({"a": 1});
        let _ = inject_namespace(Some(&ctx), &clock());
        assert_eq!(ctx, json!({"a": 1}));
    }
}
