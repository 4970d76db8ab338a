//! Typed key/value tokens for assembling a JSON body.
//!
//! # Grammar
//! ```text
//! token := bare_key | key ":=" typed_value | key "=" string_value
//! ```
//! `:=` is searched first and only the first occurrence of a separator
//! splits. A typed value must be `true`/`false`, a base-10 `i64` or a finite
//! base-10 `f64`, tried in that order. There is no string fallback on the
//! typed path.
//!
//! # Design
//! Tokens that do not match the grammar are dropped without an error so one
//! malformed item never aborts a batch. Callers that need to know whether a
//! token took effect inspect the body afterwards.

use std::collections::BTreeMap;

use crate::value::JsonValue;

/// The accumulating JSON object. Later writes to a key overwrite earlier ones.
pub type JsonBody = BTreeMap<String, JsonValue>;

const TYPED_SEPARATOR: &str = ":=";
const STRING_SEPARATOR: char = '=';

/// Parse `token` and insert at most one entry into `body`.
///
/// A typed value that parses as a float but is not finite (`inf`, `NaN`,
/// `infinity`) is dropped, since JSON has no encoding for it.
///
/// ```
/// use restreq_core::{apply_token, JsonBody, JsonValue};
///
/// let mut body = JsonBody::new();
/// apply_token("nick=test=test", &mut body);
/// apply_token("int32:=76", &mut body);
/// apply_token("bool:=xxx", &mut body);
///
/// assert_eq!(body["nick"], JsonValue::from("test=test"));
/// assert_eq!(body["int32"], JsonValue::Int(76));
/// assert!(!body.contains_key("bool"));
/// ```
pub fn apply_token(token: &str, body: &mut JsonBody) {
    if let Some((key, value)) = token.split_once(TYPED_SEPARATOR) {
        if key.is_empty() || value.is_empty() {
            return;
        }
        if let Some(typed) = parse_typed(value) {
            body.insert(key.to_string(), typed);
        }
        return;
    }

    if let Some((key, value)) = token.split_once(STRING_SEPARATOR) {
        if key.is_empty() || value.is_empty() {
            return;
        }
        body.insert(key.to_string(), JsonValue::String(value.to_string()));
    }
}

/// Insert an already typed value. Skipped when `key` is empty or `value` is
/// an empty string; every non-string value is stored.
pub fn insert_value(body: &mut JsonBody, key: &str, value: impl Into<JsonValue>) {
    let value = value.into();
    if key.is_empty() || value.is_empty_string() {
        return;
    }
    body.insert(key.to_string(), value);
}

fn parse_typed(value: &str) -> Option<JsonValue> {
    match value {
        "true" => return Some(JsonValue::Bool(true)),
        "false" => return Some(JsonValue::Bool(false)),
        _ => {}
    }

    if let Ok(int) = value.parse::<i64>() {
        return Some(JsonValue::Int(int));
    }

    // `f64::from_str` accepts "inf" and "NaN", which have no JSON encoding.
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(JsonValue::Float)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applied(token: &str) -> JsonBody {
        let mut body = JsonBody::new();
        apply_token(token, &mut body);
        body
    }

    fn single(key: &str, value: JsonValue) -> JsonBody {
        JsonBody::from([(key.to_string(), value)])
    }

    #[test]
    fn string_value() {
        assert_eq!(applied("nick=test"), single("nick", JsonValue::from("test")));
    }

    #[test]
    fn only_first_equals_splits() {
        assert_eq!(
            applied("nick=test=test"),
            single("nick", JsonValue::from("test=test"))
        );
    }

    #[test]
    fn empty_string_value_is_dropped() {
        assert!(applied("nick=").is_empty());
    }

    #[test]
    fn bare_key_is_dropped() {
        assert!(applied("nick").is_empty());
        assert!(applied("").is_empty());
    }

    #[test]
    fn empty_key_is_dropped() {
        assert!(applied("=nick=test").is_empty());
        assert!(applied("=").is_empty());
    }

    #[test]
    fn typed_true() {
        assert_eq!(applied("bool:=true"), single("bool", JsonValue::Bool(true)));
    }

    #[test]
    fn typed_false() {
        assert_eq!(applied("bool:=false"), single("bool", JsonValue::Bool(false)));
    }

    #[test]
    fn typed_garbage_has_no_string_fallback() {
        assert!(applied("bool:=xxx").is_empty());
    }

    #[test]
    fn typed_empty_value_is_dropped() {
        assert!(applied("bool:=").is_empty());
    }

    #[test]
    fn typed_empty_key_is_dropped() {
        assert!(applied(":=true").is_empty());
        assert!(applied(":=").is_empty());
    }

    #[test]
    fn typed_float() {
        assert_eq!(applied("float64:=2.34"), single("float64", JsonValue::Float(2.34)));
    }

    #[test]
    fn typed_integer_wins_over_float() {
        assert_eq!(applied("int32:=76"), single("int32", JsonValue::Int(76)));
        assert_eq!(applied("neg:=-12"), single("neg", JsonValue::Int(-12)));
    }

    #[test]
    fn integer_overflow_falls_through_to_float() {
        assert_eq!(
            applied("big:=9223372036854775808"),
            single("big", JsonValue::Float(9_223_372_036_854_775_808.0))
        );
    }

    #[test]
    fn boolean_spelling_is_case_sensitive() {
        assert!(applied("flag:=True").is_empty());
        assert!(applied("flag:=FALSE").is_empty());
    }

    #[test]
    fn non_finite_floats_are_dropped() {
        assert!(applied("x:=inf").is_empty());
        assert!(applied("x:=NaN").is_empty());
        assert!(applied("x:=infinity").is_empty());
        assert!(applied("x:=-inf").is_empty());
    }

    #[test]
    fn typed_separator_takes_priority() {
        assert!(applied("a=b:=c").is_empty());
        assert_eq!(applied("a:=1=2"), JsonBody::new());
        assert_eq!(applied("eq:=1"), single("eq", JsonValue::Int(1)));
    }

    #[test]
    fn same_token_twice_overwrites() {
        let mut body = JsonBody::new();
        apply_token("n:=1", &mut body);
        apply_token("n:=1", &mut body);
        assert_eq!(body, single("n", JsonValue::Int(1)));

        apply_token("n=one", &mut body);
        assert_eq!(body, single("n", JsonValue::from("one")));
    }

    #[test]
    fn dropped_token_leaves_existing_entries() {
        let mut body = single("keep", JsonValue::Bool(true));
        apply_token("keep:=xxx", &mut body);
        apply_token("keep=", &mut body);
        assert_eq!(body, single("keep", JsonValue::Bool(true)));
    }

    #[test]
    fn insert_value_keeps_falsy_non_strings() {
        let mut body = JsonBody::new();
        insert_value(&mut body, "b", false);
        insert_value(&mut body, "i", 0i64);
        insert_value(&mut body, "f", 0.0);
        assert_eq!(body.len(), 3);
        assert_eq!(body["b"], JsonValue::Bool(false));
    }

    #[test]
    fn insert_value_skips_empty_key_and_empty_string() {
        let mut body = JsonBody::new();
        insert_value(&mut body, "", "value");
        insert_value(&mut body, "", true);
        insert_value(&mut body, "key", "");
        assert!(body.is_empty());
    }

    #[test]
    fn insert_value_overwrites() {
        let mut body = JsonBody::new();
        insert_value(&mut body, "k", "a");
        insert_value(&mut body, "k", 2i64);
        assert_eq!(body, single("k", JsonValue::Int(2)));
    }
}
