//! Targeted key updates on raw JSON text.
//!
//! Model output is only loosely schema-bound, so instead of deserializing and
//! re-serializing a whole document (which would reorder or normalize keys
//! the caller never looked at) [`set`] rewrites just the bytes of one
//! top-level member and leaves everything else untouched.

use crate::error::JsonPatchError;
use serde::de::IgnoredAny;
use serde::Serialize;

/// Set top-level `key` of the JSON object in `json` to `value`.
///
/// Every existing occurrence of `key` has its value replaced in place. If
/// the key is absent, `"key":value` is appended as the last member.
///
/// # Errors
///
/// Fails if `json` is not a single well-formed JSON object.
pub fn set<T: Serialize + ?Sized>(
    json: &str,
    key: &str,
    value: &T,
) -> Result<String, JsonPatchError> {
    let encoded = serde_json::to_string(value).map_err(|e| JsonPatchError::Syntax {
        offset: 0,
        message: e.to_string(),
    })?;
    let members = scan_object(json)?;

    let spans: Vec<(usize, usize)> = members
        .members
        .iter()
        .filter(|m| m.key == key)
        .map(|m| m.value_span)
        .collect();

    if spans.is_empty() {
        let encoded_key = serde_json::to_string(key).map_err(|e| JsonPatchError::Syntax {
            offset: 0,
            message: e.to_string(),
        })?;
        // Append right after the last value so trailing whitespace stays put
        let (separator, at) = match members.members.last() {
            Some(last) => (",", last.value_span.1),
            None => ("", members.close),
        };
        return Ok(format!(
            "{}{separator}{encoded_key}:{encoded}{}",
            &json[..at],
            &json[at..]
        ));
    }

    let mut out = String::with_capacity(json.len() + encoded.len());
    let mut cursor = 0;
    for (start, end) in spans {
        out.push_str(&json[cursor..start]);
        out.push_str(&encoded);
        cursor = end;
    }
    out.push_str(&json[cursor..]);
    Ok(out)
}

struct Member {
    key: String,
    value_span: (usize, usize),
}

struct ObjectLayout {
    members: Vec<Member>,
    /// Byte offset of the closing brace
    close: usize,
}

fn skip_ws(json: &str, mut pos: usize) -> usize {
    let bytes = json.as_bytes();
    while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t' | b'\n' | b'\r') {
        pos += 1;
    }
    pos
}

fn syntax(offset: usize, message: impl Into<String>) -> JsonPatchError {
    JsonPatchError::Syntax {
        offset,
        message: message.into(),
    }
}

/// Parse one JSON value of type `T` starting at `pos`, returning it and the
/// offset just past it.
fn parse_at<T: serde::de::DeserializeOwned>(
    json: &str,
    pos: usize,
) -> Result<(T, usize), JsonPatchError> {
    let mut stream = serde_json::Deserializer::from_str(&json[pos..]).into_iter::<T>();
    match stream.next() {
        Some(Ok(value)) => Ok((value, pos + stream.byte_offset())),
        Some(Err(e)) => Err(syntax(pos, e.to_string())),
        None => Err(syntax(pos, "unexpected end of input")),
    }
}

fn expect_byte(json: &str, pos: usize, byte: u8) -> Result<(), JsonPatchError> {
    match json.as_bytes().get(pos) {
        Some(b) if *b == byte => Ok(()),
        Some(b) => Err(syntax(
            pos,
            format!("expected '{}', found '{}'", byte as char, *b as char),
        )),
        None => Err(syntax(pos, format!("expected '{}'", byte as char))),
    }
}

/// Locate every top-level member of the object in `json`.
fn scan_object(json: &str) -> Result<ObjectLayout, JsonPatchError> {
    let bytes = json.as_bytes();
    let mut pos = skip_ws(json, 0);
    match bytes.get(pos) {
        Some(b'{') => pos += 1,
        Some(_) => {
            // Distinguish valid non-object JSON from garbage
            return match parse_at::<IgnoredAny>(json, pos) {
                Ok(_) => Err(JsonPatchError::NotAnObject),
                Err(e) => Err(e),
            };
        }
        None => return Err(syntax(pos, "empty input")),
    }

    let mut members = Vec::new();
    pos = skip_ws(json, pos);
    let close = if bytes.get(pos) == Some(&b'}') {
        pos
    } else {
        loop {
            pos = skip_ws(json, pos);
            expect_byte(json, pos, b'"')?;
            let (key, after_key) = parse_at::<String>(json, pos)?;
            pos = skip_ws(json, after_key);
            expect_byte(json, pos, b':')?;
            let value_start = skip_ws(json, pos + 1);
            let (_, value_end) = parse_at::<IgnoredAny>(json, value_start)?;
            members.push(Member {
                key,
                value_span: (value_start, value_end),
            });

            pos = skip_ws(json, value_end);
            match bytes.get(pos) {
                Some(b',') => pos += 1,
                Some(b'}') => break pos,
                Some(b) => {
                    return Err(syntax(
                        pos,
                        format!("expected ',' or '}}', found '{}'", *b as char),
                    ))
                }
                None => return Err(syntax(pos, "unterminated object")),
            }
        }
    };

    let end = skip_ws(json, close + 1);
    if end != json.len() {
        return Err(JsonPatchError::TrailingCharacters { offset: end });
    }
    Ok(ObjectLayout { members, close })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_appends_missing_key() {
        let out = set(r#"{"name":"A","position":"VS"}"#, "identify_url", "https://x/img.jpg")
            .unwrap();
        assert_eq!(
            out,
            r#"{"name":"A","position":"VS","identify_url":"https://x/img.jpg"}"#
        );
    }

    #[test]
    fn test_replaces_existing_key_in_place() {
        let out = set(
            r#"{"identify_url": "wrong", "name": "A"}"#,
            "identify_url",
            "https://x/img.jpg",
        )
        .unwrap();
        assert_eq!(out, r#"{"identify_url": "https://x/img.jpg", "name": "A"}"#);
    }

    #[test]
    fn test_replaces_non_string_value() {
        let out = set(r#"{"identify_url":{"nested":[1,2]},"n":1}"#, "identify_url", "u").unwrap();
        assert_eq!(out, r#"{"identify_url":"u","n":1}"#);
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(set("{}", "k", "v").unwrap(), r#"{"k":"v"}"#);
        assert_eq!(set(" { \n } ", "k", "v").unwrap(), " { \n \"k\":\"v\"} ");
    }

    #[test]
    fn test_preserves_unknown_keys_and_formatting() {
        let input = "{\n  \"name\": \"王小明\",\n  \"extra\": {\"a\": [1, 2.50, null]}\n}\n";
        let out = set(input, "identify_url", "u").unwrap();
        assert_eq!(
            out,
            "{\n  \"name\": \"王小明\",\n  \"extra\": {\"a\": [1, 2.50, null]},\"identify_url\":\"u\"\n}\n"
        );
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["identify_url"], "u");
        assert_eq!(value["extra"]["a"][1], 2.5);
    }

    #[test]
    fn test_nested_key_with_same_name_is_untouched() {
        let out = set(r#"{"meta":{"identify_url":"inner"}}"#, "identify_url", "u").unwrap();
        assert_eq!(out, r#"{"meta":{"identify_url":"inner"},"identify_url":"u"}"#);
    }

    #[test]
    fn test_escapes_value() {
        let out = set("{}", "k", "a\"b").unwrap();
        assert_eq!(out, r#"{"k":"a\"b"}"#);
    }

    #[test]
    fn test_keys_with_escapes_match_decoded_form() {
        let out = set(r#"{"identify\u005furl":"old"}"#, "identify_url", "u").unwrap();
        assert_eq!(out, r#"{"identify\u005furl":"u"}"#);
    }

    #[test]
    fn test_rejects_non_object() {
        assert_eq!(set("[1,2]", "k", "v"), Err(JsonPatchError::NotAnObject));
        assert_eq!(set("\"text\"", "k", "v"), Err(JsonPatchError::NotAnObject));
    }

    #[test]
    fn test_rejects_plain_text() {
        let err = set("The name is A", "k", "v").unwrap_err();
        assert!(matches!(err, JsonPatchError::Syntax { .. }), "Got: {err:?}");
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(matches!(set("", "k", "v"), Err(JsonPatchError::Syntax { .. })));
    }

    #[test]
    fn test_rejects_truncated_object() {
        let err = set(r#"{"name":"A","#, "k", "v").unwrap_err();
        assert!(matches!(err, JsonPatchError::Syntax { .. }), "Got: {err:?}");
    }

    #[test]
    fn test_rejects_trailing_characters() {
        let err = set(r#"{"name":"A"} trailing"#, "k", "v").unwrap_err();
        assert_eq!(err, JsonPatchError::TrailingCharacters { offset: 13 });
    }
}
