//! Turning raw model text into JSON.
//!
//! Models asked for JSON still sometimes wrap it in a markdown code block, so
//! the reply is unwrapped before parsing. Only a fence at the very start and
//! at the very end is removed; backticks inside the payload are left alone.

use crate::error::ReplyParseError;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn opening_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```[A-Za-z0-9_-]*").expect("literal pattern"))
}

fn closing_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```$").expect("literal pattern"))
}

/// Remove a leading ```` ```lang ```` and a trailing ```` ``` ````, then trim.
pub fn strip_fences(raw: &str) -> String {
    let opened = opening_fence().replace(raw.trim(), "");
    let closed = closing_fence().replace(opened.trim_end(), "");
    closed.trim().to_string()
}

pub fn parse_reply(raw: &str) -> Result<Value, ReplyParseError> {
    let body = strip_fences(raw);
    if body.is_empty() {
        return Err(ReplyParseError::Empty);
    }
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fenced_reply_equals_inner_content() {
        let inner = r#"{"matches":[{"id":"1","confidence":90}]}"#;
        let fenced = format!("```json\n{}\n```", inner);
        assert_eq!(
            parse_reply(&fenced).unwrap(),
            serde_json::from_str::<Value>(inner).unwrap()
        );
    }

    #[test]
    fn test_plain_reply_is_parsed() {
        assert_eq!(parse_reply(" {\"matches\": []} \n").unwrap(), json!({"matches": []}));
    }

    #[test]
    fn test_untagged_and_uppercase_fences() {
        assert_eq!(parse_reply("```\n[1,2]\n```").unwrap(), json!([1, 2]));
        assert_eq!(parse_reply("```JSON{\"a\":true}```").unwrap(), json!({"a": true}));
    }

    #[test]
    fn test_backticks_inside_payload_survive() {
        let reply = "```json\n{\"reason\":\"see ```code```\"}\n```";
        assert_eq!(parse_reply(reply).unwrap(), json!({"reason": "see ```code```"}));
    }

    #[test]
    fn test_empty_reply() {
        assert!(matches!(parse_reply("```json\n```"), Err(ReplyParseError::Empty)));
        assert!(matches!(parse_reply("   "), Err(ReplyParseError::Empty)));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_reply("```json\nSorry, I cannot help with that.\n```").unwrap_err();
        assert!(matches!(err, ReplyParseError::InvalidJson(_)));
    }
}
