use serde_json::Value;

pub const NO_TEXT_FALLBACK: &str = "No text provided, please analyze the image";

/// Serialize catalog records compactly, in the order the store returned them.
pub fn serialize_catalog(records: &[Value]) -> String {
    Value::Array(records.to_vec()).to_string()
}

/// Build the single matching prompt sent to the model.
///
/// `catalog` is the already serialized record list; `user_input` is embedded
/// literally, or replaced by [`NO_TEXT_FALLBACK`] when absent or empty.
pub fn build_prompt(catalog: &str, user_input: Option<&str>) -> String {
    let user_input = user_input
        .filter(|text| !text.is_empty())
        .unwrap_or(NO_TEXT_FALLBACK);

    format!(
        r#"You are a professional aid matching assistant for Malaysian B40 (low-income) households.

TASKS:
1. If an image is attached, run OCR on it and identify the issuing institution (for example a hospital, a school or TNB) and the problem it describes (for example an overdue bill or a medical cost).
2. LANGUAGE: detect the language the user wrote in, in the text or in the attached image (English, Malay or Chinese).
3. Write every "reason" field in that same language. If more than one language is detected, use English.
4. Only recommend programs from the resource database below.

RESOURCE DATABASE:
{catalog}

User Input: "{user_input}"

OUTPUT FORMAT:
Return ONLY a JSON object. No markdown. No extra text.
{{
  "matches": [
    {{
      "id": "resource_id",
      "name": "Name of the aid",
      "reason": "Why this program fits, written in the user's language",
      "confidence": 98,
      "application_url": "URL",
      "lat": 3.1412,
      "lng": 101.6865
    }}
  ]
}}"#
    )
}
