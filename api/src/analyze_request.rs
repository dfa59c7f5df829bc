use serde::Deserialize;

/// Body of `POST /api/analyze`, and of the page form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub user_input: Option<String>,
    #[serde(default)]
    pub image_base64: Option<String>,
}

impl AnalyzeRequest {
    pub fn text(&self) -> Option<&str> {
        self.user_input.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn image(&self) -> Option<&str> {
        self.image_base64.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_none() && self.image().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_deserialize_to_none() {
        let req: AnalyzeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.user_input.is_none());
        assert!(req.is_empty());

        let req: AnalyzeRequest =
            serde_json::from_str(r#"{"userInput": null, "imageBase64": "data:image/png;base64,AA=="}"#).unwrap();
        assert!(!req.is_empty());
        assert_eq!(req.image(), Some("data:image/png;base64,AA=="));
    }

    #[test]
    fn blank_text_does_not_count() {
        let req = AnalyzeRequest {
            user_input: Some("  ".to_string()),
            image_base64: Some(String::new()),
        };
        assert!(req.is_empty());
    }
}
