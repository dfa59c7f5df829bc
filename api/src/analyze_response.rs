use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ANALYSIS_FAILED: &str = "AI Analysis Failed";

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Success { success: bool, data: Value },
    Failure { success: bool, error: String },
}

impl AnalyzeResponse {
    pub fn success(data: Value) -> Self {
        AnalyzeResponse::Success {
            success: true,
            data,
        }
    }

    pub fn failure() -> Self {
        AnalyzeResponse::Failure {
            success: false,
            error: ANALYSIS_FAILED.to_string(),
        }
    }
}
