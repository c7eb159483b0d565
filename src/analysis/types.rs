//! Wire types for the analyze endpoint

use serde::{Deserialize, Serialize};

/// Successful response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis: Analysis,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub detected_emotion: String,
    #[serde(default)]
    pub reason: String,
}

/// Null fields from the service deserialize as empty strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genre: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

/// Failure response body. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success_body() {
        let json = r#"{
            "analysis": {"detected_emotion": "joy", "reason": "bright smile"},
            "recommendation": {
                "title": "Sample Book",
                "author": "Kim",
                "genre": "시",
                "content": "첫 줄\n둘째 줄"
            }
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.analysis.detected_emotion, "joy");
        assert_eq!(result.recommendation.title, "Sample Book");
        assert_eq!(result.recommendation.content, "첫 줄\n둘째 줄");
    }

    #[test]
    fn test_parse_null_recommendation_fields() {
        let json = r#"{
            "analysis": {"detected_emotion": "calm", "reason": "steady gaze"},
            "recommendation": {"title": "T", "author": null, "genre": null, "content": null}
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.recommendation.author, "");
        assert_eq!(result.recommendation.content, "");
    }

    #[test]
    fn test_parse_error_body() {
        let body: ErrorBody = serde_json::from_str(r#"{"error": "invalid image"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("invalid image"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"recommended_title": "x", "analysis": {}}"#).unwrap();
        assert!(body.error.is_none());
    }
}
