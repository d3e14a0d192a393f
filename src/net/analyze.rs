use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::tree::TreeData;

/// Default address of the analysis service.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/api/analyze";

/// Document-level sentiment scores.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Sentiment {
    pub polarity: f64,
    pub subjectivity: f64,
    pub confidence: f64,
}

/// One named entity found in the text.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityHit {
    pub text: String,
    pub label: String,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
    #[serde(default)]
    pub description: String,
}

/// One dependency relation between two tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationHit {
    pub source: String,
    pub target: String,
    pub relation: String,
    #[serde(default)]
    pub description: String,
}

/// Full analysis result for one piece of text.
#[derive(Debug, Clone, Deserialize)]
pub struct Analysis {
    pub sentiment: Sentiment,
    #[serde(default)]
    pub word_count: usize,
    #[serde(default)]
    pub sentence_count: usize,
    #[serde(default)]
    pub entities: Vec<EntityHit>,
    #[serde(default)]
    pub relationships: Vec<RelationHit>,
    pub tree_data: Option<TreeData>,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Error during analysis
#[derive(Debug)]
pub struct AnalyzeError {
    pub message: String,
    pub phase: &'static str,
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.phase, self.message)
    }
}

/// POST the text to the analysis service and decode the result (blocking).
///
/// Service-reported failures (`{"error": ...}` bodies) come back as
/// `phase: "analyze"`; transport and decoding problems carry their own
/// phases so the UI banner says where things went wrong.
pub fn analyze_text(endpoint: &str, text: &str) -> Result<Analysis, AnalyzeError> {
    let url = Url::parse(endpoint).map_err(|e| AnalyzeError {
        message: format!("Invalid endpoint: {}", e),
        phase: "request",
    })?;

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!(
            "resonance/0.1 ",
            "(+https://github.com/ext-sakamoro/resonance)"
        ))
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| AnalyzeError {
            message: format!("Client error: {}", e),
            phase: "request",
        })?;

    let response = client
        .post(url.as_str())
        .json(&AnalyzeRequest { text })
        .send()
        .map_err(|e| AnalyzeError {
            message: format!("Request failed: {}", e),
            phase: "request",
        })?;

    let status = response.status();
    let body = response.text().map_err(|e| AnalyzeError {
        message: format!("Failed to read body: {}", e),
        phase: "response",
    })?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
        return Err(AnalyzeError { message, phase: "analyze" });
    }

    log::debug!("analysis response: {} bytes", body.len());
    serde_json::from_str(&body).map_err(|e| AnalyzeError {
        message: format!("Malformed response: {}", e),
        phase: "decode",
    })
}
