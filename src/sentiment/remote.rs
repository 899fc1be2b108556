//! Hosted sentiment model.
//!
//! Speaks the Hugging Face inference shape: `POST {"inputs": text}` answered
//! by `[[{"label": "POSITIVE", "score": 0.99}, ...]]` (or a flat list).

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use super::SentimentClassifier;
use crate::error::{AdapterResult, DashboardError};
use crate::types::{SentimentLabel, SentimentResult};

#[derive(Debug, Deserialize)]
struct Prediction {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<Prediction>>),
    Flat(Vec<Prediction>),
    Single(Prediction),
}

pub struct RemoteClassifier {
    client: Client,
    url: String,
    token: Option<String>,
}

impl RemoteClassifier {
    pub fn new(url: String, token: Option<String>) -> AdapterResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DashboardError::Classification(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { client, url, token })
    }
}

impl SentimentClassifier for RemoteClassifier {
    fn classify_text(&self, text: &str) -> AdapterResult<SentimentResult> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "inputs": text }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| DashboardError::Classification(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Classification(format!(
                "HTTP {} from {}",
                status.as_u16(),
                self.url
            )));
        }

        let body = response
            .text()
            .map_err(|e| DashboardError::Classification(format!("failed to read response: {}", e)))?;
        parse_predictions(&body)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Pick the highest-scoring prediction out of an inference response body
pub fn parse_predictions(body: &str) -> AdapterResult<SentimentResult> {
    let response: InferenceResponse = serde_json::from_str(body)
        .map_err(|e| DashboardError::Classification(format!("unexpected response: {}", e)))?;

    let predictions: Vec<Prediction> = match response {
        InferenceResponse::Nested(batches) => batches.into_iter().flatten().collect(),
        InferenceResponse::Flat(list) => list,
        InferenceResponse::Single(one) => vec![one],
    };

    let best = predictions
        .into_iter()
        .filter(|p| p.score.is_finite())
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| DashboardError::Classification("response contained no predictions".to_string()))?;

    Ok(SentimentResult::new(
        SentimentLabel::from_model_label(&best.label),
        best.score,
    ))
}
