//! HTTP client for a Hugging Face style zero-shot classification endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::capability::ZeroShotClassifier;
use crate::error::SentimentError;
use crate::types::LabelScore;

pub struct ZeroShotClient {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct ZeroShotOutput {
    labels: Vec<String>,
    scores: Vec<f32>,
}

/// Some deployments wrap the single output in a one-element array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotResponse {
    Single(ZeroShotOutput),
    Batch(Vec<ZeroShotOutput>),
}

impl ZeroShotClient {
    #[must_use]
    pub fn new(url: &str, token: Option<&str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
            token: token.map(ToOwned::to_owned),
        }
    }
}

#[async_trait]
impl ZeroShotClassifier for ZeroShotClient {
    /// # Errors
    ///
    /// Returns [`SentimentError::ZeroShot`] on transport or status failures and
    /// when labels and scores disagree in length, or
    /// [`SentimentError::EmptyResponse`] when nothing was ranked.
    async fn classify(
        &self,
        text: &str,
        labels: &[&str],
    ) -> Result<Vec<LabelScore>, SentimentError> {
        let body = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels: labels,
            },
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SentimentError::ZeroShot(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SentimentError::ZeroShot(format!(
                "classifier returned status {}",
                response.status()
            )));
        }

        let parsed: ZeroShotResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::ZeroShot(format!("response parse error: {e}")))?;

        let output = match parsed {
            ZeroShotResponse::Single(output) => output,
            ZeroShotResponse::Batch(outputs) => outputs
                .into_iter()
                .next()
                .ok_or(SentimentError::EmptyResponse("classifier returned no outputs"))?,
        };

        rank(output)
    }
}

fn rank(output: ZeroShotOutput) -> Result<Vec<LabelScore>, SentimentError> {
    if output.labels.len() != output.scores.len() {
        return Err(SentimentError::ZeroShot(format!(
            "classifier returned {} labels but {} scores",
            output.labels.len(),
            output.scores.len()
        )));
    }
    if output.labels.is_empty() {
        return Err(SentimentError::EmptyResponse("classifier returned no labels"));
    }

    let mut ranked: Vec<LabelScore> = output
        .labels
        .into_iter()
        .zip(output.scores)
        .map(|(label, score)| LabelScore { label, score })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(ranked)
}
