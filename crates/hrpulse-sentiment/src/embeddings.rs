//! TEI (Text Embeddings Inference) client for the embedding tier.

use async_trait::async_trait;
use serde::Serialize;

use crate::capability::TextEmbedder;
use crate::error::SentimentError;

/// TEI HTTP client.
pub struct TeiClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a str,
}

impl TeiClient {
    /// Create a new `TeiClient` for the TEI server at `tei_url`.
    #[must_use]
    pub fn new(tei_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/embed", tei_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl TextEmbedder for TeiClient {
    /// Embed a single text.
    ///
    /// TEI answers with one vector per input; the first is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Tei`] if the request fails, the status is not
    /// successful, or the response is empty or unparseable.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SentimentError> {
        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { inputs: text })
            .send()
            .await
            .map_err(|e| SentimentError::Tei(format!("TEI request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SentimentError::Tei(format!(
                "TEI returned status {}",
                response.status()
            )));
        }

        let embeddings: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| SentimentError::Tei(format!("TEI response parse error: {e}")))?;

        embeddings
            .into_iter()
            .next()
            .filter(|v| !v.is_empty())
            .ok_or(SentimentError::EmptyResponse("TEI returned no embedding"))
    }
}
