//! External inference capabilities and the gate every model call goes through.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::SentimentError;
use crate::types::LabelScore;

/// Classifies text against an arbitrary label set without task-specific training.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    /// Score `text` against `labels`, returning `(label, score)` pairs ranked
    /// by descending score.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError`] if the backend is unreachable or its output
    /// is malformed.
    async fn classify(
        &self,
        text: &str,
        labels: &[&str],
    ) -> Result<Vec<LabelScore>, SentimentError>;
}

/// Produces a fixed-length contextual embedding for a text.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SentimentError`] if the backend is unreachable or returns no vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SentimentError>;
}

/// The set of inference backends handed to the analyzer.
///
/// Either, both, or neither may be present. A missing backend only removes
/// its tier; the rule-based tier is always available.
#[derive(Clone, Default)]
pub struct Capabilities {
    pub zero_shot: Option<Arc<dyn ZeroShotClassifier>>,
    pub embedder: Option<Arc<dyn TextEmbedder>>,
}

impl Capabilities {
    /// No backends: rule-based analysis only.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_zero_shot(mut self, classifier: Arc<dyn ZeroShotClassifier>) -> Self {
        self.zero_shot = Some(classifier);
        self
    }

    #[must_use]
    pub fn with_embedder(mut self, embedder: Arc<dyn TextEmbedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("zero_shot", &self.zero_shot.is_some())
            .field("embedder", &self.embedder.is_some())
            .finish()
    }
}

/// Bounds every model call by a timeout and, for non-reentrant backends,
/// serializes them behind one lock.
///
/// Only model calls pass through the gate; rule-based scoring and
/// post-processing never wait on it.
pub(crate) struct InferenceGate {
    timeout: Duration,
    lock: Option<Mutex<()>>,
}

impl InferenceGate {
    pub(crate) fn new(timeout: Duration, serialize: bool) -> Self {
        Self {
            timeout,
            lock: serialize.then(|| Mutex::new(())),
        }
    }

    /// Run `call` under the gate. Time spent waiting for the lock counts
    /// against the timeout; on expiry the call is dropped.
    pub(crate) async fn run<T, F>(&self, call: F) -> Result<T, SentimentError>
    where
        F: Future<Output = Result<T, SentimentError>>,
    {
        let guarded = async {
            let _guard = match &self.lock {
                Some(lock) => Some(lock.lock().await),
                None => None,
            };
            call.await
        };

        tokio::time::timeout(self.timeout, guarded)
            .await
            .map_err(|_| SentimentError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn gate_passes_through_results() {
        let gate = InferenceGate::new(Duration::from_secs(1), false);
        let value = gate.run(async { Ok::<_, SentimentError>(7) }).await;
        assert_eq!(value.expect("should succeed"), 7);
    }

    #[tokio::test]
    async fn gate_passes_through_errors() {
        let gate = InferenceGate::new(Duration::from_secs(1), true);
        let result: Result<(), _> = gate
            .run(async { Err(SentimentError::Tei("boom".to_string())) })
            .await;
        assert!(matches!(result, Err(SentimentError::Tei(_))));
    }

    #[tokio::test]
    async fn gate_times_out_slow_calls() {
        let gate = InferenceGate::new(Duration::from_millis(20), false);
        let result = gate
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, SentimentError>(())
            })
            .await;
        assert!(matches!(result, Err(SentimentError::Timeout(_))));
    }

    #[test]
    fn capabilities_debug_hides_backends() {
        let debug = format!("{:?}", Capabilities::none());
        assert!(debug.contains("zero_shot: false"));
    }
}
