//! Listing descriptions from an external text-generation service.
//!
//! Nothing here touches inventory. A generated description only ever lands
//! in a [`DescriptionDraft`], which the vendor form may copy from.

pub mod gemini;

pub use gemini::GeminiDescriber;

use crate::error::DescribeError;
use async_trait::async_trait;
use metrics::counter;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Sentence used when the service answers with nothing.
pub const EMPTY_DESCRIPTION_FALLBACK: &str = "Описание недоступно.";

/// Sentence used when the service fails or times out.
pub const FAILED_DESCRIPTION_FALLBACK: &str =
    "Не удалось сгенерировать описание. Пожалуйста, попробуйте позже.";

#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate(&self, title: &str, category: &str) -> Result<String, DescribeError>;
}

/// Ask `generator` for a description, bounded by `timeout`.
/// Never fails: any error becomes one of the fallback sentences.
pub async fn describe(
    generator: &dyn DescriptionGenerator,
    title: &str,
    category: &str,
    timeout: Duration,
) -> String {
    let result = match tokio::time::timeout(timeout, generator.generate(title, category)).await {
        Ok(result) => result,
        Err(_) => Err(DescribeError::Timeout),
    };

    match result {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) | Err(DescribeError::EmptyResponse) => {
            counter!("partmarket.describe.fallbacks.total", "reason" => "empty").increment(1);
            warn!(title, "description service returned no text");
            EMPTY_DESCRIPTION_FALLBACK.to_string()
        }
        Err(e) => {
            counter!("partmarket.describe.fallbacks.total", "reason" => "error").increment(1);
            warn!(title, error = %e, "description generation failed");
            FAILED_DESCRIPTION_FALLBACK.to_string()
        }
    }
}

#[derive(Debug, Default)]
struct DraftState {
    text: Option<String>,
    pending: bool,
    generation: u64,
}

/// Slot a background description request writes into.
///
/// Only the latest request may fill the slot; a slower, older answer is
/// dropped when it arrives.
#[derive(Debug, Clone, Default)]
pub struct DescriptionDraft {
    state: Arc<Mutex<DraftState>>,
}

impl DescriptionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<String> {
        self.lock().text.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().pending
    }

    /// Replace the draft by hand, cancelling interest in any pending request.
    pub fn set_text(&self, text: impl Into<String>) {
        let mut state = self.lock();
        state.generation += 1;
        state.pending = false;
        state.text = Some(text.into());
    }

    /// Start generating a description in the background. Blank titles are
    /// ignored and return `None`, as does a call made outside a tokio
    /// runtime; the draft is left as it was in both cases.
    pub fn request(
        &self,
        generator: Arc<dyn DescriptionGenerator>,
        title: &str,
        category: &str,
        timeout: Duration,
    ) -> Option<JoinHandle<()>> {
        if title.trim().is_empty() {
            return None;
        }
        let Ok(runtime) = Handle::try_current() else {
            counter!("partmarket.describe.skipped.total").increment(1);
            warn!(title = %title, "no async runtime, description not requested");
            return None;
        };

        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.pending = true;
            state.generation
        };

        let draft = self.clone();
        let title = title.to_string();
        let category = category.to_string();
        debug!(title = %title, generation, "description requested");

        Some(runtime.spawn(async move {
            let text = describe(generator.as_ref(), &title, &category, timeout).await;
            let mut state = draft.lock();
            if state.generation == generation {
                state.text = Some(text);
                state.pending = false;
            } else {
                debug!(title = %title, generation, "stale description dropped");
            }
        }))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DraftState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    #[async_trait]
    impl DescriptionGenerator for Fixed {
        async fn generate(&self, title: &str, _category: &str) -> Result<String, DescribeError> {
            Ok(format!("{} {}", self.0, title))
        }
    }

    struct Failing;

    #[async_trait]
    impl DescriptionGenerator for Failing {
        async fn generate(&self, _title: &str, _category: &str) -> Result<String, DescribeError> {
            Err(DescribeError::MissingApiKey)
        }
    }

    struct Blank;

    #[async_trait]
    impl DescriptionGenerator for Blank {
        async fn generate(&self, _title: &str, _category: &str) -> Result<String, DescribeError> {
            Ok("  \n".to_string())
        }
    }

    struct Slow(Duration, &'static str);

    #[async_trait]
    impl DescriptionGenerator for Slow {
        async fn generate(&self, _title: &str, _category: &str) -> Result<String, DescribeError> {
            tokio::time::sleep(self.0).await;
            Ok(self.1.to_string())
        }
    }

    #[tokio::test]
    async fn test_describe_passes_text_through() {
        let text = describe(&Fixed("Лучший"), "лот", "Искусство", Duration::from_secs(1)).await;
        assert_eq!(text, "Лучший лот");
    }

    #[tokio::test]
    async fn test_describe_falls_back_on_error_and_empty() {
        let failed = describe(&Failing, "лот", "Искусство", Duration::from_secs(1)).await;
        assert_eq!(failed, FAILED_DESCRIPTION_FALLBACK);

        let empty = describe(&Blank, "лот", "Искусство", Duration::from_secs(1)).await;
        assert_eq!(empty, EMPTY_DESCRIPTION_FALLBACK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_describe_times_out() {
        let slow = Slow(Duration::from_secs(60), "late");
        let text = describe(&slow, "лот", "Искусство", Duration::from_secs(1)).await;
        assert_eq!(text, FAILED_DESCRIPTION_FALLBACK);
    }

    #[tokio::test]
    async fn test_draft_is_filled_in_background() {
        let draft = DescriptionDraft::new();
        let handle = draft
            .request(Arc::new(Fixed("Описание:")), "Яхта", "Транспорт", Duration::from_secs(1))
            .unwrap();
        handle.await.unwrap();

        assert!(!draft.is_pending());
        assert_eq!(draft.text().as_deref(), Some("Описание: Яхта"));
    }

    #[tokio::test]
    async fn test_blank_title_is_ignored() {
        let draft = DescriptionDraft::new();
        assert!(
            draft
                .request(Arc::new(Fixed("x")), "  ", "Транспорт", Duration::from_secs(1))
                .is_none()
        );
        assert!(!draft.is_pending());
        assert_eq!(draft.text(), None);
    }

    #[test]
    fn test_request_without_runtime_is_skipped() {
        let draft = DescriptionDraft::new();
        draft.set_text("черновик");
        assert!(
            draft
                .request(Arc::new(Fixed("x")), "Яхта", "Транспорт", Duration::from_secs(1))
                .is_none()
        );
        assert!(!draft.is_pending());
        assert_eq!(draft.text().as_deref(), Some("черновик"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_answer_is_dropped() {
        let draft = DescriptionDraft::new();
        let slow = draft
            .request(
                Arc::new(Slow(Duration::from_secs(5), "old")),
                "Лот",
                "Бизнес",
                Duration::from_secs(30),
            )
            .unwrap();
        let fast = draft
            .request(
                Arc::new(Slow(Duration::from_secs(1), "new")),
                "Лот",
                "Бизнес",
                Duration::from_secs(30),
            )
            .unwrap();

        fast.await.unwrap();
        slow.await.unwrap();
        assert_eq!(draft.text().as_deref(), Some("new"));
    }
}
