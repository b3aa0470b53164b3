//! Interior wear analysis for one uploaded photo.
//!
//! Missing inputs are the caller's problem and come back as [`InputError`].
//! Everything after the file is read (provider errors, timeouts, unusable
//! model text) degrades to the fallback assessment instead.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use autofix_core::input::require_field;
use autofix_core::{assess_interior, parse_price_or_default, InputError, InteriorAssessment, Money};

use crate::prompts::INTERIOR_WEAR_PROMPT;
use crate::providers::{CompletionConfig, ImageInput, VisionProvider};

/// Classifies interior photos from an uploads directory.
pub struct InteriorAnalyzer {
    provider: Arc<dyn VisionProvider>,
    uploads_dir: PathBuf,
    config: CompletionConfig,
}

impl InteriorAnalyzer {
    pub fn new(
        provider: Arc<dyn VisionProvider>,
        uploads_dir: impl Into<PathBuf>,
        config: CompletionConfig,
    ) -> Self {
        Self {
            provider,
            uploads_dir: uploads_dir.into(),
            config,
        }
    }

    /// Analyze the interior photo `filename` against a raw base price.
    ///
    /// The price is parsed leniently; see [`parse_price_or_default`].
    pub async fn analyze(
        &self,
        filename: Option<&str>,
        base_price_raw: &str,
    ) -> Result<InteriorAssessment, InputError> {
        self.analyze_priced(filename, parse_price_or_default(base_price_raw))
            .await
    }

    /// Analyze with an already resolved base price.
    pub async fn analyze_priced(
        &self,
        filename: Option<&str>,
        base_price: Money,
    ) -> Result<InteriorAssessment, InputError> {
        let filename = require_field(filename, "filename")?;
        let path = self.resolve(filename)?;

        let data = tokio::fs::read(&path).await.map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "Interior photo unreadable");
            InputError::ResourceNotFound(filename.to_string())
        })?;

        let image = ImageInput::new(data, filename);
        Ok(self.classify(&image, base_price).await)
    }

    /// Map an upload name to a path inside the uploads directory.
    ///
    /// Only the final path component is used, so `../secret.jpg` resolves
    /// to `<uploads>/secret.jpg`.
    fn resolve(&self, filename: &str) -> Result<PathBuf, InputError> {
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| InputError::ResourceNotFound(filename.to_string()))?;

        let path = self.uploads_dir.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(InputError::ResourceNotFound(filename.to_string()))
        }
    }

    async fn classify(&self, image: &ImageInput, base_price: Money) -> InteriorAssessment {
        let timeout = self.config.timeout;
        let call = self
            .provider
            .classify(image, INTERIOR_WEAR_PROMPT, &self.config);

        let response = match tokio::time::timeout(timeout, call).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(
                    leg = "interior",
                    provider = self.provider.name(),
                    error = %e,
                    "Interior classification failed, using fallback"
                );
                return InteriorAssessment::fallback(base_price);
            }
            Err(_) => {
                tracing::warn!(
                    leg = "interior",
                    provider = self.provider.name(),
                    timeout = ?timeout,
                    "Interior classification timed out, using fallback"
                );
                return InteriorAssessment::fallback(base_price);
            }
        };

        tracing::debug!(
            model = %response.model,
            tokens = response.usage.total(),
            "Interior classification received"
        );

        match assess_interior(&response.content, base_price) {
            Ok(assessment) => assessment,
            Err(e) => {
                tracing::warn!(
                    leg = "interior",
                    error = %e,
                    "Interior classifier output unusable, using fallback"
                );
                InteriorAssessment::fallback(base_price)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::providers::{CompletionResponse, ProviderError, TokenUsage, UnconfiguredProvider};
    use async_trait::async_trait;
    use autofix_core::ConditionLabel;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    /// Provider that replays a canned reply and counts calls.
    pub(crate) struct ScriptedProvider {
        pub reply: String,
        pub calls: AtomicUsize,
    }

    impl ScriptedProvider {
        pub fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VisionProvider for ScriptedProvider {
        async fn classify(
            &self,
            image: &ImageInput,
            prompt: &str,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            assert!(!image.data.is_empty());
            assert!(prompt.contains("good, moderate, poor"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CompletionResponse {
                content: self.reply.clone(),
                usage: TokenUsage::default(),
                model: config.model.clone(),
                stop_reason: Some("STOP".to_string()),
            })
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl VisionProvider for SlowProvider {
        async fn classify(
            &self,
            _image: &ImageInput,
            _prompt: &str,
            _config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(ProviderError::EmptyResponse)
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    pub(crate) fn uploads_with(files: &[&str]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in files {
            std::fs::write(dir.path().join(name), [0xff, 0xd8, 0xff, 0xe0]).unwrap();
        }
        dir
    }

    fn analyzer(provider: Arc<dyn VisionProvider>, dir: &TempDir) -> InteriorAnalyzer {
        InteriorAnalyzer::new(provider, dir.path(), CompletionConfig::default())
    }

    #[tokio::test]
    async fn test_classified_interior() {
        let dir = uploads_with(&["seat.jpg"]);
        let provider = Arc::new(ScriptedProvider::new(
            "```json\n{\"condition\":\"poor\",\"reasons\":[\"torn seat\",\"stained carpet\"]}\n```",
        ));
        let analyzer = analyzer(provider.clone(), &dir);

        let assessment = analyzer.analyze(Some("seat.jpg"), "400000").await.unwrap();

        assert_eq!(assessment.condition, ConditionLabel::Poor);
        assert_eq!(assessment.value_delta, -28_000);
        assert_eq!(assessment.reasons.len(), 2);
        assert!(!assessment.degraded);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_filename() {
        let dir = uploads_with(&[]);
        let analyzer = analyzer(Arc::new(ScriptedProvider::new("{}")), &dir);

        assert_eq!(
            analyzer.analyze(None, "500000").await,
            Err(InputError::MissingRequiredField("filename".to_string()))
        );
        assert_eq!(
            analyzer.analyze(Some("  "), "500000").await,
            Err(InputError::MissingRequiredField("filename".to_string()))
        );
    }

    #[tokio::test]
    async fn test_missing_file_skips_provider() {
        let dir = uploads_with(&[]);
        let provider = Arc::new(ScriptedProvider::new("{}"));
        let analyzer = analyzer(provider.clone(), &dir);

        assert_eq!(
            analyzer.analyze(Some("ghost.jpg"), "500000").await,
            Err(InputError::ResourceNotFound("ghost.jpg".to_string()))
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_path_components_are_stripped() {
        let dir = uploads_with(&["seat.jpg"]);
        let analyzer = analyzer(Arc::new(ScriptedProvider::new(r#"{"condition":"good"}"#)), &dir);

        let assessment = analyzer
            .analyze(Some("../../seat.jpg"), "500000")
            .await
            .unwrap();
        assert_eq!(assessment.condition, ConditionLabel::Good);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back() {
        let dir = uploads_with(&["seat.png"]);
        let analyzer = analyzer(Arc::new(UnconfiguredProvider::new("no key")), &dir);

        let assessment = analyzer.analyze(Some("seat.png"), "").await.unwrap();
        assert_eq!(assessment, InteriorAssessment::fallback(500_000));
        assert!(assessment.degraded);
    }

    #[tokio::test]
    async fn test_unusable_reply_falls_back() {
        let dir = uploads_with(&["seat.jpg"]);
        let analyzer = analyzer(
            Arc::new(ScriptedProvider::new("Sorry, the photo is too dark.")),
            &dir,
        );

        let assessment = analyzer.analyze(Some("seat.jpg"), "200000").await.unwrap();
        assert_eq!(assessment.value_delta, -6_000);
        assert!(assessment.degraded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let dir = uploads_with(&["seat.jpg"]);
        let config = CompletionConfig {
            timeout: Duration::from_secs(5),
            ..CompletionConfig::default()
        };
        let analyzer = InteriorAnalyzer::new(Arc::new(SlowProvider), dir.path(), config);

        let assessment = analyzer.analyze(Some("seat.jpg"), "500000").await.unwrap();
        assert!(assessment.degraded);
    }
}
