use anyhow::Result;
use std::sync::Arc;

use crate::app::Config;
use crate::cache::AnnotationCache;
use crate::classifier::{Classifier, HttpClassifier};
use crate::query::QueryCoordinator;
use crate::render::AnnotationSink;
use crate::scheduler::AnnotationScheduler;

/// One hosting session: the single cache shared by the query and scheduling paths
///
/// Dropping the session tears down the cache and aborts pending passes.
pub struct Session {
    config: Config,
    cache: Arc<AnnotationCache>,
    classifier: Arc<dyn Classifier>,
    coordinator: QueryCoordinator,
    scheduler: AnnotationScheduler,
}

impl Session {
    pub fn new(config: Config, classifier: Arc<dyn Classifier>, sink: Arc<dyn AnnotationSink>) -> Self {
        let cache = Arc::new(AnnotationCache::new(
            config.cache.ttl(),
            config.cache.max_entries,
        ));
        let coordinator = QueryCoordinator::new(
            Arc::clone(&cache),
            Arc::clone(&classifier),
            config.annotations.clone(),
        );
        let scheduler =
            AnnotationScheduler::new(Arc::clone(&cache), sink, config.annotations.enabled);

        Self {
            config,
            cache,
            classifier,
            coordinator,
            scheduler,
        }
    }

    /// Session talking to the configured HTTP classifier
    pub fn connect(config: Config, sink: Arc<dyn AnnotationSink>) -> Result<Self> {
        let classifier = HttpClassifier::new(&config.classifier)?;
        Ok(Self::new(config, Arc::new(classifier), sink))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &Arc<AnnotationCache> {
        &self.cache
    }

    pub fn coordinator(&self) -> &QueryCoordinator {
        &self.coordinator
    }

    pub fn scheduler(&self) -> &AnnotationScheduler {
        &self.scheduler
    }

    pub async fn health_check(&self) -> bool {
        self.classifier.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{CodeMetrics, Complexity, ComplexityVerdict, MockClassifier};
    use crate::document::{Document, Position, ViewId};
    use crate::render::RecordingSink;
    use std::time::Duration;

    const ADD: &str = "function add(a,b){ return a+b; }";

    #[tokio::test(start_paused = true)]
    async fn test_hover_populates_markers_for_scheduler() {
        let mut mock = MockClassifier::new();
        mock.expect_classify().times(1).returning(|_| {
            Ok(ComplexityVerdict::new(
                Complexity::Simple,
                0.99,
                CodeMetrics::default(),
            ))
        });
        let sink = Arc::new(RecordingSink::default());
        let session = Session::new(Config::default(), Arc::new(mock), sink.clone());
        let view = ViewId(1);
        let document = Document::new(ADD);

        session.scheduler().on_view_activated(view, document.clone());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(sink.last_for(view), Some(Vec::new()));

        assert!(session
            .coordinator()
            .hover(&document, Position::new(0, 10))
            .await
            .is_some());

        session.scheduler().on_text_changed(view, document);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(sink.last_for(view).map(|m| m.len()), Some(1));
    }

    #[tokio::test]
    async fn test_health_check_delegates() {
        let mut mock = MockClassifier::new();
        mock.expect_health_check().times(1).returning(|| false);
        let session = Session::new(
            Config::default(),
            Arc::new(mock),
            Arc::new(RecordingSink::default()),
        );
        assert!(!session.health_check().await);
    }
}
