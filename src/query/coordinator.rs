use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::app::AnnotationSettings;
use crate::cache::{AnnotationCache, ContentHash};
use crate::classifier::{Classifier, ComplexityVerdict};
use crate::document::{Document, Position, TextRange};
use crate::locator::locate_containing;
use crate::render::{
    error_notification, hover_popup, verdict_notification, HoverPopup, Notification,
    NotificationLevel,
};
use crate::utils::ClassifierError;

type VerdictFuture = Shared<BoxFuture<'static, Result<ComplexityVerdict, ClassifierError>>>;

/// On-demand analysis shared by hover and manual selection
///
/// Concurrent misses for the same content share one classifier call.
pub struct QueryCoordinator {
    cache: Arc<AnnotationCache>,
    classifier: Arc<dyn Classifier>,
    settings: AnnotationSettings,
    in_flight: Arc<Mutex<HashMap<ContentHash, VerdictFuture>>>,
}

impl QueryCoordinator {
    pub fn new(
        cache: Arc<AnnotationCache>,
        classifier: Arc<dyn Classifier>,
        settings: AnnotationSettings,
    ) -> Self {
        Self {
            cache,
            classifier,
            settings,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn cache(&self) -> &Arc<AnnotationCache> {
        &self.cache
    }

    /// Verdict for the function touching `position`; `Ok(None)` when none is found
    pub async fn analyze_at_position(
        &self,
        document: &Document,
        position: Position,
    ) -> Result<Option<ComplexityVerdict>, ClassifierError> {
        let Some(span) = locate_containing(document.text(), position) else {
            return Ok(None);
        };
        self.analyze_text(&span.text(document)).await.map(Some)
    }

    /// Verdict for an explicit range; the locator is not consulted
    pub async fn analyze_range(
        &self,
        document: &Document,
        range: &TextRange,
    ) -> Result<ComplexityVerdict, ClassifierError> {
        self.analyze_text(&document.slice(range)).await
    }

    /// Cache first, then a (possibly shared) classifier call
    pub async fn analyze_text(&self, code: &str) -> Result<ComplexityVerdict, ClassifierError> {
        if let Some(verdict) = self.cache.get(code) {
            return Ok(verdict);
        }
        self.request(code).await
    }

    fn request(&self, code: &str) -> VerdictFuture {
        let hash = AnnotationCache::content_hash(code);
        let mut in_flight = self.in_flight.lock();

        if let Some(pending) = in_flight.get(&hash) {
            debug!("joining in-flight request {}", &hash.0[..8]);
            return pending.clone();
        }

        // A request may have landed between the first lookup and taking the lock
        if let Some(verdict) = self.cache.get_by_hash(&hash) {
            return futures::future::ready(Ok(verdict)).boxed().shared();
        }

        let classifier = Arc::clone(&self.classifier);
        let cache = Arc::clone(&self.cache);
        let registry = Arc::clone(&self.in_flight);
        let code = code.to_string();
        let key = hash.clone();

        // Spawned so the response still lands in the cache if every caller goes away
        let task = tokio::spawn(async move {
            let outcome = classifier.classify(&code).await;
            if let Ok(verdict) = &outcome {
                cache.put(&code, verdict.clone());
            }
            registry.lock().remove(&key);
            outcome
        });

        let pending = async move {
            task.await.unwrap_or_else(|e| {
                Err(ClassifierError::Unavailable(format!("request task failed: {}", e)))
            })
        }
        .boxed()
        .shared();

        in_flight.insert(hash, pending.clone());
        pending
    }

    /// Hover query; failures are logged and read as "nothing to show"
    pub async fn hover(&self, document: &Document, position: Position) -> Option<HoverPopup> {
        let span = locate_containing(document.text(), position)?;
        let code = span.text(document);

        let verdict = match self.cache.get(&code) {
            Some(verdict) => verdict,
            None => {
                // Dropping the hover within the settle delay issues no request
                tokio::time::sleep(self.settings.analysis_delay()).await;
                match self.request(&code).await {
                    Ok(verdict) => verdict,
                    Err(err) => {
                        warn!("hover analysis failed: {}", err);
                        return None;
                    }
                }
            }
        };

        Some(hover_popup(&verdict, self.settings.show_metrics))
    }

    /// Manual selection analysis; always yields something to show the user
    pub async fn analyze_selection(&self, document: &Document, range: &TextRange) -> Notification {
        let code = document.slice(range);
        if code.trim().is_empty() {
            return Notification {
                level: NotificationLevel::Info,
                message: "Select some code to analyze".to_string(),
            };
        }

        match self.analyze_text(&code).await {
            Ok(verdict) => verdict_notification(&verdict, self.settings.show_metrics),
            Err(err) => {
                warn!("manual analysis failed: {}", err);
                error_notification(&err)
            }
        }
    }

    /// Requests currently awaiting the classifier
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }
}
