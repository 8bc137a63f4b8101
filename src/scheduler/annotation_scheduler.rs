use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::AnnotationCache;
use crate::constants::SCHEDULER_DEBOUNCE_MS;
use crate::document::{Document, ViewId};
use crate::locator::locate_all;
use crate::render::{inline_marker, AnnotationSink, InlineAnnotation, InlineMarker};

/// Scheduling state of one view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
}

/// Cached verdicts for every located function in `document`
///
/// Cache misses are skipped; this never reaches the classifier.
pub fn annotate(cache: &AnnotationCache, document: &Document) -> Vec<InlineAnnotation> {
    locate_all(document.text())
        .into_iter()
        .filter_map(|span| {
            cache
                .get(&span.text(document))
                .map(|verdict| InlineAnnotation { span, verdict })
        })
        .collect()
}

/// Debounced renderer of cache state into inline markers, one timer per view
///
/// Triggers spawn onto the current tokio runtime and must be called from within one.
pub struct AnnotationScheduler {
    shared: Arc<Shared>,
}

struct Shared {
    cache: Arc<AnnotationCache>,
    sink: Arc<dyn AnnotationSink>,
    debounce: Duration,
    state: Mutex<State>,
}

struct State {
    enabled: bool,
    active: Option<ViewId>,
    views: HashMap<ViewId, ViewState>,
}

struct ViewState {
    document: Document,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl ViewState {
    fn cancel(&mut self) {
        self.generation += 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl AnnotationScheduler {
    pub fn new(cache: Arc<AnnotationCache>, sink: Arc<dyn AnnotationSink>, enabled: bool) -> Self {
        Self {
            shared: Arc::new(Shared {
                cache,
                sink,
                debounce: Duration::from_millis(SCHEDULER_DEBOUNCE_MS),
                state: Mutex::new(State {
                    enabled,
                    active: None,
                    views: HashMap::new(),
                }),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.state.lock().enabled
    }

    pub fn active_view(&self) -> Option<ViewId> {
        self.shared.state.lock().active
    }

    pub fn phase(&self, view: ViewId) -> Phase {
        let state = self.shared.state.lock();
        match state.views.get(&view) {
            Some(entry) if entry.timer.is_some() => Phase::Pending,
            _ => Phase::Idle,
        }
    }

    /// `view` became the active view
    pub fn on_view_activated(&self, view: ViewId, document: Document) {
        let mut state = self.shared.state.lock();
        state.active = Some(view);
        store(&mut state, view, document);
        if state.enabled {
            self.schedule(&mut state, view);
        }
    }

    /// Text of `view` changed; only the active view is rescheduled
    pub fn on_text_changed(&self, view: ViewId, document: Document) {
        let mut state = self.shared.state.lock();
        store(&mut state, view, document);
        if state.enabled && state.active == Some(view) {
            self.schedule(&mut state, view);
        }
    }

    pub fn close_view(&self, view: ViewId) {
        let mut state = self.shared.state.lock();
        if let Some(mut entry) = state.views.remove(&view) {
            entry.cancel();
        }
        if state.active == Some(view) {
            state.active = None;
        }
    }

    /// Disabling clears every view's markers; enabling renders the active view at once
    pub fn set_enabled(&self, enabled: bool) {
        let mut state = self.shared.state.lock();
        if state.enabled == enabled {
            return;
        }
        state.enabled = enabled;

        // Sink calls are made with the state lock held
        if enabled {
            if let Some(view) = state.active {
                if let Some(entry) = state.views.get(&view) {
                    self.shared.render(view, &entry.document);
                }
            }
        } else {
            let mut views: Vec<ViewId> = Vec::with_capacity(state.views.len());
            for (view, entry) in state.views.iter_mut() {
                entry.cancel();
                views.push(*view);
            }
            views.sort();
            for view in views {
                self.shared.sink.replace_all(view, Vec::new());
            }
        }
    }

    fn schedule(&self, state: &mut State, view: ViewId) {
        let Some(entry) = state.views.get_mut(&view) else {
            return;
        };
        entry.cancel();

        let generation = entry.generation;
        let debounce = self.shared.debounce;
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);

        entry.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if let Some(shared) = weak.upgrade() {
                shared.fire(view, generation);
            }
        }));
    }
}

fn store(state: &mut State, view: ViewId, document: Document) {
    match state.views.entry(view) {
        Entry::Occupied(mut occupied) => occupied.get_mut().document = document,
        Entry::Vacant(vacant) => {
            vacant.insert(ViewState {
                document,
                generation: 0,
                timer: None,
            });
        }
    }
}

impl Shared {
    fn fire(&self, view: ViewId, generation: u64) {
        let mut state = self.state.lock();
        if !state.enabled {
            return;
        }
        let Some(entry) = state.views.get_mut(&view) else {
            return;
        };
        if entry.generation != generation {
            debug!("{}: superseded pass dropped", view);
            return;
        }
        entry.timer = None;

        // Still locked: a concurrent toggle waits for this pass to finish
        self.render(view, &entry.document);
    }

    fn render(&self, view: ViewId, document: &Document) {
        let annotations = annotate(&self.cache, document);
        let markers: Vec<InlineMarker> = annotations
            .iter()
            .map(|annotation| inline_marker(annotation, document))
            .collect();

        debug!("{}: rendering {} markers", view, markers.len());
        self.sink.replace_all(view, markers);
    }
}

impl Drop for AnnotationScheduler {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        for entry in state.views.values_mut() {
            entry.cancel();
        }
    }
}
