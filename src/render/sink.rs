use crate::document::ViewId;

use super::types::InlineMarker;

/// Receives replace-all marker sets, one view at a time
///
/// Called with the scheduler's state lock held. Implementations must not call
/// back into the scheduler.
pub trait AnnotationSink: Send + Sync {
    fn replace_all(&self, view: ViewId, markers: Vec<InlineMarker>);
}

/// In-memory sink that records every replace-all it receives
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: parking_lot::Mutex<Vec<(ViewId, Vec<InlineMarker>)>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn calls(&self) -> Vec<(ViewId, Vec<InlineMarker>)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last_for(&self, view: ViewId) -> Option<Vec<InlineMarker>> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find(|(v, _)| *v == view)
            .map(|(_, markers)| markers.clone())
    }
}

#[cfg(test)]
impl AnnotationSink for RecordingSink {
    fn replace_all(&self, view: ViewId, markers: Vec<InlineMarker>) {
        self.calls.lock().push((view, markers));
    }
}
