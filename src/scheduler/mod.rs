// Gateway module for debounced annotation passes
// All external access must go through this gateway

mod annotation_scheduler;

pub use annotation_scheduler::{annotate, AnnotationScheduler, Phase};
