// Gateway module for rendering payloads handed to the host editor
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod format;
mod sink;
mod types;

// Public re-exports - the ONLY way to access render functionality
pub use format::{error_notification, hover_popup, inline_marker, verdict_notification};
pub use sink::AnnotationSink;
#[cfg(test)]
pub use sink::RecordingSink;
pub use types::{ColorHint, HoverPopup, InlineAnnotation, InlineMarker, Notification, NotificationLevel};
