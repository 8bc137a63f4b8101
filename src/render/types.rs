use serde::{Deserialize, Serialize};

use crate::classifier::ComplexityVerdict;
use crate::document::TextRange;
use crate::locator::FunctionSpan;

/// A span paired with its cached verdict; rebuilt on every scheduler pass
#[derive(Debug, Clone, PartialEq)]
pub struct InlineAnnotation {
    pub span: FunctionSpan,
    pub verdict: ComplexityVerdict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorHint {
    Green,
    Yellow,
    Red,
}

/// One inline marker as the host renders it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineMarker {
    pub range: TextRange,
    pub display_text: String,
    pub color_hint: ColorHint,
}

/// Structured hover payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverPopup {
    pub header_text: String,
    pub metrics_line: Option<String>,
    pub first_suggestion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Dismissable notification raised by manual analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}
