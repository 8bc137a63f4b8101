use colored::Colorize;

use crate::render::{ColorHint, HoverPopup, InlineMarker, Notification, NotificationLevel};

fn paint(text: &str, hint: ColorHint) -> String {
    match hint {
        ColorHint::Green => text.green().to_string(),
        ColorHint::Yellow => text.yellow().to_string(),
        ColorHint::Red => text.red().to_string(),
    }
}

/// Plain-text rendering of a notification
pub fn format_notification(notification: &Notification) -> String {
    match notification.level {
        NotificationLevel::Info => format!("ℹ️  {}", notification.message),
        NotificationLevel::Error => format!("❌ {}", notification.message.red()),
    }
}

/// Plain-text rendering of a hover popup
pub fn format_popup(popup: &HoverPopup) -> String {
    let mut lines = vec![popup.header_text.bold().to_string()];
    if let Some(metrics) = &popup.metrics_line {
        lines.push(format!("   {}", metrics.dimmed()));
    }
    if let Some(suggestion) = &popup.first_suggestion {
        lines.push(format!("   💡 {}", suggestion));
    }
    lines.join("\n")
}

/// Plain-text rendering of one replace-all marker set
pub fn format_markers(label: &str, markers: &[InlineMarker]) -> String {
    let mut out = format!("── {} ({} annotated) ──", label.cyan(), markers.len());
    for marker in markers {
        out.push_str(&format!(
            "\n  L{:<4} {}",
            marker.range.start.line + 1,
            paint(&marker.display_text, marker.color_hint)
        ));
    }
    out
}
