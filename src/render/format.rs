use crate::classifier::{CodeMetrics, Complexity, ComplexityVerdict};
use crate::document::{Document, TextRange};
use crate::utils::ClassifierError;

use super::types::{
    ColorHint, HoverPopup, InlineAnnotation, InlineMarker, Notification, NotificationLevel,
};

fn icon(complexity: Complexity) -> &'static str {
    match complexity {
        Complexity::Simple => "🟢",
        Complexity::Moderate => "🟡",
        Complexity::Complex => "🔴",
    }
}

fn color(complexity: Complexity) -> ColorHint {
    match complexity {
        Complexity::Simple => ColorHint::Green,
        Complexity::Moderate => ColorHint::Yellow,
        Complexity::Complex => ColorHint::Red,
    }
}

fn title(complexity: Complexity) -> &'static str {
    match complexity {
        Complexity::Simple => "Simple",
        Complexity::Moderate => "Moderate",
        Complexity::Complex => "Complex",
    }
}

fn headline(verdict: &ComplexityVerdict) -> String {
    format!(
        "Complexity: {} ({:.1}% confidence)",
        verdict.complexity.as_str().to_uppercase(),
        verdict.confidence * 100.0
    )
}

fn metrics_line(metrics: &CodeMetrics) -> String {
    format!(
        "Lines: {} | Cyclomatic: {} | Nesting: {} | Loops: {} | Conditionals: {}",
        metrics.lines_of_code,
        metrics.cyclomatic,
        metrics.nesting_depth,
        metrics.loop_count,
        metrics.conditional_count
    )
}

/// Marker shown on the declaration line of an annotated function
pub fn inline_marker(annotation: &InlineAnnotation, document: &Document) -> InlineMarker {
    let line = annotation.span.start_line;
    let complexity = annotation.verdict.complexity;

    InlineMarker {
        range: TextRange::lines(line, line, document),
        display_text: format!(
            "{} {} ({:.0}%)",
            icon(complexity),
            title(complexity),
            annotation.verdict.confidence * 100.0
        ),
        color_hint: color(complexity),
    }
}

pub fn hover_popup(verdict: &ComplexityVerdict, show_metrics: bool) -> HoverPopup {
    HoverPopup {
        header_text: format!("{} {}", icon(verdict.complexity), headline(verdict)),
        metrics_line: show_metrics.then(|| metrics_line(&verdict.metrics)),
        first_suggestion: verdict.first_suggestion().map(str::to_string),
    }
}

pub fn verdict_notification(verdict: &ComplexityVerdict, show_metrics: bool) -> Notification {
    let mut message = headline(verdict);
    if show_metrics {
        message.push_str(" | ");
        message.push_str(&metrics_line(&verdict.metrics));
    }
    if let Some(suggestion) = verdict.first_suggestion() {
        message.push_str(" | Suggestion: ");
        message.push_str(suggestion);
    }

    Notification {
        level: NotificationLevel::Info,
        message,
    }
}

pub fn error_notification(err: &ClassifierError) -> Notification {
    Notification {
        level: NotificationLevel::Error,
        message: format!("Complexity analysis failed ({}): {}", err.cause(), err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::FunctionSpan;
    use pretty_assertions::assert_eq;

    fn complex_verdict() -> ComplexityVerdict {
        ComplexityVerdict::new(
            Complexity::Complex,
            0.9,
            CodeMetrics {
                lines_of_code: 40,
                cyclomatic: 12,
                nesting_depth: 4,
                loop_count: 3,
                conditional_count: 8,
            },
        )
        .with_suggestion("split", "Extract the inner loop")
    }

    #[test]
    fn test_notification_names_rating_and_confidence() {
        let notification = verdict_notification(&complex_verdict(), true);
        assert_eq!(notification.level, NotificationLevel::Info);
        assert!(notification.message.contains("COMPLEX"));
        assert!(notification.message.contains("90.0%"));
        assert!(notification.message.contains("Cyclomatic: 12"));
        assert!(notification.message.contains("Extract the inner loop"));
    }

    #[test]
    fn test_notification_without_metrics() {
        let notification = verdict_notification(&complex_verdict(), false);
        assert!(!notification.message.contains("Cyclomatic"));
    }

    #[test]
    fn test_hover_popup_fields() {
        let popup = hover_popup(&complex_verdict(), true);
        assert_eq!(popup.header_text, "🔴 Complexity: COMPLEX (90.0% confidence)");
        assert_eq!(
            popup.metrics_line.as_deref(),
            Some("Lines: 40 | Cyclomatic: 12 | Nesting: 4 | Loops: 3 | Conditionals: 8")
        );
        assert_eq!(popup.first_suggestion.as_deref(), Some("Extract the inner loop"));

        assert_eq!(hover_popup(&complex_verdict(), false).metrics_line, None);
    }

    #[test]
    fn test_inline_marker_on_declaration_line() {
        let document = Document::new("function f() {\n  return 1;\n}");
        let annotation = InlineAnnotation {
            span: FunctionSpan::new(0, 2),
            verdict: ComplexityVerdict::new(Complexity::Simple, 0.75, CodeMetrics::default()),
        };

        let marker = inline_marker(&annotation, &document);
        assert_eq!(marker.range, TextRange::lines(0, 0, &document));
        assert_eq!(marker.display_text, "🟢 Simple (75%)");
        assert_eq!(marker.color_hint, ColorHint::Green);
    }

    #[test]
    fn test_error_notification_names_cause() {
        let notification = error_notification(&ClassifierError::Unavailable("refused".into()));
        assert_eq!(notification.level, NotificationLevel::Error);
        assert!(notification.message.contains("ClassifierUnavailable"));
    }
}
