use tracing::debug;

use super::patterns::is_function_start;
use super::types::{FunctionSpan, LocateError};
use crate::document::Position;

/// Find the function whose span touches `position`
///
/// The search walks upward from the query line (inclusive) and gives up at the
/// first blank line. Nested functions resolve to the innermost one.
pub fn locate_containing(text: &str, position: Position) -> Option<FunctionSpan> {
    let lines: Vec<&str> = text.lines().collect();
    match find_containing(&lines, position.line) {
        Ok(span) => Some(span),
        Err(err) => {
            debug!("locator: {}", err);
            None
        }
    }
}

/// Every terminated function span in document order
///
/// Spans may overlap when the document is malformed.
pub fn locate_all(text: &str) -> Vec<FunctionSpan> {
    let lines: Vec<&str> = text.lines().collect();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_function_start(line))
        .filter_map(|(start_line, _)| match find_end(&lines, start_line) {
            Ok(end_line) => Some(FunctionSpan::new(start_line, end_line)),
            Err(err) => {
                debug!("locator: {}", err);
                None
            }
        })
        .collect()
}

fn find_containing(lines: &[&str], line: usize) -> Result<FunctionSpan, LocateError> {
    if line >= lines.len() {
        return Err(LocateError::LocatorMiss { line });
    }

    for candidate in (0..=line).rev() {
        let text = lines[candidate];
        if text.trim().is_empty() {
            break;
        }
        if !is_function_start(text) {
            continue;
        }

        let span = match find_end(lines, candidate) {
            Ok(end_line) => FunctionSpan::new(candidate, end_line),
            // Blockless lines (`x => x * 2;`, overload signatures) enclose nothing
            Err(LocateError::NoBlock { .. }) => continue,
            Err(err) => return Err(err),
        };
        if span.contains_line(line) {
            return Ok(span);
        }
        // A sibling that closed above the query line does not enclose it.
    }

    Err(LocateError::LocatorMiss { line })
}

/// Line on which the brace count opened at `start_line` returns to zero
fn find_end(lines: &[&str], start_line: usize) -> Result<usize, LocateError> {
    let mut depth: i64 = 0;
    let mut opened = false;

    for (index, line) in lines.iter().enumerate().skip(start_line) {
        for ch in line.chars() {
            match ch {
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' => depth -= 1,
                _ => {}
            }
        }

        if opened && depth == 0 {
            return Ok(index);
        }

        // Expression-bodied arrows (`x => x * 2;`) have no block to close
        if !opened && line.trim_end().ends_with(';') {
            return Err(LocateError::NoBlock { start_line });
        }
    }

    Err(LocateError::MalformedSpan { start_line })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn brace_balance(text: &str) -> i64 {
        text.chars().fold(0, |acc, ch| match ch {
            '{' => acc + 1,
            '}' => acc - 1,
            _ => acc,
        })
    }

    fn span_text(text: &str, span: FunctionSpan) -> String {
        text.lines()
            .skip(span.start_line)
            .take(span.end_line - span.start_line + 1)
            .collect::<Vec<_>>()
            .join("\n")
    }

    const NESTED: &str = "\
function outer(items) {
  const total = 0;
  function inner(x) {
    if (x > 0) {
      return x;
    }
    return -x;
  }
  return items.map(inner);
}";

    #[test]
    fn test_single_line_function() {
        let text = "function add(a,b){ return a+b; }";
        let span = locate_containing(text, Position::new(0, 20)).unwrap();
        assert_eq!(span, FunctionSpan::new(0, 0));
    }

    #[test]
    fn test_position_inside_nested_resolves_innermost() {
        let span = locate_containing(NESTED, Position::new(4, 0)).unwrap();
        assert_eq!(span, FunctionSpan::new(2, 7));
        assert_eq!(brace_balance(&span_text(NESTED, span)), 0);
    }

    #[test]
    fn test_position_after_nested_resolves_enclosing() {
        let span = locate_containing(NESTED, Position::new(8, 2)).unwrap();
        assert_eq!(span, FunctionSpan::new(0, 9));
        assert_eq!(brace_balance(&span_text(NESTED, span)), 0);
    }

    #[test]
    fn test_blockless_sibling_does_not_hide_enclosing() {
        let text = "function outer(xs) {\n  const double = x => x * 2;\n  return xs.map(double);\n}";
        assert_eq!(
            locate_containing(text, Position::new(2, 0)),
            Some(FunctionSpan::new(0, 3))
        );
        assert_eq!(
            locate_containing(text, Position::new(1, 4)),
            Some(FunctionSpan::new(0, 3))
        );
    }

    #[test]
    fn test_overload_signature_is_skipped() {
        let text = "\
function pick(a: string): string;
function pick(a: number): number;
function pick(a: any): any {
  return a;
}";
        assert_eq!(
            locate_containing(text, Position::new(3, 0)),
            Some(FunctionSpan::new(2, 4))
        );
        assert_eq!(locate_containing(text, Position::new(1, 0)), None);
        assert_eq!(locate_all(text), vec![FunctionSpan::new(2, 4)]);
    }

    #[test]
    fn test_match_on_query_line_wins() {
        let span = locate_containing(NESTED, Position::new(2, 0)).unwrap();
        assert_eq!(span.start_line, 2);
    }

    #[test]
    fn test_signature_with_brace_on_next_line() {
        let text = "function spaced(a)\n{\n  return a;\n}";
        let span = locate_containing(text, Position::new(2, 0)).unwrap();
        assert_eq!(span, FunctionSpan::new(0, 3));
    }

    #[test]
    fn test_unterminated_function_is_none_everywhere() {
        let text = "function broken(a) {\n  if (a) {\n    return 1;\n  }\n  return 2;";
        for line in 0..text.lines().count() {
            assert_eq!(locate_containing(text, Position::new(line, 0)), None, "line {}", line);
        }
    }

    #[test]
    fn test_blank_line_stops_upward_scan() {
        let text = "function gap() {\n  let a = 1;\n\n  return a;\n}";
        assert_eq!(locate_containing(text, Position::new(3, 0)), None);
        assert_eq!(
            locate_containing(text, Position::new(1, 0)),
            Some(FunctionSpan::new(0, 4))
        );
    }

    #[test]
    fn test_never_looks_below_query_line() {
        let text = "const x = 1;\nfunction later() {\n}";
        assert_eq!(locate_containing(text, Position::new(0, 0)), None);
    }

    #[test]
    fn test_position_past_end_is_none() {
        assert_eq!(locate_containing(NESTED, Position::new(100, 0)), None);
        assert_eq!(locate_containing("", Position::new(0, 0)), None);
    }

    #[test]
    fn test_expression_arrow_is_not_a_span() {
        let text = "const double = x => x * 2;\nfunction f() {\n}";
        assert_eq!(locate_containing(text, Position::new(0, 0)), None);
        assert_eq!(locate_all(text), vec![FunctionSpan::new(1, 2)]);
    }

    #[test]
    fn test_locate_all_in_document_order() {
        let text = "\
class Widget {
  render() {
    return 1;
  }
}

const handler = async (event) => {
  await event.wait();
};

function orphan() {
  return;";
        assert_eq!(
            locate_all(text),
            vec![FunctionSpan::new(1, 3), FunctionSpan::new(6, 8)]
        );
    }

    #[test]
    fn test_locate_all_reports_nested_and_outer() {
        assert_eq!(
            locate_all(NESTED),
            vec![FunctionSpan::new(0, 9), FunctionSpan::new(2, 7)]
        );
    }
}
