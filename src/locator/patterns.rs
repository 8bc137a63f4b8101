use once_cell::sync::Lazy;
use regex::Regex;

/// `function name(`, optionally exported, async or a generator
static NAMED_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*[A-Za-z_$][\w$]*\s*\(")
        .expect("named function pattern")
});

/// `const name = function`, `let name = async function*`
static FUNCTION_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:export\s+)?(?:const|let|var)\s+[A-Za-z_$][\w$]*\s*=\s*(?:async\s+)?function\b")
        .expect("function expression pattern")
});

/// `const name = (a, b) =>`, `const name = async x =>`
static ARROW_BINDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:export\s+)?(?:const|let|var)\s+[A-Za-z_$][\w$]*\s*=\s*(?:async\s+)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*=>",
    )
    .expect("arrow binding pattern")
});

/// `name(args) {` and `async name(args) {`
static CALL_WITH_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:async\s+)?(?P<name>[A-Za-z_$][\w$]*)\s*\([^)]*\)\s*\{")
        .expect("call with block pattern")
});

/// Keywords that look like `name(...) {` but never open a callable body
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "with", "return", "else", "do",
];

/// Whether a line lexically resembles the start of a callable body
pub fn is_function_start(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }

    if NAMED_FUNCTION.is_match(trimmed)
        || FUNCTION_EXPRESSION.is_match(trimmed)
        || ARROW_BINDING.is_match(trimmed)
    {
        return true;
    }

    CALL_WITH_BLOCK
        .captures(trimmed)
        .and_then(|caps| caps.name("name"))
        .map(|name| !CONTROL_KEYWORDS.contains(&name.as_str()))
        .unwrap_or(false)
}
