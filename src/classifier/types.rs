use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Closed set of classifier ratings; parsed case-insensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl FromStr for Complexity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Complexity::Simple),
            "moderate" => Ok(Complexity::Moderate),
            "complex" => Ok(Complexity::Complex),
            _ => Err(format!(
                "unknown complexity '{}', expected simple, moderate or complex",
                value
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Complexity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Complex => "complex",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw metrics reported alongside a verdict
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMetrics {
    #[serde(alias = "linesOfCode")]
    pub lines_of_code: u32,
    #[serde(alias = "cyclomaticComplexity", alias = "cyclomatic_complexity")]
    pub cyclomatic: u32,
    #[serde(alias = "nestingDepth")]
    pub nesting_depth: u32,
    #[serde(alias = "loopCount")]
    pub loop_count: u32,
    #[serde(alias = "conditionalCount")]
    pub conditional_count: u32,
}

/// The classifier's judgment of one function's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityVerdict {
    pub complexity: Complexity,
    pub confidence: f64,
    #[serde(default)]
    pub metrics: CodeMetrics,
    #[serde(default, alias = "processingTimeMs")]
    pub processing_time_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<HashMap<String, String>>,
}

impl ComplexityVerdict {
    pub fn new(complexity: Complexity, confidence: f64, metrics: CodeMetrics) -> Self {
        Self {
            complexity,
            confidence,
            metrics,
            processing_time_ms: 0.0,
            suggestions: None,
        }
    }

    pub fn with_suggestion(mut self, key: impl Into<String>, advice: impl Into<String>) -> Self {
        self.suggestions
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), advice.into());
        self
    }

    /// Whether the payload respects the verdict invariants
    pub fn is_well_formed(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
            && self.processing_time_ms.is_finite()
            && self.processing_time_ms >= 0.0
    }

    /// One suggestion for display; keys are unordered so the smallest key wins
    pub fn first_suggestion(&self) -> Option<&str> {
        self.suggestions
            .as_ref()?
            .iter()
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(_, advice)| advice.as_str())
    }
}
