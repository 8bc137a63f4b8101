// Gateway module for the classifier boundary
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod http;
mod traits;
mod types;

// Public re-exports - the ONLY way to access classifier functionality
pub use http::HttpClassifier;
pub use traits::Classifier;
#[cfg(test)]
pub use traits::MockClassifier;
pub use types::{CodeMetrics, Complexity, ComplexityVerdict};
