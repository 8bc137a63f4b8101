use async_trait::async_trait;

use super::types::ComplexityVerdict;
use crate::utils::ClassifierError;

/// Remote complexity classifier; stateless request/response
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one code snippet
    async fn classify(&self, code: &str) -> Result<ComplexityVerdict, ClassifierError>;

    /// Never errors; any failure reads as unhealthy
    async fn health_check(&self) -> bool;
}
