pub mod app;
pub mod cache;
pub mod classifier;
pub mod cli;
pub mod constants;
pub mod document;
pub mod locator;
pub mod query;
pub mod render;
pub mod runtime;
pub mod scheduler;
pub mod utils;

pub use app::{load_config, Config, Session};
pub use cache::AnnotationCache;
pub use classifier::{Classifier, ComplexityVerdict, HttpClassifier};
pub use document::{Document, Position, TextRange, ViewId};
pub use query::QueryCoordinator;
pub use scheduler::AnnotationScheduler;
pub use utils::{ClassifierError, LensError};
