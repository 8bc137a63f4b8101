// Gateway module for the boundary locator
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod patterns;
mod scanner;
mod types;

// Public re-exports - the ONLY way to access locator functionality
pub use patterns::is_function_start;
pub use scanner::{locate_all, locate_containing};
pub use types::{FunctionSpan, LocateError};
