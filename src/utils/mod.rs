// Gateway module for utils - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod errors;
mod file_watcher;
mod logger;

// Public re-exports - the ONLY way to access utils functionality
pub use errors::{ClassifierError, LensError};
pub use file_watcher::{FileEvent, FileSystemWatcher};
pub use logger::{default_directive, init_logger, log_info, log_warn};
