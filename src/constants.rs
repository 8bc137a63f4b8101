/// Constants module to avoid magic numbers in the codebase

// Classifier Service
pub const DEFAULT_CLASSIFIER_URL: &str = "http://localhost:8000";
pub const CLASSIFY_PATH: &str = "/classify";
pub const HEALTH_PATH: &str = "/health";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const HEALTH_CHECK_TIMEOUT_MS: u64 = 3000;

// Scheduling
/// Fixed debounce applied by the annotation scheduler, independent of the hover delay
pub const SCHEDULER_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 300;
pub const WATCH_POLL_INTERVAL_MS: u64 = 50;

// Cache
pub const DEFAULT_CACHE_TTL_MINUTES: u64 = 5;
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;

// Environment
pub const ENV_PREFIX: &str = "LENS_";
pub const LOCAL_CONFIG_PATH: &str = ".complexity-lens/config.toml";
pub const APP_NAME: &str = "complexity-lens";
