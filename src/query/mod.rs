// Gateway module for on-demand queries
// All external access must go through this gateway

mod coordinator;

pub use coordinator::QueryCoordinator;
