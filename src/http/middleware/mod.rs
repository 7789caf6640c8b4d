//! Route-scoped middleware.

pub mod access_control;

pub use access_control::user_agent_middleware;
