//! Middleware module for the NoteLM HTTP server
//!
//! Provides:
//! - Rate limiting middleware (sliding window, per client key)

pub mod rate_limit;
