//! Common library for the Newars content service
//!
//! This crate provides shared infrastructure used by the service binaries:
//! database connectivity with bounded timeouts, health checks, and the
//! storage error taxonomy.

pub mod database;
pub mod error;
