//! Groundwork API Library
//!
//! This library provides the core functionality for the Groundwork construction
//! planning backend: the agent runtime, the construction agent roster, and the
//! HTTP adapters in front of them.

pub mod agents;
pub mod api;
pub mod config;
pub mod llm;
pub mod runtime;
