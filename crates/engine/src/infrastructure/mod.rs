//! Infrastructure implementations.
//!
//! Contains the data port and its JSON-backed adapter, plus environment
//! settings loading.

pub mod json_store;
pub mod ports;
pub mod settings;
