//! Shared library surface for the track service and its tests.

pub mod api;
pub mod config;
pub mod error;
pub mod fields;
pub mod ident;
pub mod state;
pub mod uptime;
