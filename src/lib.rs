//! Contact book: a small REST service for contact records and a terminal
//! client that drives it.

pub mod app;
pub mod client;
pub mod config;
pub mod contacts;
pub mod error;
pub mod state;
pub mod telemetry;
pub mod validation;
