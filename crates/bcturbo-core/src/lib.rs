//! Core library for the BC Turbo cockpit — shared payload types,
//! configuration, error taxonomy, and pt-BR display formatting.
//!
//! This crate owns everything both sides of the backend bridge agree on:
//! the request/reply shapes of the boundary, the environment-driven
//! [`Config`], and the formatting helpers the UI uses to render
//! quantities and currency the way the original tool did.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod format;
pub mod models;

pub use config::Config;
pub use error::{Error, Result};
