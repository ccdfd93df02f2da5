//! Backend bridge for the BC Turbo cockpit.
//!
//! The cockpit never talks to the costing backend directly: requests cross
//! an abstract [`BackendApi`] boundary serviced by a background worker
//! ([`BridgeClient`]), and replies come back through a mailbox the UI
//! drains on its tick. Request-generation counters let the UI discard
//! replies that were superseded while in flight.

#![forbid(unsafe_code)]

pub mod api;
pub mod client;
pub mod demo;

pub use api::BackendApi;
pub use client::{BridgeClient, BridgeReply, BridgeRequest};
pub use demo::DemoBackend;
