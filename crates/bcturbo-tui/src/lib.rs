//! Terminal cockpit UI for the BC Turbo costing backend.
//!
//! [`app::CockpitModel`] implements the `ftui_runtime` `Model` trait and
//! orchestrates nine tabbed modules. Screens implement
//! [`screens::CockpitScreen`] and talk to the backend exclusively through
//! [`state::UiSharedState`], which wraps the bridge worker and its reply
//! mailboxes. The two rendering contracts with real complexity —
//! [`dashboard_model::DashboardView`] and [`import_model::ImportPanel`] —
//! are pure view-model builders, testable without a terminal.

#![forbid(unsafe_code)]

pub mod app;
pub mod chrome;
pub mod dashboard_model;
pub mod debounce;
pub mod import_model;
pub mod screens;
pub mod state;
pub mod theme;

pub use app::{CockpitModel, CockpitMsg};
pub use state::UiSharedState;
