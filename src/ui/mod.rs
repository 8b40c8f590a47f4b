//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod dashboard;
pub mod department_panel;
pub mod editor;
pub mod notifications;
pub mod setup_wizard;
pub mod team_panel;

pub use app::App;
pub use setup_wizard::{SetupApp, SetupWizard};
