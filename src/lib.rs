pub mod api;
pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod export;
pub mod models;
pub mod ui;
pub mod upload;

pub use error::{AppError, Result};
