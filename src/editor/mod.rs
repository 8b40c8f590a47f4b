//! Markdown rich-text editing for team member biographies.
//!
//! [`toolbar`] holds the declarative button configuration; [`document`] is the
//! text buffer the buttons operate on. Rendering lives in `ui::editor`.

pub mod document;
pub mod toolbar;

pub use document::{EditorDocument, Selection};
pub use toolbar::{CustomHandler, EditorEffect, Format, TOOLBAR, ToolbarAction, ToolbarButton, apply};
