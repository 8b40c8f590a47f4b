//! Declarative toolbar configuration for the biography editor.
//!
//! Each button maps to either a built-in markdown behavior or one of two
//! custom handlers. Nothing here holds state or touches the network; image
//! insertion is handed back to the host as [`EditorEffect::RequestImage`].

use egui_phosphor::regular::{
    CODE, ERASER, IMAGE, LINK, LIST_BULLETS, LIST_NUMBERS, QUOTES, TEXT_B, TEXT_H, TEXT_ITALIC, TEXT_STRIKETHROUGH,
};

use super::document::EditorDocument;

/// Placeholder target inserted by the link button.
pub const LINK_PLACEHOLDER: &str = "https://";

/// Built-in formatting behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bold,
    Italic,
    Strikethrough,
    Code,
    Heading,
    Quote,
    BulletList,
    NumberedList,
    Link,
}

/// Behaviors the stock editor does not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomHandler {
    /// Pick, upload, and embed an image at the caret.
    InsertImage,
    /// Erase the whole document.
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Builtin(Format),
    Custom(CustomHandler),
}

/// One toolbar button.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarButton {
    pub icon: &'static str,
    pub tooltip: &'static str,
    pub action: ToolbarAction,
}

const fn builtin(icon: &'static str, tooltip: &'static str, format: Format) -> ToolbarButton {
    ToolbarButton {
        icon,
        tooltip,
        action: ToolbarAction::Builtin(format),
    }
}

const fn custom(icon: &'static str, tooltip: &'static str, handler: CustomHandler) -> ToolbarButton {
    ToolbarButton {
        icon,
        tooltip,
        action: ToolbarAction::Custom(handler),
    }
}

/// Toolbar layout, one slice per separator-delimited group.
pub const TOOLBAR: &[&[ToolbarButton]] = &[
    &[
        builtin(TEXT_B, "Bold", Format::Bold),
        builtin(TEXT_ITALIC, "Italic", Format::Italic),
        builtin(TEXT_STRIKETHROUGH, "Strikethrough", Format::Strikethrough),
        builtin(CODE, "Inline code", Format::Code),
    ],
    &[
        builtin(TEXT_H, "Heading", Format::Heading),
        builtin(QUOTES, "Quote", Format::Quote),
    ],
    &[
        builtin(LIST_BULLETS, "Bulleted list", Format::BulletList),
        builtin(LIST_NUMBERS, "Numbered list", Format::NumberedList),
    ],
    &[
        builtin(LINK, "Link", Format::Link),
        custom(IMAGE, "Insert image", CustomHandler::InsertImage),
    ],
    &[custom(ERASER, "Clear document", CustomHandler::Clear)],
];

/// What the host must do after a toolbar action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEffect {
    None,
    /// Run the image routine and insert the result at `at`.
    RequestImage { at: usize },
}

/// Apply a toolbar action to the document.
pub fn apply(action: ToolbarAction, doc: &mut EditorDocument) -> EditorEffect {
    match action {
        ToolbarAction::Builtin(format) => {
            apply_format(format, doc);
            EditorEffect::None
        }
        ToolbarAction::Custom(CustomHandler::InsertImage) => EditorEffect::RequestImage {
            at: doc.selection().end,
        },
        ToolbarAction::Custom(CustomHandler::Clear) => {
            doc.clear();
            EditorEffect::None
        }
    }
}

fn apply_format(format: Format, doc: &mut EditorDocument) {
    match format {
        Format::Bold => doc.wrap_selection("**"),
        Format::Italic => doc.wrap_selection("_"),
        Format::Strikethrough => doc.wrap_selection("~~"),
        Format::Code => doc.wrap_selection("`"),
        Format::Heading => doc.prefix_lines(|_| "## ".to_string()),
        Format::Quote => doc.prefix_lines(|_| "> ".to_string()),
        Format::BulletList => doc.prefix_lines(|_| "- ".to_string()),
        Format::NumberedList => doc.prefix_lines(|n| format!("{}. ", n + 1)),
        Format::Link => doc.insert_link(LINK_PLACEHOLDER),
    }
}
