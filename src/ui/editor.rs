//! Biography editor widget: formatting toolbar over a markdown text area.

use eframe::egui::text::{CCursor, CCursorRange};
use eframe::egui::text_edit::TextEditState;
use eframe::egui::{self, RichText, TextStyle, Ui};

use crate::editor::{EditorDocument, EditorEffect, TOOLBAR, ToolbarAction, apply};

/// Show the editor for `doc`.
///
/// Returns [`EditorEffect::RequestImage`] when the image button was pressed;
/// the caller runs the upload and inserts the result. While `busy` the text
/// is read-only so the recorded insertion offset stays valid.
pub fn show(ui: &mut Ui, id_salt: &str, doc: &mut EditorDocument, busy: bool) -> EditorEffect {
    let id = ui.make_persistent_id(id_salt);
    let mut clicked: Option<ToolbarAction> = None;

    ui.horizontal_wrapped(|ui| {
        for (idx, group) in TOOLBAR.iter().enumerate() {
            if idx > 0 {
                ui.separator();
            }
            for button in group.iter() {
                if ui
                    .add_enabled(!busy, egui::Button::new(RichText::new(button.icon).size(16.0)).frame(false))
                    .on_hover_text(button.tooltip)
                    .clicked()
                {
                    clicked = Some(button.action);
                }
            }
        }
        if busy {
            ui.spinner();
            ui.label(RichText::new("Uploading image...").small().weak());
        }
    });

    let mut effect = EditorEffect::None;
    if let Some(action) = clicked {
        effect = apply(action, doc);
        store_selection(ui.ctx(), id, doc);
        ui.memory_mut(|m| m.request_focus(id));
    }

    let output = egui::TextEdit::multiline(doc.text_mut())
        .id(id)
        .font(TextStyle::Monospace)
        .desired_rows(8)
        .desired_width(f32::INFINITY)
        .hint_text("Write a short biography...")
        .interactive(!busy)
        .show(ui);

    match output.state.cursor.char_range() {
        Some(range) => doc.set_selection(range.primary.index, range.secondary.index),
        None => {
            // Keep the stored selection in bounds after external edits.
            let sel = doc.selection();
            doc.set_selection(sel.start, sel.end);
        }
    }

    effect
}

/// Push the document selection into the text widget state.
pub fn store_selection(ctx: &egui::Context, id: egui::Id, doc: &EditorDocument) {
    let sel = doc.selection();
    let mut state = TextEditState::load(ctx, id).unwrap_or_default();
    state
        .cursor
        .set_char_range(Some(CCursorRange::two(CCursor::new(sel.start), CCursor::new(sel.end))));
    state.store(ctx, id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ctx: &egui::Context, events: Vec<egui::Event>, doc: &mut EditorDocument, busy: bool) {
        let input = egui::RawInput {
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let id = ui.make_persistent_id("bio");
                ui.memory_mut(|m| m.request_focus(id));
                show(ui, "bio", doc, busy);
            });
        });
    }

    #[test]
    fn test_typing_edits_idle_editor() {
        let ctx = egui::Context::default();
        let mut doc = EditorDocument::new("Hello");
        frame(&ctx, Vec::new(), &mut doc, false);
        frame(&ctx, vec![egui::Event::Text("!".to_string())], &mut doc, false);
        assert_ne!(doc.text(), "Hello");
    }

    #[test]
    fn test_typing_ignored_while_uploading() {
        let ctx = egui::Context::default();
        let mut doc = EditorDocument::new("Hello");
        frame(&ctx, Vec::new(), &mut doc, false);
        frame(&ctx, vec![egui::Event::Text("xy".to_string())], &mut doc, true);
        assert_eq!(doc.text(), "Hello");
    }
}
