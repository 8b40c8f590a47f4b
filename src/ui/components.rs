//! Shared UI components.

use eframe::egui::{self, Color32, Response, RichText, Sense, StrokeKind, Ui};

/// Render a clickable dashboard card with dynamic size.
///
/// Returns the response which can be checked for `.clicked()`.
pub fn dashboard_card(ui: &mut Ui, title: &str, description: &str, icon: &str, size: egui::Vec2) -> Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let visuals = ui.style().interact(&response);

        // Scale factor based on width (200 is the reference size)
        let scale = size.x / 200.0;

        ui.painter().rect_filled(rect, 8.0, visuals.bg_fill);
        ui.painter()
            .rect_stroke(rect, 8.0, visuals.bg_stroke, StrokeKind::Outside);

        let icon_pos = egui::pos2(rect.center().x, rect.top() + size.y * 0.23);
        ui.painter().text(
            icon_pos,
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(36.0 * scale),
            visuals.text_color(),
        );

        let title_pos = egui::pos2(rect.center().x, rect.center().y + size.y * 0.07);
        ui.painter().text(
            title_pos,
            egui::Align2::CENTER_CENTER,
            title,
            egui::FontId::proportional(18.0 * scale),
            visuals.text_color(),
        );

        let desc_pos = egui::pos2(rect.center().x, rect.bottom() - size.y * 0.17);
        ui.painter().text(
            desc_pos,
            egui::Align2::CENTER_CENTER,
            description,
            egui::FontId::proportional(12.0 * scale),
            ui.visuals().weak_text_color(),
        );
    }

    response
}

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const PRIMARY: Color32 = Color32::from_rgb(68, 114, 196);
    pub const SKELETON: Color32 = Color32::from_gray(70);
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui) -> bool {
    ui.button(RichText::new("< Back to Dashboard").size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

/// Plain toolbar button.
pub fn styled_button(ui: &mut Ui, text: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(text).size(14.0)).min_size(egui::vec2(80.0, 28.0)))
}

/// Toolbar button with a leading icon.
pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(format!("{icon} {text}")).size(14.0)).min_size(egui::vec2(80.0, 28.0)))
}

/// Filled call-to-action button.
pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    primary_button_enabled(ui, true, icon, text)
}

/// Filled call-to-action button that can be disabled.
pub fn primary_button_enabled(ui: &mut Ui, enabled: bool, icon: &str, text: &str) -> Response {
    let label = if icon.is_empty() {
        text.to_string()
    } else {
        format!("{icon} {text}")
    };
    ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new(label).size(14.0).color(Color32::WHITE))
            .fill(colors::PRIMARY)
            .min_size(egui::vec2(80.0, 28.0)),
    )
}

/// Small icon button used in table rows.
pub fn action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).size(16.0)).frame(false))
        .on_hover_text(tooltip)
}

/// Row action button painted in the error color.
pub fn danger_action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).size(16.0).color(colors::ERROR)).frame(false))
        .on_hover_text(tooltip)
}

/// Grey placeholder bar shown in place of a cell while loading.
pub fn skeleton_cell(ui: &mut Ui, width: f32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 14.0), Sense::hover());
    ui.painter().rect_filled(rect, 4.0, colors::SKELETON);
}

/// Square image preview, or a neutral box when there is no image.
pub fn thumbnail(ui: &mut Ui, url: Option<&str>, size: f32) -> Response {
    match url {
        Some(url) => ui.add(
            egui::Image::new(url.to_string())
                .fit_to_exact_size(egui::vec2(size, size))
                .corner_radius(4),
        ),
        None => {
            let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), Sense::hover());
            ui.painter().rect_filled(rect, 4.0, colors::SKELETON);
            response
        }
    }
}

/// Red hint under a required field left empty.
pub fn required_hint(ui: &mut Ui, missing: Option<&'static str>, field: &'static str) {
    if missing == Some(field) {
        ui.colored_label(colors::ERROR, format!("{field} is required"));
    }
}
