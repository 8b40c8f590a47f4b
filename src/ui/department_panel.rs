//! Department management panel.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_XLS, PENCIL, PLUS, TRASH};

use super::app::App;
use super::components::{
    action_button, back_button, danger_action_button, panel_header, primary_button_enabled, primary_button_with_icon,
    required_hint, skeleton_cell, styled_button, styled_button_with_icon,
};
use crate::models::Department;

/// Placeholder rows shown before the first list response.
const SKELETON_ROWS: usize = 4;

enum RowAction {
    Edit(Department),
    Delete(Department),
}

/// Show the department panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Manage Departments");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Department").clicked() {
            app.departments.open_create();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            let request = app.departments.refresh();
            app.dispatch_departments(request);
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_XLS, "Export to Excel").clicked() {
            app.export_departments();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.departments.form().open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let loading = app.departments.is_loading();
    let mut action = None;

    if !loading {
        ui.label(format!("{} departments", app.departments.rows().len()));
        ui.add_space(10.0);
    }

    ScrollArea::vertical().id_salt("department_scroll").show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("departments_grid")
            .num_columns(4)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                // Header
                ui.strong("Name");
                ui.strong("Description");
                ui.strong("Team Members");
                ui.strong("Actions");
                ui.end_row();

                if loading {
                    for _ in 0..SKELETON_ROWS {
                        skeleton_cell(ui, 140.0);
                        skeleton_cell(ui, 220.0);
                        skeleton_cell(ui, 40.0);
                        skeleton_cell(ui, 50.0);
                        ui.end_row();
                    }
                    return;
                }

                for dept in app.departments.rows() {
                    ui.label(&dept.name);
                    ui.label(dept.description.as_deref().unwrap_or("-"));
                    ui.label(dept.team_member_count().to_string());

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            action = Some(RowAction::Edit(dept.clone()));
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            action = Some(RowAction::Delete(dept.clone()));
                        }
                    });

                    ui.end_row();
                }
            });

        if !loading && app.departments.rows().is_empty() {
            ui.add_space(20.0);
            ui.label(RichText::new("No departments yet").weak());
        }
    });

    match action {
        Some(RowAction::Edit(dept)) => app.departments.open_edit(&dept),
        Some(RowAction::Delete(dept)) => app.departments.request_delete(&dept),
        None => {}
    }
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.departments.form().is_edit {
        "Edit Department"
    } else {
        "Add Department"
    };

    let mut save = false;
    let mut cancel = false;

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            let form = app.departments.form_mut();
            egui::Grid::new("dept_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Name:");
                    ui.vertical(|ui| {
                        ui.add(egui::TextEdit::singleline(&mut form.values.name).desired_width(250.0));
                        required_hint(ui, form.missing, "Name");
                    });
                    ui.end_row();

                    ui.label("Description:");
                    ui.add(
                        egui::TextEdit::multiline(&mut form.values.description)
                            .desired_width(250.0)
                            .desired_rows(3)
                            .hint_text("Optional"),
                    );
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            let can_submit = app.departments.can_submit();
            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    cancel = true;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if primary_button_enabled(ui, can_submit, "", "Save").clicked() {
                        save = true;
                    }
                });
            });
        });

    if cancel {
        app.departments.close_form();
    } else if save && let Some(request) = app.departments.submit() {
        app.dispatch_departments(request);
    }
}
