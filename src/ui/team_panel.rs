//! Team member management panel with photo upload and biography editor.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_XLS, IMAGE, PENCIL, PLUS, TRASH};

use super::app::App;
use super::components::{
    action_button, back_button, danger_action_button, panel_header, primary_button_enabled, primary_button_with_icon,
    required_hint, skeleton_cell, styled_button, styled_button_with_icon, thumbnail,
};
use super::editor;
use crate::editor::EditorEffect;
use crate::models::TeamMember;

/// Placeholder rows shown before the first list response.
const SKELETON_ROWS: usize = 4;

const ROW_THUMBNAIL: f32 = 36.0;
const FORM_THUMBNAIL: f32 = 96.0;

enum RowAction {
    Edit(TeamMember),
    Delete(TeamMember),
}

/// Show the team panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Manage Team");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Team Member").clicked() {
            app.open_team_create();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            let request = app.team.refresh();
            app.dispatch_team(request);
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_XLS, "Export to Excel").clicked() {
            app.export_team();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.team.form().open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let loading = app.team.is_loading();
    let mut action = None;

    if !loading {
        ui.label(format!("{} team members", app.team.rows().len()));
        ui.add_space(10.0);
    }

    ScrollArea::vertical().id_salt("team_scroll").show(ui, |ui| {
        ui.add_space(4.0);
        egui::Grid::new("team_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                // Header
                ui.strong("Photo");
                ui.strong("Name");
                ui.strong("Designation");
                ui.strong("Department");
                ui.strong("Actions");
                ui.end_row();

                if loading {
                    for _ in 0..SKELETON_ROWS {
                        skeleton_cell(ui, ROW_THUMBNAIL);
                        skeleton_cell(ui, 140.0);
                        skeleton_cell(ui, 120.0);
                        skeleton_cell(ui, 120.0);
                        skeleton_cell(ui, 50.0);
                        ui.end_row();
                    }
                    return;
                }

                for member in app.team.rows() {
                    let url = member.image.as_deref().map(|r| app.uploader.resolve_url(r));
                    thumbnail(ui, url.as_deref(), ROW_THUMBNAIL);
                    ui.label(&member.name);
                    ui.label(&member.designation);
                    ui.label(member.department_name().unwrap_or("-"));

                    ui.horizontal(|ui| {
                        ui.add_space(8.0);
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            action = Some(RowAction::Edit(member.clone()));
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            action = Some(RowAction::Delete(member.clone()));
                        }
                    });

                    ui.end_row();
                }
            });

        if !loading && app.team.rows().is_empty() {
            ui.add_space(20.0);
            ui.label(RichText::new("No team members yet").weak());
        }
    });

    match action {
        Some(RowAction::Edit(member)) => app.open_team_edit(&member),
        Some(RowAction::Delete(member)) => app.team.request_delete(&member),
        None => {}
    }
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.team.form().is_edit {
        "Edit Team Member"
    } else {
        "Add Team Member"
    };

    let mut save = false;
    let mut cancel = false;
    let mut pick_photo = false;
    let mut effect = EditorEffect::None;

    // Preview of the new upload, else of the stored image
    let preview = {
        let values = &app.team.form().values;
        values
            .image
            .as_deref()
            .or(values.current_image.as_deref())
            .map(|r| app.uploader.resolve_url(r))
    };
    let bio_busy = app.bio_uploads > 0;

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(560.0)
        .max_height(640.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            ScrollArea::vertical().max_height(520.0).show(ui, |ui| {
                let departments = app.departments.rows();
                let form = app.team.form_mut();

                egui::Grid::new("team_form_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Name:");
                        ui.vertical(|ui| {
                            ui.add(egui::TextEdit::singleline(&mut form.values.name).desired_width(280.0));
                            required_hint(ui, form.missing, "Name");
                        });
                        ui.end_row();

                        ui.label("Designation:");
                        ui.vertical(|ui| {
                            ui.add(egui::TextEdit::singleline(&mut form.values.designation).desired_width(280.0));
                            required_hint(ui, form.missing, "Designation");
                        });
                        ui.end_row();

                        ui.label("Department:");
                        let selected = form
                            .values
                            .department_id
                            .as_deref()
                            .and_then(|id| departments.iter().find(|d| d.id == id))
                            .map(|d| d.name.as_str())
                            .unwrap_or("None");
                        egui::ComboBox::from_id_salt("team_form_dept")
                            .width(280.0)
                            .selected_text(selected)
                            .show_ui(ui, |ui| {
                                if ui
                                    .selectable_label(form.values.department_id.is_none(), "None")
                                    .clicked()
                                {
                                    form.values.department_id = None;
                                }
                                for dept in departments {
                                    let is_selected = form.values.department_id.as_deref() == Some(dept.id.as_str());
                                    if ui.selectable_label(is_selected, &dept.name).clicked() {
                                        form.values.department_id = Some(dept.id.clone());
                                    }
                                }
                            });
                        ui.end_row();

                        ui.label("Photo:");
                        ui.horizontal(|ui| {
                            thumbnail(ui, preview.as_deref(), FORM_THUMBNAIL);
                            ui.add_space(10.0);
                            ui.vertical(|ui| {
                                let uploading = form.values.uploading;
                                if ui
                                    .add_enabled(!uploading, egui::Button::new(format!("{IMAGE} Choose image...")))
                                    .clicked()
                                {
                                    pick_photo = true;
                                }
                                if uploading {
                                    ui.horizontal(|ui| {
                                        ui.spinner();
                                        ui.label("Uploading...");
                                    });
                                } else if form.values.image.is_some() {
                                    ui.weak("New image ready");
                                }
                            });
                        });
                        ui.end_row();
                    });

                ui.add_space(10.0);
                ui.label("Biography:");
                effect = editor::show(ui, "team_bio_editor", &mut form.values.bio, bio_busy);
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            let can_submit = app.team.can_submit();
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

    if let EditorEffect::RequestImage { at } = effect {
        app.insert_bio_image(at);
    }

    if pick_photo {
        app.pick_member_photo();
    }

    if cancel {
        app.team.close_form();
    } else if save && let Some(request) = app.team.submit() {
        app.dispatch_team(request);
    }
}
