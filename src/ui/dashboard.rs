//! Dashboard panel with stats, navigation cards, quick actions, and activity log.

use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{BUILDINGS, USERS};

use super::app::{App, LogLevel, Panel};
use super::components::{colors, dashboard_card};

/// Show the dashboard panel.
///
/// Returns `Some(panel)` if navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Panel> {
    let mut next_panel = None;

    ui.vertical_centered(|ui| {
        ui.add_space(30.0);

        // Header
        ui.label(RichText::new("Team Admin").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Departments and Team Management").size(14.0).weak());

        ui.add_space(30.0);

        // Stat cards row
        ui.horizontal(|ui| {
            let available = ui.available_width();
            let start_offset = ((available - 340.0) / 2.0).max(0.0);
            ui.add_space(start_offset);

            stat_card(
                ui,
                "Departments",
                &count_label(app.departments.is_loading(), app.departments.rows().len()),
                "Organizational units",
            );
            stat_card(
                ui,
                "Team Members",
                &count_label(app.team.is_loading(), app.team.rows().len()),
                "Published profiles",
            );
        });

        ui.add_space(30.0);

        // Navigation cards row
        let available = ui.available_width();
        let num_cards = 2.0;
        let spacing = 30.0;
        let total_spacing = spacing * (num_cards - 1.0);
        let card_width = ((available - total_spacing) / num_cards).clamp(150.0, 250.0);
        let card_height = card_width * 0.75;
        let card_size = egui::vec2(card_width, card_height);
        let total_width = card_width * num_cards + total_spacing;
        let start_offset = ((available - total_width) / 2.0).max(0.0);

        ui.horizontal(|ui| {
            ui.add_space(start_offset);

            if dashboard_card(ui, "Manage Departments", "Organize the team", BUILDINGS, card_size).clicked() {
                next_panel = Some(Panel::Departments);
            }

            ui.add_space(spacing);

            if dashboard_card(ui, "Manage Team", "Member profiles", USERS, card_size).clicked() {
                next_panel = Some(Panel::Team);
            }
        });

        ui.add_space(30.0);
    });

    // Two-column layout: Quick Actions | Recent Activity
    let available_width = ui.available_width();
    let column_width = (available_width - 40.0) / 2.0;

    ui.horizontal(|ui| {
        ui.add_space(10.0);

        // Left column - Quick Actions
        ui.vertical(|ui| {
            ui.set_width(column_width);

            egui::Frame::new()
                .fill(ui.style().visuals.extreme_bg_color)
                .inner_margin(Margin::same(15))
                .corner_radius(CornerRadius::same(8))
                .show(ui, |ui| {
                    ui.set_min_width(column_width - 30.0);

                    ui.label(RichText::new("Quick Actions").strong());
                    ui.add_space(10.0);

                    if ui.button("Add Department").clicked() {
                        next_panel = Some(Panel::Departments);
                        app.departments.open_create();
                    }

                    ui.add_space(5.0);

                    if ui.button("Add Team Member").clicked() {
                        next_panel = Some(Panel::Team);
                        app.open_team_create();
                    }

                    ui.add_space(5.0);

                    if ui.button("Clear Activity").clicked() {
                        app.clear_log();
                    }
                });
        });

        ui.add_space(20.0);

        // Right column - Recent Activity
        ui.vertical(|ui| {
            ui.set_width(column_width);

            egui::Frame::new()
                .fill(ui.style().visuals.extreme_bg_color)
                .inner_margin(Margin::same(15))
                .corner_radius(CornerRadius::same(8))
                .show(ui, |ui| {
                    ui.set_min_width(column_width - 30.0);

                    ui.label(RichText::new("Recent Activity").strong());
                    ui.add_space(10.0);

                    ScrollArea::vertical().max_height(150.0).show(ui, |ui| {
                        if app.log_messages.is_empty() {
                            ui.label(RichText::new("No recent activity").weak());
                        } else {
                            for entry in app.log_messages.iter().rev().take(10) {
                                let color = match entry.level {
                                    LogLevel::Info => Color32::GRAY,
                                    LogLevel::Success => colors::SUCCESS,
                                    LogLevel::Warning => colors::WARNING,
                                    LogLevel::Error => colors::ERROR,
                                };

                                ui.horizontal(|ui| {
                                    ui.label(
                                        RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                            .small()
                                            .color(Color32::DARK_GRAY),
                                    );
                                    ui.label(RichText::new(&entry.message).color(color));
                                });
                            }
                        }
                    });
                });
        });
    });

    ui.add_space(20.0);

    // Backend section
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::symmetric(10, 0))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.label(RichText::new("Backend").strong());
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.label("API:");
                ui.label(RichText::new(&app.config.api.base_url).weak());
            });
            ui.horizontal(|ui| {
                ui.label("Uploads:");
                ui.label(RichText::new(&app.config.upload.endpoint).weak());
            });
        });

    next_panel
}

/// Render a stat card with title, value, and subtitle.
fn stat_card(ui: &mut Ui, title: &str, value: &str, subtitle: &str) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::same(5))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_min_width(150.0);

            ui.vertical(|ui| {
                ui.label(RichText::new(title).small());
                ui.label(RichText::new(value).heading().strong());
                ui.label(RichText::new(subtitle).small().weak());
            });
        });
}

fn count_label(loading: bool, count: usize) -> String {
    if loading { "...".to_string() } else { count.to_string() }
}
