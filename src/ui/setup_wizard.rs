//! First-run setup wizard for configuration.

use std::path::PathBuf;
use std::sync::mpsc;

use eframe::egui::{self, Color32, RichText};

use crate::api::ApiClient;
use crate::config::{AppConfig, MAX_TOAST_SECONDS};

/// Connection test state.
#[derive(Default, Clone)]
pub enum ConnectionTestState {
    #[default]
    NotTested,
    Testing,
    Success,
    Failed(String),
}

/// Setup wizard state.
pub struct SetupWizard {
    /// Current step (0-3).
    pub current_step: usize,
    /// Configuration being built.
    pub config: AppConfig,
    /// API connection test state.
    pub api_test_state: ConnectionTestState,
    /// Wizard completed flag.
    pub completed: bool,
    /// Toast duration input as string for text editing.
    toast_input: String,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl SetupWizard {
    /// Start from `config`, typically the defaults or a partly valid file.
    pub fn new(config: AppConfig) -> Self {
        Self {
            current_step: 0,
            toast_input: config.ui.toast_seconds.to_string(),
            config,
            api_test_state: ConnectionTestState::NotTested,
            completed: false,
        }
    }

    /// Check if user can proceed to next step.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            0 => true, // Welcome - always can proceed
            1 => matches!(self.api_test_state, ConnectionTestState::Success),
            2 => self.validate_upload_step().is_ok(),
            3 => true, // Confirmation
            _ => false,
        }
    }

    /// Validate upload step inputs.
    fn validate_upload_step(&self) -> Result<(), String> {
        let upload = &self.config.upload;
        if !is_http_url(&upload.endpoint) {
            return Err("Upload endpoint must start with http:// or https://".to_string());
        }
        if !is_http_url(&upload.public_base_url) {
            return Err("Public base URL must start with http:// or https://".to_string());
        }
        if self.config.ui.toast_seconds < 1 {
            return Err("Notifications must stay at least 1 second".to_string());
        }
        if self.config.ui.toast_seconds > MAX_TOAST_SECONDS {
            return Err(format!("Notifications can stay at most {MAX_TOAST_SECONDS} seconds"));
        }
        Ok(())
    }

    /// Get step title.
    fn step_title(&self) -> &'static str {
        match self.current_step {
            0 => "Welcome",
            1 => "API Connection",
            2 => "Image Uploads",
            3 => "Confirmation",
            _ => "Setup",
        }
    }

    /// Total number of steps.
    const TOTAL_STEPS: usize = 4;
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Setup wizard application.
pub struct SetupApp {
    pub wizard: SetupWizard,
    pub initial_error: Option<String>,
    pub rt: tokio::runtime::Runtime,
    config_path: PathBuf,
    api_test_rx: Option<mpsc::Receiver<Result<(), String>>>,
}

impl SetupApp {
    pub fn new(
        wizard: SetupWizard,
        initial_error: Option<String>,
        config_path: PathBuf,
        rt: tokio::runtime::Runtime,
    ) -> Self {
        Self {
            wizard,
            initial_error,
            rt,
            config_path,
            api_test_rx: None,
        }
    }

    /// Test the API connection asynchronously.
    fn start_api_test(&mut self) {
        let url = self.wizard.config.api.base_url.trim().to_string();
        let (tx, rx) = mpsc::channel();
        self.api_test_rx = Some(rx);
        self.wizard.api_test_state = ConnectionTestState::Testing;

        self.rt.spawn(async move {
            let result = test_api_connection(&url).await;
            let _ = tx.send(result);
        });
    }

    /// Check for async test results.
    fn poll_test_results(&mut self) {
        if let Some(rx) = &self.api_test_rx
            && let Ok(result) = rx.try_recv()
        {
            self.wizard.api_test_state = match result {
                Ok(()) => ConnectionTestState::Success,
                Err(e) => ConnectionTestState::Failed(e),
            };
            self.api_test_rx = None;
        }
    }
}

impl eframe::App for SetupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async test results
        self.poll_test_results();

        // Request repaint while testing
        if matches!(self.wizard.api_test_state, ConnectionTestState::Testing) {
            ctx.request_repaint();
        }

        // Show initial error dialog
        if let Some(err) = self.initial_error.clone() {
            egui::Window::new("Configuration Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(Color32::from_rgb(255, 100, 100), &err);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.initial_error = None;
                    }
                });
            return;
        }

        // Main wizard panel
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                // Header
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Team Admin Setup").size(24.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!(
                            "Step {} of {}",
                            self.wizard.current_step + 1,
                            SetupWizard::TOTAL_STEPS
                        ));
                    });
                });

                ui.separator();
                ui.add_space(10.0);

                // Step title
                ui.heading(self.wizard.step_title());
                ui.add_space(20.0);

                // Step content
                let needs_api_test = match self.wizard.current_step {
                    0 => {
                        show_welcome_step(ui);
                        false
                    }
                    1 => show_api_step(ui, &mut self.wizard),
                    2 => {
                        show_upload_step(ui, &mut self.wizard);
                        false
                    }
                    3 => {
                        show_confirmation_step(ui, &self.wizard, &self.config_path);
                        false
                    }
                    _ => false,
                };

                if needs_api_test {
                    self.start_api_test();
                }

                ui.add_space(30.0);
                ui.separator();

                // Navigation buttons
                ui.horizontal(|ui| {
                    if self.wizard.current_step > 0 && ui.button("< Back").clicked() {
                        self.wizard.current_step -= 1;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.wizard.current_step < SetupWizard::TOTAL_STEPS - 1 {
                            let btn_text = if self.wizard.current_step == 0 {
                                "Get Started >"
                            } else {
                                "Next >"
                            };
                            let enabled = self.wizard.can_proceed();
                            if ui.add_enabled(enabled, egui::Button::new(btn_text)).clicked() {
                                self.wizard.current_step += 1;
                            }
                        } else if ui.button("Save & Exit").clicked() {
                            self.wizard.completed = true;
                        }
                    });
                });
            });
        });

        // Handle completion
        if self.wizard.completed {
            let result = self
                .wizard
                .config
                .validate()
                .and_then(|()| self.wizard.config.save(&self.config_path));
            match result {
                Ok(()) => {
                    tracing::info!("Configuration saved to {}", self.config_path.display());
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => {
                    tracing::error!("Failed to save config: {}", e);
                    self.initial_error = Some(format!("Failed to save config: {}", e));
                    self.wizard.completed = false;
                }
            }
        }
    }
}

fn show_welcome_step(ui: &mut egui::Ui) {
    ui.label("Welcome to Team Admin!");
    ui.add_space(10.0);
    ui.label("This wizard will help you configure the application.");
    ui.add_space(20.0);
    ui.label("You will need:");
    ui.add_space(5.0);
    ui.label("  - The base URL of the team REST API");
    ui.label("  - The image upload endpoint and its public URL");
}

fn show_api_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) -> bool {
    let mut needs_test = false;

    egui::Grid::new("api_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Base URL:");
            if ui.text_edit_singleline(&mut wizard.config.api.base_url).changed() {
                wizard.api_test_state = ConnectionTestState::NotTested;
            }
            ui.end_row();
        });

    ui.add_space(20.0);

    ui.horizontal(|ui| {
        let testing = matches!(wizard.api_test_state, ConnectionTestState::Testing);
        if ui.add_enabled(!testing, egui::Button::new("Test Connection")).clicked() {
            needs_test = true;
        }

        ui.add_space(10.0);

        match &wizard.api_test_state {
            ConnectionTestState::NotTested => {
                ui.label("Not tested");
            }
            ConnectionTestState::Testing => {
                ui.spinner();
                ui.label("Testing...");
            }
            ConnectionTestState::Success => {
                ui.colored_label(Color32::from_rgb(100, 200, 100), "Connection successful!");
            }
            ConnectionTestState::Failed(e) => {
                ui.colored_label(Color32::from_rgb(255, 100, 100), format!("Failed: {}", e));
            }
        }
    });

    needs_test
}

fn show_upload_step(ui: &mut egui::Ui, wizard: &mut SetupWizard) {
    ui.label("Configure where team member photos are uploaded.");
    ui.add_space(10.0);

    egui::Grid::new("upload_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label("Upload endpoint:");
            ui.text_edit_singleline(&mut wizard.config.upload.endpoint);
            ui.end_row();

            ui.label("Public base URL:");
            ui.text_edit_singleline(&mut wizard.config.upload.public_base_url);
            ui.end_row();

            ui.label("Notification seconds:");
            if ui.text_edit_singleline(&mut wizard.toast_input).changed()
                && let Ok(s) = wizard.toast_input.parse()
            {
                wizard.config.ui.toast_seconds = s;
            }
            ui.end_row();
        });

    // Validation feedback
    if let Err(e) = wizard.validate_upload_step() {
        ui.add_space(10.0);
        ui.colored_label(Color32::from_rgb(255, 100, 100), e);
    }
}

fn show_confirmation_step(ui: &mut egui::Ui, wizard: &SetupWizard, path: &std::path::Path) {
    ui.label("Review your configuration:");
    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("API");
        ui.label(format!("  {}", wizard.config.api.base_url));
    });

    ui.add_space(10.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Uploads");
        ui.label(format!("  Endpoint: {}", wizard.config.upload.endpoint));
        ui.label(format!("  Public URL: {}", wizard.config.upload.public_base_url));
        ui.label(format!("  Notifications: {} s", wizard.config.ui.toast_seconds));
    });

    ui.add_space(20.0);
    ui.label(format!("Settings will be written to {}.", path.display()));
    ui.label("You will need to restart the application after setup.");
}

/// Check that the API answers a department list.
async fn test_api_connection(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("URL is empty".to_string());
    }

    let client = ApiClient::new(url).map_err(|e| e.to_string())?;
    client.test_connection().await.map_err(|e| e.to_string())
}
