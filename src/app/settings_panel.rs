//! Settings modal (backend URL, timeout, history)

use super::App;
use crate::api::ClipboardClient;
use crate::constants::*;
use crate::settings::Settings;
use crate::theme;
use crate::utils::normalize_backend_url;
use eframe::egui;
use std::time::Duration;
use tracing::{info, warn};

/// Editable copy of the settings while the modal is open
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDraft {
    pub backend_url: String,
    pub timeout_secs: u64,
    pub remember_keys: bool,
    pub error: Option<String>,
}

impl SettingsDraft {
    pub fn from_settings(settings: &Settings, effective_url: &str) -> Self {
        Self {
            backend_url: effective_url.to_string(),
            timeout_secs: settings.request_timeout().as_secs(),
            remember_keys: settings.remember_keys,
            error: None,
        }
    }
}

impl App {
    pub(crate) fn open_settings(&mut self) {
        let url = self.backend_url();
        self.settings_draft = SettingsDraft::from_settings(&self.settings, &url);
        self.show_settings = true;
    }

    /// Validate the draft, swap in a new client and persist. Returns false if the URL was rejected.
    pub(crate) fn apply_settings(&mut self) -> bool {
        let timeout_secs = self
            .settings_draft
            .timeout_secs
            .clamp(MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS);
        let url = if self.backend_overridden() {
            self.backend_url()
        } else {
            normalize_backend_url(&self.settings_draft.backend_url)
        };

        let client = match ClipboardClient::new(&url, Duration::from_secs(timeout_secs)) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "Settings rejected");
                self.settings_draft.error = Some(e.to_string());
                return false;
            }
        };

        if !self.backend_overridden() {
            self.settings.backend_url = url;
        }
        self.settings.request_timeout_secs = timeout_secs;
        self.settings.remember_keys = self.settings_draft.remember_keys;
        info!(
            url = client.base_url(),
            timeout_secs = timeout_secs,
            remember_keys = self.settings.remember_keys,
            "Settings applied"
        );
        self.client = Ok(client);
        self.settings_draft.error = None;
        self.save_settings();
        true
    }

    pub(crate) fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let modal = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(180))
            .frame(theme::modal_frame());
        let modal_response = modal.show(ctx, |ui| {
            ui.set_min_width(380.0);
            ui.set_max_width(380.0);

            ui.label(
                egui::RichText::new(format!("{}  Settings", egui_phosphor::regular::GEAR_SIX))
                    .size(theme::FONT_HEADING)
                    .strong(),
            );
            ui.add_space(theme::SPACING_LG);

            ui.label(egui::RichText::new("Backend URL").color(theme::TEXT_MUTED));
            ui.add_enabled(
                !self.backend_overridden(),
                egui::TextEdit::singleline(&mut self.settings_draft.backend_url)
                    .hint_text(DEFAULT_BACKEND_URL)
                    .desired_width(f32::INFINITY),
            );
            if self.backend_overridden() {
                ui.label(
                    egui::RichText::new(format!("Set by the {} environment variable", BACKEND_URL_ENV))
                        .size(theme::FONT_SMALL)
                        .color(theme::STATUS_WARNING),
                );
            }
            ui.add_space(theme::SPACING_MD);

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Request timeout").color(theme::TEXT_MUTED));
                ui.add(
                    egui::DragValue::new(&mut self.settings_draft.timeout_secs)
                        .range(MIN_REQUEST_TIMEOUT_SECS..=MAX_REQUEST_TIMEOUT_SECS)
                        .suffix(" s"),
                );
            });
            ui.add_space(theme::SPACING_MD);

            if theme::settings_checkbox(
                ui,
                self.settings_draft.remember_keys,
                "Remember keys I save",
                self.db.is_some(),
            ) {
                self.settings_draft.remember_keys = !self.settings_draft.remember_keys;
            }

            if let Some(err) = &self.settings_draft.error {
                ui.add_space(theme::SPACING_MD);
                ui.label(
                    egui::RichText::new(format!("{}  {}", egui_phosphor::regular::WARNING, err))
                        .color(theme::STATUS_ERROR),
                );
            }

            ui.add_space(theme::SPACING_XL);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(theme::button_accent(format!("{}  Apply", egui_phosphor::regular::CHECK)))
                    .clicked()
                    && self.apply_settings()
                {
                    self.show_settings = false;
                }
                if ui
                    .add(theme::button(format!("{}  Cancel", egui_phosphor::regular::X)))
                    .clicked()
                {
                    self.show_settings = false;
                }
            });
        });

        if modal_response.should_close() {
            self.show_settings = false;
        }
    }
}
