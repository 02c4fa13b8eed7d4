//! Recently saved keys (side panel)

use super::App;
use crate::constants::HISTORY_LIMIT;
use crate::theme;
use crate::utils::format_remaining;
use chrono::Utc;
use eframe::egui;
use std::time::Duration;
use tracing::{debug, error};

impl App {
    pub(crate) fn record_history(&mut self, key: &str, text: &str) {
        if !self.settings.remember_keys {
            return;
        }
        let Some(db) = &self.db else {
            return;
        };
        if let Err(e) = db.record_saved(key, text, Utc::now()) {
            error!(error = %e, key = %key, "Failed to record saved key");
        }
        self.refresh_history();
    }

    pub(crate) fn refresh_history(&mut self) {
        let Some(db) = &self.db else {
            return;
        };
        match db.recent_keys(Utc::now(), HISTORY_LIMIT) {
            Ok(keys) => self.history = keys,
            Err(e) => error!(error = %e, "Failed to load history"),
        }
    }

    pub(crate) fn prune_history(&mut self) {
        if let Some(db) = &self.db {
            if let Err(e) = db.prune_expired(Utc::now()) {
                error!(error = %e, "Failed to prune history");
            }
        }
    }

    pub(crate) fn clear_history(&mut self) {
        if let Some(db) = &self.db {
            if let Err(e) = db.clear_history() {
                error!(error = %e, "Failed to clear history");
                return;
            }
        }
        debug!("History cleared");
        self.history.clear();
    }

    /// Put `key` into the retrieve field and fetch it
    pub(crate) fn fetch_from_history(&mut self, key: String, ctx: &egui::Context) {
        self.form.key = key;
        self.submit_get(ctx);
    }

    pub(crate) fn render_history_panel(&mut self, ui: &mut egui::Ui) {
        let now = Utc::now();
        self.history.retain(|k| k.remaining(now) > chrono::Duration::zero());

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("{}  Recent keys", egui_phosphor::regular::CLOCK_COUNTER_CLOCKWISE))
                    .size(theme::FONT_HEADING)
                    .strong(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let clear = ui.add_enabled(
                    !self.history.is_empty(),
                    theme::button(format!("{}  Clear", egui_phosphor::regular::TRASH)).small(),
                );
                if clear.clicked() {
                    self.clear_history();
                }
            });
        });
        ui.add_space(theme::SPACING_MD);

        if self.db.is_none() {
            ui.label(egui::RichText::new("History is unavailable").color(theme::TEXT_DIM));
            return;
        }
        if !self.settings.remember_keys {
            ui.label(egui::RichText::new("Remembering keys is turned off in settings").color(theme::TEXT_DIM));
        } else if self.history.is_empty() {
            ui.label(egui::RichText::new("Keys you save show up here").color(theme::TEXT_DIM));
        }

        let mut clicked: Option<String> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for entry in &self.history {
                let response = theme::card_frame()
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(&entry.key)
                                    .monospace()
                                    .size(theme::FONT_HEADING)
                                    .color(theme::ACCENT),
                            );
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(
                                    egui::RichText::new(format_remaining(entry.remaining(now)))
                                        .size(theme::FONT_SMALL)
                                        .color(theme::TEXT_MUTED),
                                );
                            });
                        });
                        ui.label(
                            egui::RichText::new(&entry.preview)
                                .size(theme::FONT_LABEL)
                                .color(theme::TEXT_SECONDARY),
                        );
                    })
                    .response
                    .interact(egui::Sense::click())
                    .on_hover_text("Retrieve this key");
                if response.clicked() {
                    clicked = Some(entry.key.clone());
                }
                ui.add_space(theme::SPACING_SM);
            }
        });

        if let Some(key) = clicked {
            let ctx = ui.ctx().clone();
            self.fetch_from_history(key, &ctx);
        }

        // Countdown labels tick once a second
        ui.ctx().request_repaint_after(Duration::from_secs(1));
    }
}
