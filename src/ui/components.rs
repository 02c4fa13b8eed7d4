//! Reusable UI components
//!
//! This module contains standalone UI components that can be used
//! throughout the application.

use crate::theme;
use eframe::egui;

/// Red error line shown under the text area, prefixed with `*`
pub fn error_line(ui: &mut egui::Ui, message: &str) {
    ui.label(
        egui::RichText::new(format!("*{}", message))
            .size(theme::FONT_LABEL)
            .color(theme::STATUS_ERROR),
    );
}

/// "Your key: …" row with a copy button. Returns true when copy was clicked.
pub fn key_badge(ui: &mut egui::Ui, key: &str) -> bool {
    let mut copy = false;
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("Your key:")
                .size(theme::FONT_HEADING)
                .color(theme::TEXT_SECONDARY),
        );
        ui.label(
            egui::RichText::new(key)
                .monospace()
                .size(theme::FONT_HEADING)
                .strong()
                .color(theme::ACCENT),
        );
        copy = ui
            .add(theme::button(egui_phosphor::regular::COPY).small())
            .on_hover_text("Copy key")
            .clicked();
    });
    copy
}

/// Title row: app name on the left, history/settings toggles on the right.
/// Returns (history_clicked, settings_clicked).
pub fn header(ui: &mut egui::Ui, title: &str, history_open: bool) -> (bool, bool) {
    let mut history = false;
    let mut settings = false;
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(format!("{}  {}", egui_phosphor::regular::CLIPBOARD_TEXT, title))
                .size(theme::FONT_TITLE)
                .strong()
                .color(theme::TEXT_PRIMARY),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            settings = ui
                .add(theme::button(egui_phosphor::regular::GEAR_SIX))
                .on_hover_text("Settings")
                .clicked();
            let history_btn = if history_open {
                theme::button(egui_phosphor::regular::CLOCK_COUNTER_CLOCKWISE).fill(theme::BG_HOVER)
            } else {
                theme::button(egui_phosphor::regular::CLOCK_COUNTER_CLOCKWISE)
            };
            history = ui.add(history_btn).on_hover_text("Recent keys").clicked();
        });
    });
    (history, settings)
}
