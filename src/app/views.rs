//! Main form view: text to send, key to retrieve, retrieved text

use super::App;
use crate::constants::APP_NAME;
use crate::theme;
use crate::types::RequestKind;
use crate::ui::components;
use eframe::egui;

impl App {
    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui) {
        let (history, settings) = components::header(ui, APP_NAME, self.settings.show_history);
        if history {
            self.settings.show_history = !self.settings.show_history;
            if self.settings.show_history {
                self.refresh_history();
            }
        }
        if settings {
            self.open_settings();
        }
    }

    pub(crate) fn render_form(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        let width = ui.available_width() * theme::CONTENT_WIDTH_RATIO;
        let mut copy_key = false;
        let mut copy_text = false;

        ui.vertical_centered(|ui| {
            ui.add_space(theme::SPACING_XL);

            // Text to send
            ui.add(
                egui::TextEdit::multiline(&mut self.form.value)
                    .hint_text("Enter your text")
                    .desired_width(width)
                    .desired_rows(10)
                    .margin(egui::Margin::symmetric(8, 6)),
            );

            if self.form.show_error() {
                components::error_line(ui, &self.form.error);
            }
            if self.form.show_response_key() {
                copy_key = components::key_badge(ui, &self.form.response_key);
            }

            ui.add_space(theme::SPACING_LG);
            let saving = self.is_pending(RequestKind::Save);
            let send_label = format!("{}  Send", egui_phosphor::regular::PAPER_PLANE_RIGHT);
            if ui.add_enabled(!saving, theme::button_accent(send_label)).clicked() {
                self.submit_save(&ctx);
            }

            // Key to retrieve
            ui.add_space(theme::SPACING_XL);
            let key_input = ui.add(
                egui::TextEdit::singleline(&mut self.form.key)
                    .hint_text("Key to retrieve")
                    .desired_width(theme::KEY_INPUT_WIDTH)
                    .font(egui::TextStyle::Monospace)
                    .margin(egui::Margin::symmetric(8, 8)),
            );
            if key_input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.submit_get(&ctx);
            }

            ui.add_space(theme::SPACING_LG);
            let retrieving = self.is_pending(RequestKind::Get);
            let retrieve_label = format!("{}  Retrieve", egui_phosphor::regular::DOWNLOAD_SIMPLE);
            if ui.add_enabled(!retrieving, theme::button_accent(retrieve_label)).clicked() {
                self.submit_get(&ctx);
            }

            // Retrieved text
            if self.form.show_retrieved() {
                ui.add_space(theme::SPACING_XL);
                theme::card_frame().show(ui, |ui| {
                    ui.set_width(width);
                    ui.horizontal_top(|ui| {
                        let text_width =
                            ui.available_width() - theme::ICON_BUTTON_SIZE - theme::SPACING_MD;
                        egui::ScrollArea::vertical()
                            .max_height(theme::TEXT_AREA_HEIGHT)
                            .show(ui, |ui| {
                                ui.add(
                                    egui::TextEdit::multiline(&mut self.form.retrieved_value.as_str())
                                        .desired_width(text_width)
                                        .frame(false),
                                );
                            });
                        copy_text = theme::icon_button(
                            ui,
                            egui_phosphor::regular::CLIPBOARD_TEXT,
                            "Copy to clipboard",
                        )
                        .clicked();
                    });
                });
            }
            ui.add_space(theme::SPACING_XL);
        });

        if copy_key {
            let key = self.form.response_key.clone();
            self.copy_to_clipboard(&key);
        }
        if copy_text {
            let text = self.form.retrieved_value.clone();
            self.copy_to_clipboard(&text);
        }
    }
}
