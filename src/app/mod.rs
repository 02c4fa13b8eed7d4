//! App module - contains the main application state and logic

mod clipboard;
pub mod form;
mod history;
mod requests;
mod settings_panel;
pub mod toasts;
mod views;

use crate::api::{ApiError, ClipboardClient};
use crate::db::{Database, SavedKey};
use crate::settings::{env_backend_url, Settings};
use crate::theme;
use crate::types::*;
use eframe::egui;
use form::ClipboardForm;
use settings_panel::SettingsDraft;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use toasts::{ToastId, Toasts};
use tracing::{info, warn};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) form: ClipboardForm,
    // Backend
    pub(crate) client: Result<ClipboardClient, ApiError>,
    // CLIPBOARD_BACKEND_URL as read at startup
    pub(crate) backend_override: Option<String>,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) request_state: Arc<Mutex<RequestState>>,
    pub(crate) save_toast: Option<ToastId>,
    pub(crate) get_toast: Option<ToastId>,
    // Text of the in-flight save, kept for the history preview
    pub(crate) pending_save_text: Option<String>,
    // Feedback
    pub(crate) toasts: Toasts,
    pub(crate) clipboard: Option<arboard::Clipboard>,
    // History
    pub(crate) db: Option<Database>,
    pub(crate) history: Vec<SavedKey>,
    // Settings
    pub(crate) settings: Settings,
    pub(crate) settings_draft: SettingsDraft,
    pub(crate) show_settings: bool,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        settings: Settings,
        db: Option<Database>,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        Self::with_backend_override(settings, env_backend_url(), db, data_dir, runtime)
    }

    /// Build the app with an explicit backend override instead of reading the environment
    pub(crate) fn with_backend_override(
        settings: Settings,
        backend_override: Option<String>,
        db: Option<Database>,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        let backend_url = settings.effective_backend_url(backend_override.as_deref());
        let client = ClipboardClient::new(&backend_url, settings.request_timeout());
        match &client {
            Ok(c) => info!(
                url = c.base_url(),
                overridden = backend_override.is_some(),
                "Backend configured"
            ),
            Err(e) => warn!(error = %e, "Backend URL rejected, requests disabled until fixed in settings"),
        }

        let mut app = Self {
            form: ClipboardForm::default(),
            client,
            backend_override,
            runtime,
            request_state: Arc::new(Mutex::new(RequestState::default())),
            save_toast: None,
            get_toast: None,
            pending_save_text: None,
            toasts: Toasts::default(),
            clipboard: None,
            db,
            history: Vec::new(),
            settings_draft: SettingsDraft::from_settings(&settings, &backend_url),
            settings,
            show_settings: false,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        };

        app.prune_history();
        app.refresh_history();
        app
    }

    /// One-time egui setup: icon font and theme
    pub fn configure_context(ctx: &egui::Context) {
        ctx.set_theme(egui::Theme::Dark);

        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        ctx.set_fonts(fonts);

        theme::apply_visuals(ctx);
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        self.settings.save(&self.data_dir);
    }

    pub fn backend_overridden(&self) -> bool {
        self.backend_override.is_some()
    }

    pub fn backend_url(&self) -> String {
        self.settings.effective_backend_url(self.backend_override.as_deref())
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.request_state.lock().unwrap().slot(kind).is_pending()
    }
}
