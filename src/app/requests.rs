//! Save / retrieve requests

use super::toasts::{ToastId, ToastKind};
use super::App;
use crate::api::{ApiError, ClipboardClient};
use crate::constants::*;
use crate::types::*;
use eframe::egui;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Run one backend call in the background and park its result in `state`.
fn spawn_request(
    kind: RequestKind,
    input: String,
    client: ClipboardClient,
    state: Arc<Mutex<RequestState>>,
    ctx: egui::Context,
    runtime: &tokio::runtime::Runtime,
) {
    runtime.spawn(async move {
        let result = match kind {
            RequestKind::Save => client.save(&input).await,
            RequestKind::Get => client.get(&input).await,
        };
        *state.lock().unwrap().slot_mut(kind) = RequestStatus::Finished(result);
        ctx.request_repaint();
    });
}

impl App {
    pub fn submit_save(&mut self, ctx: &egui::Context) {
        // A result that landed after this frame's poll must be folded in before the slot is reused
        self.poll_requests();
        if self.is_pending(RequestKind::Save) {
            return;
        }
        let Some(value) = self.form.prepare_save() else {
            debug!("Empty text rejected");
            return;
        };
        let Some(client) = self.ready_client(RequestKind::Save) else {
            return;
        };

        info!(bytes = value.len(), "Saving text");
        self.save_toast = Some(self.toasts.pending(TOAST_SAVING, Instant::now()));
        self.pending_save_text = Some(value.clone());
        self.start(RequestKind::Save, value, client, ctx);
    }

    pub fn submit_get(&mut self, ctx: &egui::Context) {
        self.poll_requests();
        if self.is_pending(RequestKind::Get) {
            return;
        }
        let Some(key) = self.form.prepare_get() else {
            debug!("Empty key rejected");
            return;
        };
        let Some(client) = self.ready_client(RequestKind::Get) else {
            return;
        };

        info!(key = %key, "Retrieving text");
        self.get_toast = Some(self.toasts.pending(TOAST_RETRIEVING, Instant::now()));
        self.start(RequestKind::Get, key, client, ctx);
    }

    /// Fold finished requests back into the form and the toasts
    pub fn poll_requests(&mut self) {
        let (save, get) = {
            let mut s = self.request_state.lock().unwrap();
            (s.save.take_finished(), s.get.take_finished())
        };
        if let Some(result) = save {
            self.finish_save(result);
        }
        if let Some(result) = get {
            self.finish_get(result);
        }
    }

    fn ready_client(&mut self, kind: RequestKind) -> Option<ClipboardClient> {
        match &self.client {
            Ok(client) => Some(client.clone()),
            Err(e) => {
                warn!(?kind, error = %e, "No usable backend");
                self.toasts.error(e.to_string(), Instant::now());
                None
            }
        }
    }

    fn start(&mut self, kind: RequestKind, input: String, client: ClipboardClient, ctx: &egui::Context) {
        *self.request_state.lock().unwrap().slot_mut(kind) = RequestStatus::Pending;
        spawn_request(
            kind,
            input,
            client,
            self.request_state.clone(),
            ctx.clone(),
            &self.runtime,
        );
    }

    pub(crate) fn finish_save(&mut self, result: Result<String, ApiError>) {
        let text = self.pending_save_text.take();
        let toast = self.save_toast.take();
        self.form.apply_save(&result);

        match &result {
            Ok(key) => {
                info!(key = %key, "Text saved");
                self.resolve_toast(toast, ToastKind::Success, TOAST_SAVED);
                if let Some(text) = text {
                    self.record_history(key, &text);
                }
            }
            Err(e) => {
                warn!(error = %e, "Save failed");
                self.resolve_toast(toast, ToastKind::Error, TOAST_SAVE_FAILED);
            }
        }
    }

    pub(crate) fn finish_get(&mut self, result: Result<String, ApiError>) {
        let toast = self.get_toast.take();
        self.form.apply_get(&result);

        match &result {
            Ok(data) => {
                info!(bytes = data.len(), "Text retrieved");
                self.resolve_toast(toast, ToastKind::Success, TOAST_RETRIEVED);
            }
            Err(e) => {
                warn!(error = %e, "Retrieve failed");
                self.resolve_toast(toast, ToastKind::Error, TOAST_RETRIEVE_FAILED);
            }
        }
    }

    fn resolve_toast(&mut self, id: Option<ToastId>, kind: ToastKind, message: &str) {
        let now = Instant::now();
        match id {
            Some(id) => {
                self.toasts.resolve(id, kind, message, now);
            }
            None if kind == ToastKind::Error => {
                self.toasts.error(message, now);
            }
            None => {
                self.toasts.success(message, now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_app;
    use super::*;
    use std::time::Duration;

    /// Port that nothing listens on
    fn dead_backend() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn wait_for(app: &mut App, kind: RequestKind) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.is_pending(kind) {
            assert!(Instant::now() < deadline, "request never finished");
            std::thread::sleep(Duration::from_millis(20));
        }
        app.poll_requests();
    }

    fn kinds(app: &App) -> Vec<(ToastKind, String)> {
        app.toasts.iter().map(|t| (t.kind, t.message.clone())).collect()
    }

    #[test]
    fn empty_text_makes_no_request() {
        let (mut app, _dir) = test_app("http://localhost:8080");
        let ctx = egui::Context::default();
        app.form.value = "   ".into();

        app.submit_save(&ctx);

        assert!(!app.is_pending(RequestKind::Save));
        assert!(app.toasts.is_empty());
        assert_eq!(app.form.error, MSG_EMPTY_TEXT);
        assert!(app.form.value.is_empty());
    }

    #[test]
    fn empty_key_makes_no_request() {
        let (mut app, _dir) = test_app("http://localhost:8080");
        let ctx = egui::Context::default();

        app.submit_get(&ctx);

        assert!(!app.is_pending(RequestKind::Get));
        assert!(app.toasts.is_empty());
        assert_eq!(app.form.error, MSG_EMPTY_KEY);
    }

    #[test]
    fn second_save_is_ignored_while_pending() {
        let (mut app, _dir) = test_app("http://localhost:8080");
        let ctx = egui::Context::default();
        app.request_state.lock().unwrap().save = RequestStatus::Pending;
        app.form.value = "hello".into();

        app.submit_save(&ctx);

        assert!(app.toasts.is_empty());
        assert!(app.pending_save_text.is_none());
    }

    #[test]
    fn unreachable_backend_resolves_to_error_toast() {
        let (mut app, _dir) = test_app(&dead_backend());
        let ctx = egui::Context::default();
        app.form.value = "hello".into();
        app.form.error = "previous".into();

        app.submit_save(&ctx);
        // The refusal can land before this line; only the poll changes the toasts
        assert!(app.save_toast.is_some());
        assert_eq!(kinds(&app), vec![(ToastKind::Pending, TOAST_SAVING.to_string())]);

        wait_for(&mut app, RequestKind::Save);

        assert_eq!(kinds(&app), vec![(ToastKind::Error, TOAST_SAVE_FAILED.to_string())]);
        // Transport failures do not touch the error line
        assert_eq!(app.form.error, "previous");
        assert!(app.history.is_empty());
    }

    #[test]
    fn unpolled_save_result_is_kept_when_saving_again() {
        let (mut app, _dir) = test_app(&dead_backend());
        let ctx = egui::Context::default();
        let now = Instant::now();
        app.save_toast = Some(app.toasts.pending(TOAST_SAVING, now));
        app.pending_save_text = Some("first text".into());
        app.request_state.lock().unwrap().save = RequestStatus::Finished(Ok("k1".into()));
        app.form.value = "second text".into();

        app.submit_save(&ctx);

        assert_eq!(app.form.response_key, "k1");
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].key, "k1");
        assert_eq!(app.history[0].preview, "first text");
        let toasts = kinds(&app);
        assert_eq!(toasts[0], (ToastKind::Success, TOAST_SAVED.to_string()));
        assert_eq!(toasts[1], (ToastKind::Pending, TOAST_SAVING.to_string()));
        assert_eq!(app.pending_save_text.as_deref(), Some("second text"));

        wait_for(&mut app, RequestKind::Save);
        assert!(app.toasts.iter().all(|t| t.kind != ToastKind::Pending));
    }

    #[test]
    fn unpolled_get_result_is_kept_when_retrieving_again() {
        let (mut app, _dir) = test_app(&dead_backend());
        let ctx = egui::Context::default();
        app.get_toast = Some(app.toasts.pending(TOAST_RETRIEVING, Instant::now()));
        app.request_state.lock().unwrap().get = RequestStatus::Finished(Ok("stored text".into()));
        app.form.key = "abc123".into();

        app.submit_get(&ctx);

        assert_eq!(app.form.retrieved_value, "stored text");
        let toasts = kinds(&app);
        assert_eq!(toasts[0], (ToastKind::Success, TOAST_RETRIEVED.to_string()));
        assert_eq!(toasts[1], (ToastKind::Pending, TOAST_RETRIEVING.to_string()));

        wait_for(&mut app, RequestKind::Get);
        assert!(app.toasts.iter().all(|t| t.kind != ToastKind::Pending));
    }

    #[test]
    fn finished_save_updates_form_toast_and_history() {
        let (mut app, _dir) = test_app("http://localhost:8080");
        let now = Instant::now();
        app.save_toast = Some(app.toasts.pending(TOAST_SAVING, now));
        app.pending_save_text = Some("some text".into());

        app.finish_save(Ok("0f3a9c".into()));

        assert_eq!(app.form.response_key, "0f3a9c");
        assert_eq!(kinds(&app), vec![(ToastKind::Success, TOAST_SAVED.to_string())]);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].key, "0f3a9c");
        assert_eq!(app.history[0].preview, "some text");
    }

    #[test]
    fn finished_get_with_server_error_shows_message() {
        let (mut app, _dir) = test_app("http://localhost:8080");
        app.get_toast = Some(app.toasts.pending(TOAST_RETRIEVING, Instant::now()));

        app.finish_get(Err(ApiError::Server("Invalid Key".into())));

        assert_eq!(app.form.error, "Invalid Key");
        assert_eq!(kinds(&app), vec![(ToastKind::Error, TOAST_RETRIEVE_FAILED.to_string())]);
    }

    #[test]
    fn finished_get_shows_text() {
        let (mut app, _dir) = test_app("http://localhost:8080");
        app.form.response_key = "0f3a9c".into();
        app.get_toast = Some(app.toasts.pending(TOAST_RETRIEVING, Instant::now()));

        app.finish_get(Ok("stored text".into()));

        assert_eq!(app.form.retrieved_value, "stored text");
        assert!(app.form.response_key.is_empty());
        assert_eq!(kinds(&app), vec![(ToastKind::Success, TOAST_RETRIEVED.to_string())]);
    }

    #[test]
    fn invalid_backend_url_reports_instead_of_sending() {
        let (mut app, _dir) = test_app("not a url");
        let ctx = egui::Context::default();
        app.form.key = "abc123".into();

        app.submit_get(&ctx);

        assert!(!app.is_pending(RequestKind::Get));
        let toasts = kinds(&app);
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].0, ToastKind::Error);
        assert!(toasts[0].1.contains("invalid backend URL"));
    }
}
